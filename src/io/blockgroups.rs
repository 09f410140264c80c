//! Loading the block-group table.

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::path::Path;
use tracing::{info, warn};

use super::{open_input, parse_multipolygon};
use crate::catalog::BlockGroup;
use crate::models::BlockGroupId;

const ID_COLUMNS: [&str; 2] = ["id", "stfid"];
const BOUNDARY_COLUMNS: [&str; 2] = ["boundary", "geom"];

/// Load block groups from a CSV (or `.csv.gz`) table, in file order.
///
/// Rows whose boundary text cannot be parsed are skipped with a warning.
pub fn load_block_groups(path: &Path) -> Result<Vec<BlockGroup>> {
    info!("Loading block groups from {}", path.display());
    let reader = open_input(path)?;
    read_block_groups(reader)
}

pub fn read_block_groups<R: std::io::Read>(reader: R) -> Result<Vec<BlockGroup>> {
    let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    // Find column indices
    let id_idx = headers
        .iter()
        .position(|h| ID_COLUMNS.contains(&h.trim()))
        .context("Column 'id' not found")?;
    let boundary_idx = headers
        .iter()
        .position(|h| BOUNDARY_COLUMNS.contains(&h.trim()))
        .context("Column 'boundary' not found")?;

    let mut groups = Vec::new();
    let mut skipped = 0usize;

    for (row, result) in csv_reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read block-group row {}", row + 1))?;
        let id = BlockGroupId::new(&record[id_idx]);

        match parse_multipolygon(&record[boundary_idx]) {
            Ok(geometry) => groups.push(BlockGroup::new(id, geometry)),
            Err(e) => {
                warn!("Skipping block group {}: {}", id, e);
                skipped += 1;
            }
        }
    }

    info!("Loaded {} block groups ({} skipped)", groups.len(), skipped);
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    const TABLE: &str = "id,boundary\n\
        170318391001,\"MULTIPOLYGON (((-87.64 41.87, -87.61 41.87, -87.61 41.90, -87.64 41.90, -87.64 41.87)))\"\n\
        170318391002,\"not a polygon\"\n";

    #[test]
    fn test_read_skips_unparseable_rows() {
        let groups = read_block_groups(TABLE.as_bytes()).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id.as_str(), "170318391001");
        assert_eq!(groups[0].bbox(), Some((-87.64, 41.87, -87.61, 41.90)));
    }

    #[test]
    fn test_legacy_column_names() {
        let table = "geom,stfid\n\"POLYGON ((0 0, 1 0, 1 1, 0 1))\",42.0\n";
        let groups = read_block_groups(table.as_bytes()).unwrap();
        assert_eq!(groups[0].id.as_str(), "42");
        assert!(groups[0].defect().is_none());
    }

    #[test]
    fn test_missing_columns() {
        assert!(read_block_groups("name,shape\na,b\n".as_bytes()).is_err());
    }

    #[test]
    fn test_load_gzip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blockgroups.csv.gz");
        let mut encoder = GzEncoder::new(std::fs::File::create(&path).unwrap(), Compression::default());
        encoder.write_all(TABLE.as_bytes()).unwrap();
        encoder.finish().unwrap();

        let groups = load_block_groups(&path).unwrap();
        assert_eq!(groups.len(), 1);
    }
}
