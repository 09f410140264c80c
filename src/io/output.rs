//! Writing the distance and error tables.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::models::{DistanceRecord, ErrorRecord};

const DISTANCE_HEADER: [&str; 5] = [
    "location_name",
    "project_number",
    "year_range",
    "block_group",
    "distance_km",
];

const ERROR_HEADER: [&str; 9] = [
    "location_name",
    "project_number",
    "year_range",
    "reason",
    "detail",
    "from_lat_long",
    "to_lat_long",
    "from_blockgroup",
    "to_blockgroup",
];

pub fn write_distances(path: &Path, records: &[DistanceRecord]) -> Result<()> {
    write_table(path, &DISTANCE_HEADER, records)?;
    info!("Wrote {} distance records to {}", records.len(), path.display());
    Ok(())
}

pub fn write_errors(path: &Path, records: &[ErrorRecord]) -> Result<()> {
    write_table(path, &ERROR_HEADER, records)?;
    info!("Wrote {} error records to {}", records.len(), path.display());
    Ok(())
}

/// The header is written explicitly so an empty table still has one
fn write_table<T: Serialize>(path: &Path, header: &[&str], records: &[T]) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer.write_record(header)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("distances.csv");
        let records = vec![DistanceRecord {
            location_name: "Main St".to_string(),
            project_number: None,
            year_range: Some("2019-2023".to_string()),
            block_group: "170318391001".to_string(),
            distance_km: 0.001,
        }];
        write_distances(&path, &records).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("location_name,project_number,year_range,block_group,distance_km")
        );
        assert_eq!(lines.next(), Some("Main St,,2019-2023,170318391001,0.001"));
    }

    #[test]
    fn test_empty_error_table_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("errors.csv");
        write_errors(&path, &[]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("location_name,project_number,year_range,reason,detail"));
        assert_eq!(text.lines().count(), 1);
    }
}
