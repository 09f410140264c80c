//! Reading and writing the locations table.

use anyhow::{Context, Result};
use csv::{ReaderBuilder, Writer};
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use super::{open_input, parse_lat_long};
use crate::models::{Endpoint, GeoPoint, Location};

/// One row of the locations table as it appears on disk.
///
/// Unknown columns are ignored on read and dropped on write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationRow {
    pub location_name: String,
    #[serde(default)]
    pub project_number: Option<String>,
    #[serde(default)]
    pub year_range: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub from_lat_long: Option<String>,
    #[serde(default)]
    pub to_lat_long: Option<String>,
    #[serde(default)]
    pub from_blockgroup: Option<String>,
    #[serde(default)]
    pub to_blockgroup: Option<String>,
}

impl LocationRow {
    /// Parse the string-encoded cells into a typed location.
    ///
    /// A malformed coordinate is treated as missing, so the location still
    /// reaches the apportioner and is reported rather than dropped.
    pub fn to_location(&self) -> Location {
        Location {
            name: self.location_name.clone(),
            project_number: self.project_number.clone(),
            year_range: self.year_range.clone(),
            from: self.point(self.from_lat_long.as_deref()),
            to: self.point(self.to_lat_long.as_deref()),
            from_blockgroup: Endpoint::parse(self.from_blockgroup.as_deref().unwrap_or("")),
            to_blockgroup: Endpoint::parse(self.to_blockgroup.as_deref().unwrap_or("")),
        }
    }

    fn point(&self, raw: Option<&str>) -> Option<GeoPoint> {
        match parse_lat_long(raw.unwrap_or("")) {
            Ok(point) => point,
            Err(e) => {
                warn!("{}: {}", self.location_name, e);
                None
            }
        }
    }
}

/// Read the raw rows of a locations table
pub fn read_location_rows(path: &Path) -> Result<Vec<LocationRow>> {
    info!("Loading locations from {}", path.display());
    let reader = open_input(path)?;
    parse_location_rows(reader)
}

pub fn parse_location_rows<R: std::io::Read>(reader: R) -> Result<Vec<LocationRow>> {
    let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let mut rows = Vec::new();
    for (n, result) in csv_reader.deserialize().enumerate() {
        let row: LocationRow =
            result.with_context(|| format!("Failed to read location row {}", n + 1))?;
        rows.push(row);
    }

    info!("Loaded {} location rows", rows.len());
    Ok(rows)
}

/// Read a resolved locations table into typed locations
pub fn read_locations(path: &Path) -> Result<Vec<Location>> {
    let rows = read_location_rows(path)?;

    let mut seen = HashSet::with_capacity(rows.len());
    for row in &rows {
        if !seen.insert(row.location_name.as_str()) {
            warn!("Duplicate location name {:?}", row.location_name);
        }
    }

    Ok(rows.iter().map(LocationRow::to_location).collect())
}

pub fn write_location_rows(path: &Path, rows: &[LocationRow]) -> Result<()> {
    let mut writer =
        Writer::from_path(path).with_context(|| format!("Failed to create {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!("Wrote {} location rows to {}", rows.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BlockGroupId;

    const TABLE: &str = ",project_number,location_name,year_range,from,to,from_lat_long,to_lat_long,from_blockgroup,to_blockgroup\n\
        0,P-17,Main St From 1st To 2nd,2019-2023,Main & 1st,Main & 2nd,\"[41.88, -87.63]\",\"[41.89, -87.62]\",170318391001,\"[41.89, -87.62]\"\n\
        1,P-18,Elm St And Oak St,2019-2023,Elm St And Oak St,None,\"[41.5, -87.5]\",None,170318391002,None\n";

    #[test]
    fn test_parse_rows_ignores_unknown_columns() {
        let rows = parse_location_rows(TABLE.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].project_number.as_deref(), Some("P-17"));
        assert_eq!(rows[1].to_lat_long.as_deref(), Some("None"));
    }

    #[test]
    fn test_to_location() {
        let rows = parse_location_rows(TABLE.as_bytes()).unwrap();

        let segment = rows[0].to_location();
        assert_eq!(segment.from, Some(GeoPoint::new(41.88, -87.63)));
        assert_eq!(segment.to, Some(GeoPoint::new(41.89, -87.62)));
        assert_eq!(
            segment.from_blockgroup,
            Endpoint::Resolved(BlockGroupId::new("170318391001"))
        );
        assert_eq!(segment.to_blockgroup, Endpoint::Unresolved);

        let single = rows[1].to_location();
        assert!(single.to.is_none());
        assert!(single.segment().unwrap().is_degenerate());
    }

    #[test]
    fn test_malformed_coordinate_becomes_missing() {
        let row = LocationRow {
            location_name: "Bad".to_string(),
            from_lat_long: Some("[abc]".to_string()),
            ..Default::default()
        };
        let loc = row.to_location();
        assert!(loc.from.is_none());
        assert!(loc.segment().is_none());
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resolved.csv");
        let rows = parse_location_rows(TABLE.as_bytes()).unwrap();

        write_location_rows(&path, &rows).unwrap();
        let locations = read_locations(&path).unwrap();
        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0].name, "Main St From 1st To 2nd");
        assert_eq!(locations[1].year_range.as_deref(), Some("2019-2023"));
    }
}
