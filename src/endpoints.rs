//! Endpoint resolution: matches each location's coordinates to the block
//! group that contains them.

use rayon::prelude::*;
use tracing::{info, warn};

use crate::catalog::BlockGroupCatalog;
use crate::io::latlong::{is_missing, parse_lat_long};
use crate::io::LocationRow;

/// Outcome counts of a resolution pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveSummary {
    pub resolved: usize,
    pub unresolved: usize,
    pub absent: usize,
}

/// Resolve one coordinate cell to its block-group cell.
///
/// Returns the block-group id when the point lies inside one, the original
/// coordinate text when it does not, and `None` when there is no coordinate.
pub fn resolve_cell(catalog: &BlockGroupCatalog, lat_long: Option<&str>) -> String {
    let raw = lat_long.unwrap_or("None");
    match parse_lat_long(raw) {
        Ok(Some(point)) => match catalog.contains(point) {
            Some(id) => id.to_string(),
            None => raw.trim().to_string(),
        },
        Ok(None) => "None".to_string(),
        Err(e) => {
            warn!("Leaving coordinate unresolved: {}", e);
            raw.trim().to_string()
        }
    }
}

/// True when the row was geocoded to an empty result and cannot be placed
pub fn has_empty_coordinates(row: &LocationRow) -> bool {
    [&row.from_lat_long, &row.to_lat_long]
        .iter()
        .any(|cell| cell.as_deref().map(str::trim) == Some("[]"))
}

/// Fill `from_blockgroup` / `to_blockgroup` on every row.
///
/// Rows are independent, so they are resolved in parallel against the
/// shared catalog.
pub fn resolve_rows(catalog: &BlockGroupCatalog, rows: &mut [LocationRow]) -> ResolveSummary {
    rows.par_iter_mut().for_each(|row| {
        row.from_blockgroup = Some(resolve_cell(catalog, row.from_lat_long.as_deref()));
        row.to_blockgroup = Some(resolve_cell(catalog, row.to_lat_long.as_deref()));
    });

    let mut summary = ResolveSummary::default();
    for row in rows.iter() {
        let cells = [
            (&row.from_lat_long, &row.from_blockgroup),
            (&row.to_lat_long, &row.to_blockgroup),
        ];
        for (lat_long, blockgroup) in cells {
            if lat_long.as_deref().map_or(true, is_missing) {
                summary.absent += 1;
            } else if blockgroup.as_deref().map_or(false, |b| !b.starts_with('[')) {
                summary.resolved += 1;
            } else {
                summary.unresolved += 1;
            }
        }
    }

    info!(
        "Resolved {} endpoint(s), {} outside every block group, {} without coordinates",
        summary.resolved, summary.unresolved, summary.absent
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BlockGroup;
    use crate::models::BlockGroupId;
    use geo::{polygon, MultiPolygon};

    fn catalog() -> BlockGroupCatalog {
        BlockGroupCatalog::new(vec![BlockGroup::new(
            BlockGroupId::new("170318391001"),
            MultiPolygon::new(vec![polygon![
                (x: -87.64, y: 41.87),
                (x: -87.61, y: 41.87),
                (x: -87.61, y: 41.90),
                (x: -87.64, y: 41.90)
            ]]),
        )])
    }

    fn row(from: &str, to: &str) -> LocationRow {
        LocationRow {
            location_name: "Main St".to_string(),
            from_lat_long: Some(from.to_string()),
            to_lat_long: Some(to.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_cell() {
        let catalog = catalog();
        assert_eq!(resolve_cell(&catalog, Some("[41.88, -87.63]")), "170318391001");
        assert_eq!(resolve_cell(&catalog, Some("[40.0, -80.0]")), "[40.0, -80.0]");
        assert_eq!(resolve_cell(&catalog, Some("None")), "None");
        assert_eq!(resolve_cell(&catalog, None), "None");
    }

    #[test]
    fn test_resolve_rows() {
        let catalog = catalog();
        let mut rows = vec![
            row("[41.88, -87.63]", "[41.89, -87.62]"),
            row("[41.88, -87.63]", "None"),
            row("[10.0, 10.0]", "[41.89, -87.62]"),
        ];
        let summary = resolve_rows(&catalog, &mut rows);

        assert_eq!(rows[0].to_blockgroup.as_deref(), Some("170318391001"));
        assert_eq!(rows[1].to_blockgroup.as_deref(), Some("None"));
        assert_eq!(rows[2].from_blockgroup.as_deref(), Some("[10.0, 10.0]"));
        assert_eq!(
            summary,
            ResolveSummary {
                resolved: 4,
                unresolved: 1,
                absent: 1
            }
        );
    }

    #[test]
    fn test_empty_coordinates_detected() {
        assert!(has_empty_coordinates(&row("[]", "None")));
        assert!(!has_empty_coordinates(&row("[41.88, -87.63]", "None")));
    }
}
