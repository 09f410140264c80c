//! Output rows of a run: apportioned distances and failed locations.

use serde::Serialize;

use super::{Endpoint, GeoPoint, Location};
use crate::error::ApportionError;

/// Distance of one location lying inside one block group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceRecord {
    pub location_name: String,
    pub project_number: Option<String>,
    pub year_range: Option<String>,
    pub block_group: String,
    pub distance_km: f64,
}

/// A location that could not be apportioned, with enough of its input to
/// re-diagnose by hand
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorRecord {
    pub location_name: String,
    pub project_number: Option<String>,
    pub year_range: Option<String>,
    pub reason: String,
    pub detail: String,
    pub from_lat_long: String,
    pub to_lat_long: String,
    pub from_blockgroup: String,
    pub to_blockgroup: String,
}

impl ErrorRecord {
    pub fn new(location: &Location, error: &ApportionError) -> Self {
        let point = |p: Option<GeoPoint>| {
            p.map(|p| p.to_string()).unwrap_or_else(|| "None".to_string())
        };
        let endpoint = |e: &Endpoint| match e {
            Endpoint::Resolved(id) => id.to_string(),
            Endpoint::Unresolved => "unresolved".to_string(),
        };

        Self {
            location_name: location.name.clone(),
            project_number: location.project_number.clone(),
            year_range: location.year_range.clone(),
            reason: error.kind().to_string(),
            detail: error.to_string(),
            from_lat_long: point(location.from),
            to_lat_long: point(location.to),
            from_blockgroup: endpoint(&location.from_blockgroup),
            to_blockgroup: endpoint(&location.to_blockgroup),
        }
    }
}
