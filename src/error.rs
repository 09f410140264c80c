//! Error taxonomy shared by parsing, catalog queries and apportionment.

use thiserror::Error;

use crate::apportion::Strategy;
use crate::models::BlockGroupId;

/// Failure to interpret a serialized coordinate or boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("malformed lat/long pair: {0:?}")]
    LatLong(String),

    #[error("malformed boundary: {0}")]
    Boundary(String),

    #[error("non-finite coordinate in {0:?}")]
    NonFinite(String),
}

/// A boundary that cannot take part in geometric queries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("ring {ring} has {vertices} vertices after closing, need at least 4")]
    DegenerateRing { ring: usize, vertices: usize },

    #[error("boundary has no polygons")]
    EmptyBoundary,
}

/// Why a location could not be apportioned.
///
/// Every variant is terminal for that location only; the run continues.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApportionError {
    #[error("unresolvable endpoint: {reason}")]
    UnresolvableEndpoint { reason: &'static str },

    #[error("intersection with block group {block_group} failed: {source}")]
    GeometryFailed {
        block_group: BlockGroupId,
        #[source]
        source: GeometryError,
    },

    #[error(
        "{strategy} credited {credited_km:.6} km but segment is {expected_km:.6} km (tolerance {tolerance_km} km)"
    )]
    Reconciliation {
        strategy: Strategy,
        credited_km: f64,
        expected_km: f64,
        tolerance_km: f64,
    },
}

impl ApportionError {
    /// Stable label written to the error table
    pub fn kind(&self) -> &'static str {
        match self {
            ApportionError::UnresolvableEndpoint { .. } => "unresolvable_endpoint",
            ApportionError::GeometryFailed { .. } => "geometry_failed",
            ApportionError::Reconciliation { .. } => "reconciliation_failed",
        }
    }
}
