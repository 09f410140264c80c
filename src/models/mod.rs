//! Core data models for the apportionment pipeline.

pub mod location;
pub mod point;
pub mod record;

pub use location::{BlockGroupId, Endpoint, Location};
pub use point::{GeoPoint, Segment};
pub use record::{DistanceRecord, ErrorRecord};
