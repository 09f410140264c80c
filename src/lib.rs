//! Blockmiles - apportions straight-line project segments across block groups
//!
//! This library provides shared types and modules for the resolve and apportion binaries.

pub mod aggregate;
pub mod apportion;
pub mod catalog;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod geometry;
pub mod io;
pub mod models;

pub use aggregate::DistanceTable;
pub use apportion::{Apportioner, Strategy};
pub use catalog::{BlockGroup, BlockGroupCatalog};
pub use models::{BlockGroupId, Endpoint, GeoPoint, Location, Segment};
