//! Project locations and their endpoint block-group resolutions.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{GeoPoint, Segment};

/// Opaque block-group identifier (e.g. a census `stfid`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockGroupId(String);

impl BlockGroupId {
    /// Build an id from a table cell.
    ///
    /// Integer-like ids written through a float column (`"170318391001.0"`)
    /// are folded back to their integer spelling.
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim();
        let normalized = match trimmed.strip_suffix(".0") {
            Some(int) if !int.is_empty() && int.bytes().all(|b| b.is_ascii_digit()) => int,
            _ => trimmed,
        };
        Self(normalized.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of resolving one endpoint to the block group that contains it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Resolved(BlockGroupId),
    /// Coordinate missing, or outside every known block group
    Unresolved,
}

impl Endpoint {
    /// Interpret a `from_blockgroup` / `to_blockgroup` cell.
    ///
    /// A bracketed coordinate string, `None` or an empty cell all mean the
    /// endpoint was never matched to a block group.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "None" || trimmed.starts_with('[') {
            Endpoint::Unresolved
        } else {
            Endpoint::Resolved(BlockGroupId::new(trimmed))
        }
    }

    pub fn id(&self) -> Option<&BlockGroupId> {
        match self {
            Endpoint::Resolved(id) => Some(id),
            Endpoint::Unresolved => None,
        }
    }
}

/// A single project location, parsed once at ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    /// Unique key
    pub name: String,
    pub project_number: Option<String>,
    pub year_range: Option<String>,
    pub from: Option<GeoPoint>,
    pub to: Option<GeoPoint>,
    pub from_blockgroup: Endpoint,
    pub to_blockgroup: Endpoint,
}

impl Location {
    /// Create a location with no project metadata
    pub fn new(
        name: impl Into<String>,
        from: Option<GeoPoint>,
        to: Option<GeoPoint>,
        from_blockgroup: Endpoint,
        to_blockgroup: Endpoint,
    ) -> Self {
        Self {
            name: name.into(),
            project_number: None,
            year_range: None,
            from,
            to,
            from_blockgroup,
            to_blockgroup,
        }
    }

    /// The segment between the endpoints; `None` without a `from` coordinate
    pub fn segment(&self) -> Option<Segment> {
        self.from.map(|from| Segment::new(from, self.to))
    }
}
