//! Segment apportionment: splits a location's length across the block
//! groups its segment passes through.
//!
//! Strategies are tried from cheapest to most general:
//!
//! 1. single point: no second endpoint, a nominal length is credited
//! 2. same block group at both ends, segment never leaves it
//! 3. two block groups whose pieces add up to the whole segment
//! 4. exhaustive scan over every block group the segment meets
//!
//! The shortcuts fall through to the exhaustive scan whenever their
//! assumptions do not hold. Every location ends committed or failed.

mod ledger;

pub use ledger::CreditLedger;

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::catalog::{BlockGroup, BlockGroupCatalog};
use crate::error::ApportionError;
use crate::geometry::Span;
use crate::models::{BlockGroupId, Endpoint, Location, Segment};

/// Reconciliation slack for the one- and two-block-group shortcuts (about 1 m)
pub const TOTAL_LENGTH_TOLERANCE_KM: f64 = 0.001;

/// Reconciliation slack for the exhaustive scan (about 10 m)
pub const EXHAUSTIVE_TOLERANCE_KM: f64 = 0.01;

/// Length recorded for a location with a single endpoint
pub const SINGLE_POINT_LENGTH_KM: f64 = 0.001;

/// Tolerance and nominal-length policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApportionSettings {
    pub two_way_tolerance_km: f64,
    pub exhaustive_tolerance_km: f64,
    pub single_point_km: f64,
}

impl Default for ApportionSettings {
    fn default() -> Self {
        Self {
            two_way_tolerance_km: TOTAL_LENGTH_TOLERANCE_KM,
            exhaustive_tolerance_km: EXHAUSTIVE_TOLERANCE_KM,
            single_point_km: SINGLE_POINT_LENGTH_KM,
        }
    }
}

/// Which case produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    SinglePoint,
    SameBlockGroup,
    TwoBlockGroups,
    Exhaustive,
}

impl Strategy {
    pub fn all() -> &'static [Strategy] {
        &[
            Strategy::SinglePoint,
            Strategy::SameBlockGroup,
            Strategy::TwoBlockGroups,
            Strategy::Exhaustive,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::SinglePoint => "single_point",
            Strategy::SameBlockGroup => "same_block_group",
            Strategy::TwoBlockGroups => "two_block_groups",
            Strategy::Exhaustive => "exhaustive",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Committed distances for one location
#[derive(Debug, Clone, PartialEq)]
pub struct Apportionment {
    pub strategy: Strategy,
    /// Non-empty, in the order block groups were found along the scan
    pub distances: Vec<(BlockGroupId, f64)>,
}

impl Apportionment {
    pub fn total_km(&self) -> f64 {
        self.distances.iter().map(|(_, km)| km).sum()
    }

    pub fn distance(&self, id: &str) -> Option<f64> {
        self.distances
            .iter()
            .find(|(bg, _)| bg.as_str() == id)
            .map(|(_, km)| *km)
    }
}

/// Apportions locations against a shared, read-only catalog
pub struct Apportioner<'c> {
    catalog: &'c BlockGroupCatalog,
    settings: ApportionSettings,
}

impl<'c> Apportioner<'c> {
    pub fn new(catalog: &'c BlockGroupCatalog, settings: ApportionSettings) -> Self {
        Self { catalog, settings }
    }

    /// Apportion one location.
    ///
    /// Pure with respect to the catalog: the same location always yields the
    /// same result.
    pub fn apportion(&self, location: &Location) -> Result<Apportionment, ApportionError> {
        let segment = location
            .segment()
            .ok_or(ApportionError::UnresolvableEndpoint {
                reason: "location has no from coordinate",
            })?;

        let from = self.lookup(location, &location.from_blockgroup);

        if segment.is_degenerate() {
            return match from {
                Some(group) => Ok(Apportionment {
                    strategy: Strategy::SinglePoint,
                    distances: vec![(group.id.clone(), self.settings.single_point_km)],
                }),
                None => Err(ApportionError::UnresolvableEndpoint {
                    reason: "single point outside every known block group",
                }),
            };
        }

        let total_km = segment.length_km();
        let to = self.lookup(location, &location.to_blockgroup);

        let shortcut = match (from, to) {
            (Some(a), Some(b)) if a.id == b.id => self.same_block_group(&segment, a, total_km)?,
            (Some(a), Some(b)) => self.two_block_groups(&segment, a, b, total_km)?,
            _ => None,
        };

        match shortcut {
            Some(apportionment) => Ok(apportionment),
            None => {
                debug!("{}: falling back to exhaustive scan", location.name);
                self.exhaustive(&segment, total_km)
            }
        }
    }

    /// Resolved endpoint that is also present in the catalog
    fn lookup(&self, location: &Location, endpoint: &Endpoint) -> Option<&'c BlockGroup> {
        let id = endpoint.id()?;
        let group = self.catalog.get(id);
        if group.is_none() {
            debug!(
                "{}: block group {} is not in the catalog, treating endpoint as unresolved",
                location.name, id
            );
        }
        group
    }

    fn same_block_group(
        &self,
        segment: &Segment,
        group: &BlockGroup,
        total_km: f64,
    ) -> Result<Option<Apportionment>, ApportionError> {
        let spans = intersect(group, segment)?;

        // Anything but one full-length piece means the segment leaves the polygon
        if spans.len() == 1 && spans[0].is_full() {
            return Ok(Some(Apportionment {
                strategy: Strategy::SameBlockGroup,
                distances: vec![(group.id.clone(), total_km)],
            }));
        }
        Ok(None)
    }

    fn two_block_groups(
        &self,
        segment: &Segment,
        first: &BlockGroup,
        second: &BlockGroup,
        total_km: f64,
    ) -> Result<Option<Apportionment>, ApportionError> {
        let first_spans = intersect(first, segment)?;
        let second_spans = intersect(second, segment)?;

        let (first_span, second_span) = match (first_spans.as_slice(), second_spans.as_slice()) {
            ([a], [b]) => (a, b),
            _ => return Ok(None),
        };

        let first_km = segment.span_length_km(first_span);
        let second_km = segment.span_length_km(second_span);

        if (first_km + second_km - total_km).abs() > self.settings.two_way_tolerance_km {
            return Ok(None);
        }

        Ok(Some(Apportionment {
            strategy: Strategy::TwoBlockGroups,
            distances: vec![
                (first.id.clone(), first_km),
                (second.id.clone(), second_km),
            ],
        }))
    }

    fn exhaustive(&self, segment: &Segment, total_km: f64) -> Result<Apportionment, ApportionError> {
        let mut ledger = CreditLedger::new(segment);

        for group in self.catalog.intersecting(segment) {
            let spans = intersect(group, segment)?;
            ledger.claim(group.id.clone(), &spans);
        }

        let credited_km = ledger.total_km();
        let distances = ledger.into_credits();
        if distances.is_empty()
            || (credited_km - total_km).abs() > self.settings.exhaustive_tolerance_km
        {
            return Err(ApportionError::Reconciliation {
                strategy: Strategy::Exhaustive,
                credited_km,
                expected_km: total_km,
                tolerance_km: self.settings.exhaustive_tolerance_km,
            });
        }

        Ok(Apportionment {
            strategy: Strategy::Exhaustive,
            distances,
        })
    }
}

fn intersect(group: &BlockGroup, segment: &Segment) -> Result<Vec<Span>, ApportionError> {
    group
        .intersect(segment)
        .map_err(|source| ApportionError::GeometryFailed {
            block_group: group.id.clone(),
            source,
        })
}
