//! Accumulates committed distances and failed locations for a run.

use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::apportion::{Apportionment, Strategy};
use crate::error::ApportionError;
use crate::models::{DistanceRecord, ErrorRecord, Location};

/// Counters reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub committed: usize,
    pub failed: usize,
    pub by_strategy: BTreeMap<Strategy, usize>,
    pub by_failure: BTreeMap<&'static str, usize>,
    pub total_km: f64,
}

/// Distance and error tables for one run.
///
/// Each unit of work gets its own table (or appends through a single
/// writer); partial tables combine with [`DistanceTable::merge`].
#[derive(Debug, Default)]
pub struct DistanceTable {
    distances: Vec<DistanceRecord>,
    errors: Vec<ErrorRecord>,
    summary: RunSummary,
}

impl DistanceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the outcome of apportioning `location`
    pub fn record(&mut self, location: &Location, outcome: Result<Apportionment, ApportionError>) {
        match outcome {
            Ok(apportionment) => self.commit(location, apportionment),
            Err(error) => self.fail(location, &error),
        }
    }

    /// One distance record per block group
    pub fn commit(&mut self, location: &Location, apportionment: Apportionment) {
        debug!(
            "{}: {} block group(s) via {}",
            location.name,
            apportionment.distances.len(),
            apportionment.strategy
        );

        self.summary.committed += 1;
        *self
            .summary
            .by_strategy
            .entry(apportionment.strategy)
            .or_default() += 1;

        for (block_group, distance_km) in apportionment.distances {
            self.summary.total_km += distance_km;
            self.distances.push(DistanceRecord {
                location_name: location.name.clone(),
                project_number: location.project_number.clone(),
                year_range: location.year_range.clone(),
                block_group: block_group.to_string(),
                distance_km,
            });
        }
    }

    pub fn fail(&mut self, location: &Location, error: &ApportionError) {
        warn!("{}: {}", location.name, error);
        self.summary.failed += 1;
        *self.summary.by_failure.entry(error.kind()).or_default() += 1;
        self.errors.push(ErrorRecord::new(location, error));
    }

    /// Append another table's records after this one's
    pub fn merge(&mut self, other: DistanceTable) {
        self.distances.extend(other.distances);
        self.errors.extend(other.errors);

        self.summary.committed += other.summary.committed;
        self.summary.failed += other.summary.failed;
        self.summary.total_km += other.summary.total_km;
        for (strategy, n) in other.summary.by_strategy {
            *self.summary.by_strategy.entry(strategy).or_default() += n;
        }
        for (kind, n) in other.summary.by_failure {
            *self.summary.by_failure.entry(kind).or_default() += n;
        }
    }

    pub fn distances(&self) -> &[DistanceRecord] {
        &self.distances
    }

    pub fn errors(&self) -> &[ErrorRecord] {
        &self.errors
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    pub fn into_parts(self) -> (Vec<DistanceRecord>, Vec<ErrorRecord>) {
        (self.distances, self.errors)
    }

    /// Log the run summary
    pub fn log_summary(&self) {
        let s = &self.summary;
        info!(
            "Apportioned {} location(s), {} failed, {:.3} km total",
            s.committed, s.failed, s.total_km
        );
        for strategy in Strategy::all() {
            if let Some(n) = s.by_strategy.get(strategy) {
                info!("  {}: {}", strategy, n);
            }
        }
        for (kind, n) in &s.by_failure {
            info!("  {}: {}", kind, n);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BlockGroupId, Endpoint, GeoPoint};

    fn location(name: &str) -> Location {
        let mut loc = Location::new(
            name,
            Some(GeoPoint::new(41.88, -87.63)),
            Some(GeoPoint::new(41.89, -87.62)),
            Endpoint::Resolved(BlockGroupId::new("A")),
            Endpoint::Unresolved,
        );
        loc.project_number = Some("P-1".to_string());
        loc
    }

    fn two_way() -> Apportionment {
        Apportionment {
            strategy: Strategy::TwoBlockGroups,
            distances: vec![
                (BlockGroupId::new("A"), 0.4),
                (BlockGroupId::new("B"), 0.6),
            ],
        }
    }

    #[test]
    fn test_commit_writes_one_record_per_block_group() {
        let mut table = DistanceTable::new();
        table.record(&location("Main St"), Ok(two_way()));

        assert_eq!(table.distances().len(), 2);
        assert!(table.errors().is_empty());
        assert_eq!(table.distances()[0].block_group, "A");
        assert_eq!(table.distances()[1].distance_km, 0.6);
        assert_eq!(table.distances()[0].project_number.as_deref(), Some("P-1"));
        assert_eq!(table.summary().by_strategy.get(&Strategy::TwoBlockGroups), Some(&1));
    }

    #[test]
    fn test_failure_goes_to_error_table_only() {
        let mut table = DistanceTable::new();
        let err = ApportionError::UnresolvableEndpoint {
            reason: "single point outside every known block group",
        };
        table.record(&location("Elm St"), Err(err));

        assert!(table.distances().is_empty());
        assert_eq!(table.errors().len(), 1);
        let row = &table.errors()[0];
        assert_eq!(row.reason, "unresolvable_endpoint");
        assert_eq!(row.from_lat_long, "[41.88, -87.63]");
        assert_eq!(row.from_blockgroup, "A");
        assert_eq!(row.to_blockgroup, "unresolved");
    }

    #[test]
    fn test_merge_preserves_order_and_counts() {
        let mut left = DistanceTable::new();
        left.record(&location("First"), Ok(two_way()));

        let mut right = DistanceTable::new();
        right.record(&location("Second"), Ok(two_way()));
        right.record(
            &location("Third"),
            Err(ApportionError::Reconciliation {
                strategy: Strategy::Exhaustive,
                credited_km: 0.5,
                expected_km: 1.0,
                tolerance_km: 0.01,
            }),
        );

        left.merge(right);
        let names: Vec<&str> = left
            .distances()
            .iter()
            .map(|r| r.location_name.as_str())
            .collect();
        assert_eq!(names, vec!["First", "First", "Second", "Second"]);
        assert_eq!(left.summary().committed, 2);
        assert_eq!(left.summary().failed, 1);
        assert_eq!(left.summary().by_failure.get("reconciliation_failed"), Some(&1));
        assert!((left.summary().total_km - 2.0).abs() < 1e-12);
    }
}
