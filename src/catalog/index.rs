//! Spatial index for fast block-group candidate lookups.

use geo::Line;
use rstar::{RTree, RTreeObject, AABB};
use tracing::info;

use super::BlockGroup;

/// Wrapper for R-tree indexing of block groups by catalog position
#[derive(Clone)]
pub struct IndexedBlockGroup {
    pub position: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedBlockGroup {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl IndexedBlockGroup {
    pub fn new(position: usize, group: &BlockGroup) -> Option<Self> {
        let (min_x, min_y, max_x, max_y) = group.bbox()?;
        Some(Self {
            position,
            envelope: AABB::from_corners([min_x, min_y], [max_x, max_y]),
        })
    }
}

/// Envelope prefilter over the catalog.
///
/// Every query returns catalog positions in ascending order, so callers see
/// candidates in the same order as a linear scan would.
pub struct BlockGroupIndex {
    tree: RTree<IndexedBlockGroup>,
}

impl BlockGroupIndex {
    /// Build spatial index from block groups
    pub fn build(groups: &[BlockGroup]) -> Self {
        info!("Building spatial index for {} block groups...", groups.len());

        let indexed: Vec<IndexedBlockGroup> = groups
            .iter()
            .enumerate()
            .filter_map(|(position, group)| IndexedBlockGroup::new(position, group))
            .collect();

        let tree = RTree::bulk_load(indexed);
        info!("Spatial index built with {} entries", tree.size());

        Self { tree }
    }

    /// Positions whose envelope contains the point
    pub fn at_point(&self, lon: f64, lat: f64) -> Vec<usize> {
        let query_envelope = AABB::from_point([lon, lat]);
        self.collect_sorted(&query_envelope)
    }

    /// Positions whose envelope meets the bounding box of `line`
    pub fn along(&self, line: &Line<f64>) -> Vec<usize> {
        let query_envelope = AABB::from_corners(
            [line.start.x, line.start.y],
            [line.end.x, line.end.y],
        );
        self.collect_sorted(&query_envelope)
    }

    fn collect_sorted(&self, envelope: &AABB<[f64; 2]>) -> Vec<usize> {
        let mut positions: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(envelope)
            .map(|ib| ib.position)
            .collect();
        positions.sort_unstable();
        positions
    }
}
