//! Block-group catalog: owns every boundary for a run and answers
//! point-in-polygon and segment-intersection queries.

mod boundary;
mod index;

pub use boundary::BlockGroup;
pub use index::BlockGroupIndex;

use hashbrown::HashMap;
use tracing::{debug, info, warn};

use crate::models::{BlockGroupId, GeoPoint, Segment};

/// Immutable set of block groups, in load order.
///
/// Queries take `&self` only, so one catalog can be shared across worker
/// threads for the whole run.
pub struct BlockGroupCatalog {
    groups: Vec<BlockGroup>,
    by_id: HashMap<BlockGroupId, usize>,
    index: BlockGroupIndex,
}

impl BlockGroupCatalog {
    /// Build the catalog; on duplicate ids the first boundary wins
    pub fn new(groups: Vec<BlockGroup>) -> Self {
        let mut by_id = HashMap::with_capacity(groups.len());
        for (position, group) in groups.iter().enumerate() {
            if let Some(defect) = group.defect() {
                warn!("Block group {} has a malformed boundary: {}", group.id, defect);
            }
            if by_id.contains_key(&group.id) {
                warn!("Duplicate block group id {}, keeping the first", group.id);
                continue;
            }
            by_id.insert(group.id.clone(), position);
        }

        let index = BlockGroupIndex::build(&groups);
        info!("Block-group catalog ready with {} boundaries", groups.len());

        Self {
            groups,
            by_id,
            index,
        }
    }

    /// The block group whose interior contains `point`.
    ///
    /// Overlapping polygons are not an error: the first in catalog order
    /// wins. Malformed boundaries are skipped.
    pub fn contains(&self, point: GeoPoint) -> Option<&BlockGroupId> {
        for position in self.index.at_point(point.lon, point.lat) {
            let group = &self.groups[position];
            match group.contains(point) {
                Ok(true) => return Some(&group.id),
                Ok(false) => {}
                Err(e) => debug!("Skipping block group {} for {}: {}", group.id, point, e),
            }
        }
        None
    }

    /// Block groups whose bounding box meets the segment, in catalog order
    pub fn intersecting<'a>(&'a self, segment: &Segment) -> impl Iterator<Item = &'a BlockGroup> + 'a {
        let positions = match segment.line() {
            Some(line) => self.index.along(&line),
            None => self.index.at_point(segment.from.lon, segment.from.lat),
        };
        positions.into_iter().map(move |p| &self.groups[p])
    }

    pub fn get(&self, id: &BlockGroupId) -> Option<&BlockGroup> {
        self.by_id.get(id).map(|&p| &self.groups[p])
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
