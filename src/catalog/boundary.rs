//! Block-group boundary polygons and the per-polygon geometric queries.

use geo::{BoundingRect, Contains, MultiPolygon};

use crate::error::GeometryError;
use crate::geometry::{clip_segment, Span};
use crate::models::{BlockGroupId, GeoPoint, Segment};

/// A single block-group polygon with its identifier
#[derive(Debug, Clone)]
pub struct BlockGroup {
    pub id: BlockGroupId,
    pub geometry: MultiPolygon<f64>,
    defect: Option<GeometryError>,
}

impl BlockGroup {
    /// Wrap a boundary, recording whether it is usable for queries.
    ///
    /// `geo::Polygon` closes its rings on construction; rings that are still
    /// too short afterwards flag the whole block group as defective.
    pub fn new(id: BlockGroupId, geometry: MultiPolygon<f64>) -> Self {
        let defect = find_defect(&geometry);
        Self {
            id,
            geometry,
            defect,
        }
    }

    /// Get the bounding box of this boundary
    pub fn bbox(&self) -> Option<(f64, f64, f64, f64)> {
        self.geometry
            .bounding_rect()
            .map(|rect| (rect.min().x, rect.min().y, rect.max().x, rect.max().y))
    }

    /// Why this boundary cannot be queried, if it cannot
    pub fn defect(&self) -> Option<&GeometryError> {
        self.defect.as_ref()
    }

    /// Strict point-in-polygon test; points on the boundary are outside
    pub fn contains(&self, point: GeoPoint) -> Result<bool, GeometryError> {
        if let Some(defect) = &self.defect {
            return Err(defect.clone());
        }
        Ok(self.geometry.contains(&point.to_point()))
    }

    /// Stretches of `segment` lying inside this block group.
    ///
    /// A single-point segment never intersects anything.
    pub fn intersect(&self, segment: &Segment) -> Result<Vec<Span>, GeometryError> {
        if let Some(defect) = &self.defect {
            return Err(defect.clone());
        }
        Ok(segment
            .line()
            .map(|line| clip_segment(line, &self.geometry))
            .unwrap_or_default())
    }
}

fn find_defect(geometry: &MultiPolygon<f64>) -> Option<GeometryError> {
    if geometry.0.is_empty() {
        return Some(GeometryError::EmptyBoundary);
    }

    let rings = geometry
        .iter()
        .flat_map(|polygon| std::iter::once(polygon.exterior()).chain(polygon.interiors()));
    for (ring, line_string) in rings.enumerate() {
        if line_string.0.len() < 4 {
            return Some(GeometryError::DegenerateRing {
                ring,
                vertices: line_string.0.len(),
            });
        }
    }
    None
}
