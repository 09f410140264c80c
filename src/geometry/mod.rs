//! Geometry primitives: great-circle lengths and segment clipping.

mod clip;

pub use clip::clip_segment;

use geo::{Distance, Haversine};

use crate::models::GeoPoint;

/// Parameters closer than this along a segment are the same position.
pub const PARAM_EPSILON: f64 = 1e-12;

/// Great-circle distance in kilometers
pub fn great_circle_km(a: GeoPoint, b: GeoPoint) -> f64 {
    Haversine.distance(a.to_point(), b.to_point()) / 1000.0
}

/// A stretch of a segment, as a parameter interval `[start, end]` within `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub start: f64,
    pub end: f64,
}

impl Span {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn width(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= PARAM_EPSILON
    }

    /// True when this span runs the whole segment
    pub fn is_full(&self) -> bool {
        self.start <= PARAM_EPSILON && self.end >= 1.0 - PARAM_EPSILON
    }

    /// The shared stretch of two spans, if it has positive width
    pub fn overlap(&self, other: &Span) -> Option<Span> {
        let shared = Span::new(self.start.max(other.start), self.end.min(other.end));
        if shared.is_empty() {
            None
        } else {
            Some(shared)
        }
    }
}
