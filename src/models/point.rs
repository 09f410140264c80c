//! Coordinates and the straight segment between a location's endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geometry::{great_circle_km, Span};

/// Geographic point (lat/lon)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Planar coordinate with `x = lon`, `y = lat`
    pub fn coord(&self) -> geo::Coord<f64> {
        geo::Coord {
            x: self.lon,
            y: self.lat,
        }
    }

    pub fn to_point(&self) -> geo::Point<f64> {
        geo::Point::from(self.coord())
    }
}

/// Renders the `"[lat, long]"` form used by the locations table.
impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lat, self.lon)
    }
}

/// The straight line between a location's endpoints.
///
/// `to` is absent for single-point locations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: GeoPoint,
    pub to: Option<GeoPoint>,
}

impl Segment {
    pub fn new(from: GeoPoint, to: Option<GeoPoint>) -> Self {
        Self { from, to }
    }

    /// True when there is no second endpoint or both endpoints coincide
    pub fn is_degenerate(&self) -> bool {
        match self.to {
            None => true,
            Some(to) => self.length_km() == 0.0 || to == self.from,
        }
    }

    /// Planar line in lon/lat space, if the segment has two endpoints
    pub fn line(&self) -> Option<geo::Line<f64>> {
        self.to
            .map(|to| geo::Line::new(self.from.coord(), to.coord()))
    }

    /// Great-circle length between the endpoints, zero for a single point
    pub fn length_km(&self) -> f64 {
        match self.to {
            Some(to) => great_circle_km(self.from, to),
            None => 0.0,
        }
    }

    /// Point at parameter `t` along the planar line (0 = from, 1 = to)
    pub fn point_at(&self, t: f64) -> GeoPoint {
        match self.to {
            Some(to) => GeoPoint {
                lat: self.from.lat + (to.lat - self.from.lat) * t,
                lon: self.from.lon + (to.lon - self.from.lon) * t,
            },
            None => self.from,
        }
    }

    /// Great-circle length of the stretch of this segment covered by `span`
    pub fn span_length_km(&self, span: &Span) -> f64 {
        if span.is_empty() {
            return 0.0;
        }
        great_circle_km(self.point_at(span.start), self.point_at(span.end))
    }
}
