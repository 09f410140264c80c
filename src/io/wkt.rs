//! Parser for the serialized block-group boundaries.
//!
//! Boundaries arrive as WKT `MULTIPOLYGON` (or `POLYGON`) text with
//! `lon lat` vertex order, optionally prefixed by a PostGIS `SRID=...;`.
//! `lon lat` maps directly onto `geo`'s `x y`.

use geo::{CoordsIter, Geometry, MultiPolygon};
use wkt::TryFromWkt;

use crate::error::ParseError;

/// Parse a `MULTIPOLYGON` / `POLYGON` string into a multipolygon
pub fn parse_multipolygon(text: &str) -> Result<MultiPolygon<f64>, ParseError> {
    let geometry = Geometry::<f64>::try_from_wkt_str(strip_srid(text))
        .map_err(|e| ParseError::Boundary(e.to_string()))?;

    let multipolygon = match geometry {
        Geometry::MultiPolygon(mp) => mp,
        Geometry::Polygon(p) => MultiPolygon::new(vec![p]),
        other => {
            return Err(ParseError::Boundary(format!(
                "expected MULTIPOLYGON or POLYGON, found {}",
                geometry_name(&other)
            )))
        }
    };

    if multipolygon
        .coords_iter()
        .any(|c| !c.x.is_finite() || !c.y.is_finite())
    {
        return Err(ParseError::NonFinite(text.trim().to_string()));
    }

    // EMPTY members carry no area
    Ok(MultiPolygon::new(
        multipolygon
            .into_iter()
            .filter(|p| !p.exterior().0.is_empty())
            .collect(),
    ))
}

fn strip_srid(text: &str) -> &str {
    let trimmed = text.trim();
    if trimmed
        .get(..5)
        .map_or(false, |prefix| prefix.eq_ignore_ascii_case("SRID="))
    {
        if let Some(semi) = trimmed.find(';') {
            return trimmed[semi + 1..].trim_start();
        }
    }
    trimmed
}

fn geometry_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "POINT",
        Geometry::Line(_) | Geometry::LineString(_) => "LINESTRING",
        Geometry::MultiPoint(_) => "MULTIPOINT",
        Geometry::MultiLineString(_) => "MULTILINESTRING",
        Geometry::GeometryCollection(_) => "GEOMETRYCOLLECTION",
        _ => "another geometry",
    }
}
