//! The `"[lat, long]"` coordinate cells of the locations table.

use crate::error::ParseError;
use crate::models::GeoPoint;

/// Parse a coordinate cell.
///
/// `None`, an empty cell and the empty list `[]` all mean "no coordinate".
pub fn parse_lat_long(raw: &str) -> Result<Option<GeoPoint>, ParseError> {
    let trimmed = raw.trim();
    if is_missing(trimmed) {
        return Ok(None);
    }

    let inner = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .or_else(|| trimmed.strip_prefix('(').and_then(|s| s.strip_suffix(')')))
        .ok_or_else(|| ParseError::LatLong(raw.to_string()))?;

    let mut parts = inner.split(',').map(str::trim);
    let (lat, lon) = match (parts.next(), parts.next(), parts.next()) {
        (Some(lat), Some(lon), None) => (lat, lon),
        _ => return Err(ParseError::LatLong(raw.to_string())),
    };

    let lat: f64 = lat.parse().map_err(|_| ParseError::LatLong(raw.to_string()))?;
    let lon: f64 = lon.parse().map_err(|_| ParseError::LatLong(raw.to_string()))?;
    if !lat.is_finite() || !lon.is_finite() {
        return Err(ParseError::NonFinite(raw.to_string()));
    }

    Ok(Some(GeoPoint::new(lat, lon)))
}

/// True for the spellings of an absent coordinate
pub fn is_missing(raw: &str) -> bool {
    matches!(raw.trim(), "" | "None" | "[]")
}
