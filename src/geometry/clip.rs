//! Clipping a straight segment against a block-group boundary.
//!
//! The segment is cut at every place it meets a ring edge; each piece is kept
//! when its midpoint lies in the closed polygon, so stretches running along a
//! boundary belong to the polygon while single-point touches vanish.

use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{BoundingRect, Coord, Intersects, Line, MultiPolygon, Point};

use super::{Span, PARAM_EPSILON};

/// Portions of `line` inside `boundary`, ordered along the line.
///
/// Returns an empty list when the line misses the polygon or only touches
/// it. Adjacent pieces are merged, so a line that stays inside yields one
/// full span.
pub fn clip_segment(line: Line<f64>, boundary: &MultiPolygon<f64>) -> Vec<Span> {
    let delta = line.delta();
    let len_sq = delta.x * delta.x + delta.y * delta.y;
    if len_sq == 0.0 {
        return Vec::new();
    }

    // Fast bounding box rejection
    match boundary.bounding_rect() {
        Some(rect) if rect.intersects(&line.bounding_rect()) => {}
        _ => return Vec::new(),
    }

    let param = |c: Coord<f64>| {
        ((c.x - line.start.x) * delta.x + (c.y - line.start.y) * delta.y) / len_sq
    };

    let mut cuts = vec![0.0, 1.0];
    for polygon in boundary.iter() {
        for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
            for edge in ring.lines() {
                match line_intersection(line, edge) {
                    Some(LineIntersection::SinglePoint { intersection, .. }) => {
                        cuts.push(param(intersection));
                    }
                    Some(LineIntersection::Collinear { intersection }) => {
                        cuts.push(param(intersection.start));
                        cuts.push(param(intersection.end));
                    }
                    None => {}
                }
            }
        }
    }

    cuts.retain(|t| t.is_finite());
    for t in cuts.iter_mut() {
        *t = t.clamp(0.0, 1.0);
    }
    cuts.sort_by(|a, b| a.total_cmp(b));
    cuts.dedup_by(|later, kept| (*later - *kept).abs() <= PARAM_EPSILON);

    let mut spans: Vec<Span> = Vec::new();
    for pair in cuts.windows(2) {
        let (t0, t1) = (pair[0], pair[1]);
        if t1 - t0 <= PARAM_EPSILON {
            continue;
        }

        let t_mid = (t0 + t1) / 2.0;
        let mid = Point::new(line.start.x + delta.x * t_mid, line.start.y + delta.y * t_mid);
        if !boundary.intersects(&mid) {
            continue;
        }

        match spans.last_mut() {
            Some(last) if (t0 - last.end).abs() <= PARAM_EPSILON => last.end = t1,
            _ => spans.push(Span::new(t0, t1)),
        }
    }

    spans
}
