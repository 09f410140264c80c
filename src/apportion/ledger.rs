//! Credit bookkeeping for the exhaustive scan.
//!
//! Neighbouring block groups share their boundary, so a stretch of segment
//! running along that boundary is reported by both. Each pair of
//! overlapping claims from different block groups splits the shared length
//! evenly: both owners lose half of it.

use crate::geometry::Span;
use crate::models::{BlockGroupId, Segment};

struct Claim {
    owner: usize,
    span: Span,
}

/// Running per-block-group credit for one segment
pub struct CreditLedger<'s> {
    segment: &'s Segment,
    credits: Vec<(BlockGroupId, f64)>,
    claims: Vec<Claim>,
}

impl<'s> CreditLedger<'s> {
    pub fn new(segment: &'s Segment) -> Self {
        Self {
            segment,
            credits: Vec::new(),
            claims: Vec::new(),
        }
    }

    /// Record every stretch one block group covers.
    ///
    /// Spans of the same block group never overlap each other, so they are
    /// only compared against claims already held by other owners.
    pub fn claim(&mut self, id: BlockGroupId, spans: &[Span]) {
        if spans.is_empty() {
            return;
        }

        let owner = self.credits.len();
        self.credits.push((id, 0.0));

        for span in spans {
            self.credits[owner].1 += self.segment.span_length_km(span);

            for previous in &self.claims {
                if previous.owner == owner {
                    continue;
                }
                if let Some(shared) = span.overlap(&previous.span) {
                    let half = 0.5 * self.segment.span_length_km(&shared);
                    self.credits[owner].1 -= half;
                    self.credits[previous.owner].1 -= half;
                }
            }

            self.claims.push(Claim {
                owner,
                span: *span,
            });
        }
    }

    /// Sum of all credits, including any driven non-positive
    pub fn total_km(&self) -> f64 {
        self.credits.iter().map(|(_, km)| km).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.credits.is_empty()
    }

    /// Final credits in first-claim order, with repeated ids folded together
    /// and non-positive credits dropped
    pub fn into_credits(self) -> Vec<(BlockGroupId, f64)> {
        let mut folded: Vec<(BlockGroupId, f64)> = Vec::with_capacity(self.credits.len());
        for (id, km) in self.credits {
            match folded.iter_mut().find(|(seen, _)| *seen == id) {
                Some(entry) => entry.1 += km,
                None => folded.push((id, km)),
            }
        }
        folded.retain(|(_, km)| *km > 0.0);
        folded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeoPoint;

    fn segment() -> Segment {
        Segment::new(
            GeoPoint::new(41.885, -87.64),
            Some(GeoPoint::new(41.885, -87.62)),
        )
    }

    #[test]
    fn test_disjoint_claims_add_up() {
        let seg = segment();
        let mut ledger = CreditLedger::new(&seg);
        ledger.claim(BlockGroupId::new("a"), &[Span::new(0.0, 0.4)]);
        ledger.claim(BlockGroupId::new("b"), &[Span::new(0.4, 1.0)]);
        // Pieces are measured independently, so they only approximately add up
        assert!((ledger.total_km() - seg.length_km()).abs() < 1e-6);
        assert_eq!(ledger.into_credits().len(), 2);
    }

    #[test]
    fn test_overlap_is_split_evenly() {
        let seg = segment();
        let mut ledger = CreditLedger::new(&seg);
        ledger.claim(BlockGroupId::new("a"), &[Span::new(0.0, 0.6)]);
        ledger.claim(BlockGroupId::new("b"), &[Span::new(0.4, 1.0)]);

        let shared = seg.span_length_km(&Span::new(0.4, 0.6));
        let credits = ledger.into_credits();
        let a = seg.span_length_km(&Span::new(0.0, 0.6)) - 0.5 * shared;
        let b = seg.span_length_km(&Span::new(0.4, 1.0)) - 0.5 * shared;
        assert!((credits[0].1 - a).abs() < 1e-12);
        assert!((credits[1].1 - b).abs() < 1e-12);
        assert!((credits[0].1 + credits[1].1 - seg.length_km()).abs() < 1e-6);
    }

    #[test]
    fn test_own_pieces_do_not_offset() {
        let seg = segment();
        let mut ledger = CreditLedger::new(&seg);
        ledger.claim(
            BlockGroupId::new("a"),
            &[Span::new(0.0, 0.3), Span::new(0.7, 1.0)],
        );
        let expected = seg.span_length_km(&Span::new(0.0, 0.3)) + seg.span_length_km(&Span::new(0.7, 1.0));
        assert!((ledger.total_km() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_repeated_id_is_folded() {
        let seg = segment();
        let mut ledger = CreditLedger::new(&seg);
        ledger.claim(BlockGroupId::new("a"), &[Span::new(0.0, 0.3)]);
        ledger.claim(BlockGroupId::new("a"), &[Span::new(0.5, 0.8)]);
        let credits = ledger.into_credits();
        assert_eq!(credits.len(), 1);
        assert_eq!(credits[0].0.as_str(), "a");
    }

    #[test]
    fn test_empty_claim_is_ignored() {
        let seg = segment();
        let mut ledger = CreditLedger::new(&seg);
        ledger.claim(BlockGroupId::new("a"), &[]);
        assert!(ledger.is_empty());
    }
}
