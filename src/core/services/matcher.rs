//! Vector matcher - cosine similarity and vote-based verification
//!
//! This module contains pure numeric comparison with no state.

use serde::Serialize;

/// Cosine similarity of two vectors, clamped to `[0, 1]`
///
/// Returns `0.0` when either vector has zero norm, when the lengths differ,
/// or when the inputs contain non-finite values. Accumulates in `f64`.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let (dot, norm_a_sq, norm_b_sq) =
        a.iter().zip(b).fold((0.0_f64, 0.0_f64, 0.0_f64), |(dot, na, nb), (&x, &y)| {
            let (x, y) = (f64::from(x), f64::from(y));
            (x.mul_add(y, dot), x.mul_add(x, na), y.mul_add(y, nb))
        });

    // Sums of squares are never negative, so this is the exact-zero floor.
    if norm_a_sq <= 0.0 || norm_b_sq <= 0.0 {
        return 0.0;
    }

    let similarity = dot / (norm_a_sq.sqrt() * norm_b_sq.sqrt());
    if similarity.is_finite() {
        similarity.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Result of comparing a live embedding against a reference set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchReport {
    /// Whether `match_count >= min_matches`
    pub verified: bool,
    /// Similarity against each reference, in the order supplied
    pub scores: Vec<f64>,
    /// How many scores reached the threshold
    pub match_count: usize,
}

impl MatchReport {
    /// Highest score, or `0.0` for an empty reference set
    #[must_use]
    pub fn best_score(&self) -> f64 {
        self.scores.iter().copied().fold(0.0, f64::max)
    }
}

/// Vote-based verification of `live` against every stored reference
///
/// A reference votes for the live capture when its similarity is at least
/// `threshold`; the capture is verified when at least `min_matches` vote.
#[must_use]
pub fn verify(live: &[f32], stored: &[Vec<f32>], threshold: f64, min_matches: usize) -> MatchReport {
    let scores: Vec<f64> = stored.iter().map(|reference| cosine_similarity(live, reference)).collect();
    let match_count = scores.iter().filter(|&&score| score >= threshold).count();

    MatchReport {
        verified: match_count >= min_matches,
        scores,
        match_count,
    }
}
