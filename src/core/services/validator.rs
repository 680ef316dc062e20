//! Embedding validator - structural checks before vectors enter the system
//!
//! Non-numeric payloads never reach this module: they fail deserialization
//! into `Vec<f32>` at the request boundary.

use crate::core::error::InvalidEmbedding;

/// Validate one embedding against the expected dimension
///
/// Fails when the length differs from `expected_dim` or any component is
/// NaN or infinite.
pub fn validate(vector: &[f32], expected_dim: usize) -> Result<(), InvalidEmbedding> {
    if vector.len() != expected_dim {
        return Err(InvalidEmbedding::WrongDimension {
            expected: expected_dim,
            actual: vector.len(),
        });
    }
    if let Some(index) = vector.iter().position(|x| !x.is_finite()) {
        return Err(InvalidEmbedding::NonFinite { index });
    }
    Ok(())
}

/// Validate a registration batch
///
/// Checks the vector count first, then each vector in order, reporting the
/// 1-based position of the first offending one.
pub fn validate_batch(
    vectors: &[Vec<f32>],
    expected_count: usize,
    expected_dim: usize,
) -> Result<(), InvalidEmbedding> {
    if vectors.len() != expected_count {
        return Err(InvalidEmbedding::WrongCount {
            expected: expected_count,
            actual: vectors.len(),
        });
    }
    for (i, vector) in vectors.iter().enumerate() {
        validate(vector, expected_dim).map_err(|source| InvalidEmbedding::InBatch {
            index: i + 1,
            source: Box::new(source),
        })?;
    }
    Ok(())
}

/// Component-wise mean of a validated, non-empty batch
///
/// Used as the single fallback reference vector. Returns an empty vector
/// for an empty batch.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn average(vectors: &[Vec<f32>]) -> Vec<f32> {
    let Some(first) = vectors.first() else {
        return Vec::new();
    };
    let mut sums = vec![0.0_f64; first.len()];
    for vector in vectors {
        for (sum, &x) in sums.iter_mut().zip(vector) {
            *sum += f64::from(x);
        }
    }
    let n = vectors.len() as f64;
    sums.into_iter().map(|s| (s / n) as f32).collect()
}
