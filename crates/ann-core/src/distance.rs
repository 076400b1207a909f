//! Distance kernel: dot product, magnitude, cosine similarity/distance, normalize.
//!
//! These are the only numeric primitives the store and the HNSW index build
//! on; every other distance computation in this crate goes through
//! [`cosine_distance`].

use crate::error::{CoreError, CoreResult};

/// Magnitudes below this threshold are treated as zero.
pub const ZERO_MAGNITUDE_THRESHOLD: f32 = 1e-6;

/// Computes the dot product of two equal-length vectors.
///
/// # Errors
///
/// Returns [`CoreError::DimensionMismatch`] if `a.len() != b.len()`.
pub fn dot(a: &[f32], b: &[f32]) -> CoreResult<f32> {
    if a.len() != b.len() {
        return Err(CoreError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(a.iter().zip(b.iter()).map(|(x, y)| x * y).sum())
}

/// Computes the Euclidean norm of a vector. Never fails.
#[must_use]
pub fn magnitude(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Computes cosine similarity, `dot(a, b) / (|a| * |b|)`, in `[-1, 1]` up to
/// floating-point rounding.
///
/// # Errors
///
/// Returns [`CoreError::DimensionMismatch`] if the vectors' lengths differ,
/// or [`CoreError::ZeroMagnitude`] if either vector's magnitude is below
/// [`ZERO_MAGNITUDE_THRESHOLD`].
pub fn cosine(a: &[f32], b: &[f32]) -> CoreResult<f32> {
    let mag_a = magnitude(a);
    let mag_b = magnitude(b);
    if mag_a < ZERO_MAGNITUDE_THRESHOLD || mag_b < ZERO_MAGNITUDE_THRESHOLD {
        return Err(CoreError::ZeroMagnitude);
    }
    let d = dot(a, b)?;
    Ok(d / (mag_a * mag_b))
}

/// Computes cosine distance, `1 - cosine(a, b)` — the ordering key used
/// throughout the store and the HNSW index. Smaller is closer.
///
/// # Errors
///
/// Same as [`cosine`].
pub fn cosine_distance(a: &[f32], b: &[f32]) -> CoreResult<f32> {
    cosine(a, b).map(|sim| 1.0 - sim)
}

/// Divides `v` in place by its magnitude.
///
/// # Errors
///
/// Returns [`CoreError::ZeroMagnitude`] if `v`'s magnitude is below
/// [`ZERO_MAGNITUDE_THRESHOLD`].
pub fn normalize(v: &mut [f32]) -> CoreResult<()> {
    let mag = magnitude(v);
    if mag < ZERO_MAGNITUDE_THRESHOLD {
        return Err(CoreError::ZeroMagnitude);
    }
    for x in v.iter_mut() {
        *x /= mag;
    }
    Ok(())
}
