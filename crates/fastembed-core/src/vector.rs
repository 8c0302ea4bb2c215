// crates/fastembed-core/src/vector.rs
//
// Vector math kernels over f32 slices.
//
// Reductions run four lanes at a time and fold the lanes together before
// the scalar tail, so every platform produces the same sums. Arithmetic
// stays in single precision, except `l2_normalize_precise` which
// accumulates in f64 for the model path.
//
// The kernels assume equal, non-zero lengths. `check_pair` and
// `check_single` perform those checks for callers at the API boundary.

use crate::error::EmbedError;

const LANES: usize = 4;

/// Σ a[i] * b[i].
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    let len = a.len().min(b.len());
    let (a, b) = (&a[..len], &b[..len]);

    let chunks_a = a.chunks_exact(LANES);
    let chunks_b = b.chunks_exact(LANES);
    let tail_a = chunks_a.remainder();
    let tail_b = chunks_b.remainder();

    let mut lanes = [0.0f32; LANES];
    for (ca, cb) in chunks_a.zip(chunks_b) {
        for lane in 0..LANES {
            lanes[lane] += ca[lane] * cb[lane];
        }
    }

    let mut sum = (lanes[0] + lanes[1]) + (lanes[2] + lanes[3]);
    for (x, y) in tail_a.iter().zip(tail_b) {
        sum += x * y;
    }
    sum
}

/// Euclidean norm: sqrt(Σ v[i]²). Zero for an all-zero vector.
pub fn vector_norm(v: &[f32]) -> f32 {
    dot_product(v, v).sqrt()
}

/// Scale `v` in place to unit length. A vector whose norm is exactly zero
/// is left unchanged.
pub fn normalize(v: &mut [f32]) {
    let norm = vector_norm(v);
    if norm == 0.0 {
        return;
    }
    for x in v.iter_mut() {
        *x /= norm;
    }
}

/// dot(a, b) / (|a| * |b|), or exactly `0.0` when either vector is all zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let denominator = vector_norm(a) * vector_norm(b);
    if denominator == 0.0 {
        return 0.0;
    }
    dot_product(a, b) / denominator
}

/// result[i] = a[i] + b[i].
pub fn add_vectors(a: &[f32], b: &[f32], result: &mut [f32]) {
    debug_assert_eq!(a.len(), b.len());
    debug_assert!(result.len() >= a.len());

    let chunks_a = a.chunks_exact(LANES);
    let chunks_b = b.chunks_exact(LANES);
    let tail_a = chunks_a.remainder();
    let tail_b = chunks_b.remainder();
    let mut chunks_out = result.chunks_exact_mut(LANES);

    for ((ca, cb), out) in chunks_a.zip(chunks_b).zip(&mut chunks_out) {
        for lane in 0..LANES {
            out[lane] = ca[lane] + cb[lane];
        }
    }

    let done = a.len() - tail_a.len();
    for (i, (x, y)) in tail_a.iter().zip(tail_b).enumerate() {
        if let Some(out) = result.get_mut(done + i) {
            *out = x + y;
        }
    }
}

/// L2-normalize with f64 accumulation of the sum of squares.
///
/// Returns `false` and leaves `v` untouched when the norm is at or below
/// `epsilon`.
pub fn l2_normalize_precise(v: &mut [f32], epsilon: f64) -> bool {
    let norm = v
        .iter()
        .map(|&x| f64::from(x) * f64::from(x))
        .sum::<f64>()
        .sqrt();
    if norm <= epsilon {
        return false;
    }
    let inv_norm = 1.0f32 / norm as f32;
    for x in v.iter_mut() {
        *x *= inv_norm;
    }
    true
}

/// Validate the operands of a binary operation; returns their shared length.
pub fn check_pair(a: &[f32], b: &[f32]) -> Result<usize, EmbedError> {
    if a.len() != b.len() {
        return Err(EmbedError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    check_single(a)
}

/// Validate the operand of a unary operation; returns its length.
pub fn check_single(v: &[f32]) -> Result<usize, EmbedError> {
    if v.is_empty() {
        return Err(EmbedError::EmptyVector);
    }
    Ok(v.len())
}
