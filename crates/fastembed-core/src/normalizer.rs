// crates/fastembed-core/src/normalizer.rs
//
// Hash -> float mapping for the hash path, using the square-root curve:
//
//   value = sqrt((hash & 0x7FFF_FFFF) / 2^31) * 2 - 1
//
// The curve spreads values near zero and compresses them near one, which
// keeps one-character edits closer in cosine space than a linear map while
// unrelated strings stay apart. This is the only curve wired into the
// generator; embeddings from a different curve are not comparable.

use crate::hash::Hash64;

const LOW_31_BITS: u64 = 0x7FFF_FFFF;

/// 2^31 as f32.
const SCALE: f32 = 2_147_483_648.0;

/// Map a 64-bit hash to a float in `[-1, 1]`.
pub fn hash_to_float(hash: Hash64) -> f32 {
    let unit = (hash & LOW_31_BITS) as f32 / SCALE;
    unit.sqrt() * 2.0 - 1.0
}
