// crates/fastembed-core/src/hash.rs
//
// Deterministic text hashing for the hash-based embedding path.
//
// All arithmetic wraps modulo 2^64 so results are identical on every
// platform. Bytes are treated as unsigned.

/// Opaque 64-bit fingerprint of (text, seed).
pub type Hash64 = u64;

const MULTIPLIER: u64 = 31;

/// Seed multiplier of the second hash in [`combined_hash`].
const SECOND_SEED_FACTOR: u64 = 37;

/// Left shift applied to the second hash before it is XORed in.
const SECOND_HASH_SHIFT: u32 = 16;

/// Polynomial rolling hash: `h = seed; h = h * 31 + c` for each byte.
///
/// Stops at the end of `text` or at the first NUL byte.
pub fn simple_hash(text: &[u8], seed: u64) -> Hash64 {
    text.iter()
        .take_while(|&&b| b != 0)
        .fold(seed, |h, &b| h.wrapping_mul(MULTIPLIER).wrapping_add(u64::from(b)))
}

/// Rolling hash with each byte weighted by its 1-based position:
/// `h = h * 31 + c[j] * (j + 1)`.
///
/// The weighting makes reorderings of the same bytes (anagrams) hash
/// differently, which [`simple_hash`] does not.
pub fn positional_hash(text: &[u8], seed: u64) -> Hash64 {
    text.iter().enumerate().fold(seed, |h, (j, &b)| {
        let weighted = u64::from(b).wrapping_mul(j as u64 + 1);
        h.wrapping_mul(MULTIPLIER).wrapping_add(weighted)
    })
}

/// Two positional hashes with decorrelated seeds, combined as
/// `h1 ^ (h2 << 16)`.
pub fn combined_hash(text: &[u8], seed: u64) -> Hash64 {
    let h1 = positional_hash(text, seed);
    let h2 = positional_hash(text, seed.wrapping_mul(SECOND_SEED_FACTOR));
    h1 ^ (h2 << SECOND_HASH_SHIFT)
}
