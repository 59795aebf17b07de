//! Bucket placement: a one-word, one-round fasthash mix folded with a salt.

const M: u64 = 0x880355f21e6d1965;

#[inline(always)]
fn mix(mut h: u64) -> u64 {
    h ^= h >> 23;
    h = h.wrapping_mul(0x2127599bf4325c37);
    h ^= h >> 47;
    h
}

/// Map `hash` to a bucket index in `[0, n)` for a table of `n` buckets
/// under `salt`. `n` must be a power of two.
#[inline]
pub fn bucket_index(hash: u64, n: usize, salt: u64) -> usize {
    debug_assert!(n.is_power_of_two());
    let mut h = M.wrapping_mul(8);
    h ^= mix(hash);
    h = h.wrapping_mul(M);
    (mix(h ^ salt) & (n as u64 - 1)) as usize
}
