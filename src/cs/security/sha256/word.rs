//! 32-bit word operations from FIPS 180-4 section 4.1.2.
//!
//! All arithmetic is modulo 2^32. Callers add words through [`add`] or
//! `u32::wrapping_add`, never through `+`.

/// Circular right rotation of `x` by `n` bits, `0 < n < 32`.
#[inline(always)]
pub fn rotate_right(x: u32, n: u32) -> u32 {
    debug_assert!(n > 0 && n < 32, "rotation amount out of range: {n}");
    x.rotate_right(n)
}

/// Sum of `words` modulo 2^32.
#[inline(always)]
pub fn add(words: &[u32]) -> u32 {
    words.iter().fold(0u32, |acc, &w| acc.wrapping_add(w))
}

/// `x` chooses between the bits of `y` and `z`.
#[inline(always)]
pub fn ch(x: u32, y: u32, z: u32) -> u32 {
    (x & y) ^ (!x & z)
}

/// Bitwise majority of `x`, `y` and `z`.
#[inline(always)]
pub fn maj(x: u32, y: u32, z: u32) -> u32 {
    (x & y) ^ (x & z) ^ (y & z)
}

/// Σ0, applied to the `a` register in each round.
#[inline(always)]
pub fn big_sigma0(x: u32) -> u32 {
    rotate_right(x, 2) ^ rotate_right(x, 13) ^ rotate_right(x, 22)
}

/// Σ1, applied to the `e` register in each round.
#[inline(always)]
pub fn big_sigma1(x: u32) -> u32 {
    rotate_right(x, 6) ^ rotate_right(x, 11) ^ rotate_right(x, 25)
}

/// σ0, applied to `W[t-15]` during schedule expansion.
#[inline(always)]
pub fn small_sigma0(x: u32) -> u32 {
    rotate_right(x, 7) ^ rotate_right(x, 18) ^ (x >> 3)
}

/// σ1, applied to `W[t-2]` during schedule expansion.
#[inline(always)]
pub fn small_sigma1(x: u32) -> u32 {
    rotate_right(x, 17) ^ rotate_right(x, 19) ^ (x >> 10)
}
