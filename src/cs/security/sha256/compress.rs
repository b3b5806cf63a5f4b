use super::schedule::{MessageSchedule, SCHEDULE_LEN};
use super::word::{add, big_sigma0, big_sigma1, ch, maj};

/// The first 32 bits of the fractional parts of the cube roots of the first 64 primes 2..311.
pub static ROUND_CONSTANTS: [u32; SCHEDULE_LEN] = [
    0x428A2F98, 0x71374491, 0xB5C0FBCF, 0xE9B5DBA5, 0x3956C25B, 0x59F111F1, 0x923F82A4, 0xAB1C5ED5,
    0xD807AA98, 0x12835B01, 0x243185BE, 0x550C7DC3, 0x72BE5D74, 0x80DEB1FE, 0x9BDC06A7, 0xC19BF174,
    0xE49B69C1, 0xEFBE4786, 0x0FC19DC6, 0x240CA1CC, 0x2DE92C6F, 0x4A7484AA, 0x5CB0A9DC, 0x76F988DA,
    0x983E5152, 0xA831C66D, 0xB00327C8, 0xBF597FC7, 0xC6E00BF3, 0xD5A79147, 0x06CA6351, 0x14292967,
    0x27B70A85, 0x2E1B2138, 0x4D2C6DFC, 0x53380D13, 0x650A7354, 0x766A0ABB, 0x81C2C92E, 0x92722C85,
    0xA2BFE8A1, 0xA81A664B, 0xC24B8B70, 0xC76C51A3, 0xD192E819, 0xD6990624, 0xF40E3585, 0x106AA070,
    0x19A4C116, 0x1E376C08, 0x2748774C, 0x34B0BCB5, 0x391C0CB3, 0x4ED8AA4A, 0x5B9CCA4F, 0x682E6FF3,
    0x748F82EE, 0x78A5636F, 0x84C87814, 0x8CC70208, 0x90BEFFFA, 0xA4506CEB, 0xBEF9A3F7, 0xC67178F2,
];

/// The first 32 bits of the fractional parts of the square roots of the first 8 primes 2..19.
pub static INITIAL_HASH: [u32; 8] = [
    0x6A09E667, 0xBB67AE85, 0x3C6EF372, 0xA54FF53A, 0x510E527F, 0x9B05688C, 0x1F83D9AB, 0x5BE0CD19,
];

/// The chained hash value H0..H7 carried from one block to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashState(pub [u32; 8]);

impl HashState {
    /// The state every digest computation starts from.
    pub fn initial() -> Self {
        HashState(INITIAL_HASH)
    }

    /// H0..H7 concatenated big-endian.
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        for (chunk, word) in out.chunks_exact_mut(4).zip(self.0.iter()) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        out
    }
}

impl Default for HashState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Runs the 64 compression rounds over `schedule` and folds the result into `state`.
///
/// Returns the new chained value; the input state is taken by value and never
/// shared, so the caller decides whether to keep it.
pub fn compress(schedule: &MessageSchedule, state: HashState) -> HashState {
    let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = state.0;

    for (&k, &w) in ROUND_CONSTANTS.iter().zip(schedule.iter()) {
        let t1 = add(&[h, big_sigma1(e), ch(e, f, g), k, w]);
        let t2 = big_sigma0(a).wrapping_add(maj(a, b, c));

        // Shunt the working registers down one place
        h = g;
        g = f;
        f = e;
        e = d.wrapping_add(t1);
        d = c;
        c = b;
        b = a;
        a = t1.wrapping_add(t2);
    }

    let mut next = state.0;
    for (h_i, reg) in next.iter_mut().zip([a, b, c, d, e, f, g, h]) {
        *h_i = h_i.wrapping_add(reg);
    }
    HashState(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cs::security::sha256::preprocess::preprocess;
    use crate::cs::security::sha256::schedule::expand;

    #[test]
    fn test_compress_abc_block() {
        let blocks = preprocess("abc");
        let next = compress(&expand(&blocks[0]), HashState::initial());
        assert_eq!(
            next.0,
            [
                0xBA7816BF, 0x8F01CFEA, 0x414140DE, 0x5DAE2223, 0xB00361A3, 0x96177A9C, 0xB410FF61,
                0xF20015AD,
            ]
        );
    }

    #[test]
    fn test_compress_does_not_touch_caller_state() {
        let state = HashState::initial();
        let next = compress(&[0u32; SCHEDULE_LEN], state);
        assert_eq!(state, HashState::initial());
        assert_ne!(next, state);
    }

    #[test]
    fn test_to_bytes_is_big_endian() {
        let state = HashState([
            0x01020304, 0x05060708, 0, 0, 0, 0, 0, 0xA0B0C0D0,
        ]);
        let bytes = state.to_bytes();
        assert_eq!(&bytes[..8], &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(&bytes[28..], &[0xA0, 0xB0, 0xC0, 0xD0]);
    }
}
