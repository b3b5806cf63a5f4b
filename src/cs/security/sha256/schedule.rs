use super::preprocess::Block;
use super::word::{add, small_sigma0, small_sigma1};

/// Number of words in one message schedule, one per compression round.
pub const SCHEDULE_LEN: usize = 64;

/// The 64 words fed to the compression rounds for one block.
pub type MessageSchedule = [u32; SCHEDULE_LEN];

/// Expands one block into its message schedule.
///
/// Words 0..16 are the block read as big-endian `u32`s; words 16..64 mix earlier
/// words through the small sigma functions.
pub fn expand(block: &Block) -> MessageSchedule {
    let mut w = [0u32; SCHEDULE_LEN];

    for (t, bytes) in block.chunks_exact(4).enumerate() {
        w[t] = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    }

    for t in 16..SCHEDULE_LEN {
        w[t] = add(&[
            small_sigma1(w[t - 2]),
            w[t - 7],
            small_sigma0(w[t - 15]),
            w[t - 16],
        ]);
    }

    w
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cs::security::sha256::preprocess::preprocess;

    #[test]
    fn test_first_words_are_big_endian_block_slices() {
        let mut block = [0u8; 64];
        for (i, b) in block.iter_mut().enumerate() {
            *b = i as u8;
        }
        let w = expand(&block);
        assert_eq!(w[0], 0x0001_0203);
        assert_eq!(w[1], 0x0405_0607);
        assert_eq!(w[15], 0x3C3D_3E3F);
    }

    #[test]
    fn test_abc_schedule() {
        // Schedule of the single padded "abc" block.
        let blocks = preprocess("abc");
        let w = expand(&blocks[0]);
        assert_eq!(w[0], 0x6162_6380);
        assert!(w[1..15].iter().all(|&x| x == 0));
        assert_eq!(w[15], 0x0000_0018);
        assert_eq!(w[16], 0x6162_6380);
        assert_eq!(w[17], 0x000F_0000);
        assert_eq!(w[63], 0x12B1_EDEB);
    }

    #[test]
    fn test_zero_block_expands_to_zero() {
        assert_eq!(expand(&[0u8; 64]), [0u32; SCHEDULE_LEN]);
    }
}
