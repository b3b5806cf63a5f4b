//! Message canonicalization, padding and block parsing (FIPS 180-4 sections 5.1.1 and 5.2.1).

use std::any::Any;

use crate::error::{Error, Result};

/// Size of one SHA-256 message block in bytes (512 bits).
pub const SHA256_BLOCK_SIZE: usize = 64;

/// Bytes reserved at the end of the padded message for the bit length.
const LENGTH_FIELD_SIZE: usize = 8;

/// One 512-bit message block.
pub type Block = [u8; SHA256_BLOCK_SIZE];

/// A message to be hashed: either UTF-8 text or raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message<'a> {
    Text(&'a str),
    Bytes(&'a [u8]),
}

impl<'a> Message<'a> {
    /// The canonical byte sequence of the message. Text is taken as its UTF-8 encoding.
    pub fn as_bytes(&self) -> &'a [u8] {
        match *self {
            Message::Text(text) => text.as_bytes(),
            Message::Bytes(bytes) => bytes,
        }
    }

    /// Resolves a dynamically typed value into a message.
    ///
    /// Accepts `String`, `&'static str`, `Vec<u8>`, `&'static [u8]` and `Box<[u8]>`.
    /// Anything else fails with [`Error::InputType`].
    pub fn from_any(value: &'a dyn Any) -> Result<Self> {
        if let Some(text) = value.downcast_ref::<String>() {
            Ok(Message::Text(text.as_str()))
        } else if let Some(text) = value.downcast_ref::<&'static str>() {
            Ok(Message::Text(*text))
        } else if let Some(bytes) = value.downcast_ref::<Vec<u8>>() {
            Ok(Message::Bytes(bytes.as_slice()))
        } else if let Some(bytes) = value.downcast_ref::<&'static [u8]>() {
            Ok(Message::Bytes(*bytes))
        } else if let Some(bytes) = value.downcast_ref::<Box<[u8]>>() {
            Ok(Message::Bytes(&bytes[..]))
        } else {
            Err(Error::InputType(
                "expected text (String, &str) or bytes (Vec<u8>, &[u8], Box<[u8]>)".to_string(),
            ))
        }
    }
}

impl<'a> From<&'a str> for Message<'a> {
    fn from(text: &'a str) -> Self {
        Message::Text(text)
    }
}

impl<'a> From<&'a String> for Message<'a> {
    fn from(text: &'a String) -> Self {
        Message::Text(text.as_str())
    }
}

impl<'a> From<&'a [u8]> for Message<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Message::Bytes(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Message<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Message::Bytes(bytes.as_slice())
    }
}

impl<'a> From<&'a Vec<u8>> for Message<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Message::Bytes(bytes.as_slice())
    }
}

/// Pads `bytes` to a multiple of 64 bytes.
///
/// Appends `0x80`, then zeros until the length is 56 mod 64, then the original
/// length in bits as a big-endian `u64`. The `0x80` marker is always written, so
/// an input that is already a multiple of 64 bytes gains a whole extra block.
pub fn pad(bytes: &[u8]) -> Vec<u8> {
    let bit_len = (bytes.len() as u64).wrapping_mul(8);

    let unpadded = bytes.len() + 1 + LENGTH_FIELD_SIZE;
    let padded_len = unpadded.div_ceil(SHA256_BLOCK_SIZE) * SHA256_BLOCK_SIZE;

    let mut padded = Vec::with_capacity(padded_len);
    padded.extend_from_slice(bytes);
    padded.push(0x80);
    padded.resize(padded_len - LENGTH_FIELD_SIZE, 0x00);
    padded.extend_from_slice(&bit_len.to_be_bytes());

    debug_assert_eq!(padded.len() % SHA256_BLOCK_SIZE, 0);
    padded
}

/// Pads the message and splits it into consecutive 64-byte blocks, in message order.
pub fn preprocess<'a, M: Into<Message<'a>>>(message: M) -> Vec<Block> {
    let padded = pad(message.into().as_bytes());

    padded
        .chunks_exact(SHA256_BLOCK_SIZE)
        .map(|chunk| {
            let mut block = [0u8; SHA256_BLOCK_SIZE];
            block.copy_from_slice(chunk);
            block
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_empty_message() {
        let padded = pad(b"");
        assert_eq!(padded.len(), 64);
        assert_eq!(padded[0], 0x80);
        assert!(padded[1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_pad_abc_layout() {
        let padded = pad(b"abc");
        assert_eq!(padded.len(), 64);
        assert_eq!(&padded[..4], &[0x61, 0x62, 0x63, 0x80]);
        assert!(padded[4..56].iter().all(|&b| b == 0));
        assert_eq!(&padded[56..], &24u64.to_be_bytes());
    }

    #[test]
    fn test_block_count_at_boundaries() {
        // 55 bytes leave exactly room for 0x80 and the length field.
        assert_eq!(preprocess(&[0x41u8; 55]).len(), 1);
        // 56 bytes push the length field into a second block.
        assert_eq!(preprocess(&[0x41u8; 56]).len(), 2);
        assert_eq!(preprocess(&[0x41u8; 63]).len(), 2);
        // An aligned message still gets a padding-only block.
        assert_eq!(preprocess(&[0x41u8; 64]).len(), 2);
        assert_eq!(preprocess(&[0x41u8; 119]).len(), 2);
        assert_eq!(preprocess(&[0x41u8; 120]).len(), 3);
    }

    #[test]
    fn test_aligned_message_trailing_block() {
        let blocks = preprocess(&[0xFFu8; 64]);
        assert_eq!(blocks[0], [0xFFu8; 64]);
        assert_eq!(blocks[1][0], 0x80);
        assert!(blocks[1][1..56].iter().all(|&b| b == 0));
        assert_eq!(&blocks[1][56..], &512u64.to_be_bytes());
    }

    #[test]
    fn test_padded_length_always_positive_multiple() {
        for len in 0..300 {
            let padded = pad(&vec![0u8; len]);
            assert!(!padded.is_empty());
            assert_eq!(padded.len() % SHA256_BLOCK_SIZE, 0, "length {len}");
            assert!(padded.len() >= len + 9, "length {len}");
            assert!(padded.len() < len + 9 + SHA256_BLOCK_SIZE, "length {len}");
        }
    }

    #[test]
    fn test_text_is_utf8_encoded() {
        let text = Message::from("héllo");
        assert_eq!(text.as_bytes(), "héllo".as_bytes());
        assert_eq!(preprocess("héllo"), preprocess("héllo".as_bytes()));
    }

    #[test]
    fn test_from_any_accepts_text_and_bytes() {
        let owned = String::from("abc");
        assert_eq!(Message::from_any(&owned).unwrap(), Message::Text("abc"));

        let literal: &'static str = "abc";
        assert_eq!(Message::from_any(&literal).unwrap(), Message::Text("abc"));

        let bytes = vec![1u8, 2, 3];
        assert_eq!(
            Message::from_any(&bytes).unwrap(),
            Message::Bytes(&[1, 2, 3])
        );

        let slice: &'static [u8] = b"xyz";
        assert_eq!(Message::from_any(&slice).unwrap(), Message::Bytes(b"xyz"));

        let boxed: Box<[u8]> = vec![9u8].into_boxed_slice();
        assert_eq!(Message::from_any(&boxed).unwrap(), Message::Bytes(&[9]));
    }

    #[test]
    fn test_from_any_rejects_other_types() {
        assert!(matches!(Message::from_any(&42i32), Err(Error::InputType(_))));
        assert!(matches!(Message::from_any(&3.5f64), Err(Error::InputType(_))));
        assert!(matches!(
            Message::from_any(&vec![1u32, 2]),
            Err(Error::InputType(_))
        ));
    }
}
