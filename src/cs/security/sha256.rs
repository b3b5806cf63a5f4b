//! DISCLAIMER: This module is a from-scratch SHA-256 (FIPS 180-4) in pure Rust, written
//! for demonstration and educational purposes. It makes no constant-time guarantees.
//! If you need SHA-2 for real security work, use a vetted library (e.g. RustCrypto `sha2`).
//!
//! The pipeline for one message is:
//! [`preprocess`] (pad and split into blocks) → [`expand`] (64-word schedule per block)
//! → [`compress`] (64 rounds, chained through [`HashState`]) → [`Digest`].

pub mod compress;
pub mod preprocess;
pub mod schedule;
pub mod word;

use std::any::Any;
use std::fmt;
use std::str::FromStr;

use log::trace;

use crate::error::{Error, Result};

pub use compress::{compress, HashState, INITIAL_HASH, ROUND_CONSTANTS};
pub use preprocess::{pad, preprocess, Block, Message, SHA256_BLOCK_SIZE};
pub use schedule::{expand, MessageSchedule};

/// The size of the SHA-256 digest in bytes (256 bits = 32 bytes).
pub const SHA256_OUTPUT_SIZE: usize = 32;

/// A finished SHA-256 digest. Displays as 64 lowercase hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; SHA256_OUTPUT_SIZE]);

impl Digest {
    /// The 32 digest bytes, H0..H7 big-endian.
    pub fn as_bytes(&self) -> &[u8; SHA256_OUTPUT_SIZE] {
        &self.0
    }

    /// 64 lowercase hex characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; SHA256_OUTPUT_SIZE]> for Digest {
    fn from(bytes: [u8; SHA256_OUTPUT_SIZE]) -> Self {
        Digest(bytes)
    }
}

impl From<HashState> for Digest {
    fn from(state: HashState) -> Self {
        Digest(state.to_bytes())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Digest {
    type Err = Error;

    /// Parses exactly 64 hexadecimal characters, either case.
    fn from_str(s: &str) -> Result<Self> {
        if s.len() != 2 * SHA256_OUTPUT_SIZE {
            return Err(Error::InvalidDigest(format!(
                "expected {} hex characters, got {} bytes",
                2 * SHA256_OUTPUT_SIZE,
                s.len()
            )));
        }
        let mut bytes = [0u8; SHA256_OUTPUT_SIZE];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| Error::InvalidDigest(format!("{s:?}: {e}")))?;
        Ok(Digest(bytes))
    }
}

/// Computes the SHA-256 digest of a message.
///
/// # Example
/// ```
/// use sha256_lab::cs::security::sha256::digest;
///
/// let d = digest("abc");
/// assert_eq!(d.as_bytes()[0], 0xba);
/// ```
pub fn digest<'a, M: Into<Message<'a>>>(message: M) -> Digest {
    let blocks = preprocess(message);
    trace!("sha256: processing {} block(s)", blocks.len());

    let state = blocks
        .iter()
        .fold(HashState::initial(), |state, block| {
            compress(&expand(block), state)
        });
    Digest::from(state)
}

/// Computes the SHA-256 digest of a message as 64 lowercase hex characters.
///
/// # Example
/// ```
/// use sha256_lab::hash;
///
/// assert_eq!(
///     hash("abc"),
///     "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
/// );
/// ```
pub fn hash<'a, M: Into<Message<'a>>>(message: M) -> String {
    digest(message).to_hex()
}

/// Hashes a dynamically typed value.
///
/// Fails with [`Error::InputType`] before any hashing work when `value` is neither text
/// nor a byte sequence.
pub fn hash_any(value: &dyn Any) -> Result<String> {
    let message = Message::from_any(value)?;
    Ok(hash(message))
}

/// Hashes the bytes spelled out by a hex string, e.g. `"616263"` for `"abc"`.
pub fn hash_hex(hex_text: &str) -> Result<String> {
    let bytes = hex::decode(hex_text.trim())?;
    Ok(hash(&bytes))
}
