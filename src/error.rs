use thiserror::Error;

/// Errors surfaced by the digest engine and the preimage search.
#[derive(Debug, Error)]
pub enum Error {
    /// The message was neither text nor a byte sequence.
    #[error("unsupported message type: {0}")]
    InputType(String),

    /// The target digest is not exactly 64 hexadecimal characters.
    #[error("invalid SHA-256 digest: {0}")]
    InvalidDigest(String),

    #[error("invalid hex input: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("invalid search configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to build search thread pool: {0}")]
    ThreadPool(String),
}

pub type Result<T> = std::result::Result<T, Error>;
