pub mod cs;
pub mod error;

pub use cs::security;
pub use cs::security::{
    digest, find, hash, hash_any, hash_hex, Digest, Message, PreimageSearch, SearchConfig,
    SearchOutcome,
};
pub use error::{Error, Result};
