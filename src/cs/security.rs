pub mod preimage;
pub mod sha256;

// Re-export SHA-256 functionality
pub use sha256::{
    digest, hash, hash_any, hash_hex, Digest, HashState, Message, SHA256_BLOCK_SIZE,
    SHA256_OUTPUT_SIZE,
};

// Re-export preimage search functionality
pub use preimage::{
    find, CancelToken, CandidatePosition, Candidates, PreimageSearch, SearchConfig,
    SearchConfigBuilder, SearchOutcome, ALPHABET, MAX_SEARCH_LENGTH,
};
