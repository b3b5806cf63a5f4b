//! # Brute-force SHA-256 preimage search
//!
//! Enumerates printable-ASCII strings in increasing length, lexicographic order within a
//! length, and returns the first one whose SHA-256 digest equals the target.
//!
//! The search is always bounded: by a maximum candidate length and, optionally, by a
//! deadline or an external [`CancelToken`]. Each length's candidate space is split into
//! fixed-size chunks searched in parallel with rayon. Unless the search is interrupted
//! mid-length, the match reported is the first one in enumeration order.
//!
//! This is a demonstration of the digest engine's equality contract, not a practical
//! attack: the space grows by a factor of 95 per character.

use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::cs::security::sha256::{digest, Digest};
use crate::error::{Error, Result};

/// Number of printable ASCII symbols, `' '` through `'~'`.
pub const ALPHABET_SIZE: usize = 95;

/// The candidate alphabet in code-point order.
pub const ALPHABET: [u8; ALPHABET_SIZE] = {
    let mut symbols = [0u8; ALPHABET_SIZE];
    let mut i = 0;
    while i < ALPHABET_SIZE {
        symbols[i] = b' ' + i as u8;
        i += 1;
    }
    symbols
};

/// Longest candidate length accepted; `95^9` is the largest power that fits in a `u64` index.
pub const MAX_SEARCH_LENGTH: usize = 9;

const DEFAULT_MAX_LENGTH: usize = 4;
const DEFAULT_CHUNK_SIZE: u64 = 4096;

/// Number of candidates of exactly `length` symbols.
fn candidate_count(length: usize) -> u64 {
    (ALPHABET_SIZE as u64).pow(length as u32)
}

/// Identifies one candidate: its length and its index in lexicographic order among
/// candidates of that length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CandidatePosition {
    /// Number of symbols in the candidate.
    pub length: usize,
    /// Offset among candidates of `length` symbols, `0..95^length`.
    pub index: u64,
}

impl CandidatePosition {
    /// The first candidate, the single-character string `" "`.
    pub fn start() -> Self {
        Self { length: 1, index: 0 }
    }
}

impl Default for CandidatePosition {
    fn default() -> Self {
        Self::start()
    }
}

/// Resumable iterator over candidate strings up to a maximum length.
///
/// Positions are stable, so an enumeration can be stopped, its [`position`](Self::position)
/// recorded, and a new iterator built with [`Candidates::resume`] to pick up where it left off.
///
/// # Example
/// ```
/// use sha256_lab::cs::security::preimage::Candidates;
///
/// let mut candidates = Candidates::new(2);
/// assert_eq!(candidates.next().as_deref(), Some(" "));
/// assert_eq!(candidates.next().as_deref(), Some("!"));
/// assert_eq!(candidates.count(), 95 + 95 * 95 - 2);
/// ```
#[derive(Debug, Clone)]
pub struct Candidates {
    /// Alphabet offsets of the next candidate, most significant first.
    digits: Vec<u8>,
    index: u64,
    max_length: usize,
    exhausted: bool,
}

impl Candidates {
    /// All candidates of length `1..=max_length`. `max_length` is capped at
    /// [`MAX_SEARCH_LENGTH`].
    pub fn new(max_length: usize) -> Self {
        Self::resume(CandidatePosition::start(), max_length)
    }

    /// Candidates from `position` (inclusive) through the end of `max_length`.
    pub fn resume(position: CandidatePosition, max_length: usize) -> Self {
        let max_length = max_length.min(MAX_SEARCH_LENGTH);
        let length = position.length.max(1);
        let exhausted = length > max_length || position.index >= candidate_count(length);

        let mut digits = vec![0u8; length];
        if !exhausted {
            let mut rest = position.index;
            for digit in digits.iter_mut().rev() {
                *digit = (rest % ALPHABET_SIZE as u64) as u8;
                rest /= ALPHABET_SIZE as u64;
            }
        }

        Self {
            digits,
            index: position.index,
            max_length,
            exhausted,
        }
    }

    /// Position of the next candidate to be yielded, or `None` once exhausted.
    pub fn position(&self) -> Option<CandidatePosition> {
        if self.exhausted {
            None
        } else {
            Some(CandidatePosition {
                length: self.digits.len(),
                index: self.index,
            })
        }
    }

    fn render(&self) -> String {
        self.digits
            .iter()
            .map(|&d| ALPHABET[d as usize] as char)
            .collect()
    }

    fn advance(&mut self) {
        // Odometer increment, last symbol fastest
        for digit in self.digits.iter_mut().rev() {
            if (*digit as usize) + 1 < ALPHABET_SIZE {
                *digit += 1;
                self.index += 1;
                return;
            }
            *digit = 0;
        }

        let next_length = self.digits.len() + 1;
        if next_length > self.max_length {
            self.exhausted = true;
        } else {
            self.digits = vec![0u8; next_length];
            self.index = 0;
        }
    }
}

impl Iterator for Candidates {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.exhausted {
            return None;
        }
        let candidate = self.render();
        self.advance();
        Some(candidate)
    }
}

/// Shared flag a host can raise to stop a running search from another thread.
///
/// # Example
/// ```
/// use sha256_lab::cs::security::preimage::{CancelToken, PreimageSearch, SearchConfig, SearchOutcome};
/// use sha256_lab::hash;
///
/// let cancel = CancelToken::new();
/// let config = SearchConfig::builder()
///     .max_length(2)
///     .cancel_token(cancel.clone())
///     .build()
///     .unwrap();
/// cancel.cancel();
/// let outcome = PreimageSearch::new(config).unwrap().find(&hash("ab")).unwrap();
/// assert!(matches!(outcome, SearchOutcome::Cancelled { .. }));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A token that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks every search holding a clone of this token to stop after its current chunk.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether [`cancel`](Self::cancel) has been called on this token or any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Result of a bounded search.
///
/// `DeadlineExceeded` and `Cancelled` carry the position to pass to
/// [`SearchConfigBuilder::start_at`] to continue: the first candidate that was not
/// searched. Candidates after it may have been searched already and are checked again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A candidate whose digest equals the target.
    Found(String),
    /// Every candidate up to the maximum length was tried without a match.
    NotFound,
    /// The deadline passed before the bound was exhausted.
    DeadlineExceeded { resume_at: CandidatePosition },
    /// The [`CancelToken`] was raised before the bound was exhausted.
    Cancelled { resume_at: CandidatePosition },
}

impl SearchOutcome {
    /// The preimage, if one was found.
    pub fn found(&self) -> Option<&str> {
        match self {
            SearchOutcome::Found(preimage) => Some(preimage),
            _ => None,
        }
    }
}

/// Bounds and tuning for a [`PreimageSearch`].
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Longest candidate tried, `1..=MAX_SEARCH_LENGTH`.
    pub max_length: usize,
    /// Wall-clock budget measured from the start of the search.
    pub deadline: Option<Duration>,
    /// Candidates per parallel work item; also the granularity of interruption.
    pub chunk_size: u64,
    /// Run in a dedicated pool of this many threads instead of rayon's global pool.
    pub threads: Option<usize>,
    /// Checked before every chunk.
    pub cancel: CancelToken,
    /// First candidate to try; earlier ones are skipped.
    pub start_at: CandidatePosition,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            deadline: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            threads: None,
            cancel: CancelToken::new(),
            start_at: CandidatePosition::start(),
        }
    }
}

impl SearchConfig {
    /// Starts a [`SearchConfigBuilder`] from the defaults.
    pub fn builder() -> SearchConfigBuilder {
        SearchConfigBuilder::new()
    }

    fn validate(&self) -> Result<()> {
        if self.max_length == 0 || self.max_length > MAX_SEARCH_LENGTH {
            return Err(Error::InvalidConfig(format!(
                "max_length must be in 1..={MAX_SEARCH_LENGTH}, got {}",
                self.max_length
            )));
        }
        if self.chunk_size == 0 {
            return Err(Error::InvalidConfig("chunk_size must be nonzero".into()));
        }
        if self.threads == Some(0) {
            return Err(Error::InvalidConfig("threads must be nonzero".into()));
        }
        if self.start_at.length == 0 {
            return Err(Error::InvalidConfig("start_at length must be at least 1".into()));
        }
        Ok(())
    }
}

/// A builder for [`SearchConfig`].
#[derive(Debug, Clone, Default)]
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    /// Create a new builder with defaults (max length 4, no deadline, global pool).
    pub fn new() -> Self {
        Default::default()
    }

    /// Longest candidate to try, `1..=MAX_SEARCH_LENGTH`.
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.config.max_length = max_length;
        self
    }

    /// Wall-clock budget, measured from the start of [`PreimageSearch::find`].
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.config.deadline = Some(deadline);
        self
    }

    /// Candidates per parallel work item.
    pub fn chunk_size(mut self, chunk_size: u64) -> Self {
        self.config.chunk_size = chunk_size;
        self
    }

    /// Search in a dedicated pool of `threads` workers.
    pub fn threads(mut self, threads: usize) -> Self {
        self.config.threads = Some(threads);
        self
    }

    /// Share `cancel` with the host so it can stop the search.
    pub fn cancel_token(mut self, cancel: CancelToken) -> Self {
        self.config.cancel = cancel;
        self
    }

    /// Skip every candidate before `position`.
    pub fn start_at(mut self, position: CandidatePosition) -> Self {
        self.config.start_at = position;
        self
    }

    /// Validates the bounds and returns the configuration.
    pub fn build(self) -> Result<SearchConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Why workers stopped early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interrupt {
    Deadline,
    Cancelled,
}

/// Bounded, parallel brute-force preimage search.
#[derive(Debug, Clone)]
pub struct PreimageSearch {
    config: SearchConfig,
}

impl PreimageSearch {
    /// Fails with [`Error::InvalidConfig`] when `config` is out of bounds.
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Searches for a preimage of a hex-encoded digest.
    ///
    /// Fails with [`Error::InvalidDigest`] before any enumeration when `digest_hex` is not
    /// exactly 64 hexadecimal characters.
    pub fn find(&self, digest_hex: &str) -> Result<SearchOutcome> {
        let target = Digest::from_str(digest_hex)?;
        self.find_digest(&target)
    }

    /// Searches for a preimage of `target`.
    pub fn find_digest(&self, target: &Digest) -> Result<SearchOutcome> {
        match self.config.threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| Error::ThreadPool(e.to_string()))?;
                Ok(pool.install(|| self.run(target)))
            }
            None => Ok(self.run(target)),
        }
    }

    fn run(&self, target: &Digest) -> SearchOutcome {
        let started = Instant::now();
        let deadline = self.config.deadline.map(|budget| started + budget);
        let interrupted = AtomicBool::new(false);
        let start = self.config.start_at;

        for length in start.length..=self.config.max_length {
            let first = if length == start.length { start.index } else { 0 };
            let total = candidate_count(length);
            if first >= total {
                continue;
            }
            debug!(
                "preimage search: length {length}, candidates {first}..{total} of target {target}"
            );

            let chunk_size = self.config.chunk_size;
            let chunks = (total - first).div_ceil(chunk_size);
            // Lowest chunk left unsearched because of an interrupt. Every chunk either
            // runs to completion or is skipped, so everything before it is done.
            let first_skipped = AtomicU64::new(u64::MAX);

            let found = (0..chunks).into_par_iter().find_map_first(|chunk| {
                if self.interrupt(deadline).is_some() {
                    interrupted.store(true, Ordering::Relaxed);
                }
                if interrupted.load(Ordering::Relaxed) {
                    first_skipped.fetch_min(chunk, Ordering::Relaxed);
                    return None;
                }

                let offset = first + chunk * chunk_size;
                let count = chunk_size.min(total - offset);
                Candidates::resume(CandidatePosition { length, index: offset }, length)
                    .take(count as usize)
                    .find(|candidate| digest(candidate.as_str()) == *target)
            });

            if let Some(preimage) = found {
                info!(
                    "preimage search: found {preimage:?} after {:?}",
                    started.elapsed()
                );
                return SearchOutcome::Found(preimage);
            }

            let skipped = first_skipped.load(Ordering::Relaxed);
            if skipped != u64::MAX {
                let resume_at = CandidatePosition {
                    length,
                    index: first + skipped * chunk_size,
                };
                return match self.interrupt(deadline) {
                    Some(Interrupt::Deadline) => {
                        warn!("preimage search: deadline exceeded at length {length}");
                        SearchOutcome::DeadlineExceeded { resume_at }
                    }
                    _ => {
                        warn!("preimage search: cancelled at length {length}");
                        SearchOutcome::Cancelled { resume_at }
                    }
                };
            }
        }

        debug!(
            "preimage search: no preimage up to length {} ({:?})",
            self.config.max_length,
            started.elapsed()
        );
        SearchOutcome::NotFound
    }

    fn interrupt(&self, deadline: Option<Instant>) -> Option<Interrupt> {
        if self.config.cancel.is_cancelled() {
            Some(Interrupt::Cancelled)
        } else if deadline.is_some_and(|d| Instant::now() >= d) {
            Some(Interrupt::Deadline)
        } else {
            None
        }
    }
}

/// Searches for a printable-ASCII preimage of `digest_hex` of at most `max_length` characters.
///
/// Returns [`SearchOutcome::NotFound`] when the bound is exhausted, and
/// [`SearchOutcome::DeadlineExceeded`] when `deadline` elapses first.
///
/// # Example
/// ```
/// use sha256_lab::{find, hash, SearchOutcome};
///
/// let target = hash("Hi");
/// let outcome = find(&target, 2, None).unwrap();
/// assert_eq!(outcome, SearchOutcome::Found("Hi".to_string()));
/// ```
pub fn find(
    digest_hex: &str,
    max_length: usize,
    deadline: Option<Duration>,
) -> Result<SearchOutcome> {
    let target = Digest::from_str(digest_hex)?;

    let mut builder = SearchConfig::builder().max_length(max_length);
    if let Some(deadline) = deadline {
        builder = builder.deadline(deadline);
    }
    PreimageSearch::new(builder.build()?)?.find_digest(&target)
}
