//! Error taxonomy for the reward engine.
//!
//! - `Configuration`: malformed rarity table / probability mass broken.
//!   Fatal, refuse to sample; requires a catalogue fix.
//! - `Integrity`: a write referenced an entity unknown to the current
//!   table generation. The write is rejected, the ledger stays clean.
//! - `TransientFetch`: catalogue or collection fetch failed. Recoverable;
//!   callers may retry or fall back to cached data.

use thiserror::Error;

pub type WheelResult<T> = Result<T, WheelError>;

#[derive(Debug, Error)]
pub enum WheelError {
    /// Malformed rarity table. Not user-recoverable without a catalogue fix.
    #[error("catalogue configuration error: {0}")]
    Configuration(String),

    /// Draw result references an entity missing from the current table.
    #[error("integrity error: entity '{entity}' not in table generation {generation}")]
    Integrity { entity: String, generation: u64 },

    /// Upstream fetch failed; retryable.
    #[error("transient fetch error: {0}")]
    TransientFetch(String),

    /// No ledger state for this player.
    #[error("unknown player '{0}'")]
    UnknownPlayer(String),
}

impl WheelError {
    /// Whether the caller may retry the operation as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WheelError::TransientFetch(_))
    }
}
