//! Item Wheel reference backend.
//!
//! Implements the reward-engine interface contract over JSON-over-HTTP:
//! spin + ledger commit (atomic per player), container simulation,
//! collection/completion reads, luck and achievement derivation,
//! leaderboards, and the time-boxed event mode.
//!
//! Storage sits behind `async_trait` repositories so the in-memory
//! reference store can be swapped for a real backend without touching the
//! API layer.

pub mod api;
pub mod catalogue;
pub mod error;
pub mod storage;
