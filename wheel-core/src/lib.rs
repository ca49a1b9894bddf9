//! Item Wheel - Reward Engine Core
//!
//! This crate provides the deterministic reward logic for the wheel:
//! - Rarity catalogue (tiered entities, reserved mythic/special mass)
//! - Weighted sampler (single draw, tier precedence)
//! - Loot-pool sampler (bounded multi-draw container simulation)
//! - Collection ledger (per-player multiset + draw history)
//! - Progress derivation (completion, luck rating, achievements)
//! - Competitive scoring mode (time-boxed event window, bonus spins)
//!
//! Everything here is pure and synchronous. Persistence, caching and
//! per-player write serialization live in `wheel-server`.

pub mod achievements;
pub mod collection;
pub mod constants;
pub mod error;
pub mod events;
pub mod leaderboard;
pub mod luck;
pub mod rarity;
pub mod sampler;

pub use error::WheelError;
