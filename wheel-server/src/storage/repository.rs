//! Repository traits - abstraction layer for data access.
//!
//! The API layer only talks to these traits, so the in-memory reference
//! store can be swapped for a real backing store without touching the
//! handlers. Implementations must serialize `record_draw` per player: the
//! increment-then-read behind `was_new` may never race for the same player
//! (different players proceed in parallel).

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use wheel_core::achievements::UnlockFact;
use wheel_core::collection::{Completion, DrawOutcome, PlayerStats};
use wheel_core::error::WheelResult;
use wheel_core::events::{EventStanding, EventWindow};
use wheel_core::rarity::{RarityTable, Tier};

/// Per-player collection ledger + draw history.
#[async_trait]
pub trait LedgerRepo: Send + Sync {
    /// Commit one draw: validate against `table`, increment, append
    /// history. Atomic per player.
    async fn record_draw(
        &self,
        table: &RarityTable,
        player: &str,
        entity_id: &str,
        now: DateTime<Utc>,
    ) -> WheelResult<DrawOutcome>;

    /// Count a bonus-event trigger for the player.
    async fn record_event_trigger(&self, player: &str) -> WheelResult<()>;

    async fn collection(&self, player: &str) -> WheelResult<HashMap<String, u64>>;

    async fn completion(
        &self,
        table: &RarityTable,
        player: &str,
        tier: Tier,
    ) -> WheelResult<Completion>;

    async fn stats(&self, player: &str) -> WheelResult<PlayerStats>;

    /// Aggregates for every known player (luck population, leaderboards).
    async fn all_stats(&self) -> WheelResult<Vec<(String, PlayerStats)>>;
}

/// Persisted achievement unlock facts.
#[async_trait]
pub trait AchievementRepo: Send + Sync {
    async fn unlocked(&self, player: &str) -> WheelResult<HashSet<String>>;
    async fn persist_unlocks(&self, player: &str, facts: &[UnlockFact]) -> WheelResult<()>;
    async fn unlock_facts(&self, player: &str) -> WheelResult<Vec<UnlockFact>>;
}

/// Event window + event-scoped scoreboard.
#[async_trait]
pub trait EventRepo: Send + Sync {
    async fn window(&self) -> WheelResult<Option<EventWindow>>;
    async fn set_window(&self, window: Option<EventWindow>) -> WheelResult<()>;

    /// Score a draw against the current window; `None` when no window is
    /// active at `now`.
    async fn record_event_draw(
        &self,
        player: &str,
        tier: Tier,
        now: DateTime<Utc>,
    ) -> WheelResult<Option<u64>>;

    async fn standings(&self) -> WheelResult<Vec<EventStanding>>;
}
