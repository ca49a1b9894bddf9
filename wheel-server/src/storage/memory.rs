//! In-memory reference store.
//!
//! Layout: a short-lived `parking_lot` map lock hands out one
//! `tokio::sync::Mutex` per player; `record_draw` holds that player's
//! mutex across validate + increment + append, so the `was_new` check
//! cannot race with a concurrent spin from the same player while draws
//! for different players stay fully parallel.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::error;
use wheel_core::achievements::UnlockFact;
use wheel_core::collection::{Completion, DrawEvent, DrawOutcome, PlayerCollection, PlayerStats};
use wheel_core::error::{WheelError, WheelResult};
use wheel_core::events::{EventScoreboard, EventStanding, EventWindow};
use wheel_core::rarity::{RarityTable, Tier};

use super::repository::{AchievementRepo, EventRepo, LedgerRepo};

type PlayerSlot = Arc<tokio::sync::Mutex<PlayerCollection>>;

#[derive(Default)]
struct EventState {
    window: Option<EventWindow>,
    board: EventScoreboard,
}

/// Reference implementation of all repositories, process-local.
#[derive(Default)]
pub struct MemoryStore {
    players: Mutex<HashMap<String, PlayerSlot>>,
    unlocks: Mutex<HashMap<String, Vec<UnlockFact>>>,
    event: Mutex<EventState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn player_slot(&self, player: &str) -> PlayerSlot {
        let mut players = self.players.lock();
        players
            .entry(player.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(PlayerCollection::default())))
            .clone()
    }

    fn existing_slot(&self, player: &str) -> WheelResult<PlayerSlot> {
        self.players
            .lock()
            .get(player)
            .cloned()
            .ok_or_else(|| WheelError::UnknownPlayer(player.to_string()))
    }
}

#[async_trait]
impl LedgerRepo for MemoryStore {
    async fn record_draw(
        &self,
        table: &RarityTable,
        player: &str,
        entity_id: &str,
        now: DateTime<Utc>,
    ) -> WheelResult<DrawOutcome> {
        let slot = self.player_slot(player);
        let mut collection = slot.lock().await;

        let Some(entity) = table.get(entity_id) else {
            error!(
                player,
                entity = entity_id,
                generation = table.generation(),
                "rejecting draw for entity unknown to the current table"
            );
            return Err(WheelError::Integrity {
                entity: entity_id.to_string(),
                generation: table.generation(),
            });
        };

        Ok(collection.record(DrawEvent {
            player: player.to_string(),
            entity_id: entity.id.clone(),
            tier: entity.tier,
            timestamp: now,
        }))
    }

    async fn record_event_trigger(&self, player: &str) -> WheelResult<()> {
        let slot = self.player_slot(player);
        slot.lock().await.record_event_trigger();
        Ok(())
    }

    async fn collection(&self, player: &str) -> WheelResult<HashMap<String, u64>> {
        let slot = self.existing_slot(player)?;
        let collection = slot.lock().await;
        Ok(collection.counts().clone())
    }

    async fn completion(
        &self,
        table: &RarityTable,
        player: &str,
        tier: Tier,
    ) -> WheelResult<Completion> {
        let total = table.tier_total(tier);
        // The map guard must be gone before the per-player await.
        let slot = self.players.lock().get(player).cloned();
        let collected = match slot {
            Some(slot) => {
                let collection = slot.lock().await;
                collection.tier_collected(table, tier)
            }
            None => 0,
        };
        Ok(Completion { collected, total })
    }

    async fn stats(&self, player: &str) -> WheelResult<PlayerStats> {
        let slot = self.existing_slot(player)?;
        let collection = slot.lock().await;
        Ok(collection.stats())
    }

    async fn all_stats(&self) -> WheelResult<Vec<(String, PlayerStats)>> {
        let slots: Vec<(String, PlayerSlot)> = self
            .players
            .lock()
            .iter()
            .map(|(name, slot)| (name.clone(), slot.clone()))
            .collect();

        let mut stats = Vec::with_capacity(slots.len());
        for (name, slot) in slots {
            let collection = slot.lock().await;
            stats.push((name, collection.stats()));
        }
        Ok(stats)
    }
}

#[async_trait]
impl AchievementRepo for MemoryStore {
    async fn unlocked(&self, player: &str) -> WheelResult<HashSet<String>> {
        Ok(self
            .unlocks
            .lock()
            .get(player)
            .map(|facts| facts.iter().map(|f| f.id.clone()).collect())
            .unwrap_or_default())
    }

    async fn persist_unlocks(&self, player: &str, facts: &[UnlockFact]) -> WheelResult<()> {
        if facts.is_empty() {
            return Ok(());
        }
        let mut unlocks = self.unlocks.lock();
        let existing = unlocks.entry(player.to_string()).or_default();
        for fact in facts {
            if !existing.iter().any(|f| f.id == fact.id) {
                existing.push(fact.clone());
            }
        }
        Ok(())
    }

    async fn unlock_facts(&self, player: &str) -> WheelResult<Vec<UnlockFact>> {
        Ok(self.unlocks.lock().get(player).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl EventRepo for MemoryStore {
    async fn window(&self) -> WheelResult<Option<EventWindow>> {
        Ok(self.event.lock().window)
    }

    async fn set_window(&self, window: Option<EventWindow>) -> WheelResult<()> {
        let mut event = self.event.lock();
        event.window = window;
        // A new window starts from a clean scoreboard.
        event.board = EventScoreboard::new();
        Ok(())
    }

    async fn record_event_draw(
        &self,
        player: &str,
        tier: Tier,
        now: DateTime<Utc>,
    ) -> WheelResult<Option<u64>> {
        let mut event = self.event.lock();
        let Some(window) = event.window else {
            return Ok(None);
        };
        Ok(event.board.record_draw(&window, player, tier, now))
    }

    async fn standings(&self) -> WheelResult<Vec<EventStanding>> {
        Ok(self.event.lock().board.standings())
    }
}
