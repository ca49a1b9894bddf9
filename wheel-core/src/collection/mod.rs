//! Collection ledger: per-player multiset of drawn entities plus the
//! append-only draw history.
//!
//! The ledger is pure data. Per-player write serialization (two concurrent
//! spins must not race past the `was_new` check) is the storage layer's
//! responsibility in `wheel-server`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{WheelError, WheelResult};
use crate::rarity::{RarityTable, Tier};

/// Immutable record of one completed draw. Appended once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawEvent {
    pub player: String,
    pub entity_id: String,
    pub tier: Tier,
    pub timestamp: DateTime<Utc>,
}

/// Result of committing a draw to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawOutcome {
    /// True iff the prior count was 0.
    pub was_new: bool,
    pub new_count: u64,
}

/// Tier completion: exact ratio, one-decimal rounding only for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub collected: usize,
    pub total: usize,
}

impl Completion {
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.collected as f64 / self.total as f64
        }
    }

    /// Percentage rounded to one decimal, for presentation.
    pub fn percent_display(&self) -> f64 {
        (self.ratio() * 1000.0).round() / 10.0
    }
}

/// Aggregate statistics derived from one player's ledger + history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub total_spins: u64,
    pub unique_items: u64,
    pub total_duplicates: u64,
    pub event_triggers: u64,
    pub mythics: u64,
    pub specials: u64,
    pub legendaries: u64,
    pub rares: u64,
    pub commons: u64,
}

impl PlayerStats {
    /// Draws counting toward the rare-pull rate (luck rating numerator).
    pub fn rare_pulls(&self) -> u64 {
        self.mythics + self.legendaries + self.rares
    }
}

/// One player's collection state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerCollection {
    counts: HashMap<String, u64>,
    history: Vec<DrawEvent>,
    event_triggers: u64,
}

impl PlayerCollection {
    /// Increment the count for an already-validated entity and append the
    /// draw event. Monotonic: counts only ever grow.
    pub fn record(&mut self, event: DrawEvent) -> DrawOutcome {
        let count = self.counts.entry(event.entity_id.clone()).or_insert(0);
        let was_new = *count == 0;
        *count += 1;
        let new_count = *count;
        self.history.push(event);
        DrawOutcome { was_new, new_count }
    }

    /// Count a bonus-event trigger (separate from entity draws).
    pub fn record_event_trigger(&mut self) {
        self.event_triggers += 1;
    }

    pub fn counts(&self) -> &HashMap<String, u64> {
        &self.counts
    }

    pub fn history(&self) -> &[DrawEvent] {
        &self.history
    }

    /// Distinct collected entities of `tier`, judged against the supplied
    /// table generation. Entities absent from that generation never count.
    pub fn tier_collected(&self, table: &RarityTable, tier: Tier) -> usize {
        self.counts
            .iter()
            .filter(|(id, count)| {
                **count > 0 && table.get(id).map(|e| e.tier == tier).unwrap_or(false)
            })
            .count()
    }

    pub fn stats(&self) -> PlayerStats {
        let mut stats = PlayerStats {
            total_spins: self.history.len() as u64,
            unique_items: self.counts.values().filter(|c| **c > 0).count() as u64,
            event_triggers: self.event_triggers,
            ..PlayerStats::default()
        };
        stats.total_duplicates = stats.total_spins.saturating_sub(stats.unique_items);
        for event in &self.history {
            match event.tier {
                Tier::Common => stats.commons += 1,
                Tier::Rare => stats.rares += 1,
                Tier::Legendary => stats.legendaries += 1,
                Tier::Special => stats.specials += 1,
                Tier::Mythic => stats.mythics += 1,
            }
        }
        stats
    }
}

/// All players' collections, bound to one table generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionLedger {
    players: HashMap<String, PlayerCollection>,
}

impl CollectionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit a draw. The entity must exist in the supplied table
    /// generation; a miss is an integrity error and the write is rejected.
    pub fn record_draw(
        &mut self,
        table: &RarityTable,
        player: &str,
        entity_id: &str,
        now: DateTime<Utc>,
    ) -> WheelResult<DrawOutcome> {
        let Some(entity) = table.get(entity_id) else {
            error!(
                player,
                entity = entity_id,
                generation = table.generation(),
                "draw references entity unknown to the current table"
            );
            return Err(WheelError::Integrity {
                entity: entity_id.to_string(),
                generation: table.generation(),
            });
        };

        let outcome = self.players.entry(player.to_string()).or_default().record(DrawEvent {
            player: player.to_string(),
            entity_id: entity.id.clone(),
            tier: entity.tier,
            timestamp: now,
        });
        debug!(
            player,
            entity = entity_id,
            tier = entity.tier.as_str(),
            was_new = outcome.was_new,
            count = outcome.new_count,
            "draw recorded"
        );
        Ok(outcome)
    }

    pub fn player(&self, player: &str) -> Option<&PlayerCollection> {
        self.players.get(player)
    }

    pub fn player_mut(&mut self, player: &str) -> &mut PlayerCollection {
        self.players.entry(player.to_string()).or_default()
    }

    /// Read-only snapshot of a player's entity counts.
    pub fn collection(&self, player: &str) -> WheelResult<&HashMap<String, u64>> {
        self.players
            .get(player)
            .map(PlayerCollection::counts)
            .ok_or_else(|| WheelError::UnknownPlayer(player.to_string()))
    }

    /// Per-tier completion against the static tier cardinality of `table`.
    pub fn completion(&self, table: &RarityTable, player: &str, tier: Tier) -> Completion {
        let total = table.tier_total(tier);
        let collected = self
            .players
            .get(player)
            .map(|pc| pc.tier_collected(table, tier))
            .unwrap_or(0);
        Completion { collected, total }
    }

    pub fn stats(&self, player: &str) -> Option<PlayerStats> {
        self.players.get(player).map(PlayerCollection::stats)
    }

    pub fn all_stats(&self) -> Vec<(String, PlayerStats)> {
        self.players
            .iter()
            .map(|(name, pc)| (name.clone(), pc.stats()))
            .collect()
    }
}
