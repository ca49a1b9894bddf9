//! Standard (non-event) leaderboards.
//!
//! Four independently sortable aggregates per player. Sort keys are an
//! explicit enum so an unhandled key is a compile-time failure, not a
//! silently wrong default.

use serde::{Deserialize, Serialize};

use crate::collection::PlayerStats;

/// Which aggregate a leaderboard request sorts by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Collection,
    Spins,
    Duplicates,
    Events,
}

/// One player's row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player: String,
    pub unique_items: u64,
    pub total_spins: u64,
    pub total_duplicates: u64,
    pub event_triggers: u64,
}

impl LeaderboardEntry {
    pub fn from_stats(player: &str, stats: &PlayerStats) -> Self {
        LeaderboardEntry {
            player: player.to_string(),
            unique_items: stats.unique_items,
            total_spins: stats.total_spins,
            total_duplicates: stats.total_duplicates,
            event_triggers: stats.event_triggers,
        }
    }

    fn key_value(&self, key: SortKey) -> u64 {
        match key {
            SortKey::Collection => self.unique_items,
            SortKey::Spins => self.total_spins,
            SortKey::Duplicates => self.total_duplicates,
            SortKey::Events => self.event_triggers,
        }
    }
}

/// Rank entries descending by the keyed aggregate; ties break by player id
/// for a deterministic order.
pub fn rank(mut entries: Vec<LeaderboardEntry>, key: SortKey) -> Vec<LeaderboardEntry> {
    entries.sort_by(|a, b| {
        b.key_value(key)
            .cmp(&a.key_value(key))
            .then_with(|| a.player.cmp(&b.player))
    });
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(player: &str, unique: u64, spins: u64, dupes: u64, events: u64) -> LeaderboardEntry {
        LeaderboardEntry {
            player: player.to_string(),
            unique_items: unique,
            total_spins: spins,
            total_duplicates: dupes,
            event_triggers: events,
        }
    }

    #[test]
    fn test_rank_by_each_key() {
        let entries = vec![
            entry("alice", 10, 50, 40, 1),
            entry("bob", 30, 40, 10, 5),
            entry("carol", 20, 60, 40, 2),
        ];

        assert_eq!(rank(entries.clone(), SortKey::Collection)[0].player, "bob");
        assert_eq!(rank(entries.clone(), SortKey::Spins)[0].player, "carol");
        assert_eq!(rank(entries.clone(), SortKey::Events)[0].player, "bob");

        let by_dupes = rank(entries, SortKey::Duplicates);
        // Tied at 40: player id decides.
        assert_eq!(by_dupes[0].player, "alice");
        assert_eq!(by_dupes[1].player, "carol");
    }

    #[test]
    fn test_from_stats() {
        let stats = PlayerStats {
            total_spins: 7,
            unique_items: 5,
            total_duplicates: 2,
            event_triggers: 1,
            ..PlayerStats::default()
        };
        let e = LeaderboardEntry::from_stats("alice", &stats);
        assert_eq!(e.total_spins, 7);
        assert_eq!(e.unique_items, 5);
    }
}
