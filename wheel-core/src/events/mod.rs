//! Competitive scoring mode ("Gold Rush") and bonus events.
//!
//! The event window is fully described by two broadcast timestamps; every
//! client derives the same phase from them by wall-clock comparison, so the
//! state machine needs no coordination:
//!
//! ```text
//! inactive -> pending -> active -> inactive
//! ```
//!
//! While active, each draw converts to points by rarity. At window close,
//! a sub-linear curve converts the final point total into bonus spins so
//! the top scorer cannot snowball.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{
    BONUS_SPIN_CURVE_MULT, BONUS_SPIN_POINT_DIVISOR, EVENT_POINTS_COMMON, EVENT_POINTS_LEGENDARY,
    EVENT_POINTS_MYTHIC, EVENT_POINTS_RARE, EVENT_POINTS_SPECIAL,
};
use crate::rarity::Tier;

/// The scheduled event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    GoldRush,
}

/// Event phase, derived purely from the window timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventPhase {
    Inactive,
    /// Pre-announcement countdown; no points accrue yet.
    Pending,
    Active,
}

/// A scheduled event window as broadcast by the event controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventWindow {
    pub kind: EventKind,
    /// Start of point accrual. `None` means no pre-announcement: the window
    /// is active from whenever it was broadcast until `expires_at`.
    pub activates_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
}

impl EventWindow {
    /// Derive the phase at `now`. Safe to evaluate redundantly on every
    /// client; identical timestamps always yield identical phases.
    pub fn phase(&self, now: DateTime<Utc>) -> EventPhase {
        if now >= self.expires_at {
            return EventPhase::Inactive;
        }
        match self.activates_at {
            Some(at) if now < at => EventPhase::Pending,
            _ => EventPhase::Active,
        }
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.phase(now) == EventPhase::Active
    }
}

/// Points awarded for drawing an entity of the given tier during an active
/// window. Monotonically increasing with rarity.
pub fn points_for_tier(tier: Tier) -> u64 {
    match tier {
        Tier::Common => EVENT_POINTS_COMMON,
        Tier::Rare => EVENT_POINTS_RARE,
        Tier::Legendary => EVENT_POINTS_LEGENDARY,
        Tier::Special => EVENT_POINTS_SPECIAL,
        Tier::Mythic => EVENT_POINTS_MYTHIC,
    }
}

/// Convert a final event point total into bonus spins.
///
/// `bonus = floor(log2(points / 50 + 1) * 4)` — sub-linear so marginal
/// points past the first few hundred yield diminishing spins.
/// Reference points: 50 -> 4, 500 -> 13, 3000 -> 23.
pub fn convert_points_to_bonus_spins(points: u64) -> u64 {
    let curve = (points as f64 / BONUS_SPIN_POINT_DIVISOR + 1.0).log2() * BONUS_SPIN_CURVE_MULT;
    curve.floor() as u64
}

/// One player's event-scoped score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventScore {
    pub points: u64,
    pub spins: u64,
    /// Instant of the most recent point gain; drives the tie-break.
    pub last_scored_at: DateTime<Utc>,
}

/// Ranked event leaderboard row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventStanding {
    pub player: String,
    pub points: u64,
    pub spins: u64,
}

/// Event-scoped leaderboard, independent of the permanent ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventScoreboard {
    scores: HashMap<String, EventScore>,
}

impl EventScoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score a draw. Returns the points awarded, or `None` when the window
    /// is not active at `now` (pending/expired draws score nothing).
    pub fn record_draw(
        &mut self,
        window: &EventWindow,
        player: &str,
        tier: Tier,
        now: DateTime<Utc>,
    ) -> Option<u64> {
        if !window.is_active(now) {
            return None;
        }
        let points = points_for_tier(tier);
        let score = self.scores.entry(player.to_string()).or_insert(EventScore {
            points: 0,
            spins: 0,
            last_scored_at: now,
        });
        score.points += points;
        score.spins += 1;
        score.last_scored_at = now;
        debug!(player, tier = tier.as_str(), points, "event draw scored");
        Some(points)
    }

    pub fn score(&self, player: &str) -> Option<&EventScore> {
        self.scores.get(player)
    }

    /// Standings ranked strictly by points. Equal points rank by earlier
    /// `last_scored_at` (first to reach the score wins), then player id.
    /// The tie-break is a documented design choice, not an inherited rule.
    pub fn standings(&self) -> Vec<EventStanding> {
        let mut rows: Vec<(&String, &EventScore)> = self.scores.iter().collect();
        rows.sort_by(|(name_a, a), (name_b, b)| {
            b.points
                .cmp(&a.points)
                .then(a.last_scored_at.cmp(&b.last_scored_at))
                .then(name_a.cmp(name_b))
        });
        rows.into_iter()
            .map(|(player, score)| EventStanding {
                player: player.clone(),
                points: score.points,
                spins: score.spins,
            })
            .collect()
    }
}

/// Bonus events that can replace a normal draw result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusEvent {
    /// 3 bonus spins.
    TripleSpin,
    /// One draw with equal chance for all items.
    LuckySpin,
}

impl BonusEvent {
    pub const ALL: [BonusEvent; 2] = [BonusEvent::TripleSpin, BonusEvent::LuckySpin];

    pub fn id(&self) -> &'static str {
        match self {
            BonusEvent::TripleSpin => "triple_spin",
            BonusEvent::LuckySpin => "lucky_spin",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BonusEvent::TripleSpin => "Triple Spin",
            BonusEvent::LuckySpin => "Lucky Spin",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BonusEvent::TripleSpin => "3 bonus spins!",
            BonusEvent::LuckySpin => "Equal chance for all items!",
        }
    }

    /// Extra spins granted immediately on trigger.
    pub fn granted_spins(&self) -> u64 {
        match self {
            BonusEvent::TripleSpin => 3,
            BonusEvent::LuckySpin => 0,
        }
    }

    /// Uniform pick among the available bonus events.
    pub fn pick<R: rand::Rng>(rng: &mut R) -> BonusEvent {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}
