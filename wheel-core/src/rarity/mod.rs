//! Rarity catalogue: tiers, entities, and the validated rarity table.
//!
//! The table partitions probability space as follows:
//! - Mythic roster: tiny fixed chances, reserved off the top
//! - Special roster: named individuals with fixed independent chances
//! - Common/rare/legendary pool: the remaining mass, uniform per entry
//!
//! The pool is deliberately unweighted so catalogue edits never require
//! renormalization of individual item chances.

pub mod catalogue;

use serde::{Deserialize, Serialize};

use crate::constants::PROBABILITY_TOLERANCE;
use crate::error::{WheelError, WheelResult};

/// Rarity tier. Ordered from most to least frequently drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Common,
    Rare,
    Legendary,
    /// Named roster members with fixed individual chances.
    Special,
    /// Reserved top-of-space allocation, checked before everything else.
    Mythic,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Common => "common",
            Tier::Rare => "rare",
            Tier::Legendary => "legendary",
            Tier::Special => "special",
            Tier::Mythic => "mythic",
        }
    }

    /// Tiers that count toward the rare-pull rate used by the luck rating.
    pub fn counts_as_rare_pull(&self) -> bool {
        matches!(self, Tier::Rare | Tier::Legendary | Tier::Mythic)
    }
}

/// A drawable entity in the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Stable identifier (texture key in the upstream catalogue).
    pub id: String,
    pub name: String,
    pub tier: Tier,
    /// Draw probability. Fixed for mythic/special, derived (uniform pool
    /// share) for common/rare/legendary.
    pub chance: f64,
    /// Part of the finite named roster.
    pub special_roster: bool,
}

/// Validated, immutable-for-a-session rarity catalogue.
///
/// `generation` increments on every refresh so ledger writes can detect a
/// draw recorded against a stale table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RarityTable {
    generation: u64,
    mythics: Vec<Entity>,
    specials: Vec<Entity>,
    pool: Vec<Entity>,
}

impl RarityTable {
    /// Build and validate a table. The pool entries get their uniform share
    /// of the remaining mass assigned here.
    ///
    /// Rejects (fatal, `WheelError::Configuration`):
    /// - empty pool
    /// - non-positive or out-of-range fixed chances
    /// - mythic + special mass >= 1
    /// - total mass != 1 within [`PROBABILITY_TOLERANCE`]
    pub fn from_parts(
        generation: u64,
        mythics: Vec<Entity>,
        specials: Vec<Entity>,
        mut pool: Vec<Entity>,
    ) -> WheelResult<Self> {
        if pool.is_empty() {
            return Err(WheelError::Configuration(
                "catalogue pool is empty".to_string(),
            ));
        }
        for e in mythics.iter().chain(specials.iter()) {
            if !(e.chance > 0.0 && e.chance < 1.0) {
                return Err(WheelError::Configuration(format!(
                    "entity '{}' has invalid chance {}",
                    e.id, e.chance
                )));
            }
        }

        let reserved: f64 = mythics
            .iter()
            .chain(specials.iter())
            .map(|e| e.chance)
            .sum();
        if reserved >= 1.0 {
            return Err(WheelError::Configuration(format!(
                "mythic + special mass {reserved} leaves no room for the pool"
            )));
        }

        let share = (1.0 - reserved) / pool.len() as f64;
        for e in pool.iter_mut() {
            e.chance = share;
        }

        let table = RarityTable {
            generation,
            mythics,
            specials,
            pool,
        };
        table.validate()?;
        Ok(table)
    }

    /// Re-check the probability-mass invariant. Called by `from_parts`;
    /// exposed so deserialized tables can be re-verified.
    pub fn validate(&self) -> WheelResult<()> {
        let total: f64 = self.all_entities().map(|e| e.chance).sum();
        if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(WheelError::Configuration(format!(
                "total probability mass is {total}, expected 1.0"
            )));
        }
        for tier in [
            Tier::Common,
            Tier::Rare,
            Tier::Legendary,
            Tier::Special,
            Tier::Mythic,
        ] {
            let mass: f64 = self
                .all_entities()
                .filter(|e| e.tier == tier)
                .map(|e| e.chance)
                .sum();
            if mass > 1.0 + PROBABILITY_TOLERANCE {
                return Err(WheelError::Configuration(format!(
                    "tier {} mass {mass} exceeds 1.0",
                    tier.as_str()
                )));
            }
        }
        Ok(())
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn mythics(&self) -> &[Entity] {
        &self.mythics
    }

    pub fn specials(&self) -> &[Entity] {
        &self.specials
    }

    pub fn pool(&self) -> &[Entity] {
        &self.pool
    }

    /// Reserved mythic mass at the top of the probability space.
    pub fn mythic_total(&self) -> f64 {
        self.mythics.iter().map(|e| e.chance).sum()
    }

    /// Reserved special-roster mass, checked after mythic.
    pub fn special_total(&self) -> f64 {
        self.specials.iter().map(|e| e.chance).sum()
    }

    pub fn all_entities(&self) -> impl Iterator<Item = &Entity> {
        self.mythics
            .iter()
            .chain(self.specials.iter())
            .chain(self.pool.iter())
    }

    pub fn len(&self) -> usize {
        self.mythics.len() + self.specials.len() + self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.all_entities().find(|e| e.id == id)
    }

    /// Static cardinality of a tier in this table generation.
    pub fn tier_total(&self, tier: Tier) -> usize {
        self.all_entities().filter(|e| e.tier == tier).count()
    }
}

/// The reference catalogue shipped with the engine, used when the upstream
/// document is unreachable. Parsed from [`catalogue::FALLBACK_CATALOGUE`].
pub fn reference_table(generation: u64) -> WheelResult<RarityTable> {
    catalogue::parse(catalogue::FALLBACK_CATALOGUE, generation)
}
