//! Achievement evaluation.
//!
//! Achievements are derived from aggregate player statistics; only the
//! unlock fact (id + timestamp) is ever persisted. Hidden achievements obey
//! a hard privacy invariant: a viewer who has not unlocked one themselves
//! sees a generic "Secret achievement" placeholder, never the true name or
//! description, even when the profile owner has unlocked it.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::collection::PlayerStats;

/// Achievement categories shown on the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementCategory {
    Beginner,
    Collection,
    Spins,
    Events,
    Duplicates,
    Special,
}

/// Which aggregate statistic an achievement thresholds on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKey {
    TotalSpins,
    UniqueItems,
    TotalDuplicates,
    EventTriggers,
    Mythics,
    Specials,
    Legendaries,
    Rares,
}

impl StatKey {
    pub fn value(&self, stats: &PlayerStats) -> u64 {
        match self {
            StatKey::TotalSpins => stats.total_spins,
            StatKey::UniqueItems => stats.unique_items,
            StatKey::TotalDuplicates => stats.total_duplicates,
            StatKey::EventTriggers => stats.event_triggers,
            StatKey::Mythics => stats.mythics,
            StatKey::Specials => stats.specials,
            StatKey::Legendaries => stats.legendaries,
            StatKey::Rares => stats.rares,
        }
    }
}

/// Static achievement definition.
#[derive(Debug, Clone, Serialize)]
pub struct AchievementDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: AchievementCategory,
    pub hidden: bool,
    pub stat: StatKey,
    pub target: u64,
}

impl AchievementDef {
    pub fn is_complete(&self, stats: &PlayerStats) -> bool {
        self.stat.value(stats) >= self.target
    }

    /// Current/target progress pair, capped at the target.
    pub fn progress(&self, stats: &PlayerStats) -> (u64, u64) {
        (self.stat.value(stats).min(self.target), self.target)
    }
}

/// The standard achievement set.
pub fn standard_achievements() -> &'static [AchievementDef] {
    use AchievementCategory::*;
    use StatKey::*;
    const DEFS: &[AchievementDef] = &[
        AchievementDef {
            id: "first_spin",
            name: "First Spin",
            description: "Spin the wheel once",
            category: Beginner,
            hidden: false,
            stat: TotalSpins,
            target: 1,
        },
        AchievementDef {
            id: "getting_started",
            name: "Getting Started",
            description: "Collect 10 different items",
            category: Beginner,
            hidden: false,
            stat: UniqueItems,
            target: 10,
        },
        AchievementDef {
            id: "collector",
            name: "Collector",
            description: "Collect 100 different items",
            category: Collection,
            hidden: false,
            stat: UniqueItems,
            target: 100,
        },
        AchievementDef {
            id: "completionist",
            name: "Completionist",
            description: "Collect 500 different items",
            category: Collection,
            hidden: false,
            stat: UniqueItems,
            target: 500,
        },
        AchievementDef {
            id: "spin_100",
            name: "Wheel Enthusiast",
            description: "Spin the wheel 100 times",
            category: Spins,
            hidden: false,
            stat: TotalSpins,
            target: 100,
        },
        AchievementDef {
            id: "spin_1000",
            name: "Wheel Addict",
            description: "Spin the wheel 1,000 times",
            category: Spins,
            hidden: false,
            stat: TotalSpins,
            target: 1000,
        },
        AchievementDef {
            id: "event_10",
            name: "Event Chaser",
            description: "Trigger 10 bonus events",
            category: Events,
            hidden: false,
            stat: EventTriggers,
            target: 10,
        },
        AchievementDef {
            id: "dupe_100",
            name: "Deja Vu",
            description: "Draw 100 duplicates",
            category: Duplicates,
            hidden: false,
            stat: TotalDuplicates,
            target: 100,
        },
        AchievementDef {
            id: "rare_roster",
            name: "Familiar Faces",
            description: "Draw 5 roster members",
            category: Special,
            hidden: false,
            stat: Specials,
            target: 5,
        },
        // Hidden until someone actually pulls these off.
        AchievementDef {
            id: "mythic_pull",
            name: "Against All Odds",
            description: "Draw a mythic item",
            category: Special,
            hidden: true,
            stat: Mythics,
            target: 1,
        },
        AchievementDef {
            id: "legendary_10",
            name: "Gilded",
            description: "Draw 10 legendary items",
            category: Special,
            hidden: true,
            stat: Legendaries,
            target: 10,
        },
    ];
    DEFS
}

/// Persisted unlock fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnlockFact {
    pub id: String,
    pub unlocked_at: DateTime<Utc>,
}

/// Progress entry for a locked, non-hidden achievement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub id: String,
    pub current: u64,
    pub target: u64,
}

/// Evaluation result: unlocked set plus progress for visible locked ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AchievementProgress {
    pub unlocked: Vec<String>,
    pub progress: Vec<ProgressEntry>,
}

/// Evaluate all standard achievements against a player's stats.
pub fn evaluate(stats: &PlayerStats) -> AchievementProgress {
    let mut result = AchievementProgress::default();
    for def in standard_achievements() {
        if def.is_complete(stats) {
            result.unlocked.push(def.id.to_string());
        } else if !def.hidden {
            let (current, target) = def.progress(stats);
            result.progress.push(ProgressEntry {
                id: def.id.to_string(),
                current,
                target,
            });
        }
    }
    result
}

/// Unlock facts for achievements newly completed since the persisted set.
pub fn new_unlocks(
    stats: &PlayerStats,
    already_unlocked: &HashSet<String>,
    now: DateTime<Utc>,
) -> Vec<UnlockFact> {
    standard_achievements()
        .iter()
        .filter(|def| def.is_complete(stats) && !already_unlocked.contains(def.id))
        .map(|def| UnlockFact {
            id: def.id.to_string(),
            unlocked_at: now,
        })
        .collect()
}

/// How one achievement renders for a given viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AchievementView {
    /// Full details: the viewer is allowed to see everything.
    Unlocked {
        id: String,
        name: String,
        description: String,
        category: AchievementCategory,
    },
    /// Unlocked but hidden, viewed by someone who hasn't earned it:
    /// generic placeholder only.
    Secret,
    /// Locked and visible: show progress.
    Locked {
        id: String,
        name: String,
        current: u64,
        target: u64,
    },
}

/// Render an achievement for a viewer looking at `owner`'s profile.
///
/// `owner_unlocked`: the profile owner has the unlock fact.
/// `viewer_unlocked`: the viewer themselves has earned this achievement.
/// Returns `None` when the achievement must not appear at all (hidden and
/// not unlocked by the owner).
pub fn view_for(
    def: &AchievementDef,
    stats: &PlayerStats,
    owner_unlocked: bool,
    viewer_unlocked: bool,
) -> Option<AchievementView> {
    if !owner_unlocked {
        if def.hidden {
            return None;
        }
        let (current, target) = def.progress(stats);
        return Some(AchievementView::Locked {
            id: def.id.to_string(),
            name: def.name.to_string(),
            current,
            target,
        });
    }

    if def.hidden && !viewer_unlocked {
        return Some(AchievementView::Secret);
    }

    Some(AchievementView::Unlocked {
        id: def.id.to_string(),
        name: def.name.to_string(),
        description: def.description.to_string(),
        category: def.category,
    })
}
