//! Edge case & boundary tests
//!
//! Behavior at system boundaries:
//! - Probability mass exactly at / outside tolerance
//! - Pinned rolls at roster thresholds
//! - Zero-spin players, empty populations
//! - Event window boundary instants
//! - Censorship of hidden achievements

use chrono::{Duration, Utc};
use wheel_core::achievements::{self, AchievementView};
use wheel_core::collection::{CollectionLedger, PlayerStats};
use wheel_core::events::{self, EventKind, EventPhase, EventWindow};
use wheel_core::luck;
use wheel_core::rarity::{catalogue, Entity, RarityTable, Tier};
use wheel_core::sampler::{self, LootEntry, LootPool};
use wheel_core::WheelError;

// ============================================================
// Helpers
// ============================================================

fn fixed(id: &str, tier: Tier, chance: f64) -> Entity {
    Entity {
        id: id.to_string(),
        name: id.to_string(),
        tier,
        chance,
        special_roster: true,
    }
}

fn pool_item(id: &str, tier: Tier) -> Entity {
    Entity {
        id: id.to_string(),
        name: id.to_string(),
        tier,
        chance: 0.0,
        special_roster: false,
    }
}

/// The reference scenario table: mythic 1e-6, special A 1e-4, special B
/// 3e-4, remainder uniform over 3 pool entries.
fn scenario_table() -> RarityTable {
    RarityTable::from_parts(
        1,
        vec![fixed("myth", Tier::Mythic, 0.000001)],
        vec![
            fixed("spec_a", Tier::Special, 0.0001),
            fixed("spec_b", Tier::Special, 0.0003),
        ],
        vec![
            pool_item("stone", Tier::Common),
            pool_item("oak_log", Tier::Common),
            pool_item("wheat", Tier::Common),
        ],
    )
    .unwrap()
}

// ============================================================
// Scenario rolls (pinned values)
// ============================================================

#[test]
fn scenario_roll_hits_mythic() {
    let table = scenario_table();
    let entity = sampler::resolve_roll(&table, 0.0000005).unwrap();
    assert_eq!(entity.id, "myth");
    assert_eq!(entity.tier, Tier::Mythic);
}

#[test]
fn scenario_roll_walks_special_roster() {
    let table = scenario_table();
    // Cumulative thresholds: myth 0.000001, spec_a 0.000101, spec_b 0.000401.
    // The first member whose threshold exceeds the roll wins.
    assert_eq!(sampler::resolve_roll(&table, 0.00005).unwrap().id, "spec_a");
    assert_eq!(sampler::resolve_roll(&table, 0.00015).unwrap().id, "spec_b");
    assert_eq!(sampler::resolve_roll(&table, 0.0004).unwrap().id, "spec_b");
}

#[test]
fn scenario_roll_falls_through_to_uniform_pool() {
    let table = scenario_table();
    assert!(sampler::resolve_roll(&table, 0.9).is_none());
    assert!(sampler::resolve_roll(&table, 0.000401).is_none());
}

#[test]
fn roll_exactly_at_roster_boundary_goes_to_pool() {
    let table = scenario_table();
    // resolve uses strict less-than; the boundary value itself falls through.
    let total = table.mythic_total() + table.special_total();
    assert!(sampler::resolve_roll(&table, total).is_none());
}

// ============================================================
// Table validation boundaries
// ============================================================

#[test]
fn mass_within_tolerance_accepted() {
    let table = scenario_table();
    assert!(table.validate().is_ok());
    let total: f64 = table.all_entities().map(|e| e.chance).sum();
    assert!((total - 1.0).abs() <= 1e-9);
}

#[test]
fn reserved_mass_at_or_above_one_is_fatal() {
    let result = RarityTable::from_parts(
        1,
        vec![fixed("myth", Tier::Mythic, 0.6)],
        vec![fixed("spec", Tier::Special, 0.4)],
        vec![pool_item("stone", Tier::Common)],
    );
    assert!(matches!(result, Err(WheelError::Configuration(_))));
}

#[test]
fn chance_of_one_is_rejected() {
    let result = RarityTable::from_parts(
        1,
        vec![fixed("myth", Tier::Mythic, 1.0)],
        vec![],
        vec![pool_item("stone", Tier::Common)],
    );
    assert!(matches!(result, Err(WheelError::Configuration(_))));
}

// ============================================================
// Loot pool boundaries
// ============================================================

#[test]
fn sole_full_weight_entry_yields_exact_count_for_any_k() {
    use rand::SeedableRng;
    for k in 1u32..=8 {
        let pool = LootPool::new(
            vec![
                LootEntry {
                    id: "emerald".to_string(),
                    weight: 100.0,
                },
                LootEntry {
                    id: sampler::NOTHING_ID.to_string(),
                    weight: 1e-12,
                },
            ],
            k,
            k,
        )
        .unwrap();
        let mut rng = rand_xoshiro::Xoshiro256PlusPlus::seed_from_u64(k as u64);
        let results = pool.simulate(&mut rng);
        assert_eq!(results.len(), k as usize, "k = {k}");
        assert!(results.iter().all(|id| id == "emerald"));
    }
}

#[test]
fn all_nothing_pool_yields_empty_results() {
    use rand::SeedableRng;
    let pool = LootPool::new(
        vec![LootEntry {
            id: sampler::NOTHING_ID.to_string(),
            weight: 1.0,
        }],
        1,
        4,
    )
    .unwrap();
    let mut rng = rand_xoshiro::Xoshiro256PlusPlus::seed_from_u64(2);
    assert!(pool.simulate(&mut rng).is_empty());
}

// ============================================================
// Ledger boundaries
// ============================================================

#[test]
fn ledger_rejects_stale_generation_entity() {
    let old = catalogue::parse("[pool]\ncommon stone Stone\ncommon old_relic Relic\n", 1).unwrap();
    let new = catalogue::parse("[pool]\ncommon stone Stone\ncommon dirt Dirt\n", 2).unwrap();

    let mut ledger = CollectionLedger::new();
    let now = Utc::now();
    ledger.record_draw(&old, "alice", "old_relic", now).unwrap();

    // The entity vanished in generation 2: the write must be rejected.
    let result = ledger.record_draw(&new, "alice", "old_relic", now);
    assert!(matches!(result, Err(WheelError::Integrity { .. })));

    // Earlier history is untouched.
    assert_eq!(ledger.collection("alice").unwrap()["old_relic"], 1);
}

#[test]
fn completion_for_unknown_player_is_zero_not_error() {
    let table = scenario_table();
    let ledger = CollectionLedger::new();
    let completion = ledger.completion(&table, "ghost", Tier::Common);
    assert_eq!(completion.collected, 0);
    assert_eq!(completion.total, 3);
}

// ============================================================
// Luck boundaries
// ============================================================

#[test]
fn luck_rating_undefined_at_zero_spins() {
    let population = vec![PlayerStats {
        total_spins: 100,
        rares: 10,
        ..PlayerStats::default()
    }];
    assert!(luck::luck_rating(&PlayerStats::default(), &population).is_none());
    assert!(luck::rare_rate(&PlayerStats::default()).is_none());
}

#[test]
fn luck_rating_undefined_for_empty_population() {
    let me = PlayerStats {
        total_spins: 10,
        rares: 2,
        ..PlayerStats::default()
    };
    assert!(luck::luck_rating(&me, &[]).is_none());
}

// ============================================================
// Event window boundaries
// ============================================================

#[test]
fn event_boundary_instants() {
    let base = Utc::now();
    let w = EventWindow {
        kind: EventKind::GoldRush,
        activates_at: Some(base),
        expires_at: base + Duration::seconds(10),
    };
    // Activation instant is active; expiry instant is inactive.
    assert_eq!(w.phase(base), EventPhase::Active);
    assert_eq!(w.phase(base + Duration::seconds(10)), EventPhase::Inactive);
    assert_eq!(w.phase(base - Duration::seconds(1)), EventPhase::Pending);
}

#[test]
fn bonus_spin_conversion_reference_points() {
    assert_eq!(events::convert_points_to_bonus_spins(50), 4);
    assert_eq!(events::convert_points_to_bonus_spins(500), 13);
    assert_eq!(events::convert_points_to_bonus_spins(3000), 23);
}

// ============================================================
// Achievement censorship
// ============================================================

#[test]
fn hidden_unlocked_achievement_always_censored_for_others() {
    let stats = PlayerStats {
        total_spins: 50,
        mythics: 1,
        legendaries: 10,
        ..PlayerStats::default()
    };
    for def in achievements::standard_achievements()
        .iter()
        .filter(|d| d.hidden)
    {
        let view = achievements::view_for(def, &stats, true, false).unwrap();
        assert_eq!(view, AchievementView::Secret, "leaked '{}'", def.id);
    }
}
