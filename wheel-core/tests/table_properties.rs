//! Property tests for table construction and loot-pool simulation.

use proptest::prelude::*;
use wheel_core::rarity::{Entity, RarityTable, Tier};
use wheel_core::sampler::{LootEntry, LootPool, NOTHING_ID};

fn fixed(id: String, tier: Tier, chance: f64) -> Entity {
    Entity {
        name: id.clone(),
        id,
        tier,
        chance,
        special_roster: true,
    }
}

proptest! {
    /// Any table that construction accepts has total mass 1 within tolerance.
    #[test]
    fn accepted_tables_have_unit_mass(
        mythic_chance in 1e-9..0.1f64,
        special_chances in prop::collection::vec(1e-9..0.05f64, 0..8),
        pool_size in 1usize..50,
    ) {
        let mythics = vec![fixed("myth".to_string(), Tier::Mythic, mythic_chance)];
        let specials: Vec<Entity> = special_chances
            .iter()
            .enumerate()
            .map(|(i, c)| fixed(format!("spec_{i}"), Tier::Special, *c))
            .collect();
        let pool: Vec<Entity> = (0..pool_size)
            .map(|i| Entity {
                id: format!("item_{i}"),
                name: format!("item_{i}"),
                tier: Tier::Common,
                chance: 0.0,
                special_roster: false,
            })
            .collect();

        if let Ok(table) = RarityTable::from_parts(1, mythics, specials, pool) {
            let total: f64 = table.all_entities().map(|e| e.chance).sum();
            prop_assert!((total - 1.0).abs() <= 1e-9);
            prop_assert!(table.validate().is_ok());
        }
    }

    /// Simulation length is bounded by the roll range and "nothing" never
    /// appears in the output.
    #[test]
    fn loot_results_bounded_and_filtered(
        weights in prop::collection::vec(0.01..100.0f64, 1..10),
        nothing_weight in 0.01..100.0f64,
        min in 0u32..5,
        extra in 0u32..5,
        seed in any::<u64>(),
    ) {
        use rand::SeedableRng;
        let mut entries: Vec<LootEntry> = weights
            .iter()
            .enumerate()
            .map(|(i, w)| LootEntry { id: format!("e{i}"), weight: *w })
            .collect();
        entries.push(LootEntry { id: NOTHING_ID.to_string(), weight: nothing_weight });

        let pool = LootPool::new(entries, min, min + extra).unwrap();
        let mut rng = rand_xoshiro::Xoshiro256PlusPlus::seed_from_u64(seed);
        let results = pool.simulate(&mut rng);

        prop_assert!(results.len() <= (min + extra) as usize);
        prop_assert!(results.iter().all(|id| id != NOTHING_ID));
    }
}
