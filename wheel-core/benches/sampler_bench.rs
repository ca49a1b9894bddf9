//! Benchmarks for the hot sampling path.

use criterion::{criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use wheel_core::rarity::reference_table;
use wheel_core::sampler::{self, LootEntry, LootPool};

fn bench_draw(c: &mut Criterion) {
    let table = reference_table(1).expect("reference catalogue parses");
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);

    c.bench_function("weighted_draw", |b| {
        b.iter(|| sampler::draw(&table, &mut rng))
    });
}

fn bench_loot_pool(c: &mut Criterion) {
    let entries = (0..32)
        .map(|i| LootEntry {
            id: format!("entry_{i}"),
            weight: (i + 1) as f64,
        })
        .collect();
    let pool = LootPool::new(entries, 3, 8).expect("valid pool");
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);

    c.bench_function("loot_pool_simulate", |b| b.iter(|| pool.simulate(&mut rng)));
}

criterion_group!(benches, bench_draw, bench_loot_pool);
criterion_main!(benches);
