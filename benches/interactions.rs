//! Benchmarks for the CPU simulation stages.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{Vec2, Vec3};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use tactile::gesture::{self, EffectContext};
use tactile::hand::{Fingertips, Gesture, HandObservation};
use tactile::interactions::{
    ExhaustiveInteractions, GridInteractions, InteractionParams, NeighborInteractionStrategy,
};
use tactile::material::{Material, WATER};
use tactile::store::ParticleStore;
use tactile::Simulation;

const EXTENT: Vec2 = Vec2::new(640.0, 480.0);

fn water(count: usize) -> ParticleStore {
    let mut store = ParticleStore::new(count, EXTENT);
    store.reset(Material::Water, &mut SmallRng::seed_from_u64(1));
    store
}

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("neighbor_interactions");
    let params = InteractionParams::for_material(&WATER, 10.0);

    for count in [500, 1000, 2000, 4000] {
        let store = water(count);

        group.bench_with_input(BenchmarkId::new("exhaustive", count), &count, |b, _| {
            let mut particles = store.particles().to_vec();
            let mut strategy = ExhaustiveInteractions;
            b.iter(|| strategy.apply(black_box(&mut particles), &params))
        });

        group.bench_with_input(BenchmarkId::new("grid", count), &count, |b, _| {
            let mut particles = store.particles().to_vec();
            let mut strategy = GridInteractions::new(20.0);
            b.iter(|| strategy.apply(black_box(&mut particles), &params))
        });
    }

    group.finish();
}

fn bench_gestures(c: &mut Criterion) {
    let mut group = c.benchmark_group("gesture_effects");
    let store = water(2000);
    let ctx = EffectContext::new(&WATER, EXTENT, 0.0, 5.0).with_velocity(Vec2::new(3.0, 1.0));

    for g in [Gesture::Grab, Gesture::Push, Gesture::Spread, Gesture::Wave] {
        let hand = HandObservation::new(
            Vec3::new(0.5, 0.5, 0.0),
            Fingertips::splayed(Vec2::new(0.5, 0.5), 0.05),
            g,
        );
        group.bench_function(g.name(), |b| {
            let mut particles = store.particles().to_vec();
            let mut rng = SmallRng::seed_from_u64(2);
            b.iter(|| gesture::apply_hand(black_box(&mut particles), &hand, &ctx, &mut rng))
        });
    }

    group.finish();
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");

    for material in Material::ALL {
        group.bench_function(material.name(), |b| {
            let mut sim = Simulation::new().with_material(material.name()).with_seed(3);
            b.iter(|| sim.tick())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_strategies, bench_gestures, bench_tick);
criterion_main!(benches);
