//! Property-based tests for the particle pipeline using proptest
//!
//! These tests verify invariants hold across random inputs:
//! - Positions stay inside the canvas after integration
//! - Fixed particles are untouched by the integrator
//! - Push only ever adds outward velocity
//! - Reset yields exactly `max_particles` in-bounds particles

use glam::{Vec2, Vec3};
use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use tactile::gesture::{self, EffectContext};
use tactile::integrator::Integrator;
use tactile::material::Material;
use tactile::store::ParticleStore;
use tactile::Particle;

const EXTENT: Vec2 = Vec2::new(640.0, 480.0);

fn material() -> impl Strategy<Value = Material> {
    (0usize..Material::ALL.len()).prop_map(|i| Material::ALL[i])
}

fn position_in(extent: Vec2) -> impl Strategy<Value = Vec2> {
    (0.0f32..=extent.x, 0.0f32..=extent.y).prop_map(|(x, y)| Vec2::new(x, y))
}

fn velocity() -> impl Strategy<Value = Vec2> {
    (-60.0f32..60.0, -60.0f32..60.0).prop_map(|(x, y)| Vec2::new(x, y))
}

/// 1-200 particles anywhere on the canvas with arbitrary velocities.
fn particle_set() -> impl Strategy<Value = Vec<Particle>> {
    prop::collection::vec((position_in(EXTENT), velocity(), any::<bool>()), 1..200).prop_map(
        |specs| {
            specs
                .into_iter()
                .map(|(pos, vel, fixed)| {
                    let mut p = Particle::new(pos, vel, Vec3::ONE, 3.0, 1.0);
                    p.fixed = fixed;
                    p
                })
                .collect()
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: no particle leaves `[0, width] × [0, height]`.
    #[test]
    fn test_integration_stays_in_bounds(
        mut particles in particle_set(),
        material in material(),
        steps in 1usize..20,
        seed in any::<u64>(),
    ) {
        let mut rng = SmallRng::seed_from_u64(seed);
        for _ in 0..steps {
            Integrator.step(&mut particles, material.definition(), EXTENT, &mut rng);
            for (i, p) in particles.iter().enumerate() {
                prop_assert!(p.in_bounds(EXTENT), "particle {} escaped: {:?}", i, p.position);
            }
        }
    }

    /// Property: fixed particles keep position and velocity.
    #[test]
    fn test_fixed_particles_are_frozen(
        mut particles in particle_set(),
        material in material(),
        seed in any::<u64>(),
    ) {
        let before = particles.clone();
        let mut rng = SmallRng::seed_from_u64(seed);
        Integrator.step(&mut particles, material.definition(), EXTENT, &mut rng);
        for (a, b) in before.iter().zip(&particles) {
            if a.fixed {
                prop_assert_eq!(a, b);
            }
        }
    }

    /// Property: push never pulls a particle toward the palm.
    #[test]
    fn test_push_never_pulls_inward(
        mut particles in particle_set(),
        material in material(),
        palm in position_in(EXTENT),
        hand_velocity in velocity(),
    ) {
        let ctx = EffectContext::new(material.definition(), EXTENT, 0.0, 5.0)
            .with_velocity(hand_velocity);
        let radius = EXTENT.x * gesture::GESTURE_RADIUS;
        let before = particles.clone();
        gesture::push(&mut particles, palm, radius, &ctx);

        for (a, b) in before.iter().zip(&particles) {
            let outward = a.position - palm;
            let dv = b.velocity - a.velocity;
            prop_assert!(dv.dot(outward) >= 0.0);
            if outward.length() < radius {
                prop_assert!(!b.fixed);
            } else {
                prop_assert_eq!(a, b);
            }
        }
    }

    /// Property: push from rest leaves every touched particle moving outward.
    #[test]
    fn test_push_from_rest_moves_outward(
        positions in prop::collection::vec(position_in(EXTENT), 1..100),
        material in material(),
    ) {
        let mut particles: Vec<Particle> = positions
            .iter()
            .map(|&p| Particle::new(p, Vec2::ZERO, Vec3::ONE, 3.0, 1.0))
            .collect();
        let palm = EXTENT * 0.5;
        let ctx = EffectContext::new(material.definition(), EXTENT, 0.0, 5.0);
        gesture::push(&mut particles, palm, EXTENT.x * gesture::GESTURE_RADIUS, &ctx);
        for p in &particles {
            prop_assert!(p.velocity.dot(p.position - palm) >= 0.0);
        }
    }

    /// Property: reset yields exactly `max_particles` particles in bounds.
    #[test]
    fn test_reset_in_bounds(
        material in material(),
        width in 16.0f32..1600.0,
        height in 16.0f32..1200.0,
        count in 1usize..600,
        seed in any::<u64>(),
    ) {
        let extent = Vec2::new(width, height);
        let mut store = ParticleStore::new(count, extent);
        let mut rng = SmallRng::seed_from_u64(seed);
        store.reset(material, &mut rng);

        prop_assert_eq!(store.particle_count(), count);
        prop_assert_eq!(store.current_material(), material);
        for p in store.particles() {
            prop_assert!(p.in_bounds(extent), "{:?} outside {:?}", p.position, extent);
            prop_assert!(!p.fixed);
        }
    }
}
