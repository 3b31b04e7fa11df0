//! Kinematic integration.
//!
//! Per free particle, in order: friction, an occasional random kick,
//! position update, and an inelastic bounce off the canvas edges. Fixed
//! particles are skipped entirely, keeping both position and velocity.

use glam::Vec2;
use rand::Rng;

use crate::material::MaterialDefinition;
use crate::particle::Particle;

/// Width of the random kick per axis.
const KICK: f32 = 0.2;
/// Velocity factor applied on the bounced axis.
const BOUNCE: f32 = -0.5;

/// Advances particle positions.
#[derive(Debug, Clone, Copy, Default)]
pub struct Integrator;

impl Integrator {
    /// Advance every free particle by one tick inside `[0, extent]`.
    pub fn step<R: Rng + ?Sized>(
        &self,
        particles: &mut [Particle],
        material: &MaterialDefinition,
        extent: Vec2,
        rng: &mut R,
    ) {
        for p in particles.iter_mut().filter(|p| !p.fixed) {
            p.velocity *= material.friction;

            if rng.gen::<f32>() < material.randomness {
                p.velocity.x += (rng.gen::<f32>() - 0.5) * KICK;
                p.velocity.y += (rng.gen::<f32>() - 0.5) * KICK;
            }

            p.position += p.velocity;
            reflect(&mut p.position.x, &mut p.velocity.x, extent.x);
            reflect(&mut p.position.y, &mut p.velocity.y, extent.y);
        }
    }
}

#[inline]
fn reflect(position: &mut f32, velocity: &mut f32, max: f32) {
    if *position < 0.0 {
        *position = 0.0;
        *velocity *= BOUNCE;
    } else if *position > max {
        *position = max;
        *velocity *= BOUNCE;
    }
}
