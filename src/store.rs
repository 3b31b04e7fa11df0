//! Particle storage.
//!
//! The store owns every particle for the current material selection. A reset
//! discards the whole set and seeds `max_particles` new ones from the
//! material's [`SeedDistribution`](crate::spawn::SeedDistribution).

use glam::Vec2;
use rand::Rng;

use crate::material::{Material, MaterialDefinition};
use crate::particle::Particle;
use crate::spawn::SpawnContext;

/// Relative size jitter applied at spawn (±20%).
const SIZE_JITTER: f32 = 0.2;
/// Per-channel color jitter width on the 0-255 scale.
const COLOR_VARIATION: f32 = 20.0;

/// Owns the particle set for the current material.
#[derive(Debug, Clone)]
pub struct ParticleStore {
    particles: Vec<Particle>,
    material: Material,
    max_particles: usize,
    extent: Vec2,
}

impl ParticleStore {
    /// Create an empty store. Call [`reset`](Self::reset) to populate it.
    pub fn new(max_particles: usize, extent: Vec2) -> Self {
        Self {
            particles: Vec::with_capacity(max_particles),
            material: Material::default(),
            max_particles,
            extent,
        }
    }

    /// Replace every particle with a fresh layout for `material`.
    pub fn reset<R: Rng + ?Sized>(&mut self, material: Material, rng: &mut R) {
        let def = material.definition();
        let mut ctx = SpawnContext::new(self.extent, rng);
        self.particles.clear();
        for _ in 0..self.max_particles {
            self.particles.push(spawn_one(def, &mut ctx));
        }
        self.material = material;
    }

    pub fn for_each<F: FnMut(&Particle)>(&self, f: F) {
        self.particles.iter().for_each(f);
    }

    pub fn for_each_mut<F: FnMut(&mut Particle)>(&mut self, f: F) {
        self.particles.iter_mut().for_each(f);
    }

    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[inline]
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    #[inline]
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn current_material(&self) -> Material {
        self.material
    }

    #[inline]
    pub fn max_particles(&self) -> usize {
        self.max_particles
    }

    #[inline]
    pub fn extent(&self) -> Vec2 {
        self.extent
    }

    /// Change the canvas extent and clamp every particle into it.
    ///
    /// Fixed particles are clamped too, since the integrator never moves
    /// them. Velocities are left alone; free particles still heading out
    /// bounce on the next integration step.
    pub fn resize(&mut self, extent: Vec2) {
        self.extent = extent;
        for p in &mut self.particles {
            p.position = p.position.clamp(Vec2::ZERO, extent);
        }
    }

    /// Number of particles with the `fixed` flag set.
    pub fn fixed_count(&self) -> usize {
        self.particles.iter().filter(|p| p.fixed).count()
    }
}

fn spawn_one<R: Rng + ?Sized>(def: &MaterialDefinition, ctx: &mut SpawnContext<'_, R>) -> Particle {
    let position = def
        .seed
        .sample(ctx)
        .clamp(Vec2::ZERO, ctx.extent);
    let velocity = ctx.random_velocity(def.initial_speed);
    let size = ctx.jitter_size(def.particle_size, SIZE_JITTER);
    let color = ctx.jitter_color(def.color, COLOR_VARIATION);
    Particle::new(position, velocity, color, size, def.mass)
}
