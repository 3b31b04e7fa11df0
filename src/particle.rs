//! Particle state.

use glam::{Vec2, Vec3};

/// One simulated particle.
///
/// Positions and velocities are in canvas pixels; velocity is the
/// per-tick displacement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Normalized RGB.
    pub color: Vec3,
    /// Radius in pixels.
    pub size: f32,
    pub mass: f32,
    /// Excluded from integration while set. Gesture forces may clear it.
    pub fixed: bool,
}

impl Particle {
    pub fn new(position: Vec2, velocity: Vec2, color: Vec3, size: f32, mass: f32) -> Self {
        Self {
            position,
            velocity,
            color,
            size,
            mass,
            fixed: false,
        }
    }

    /// Whether the position lies inside `[0, extent.x] × [0, extent.y]`.
    #[inline]
    pub fn in_bounds(&self, extent: Vec2) -> bool {
        self.position.x >= 0.0
            && self.position.x <= extent.x
            && self.position.y >= 0.0
            && self.position.y <= extent.y
    }

    pub fn snapshot(&self) -> ParticleSnapshot {
        ParticleSnapshot {
            x: self.position.x,
            y: self.position.y,
            vx: self.velocity.x,
            vy: self.velocity.y,
            size: self.size,
            fixed: self.fixed,
        }
    }
}

/// Read-only copy of a particle for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ParticleSnapshot {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub size: f32,
    pub fixed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_particle_is_free() {
        let p = Particle::new(Vec2::new(1.0, 2.0), Vec2::ZERO, Vec3::ONE, 3.0, 1.0);
        assert!(!p.fixed);
    }

    #[test]
    fn test_in_bounds_includes_edges() {
        let extent = Vec2::new(10.0, 10.0);
        let mut p = Particle::new(Vec2::ZERO, Vec2::ZERO, Vec3::ONE, 1.0, 1.0);
        assert!(p.in_bounds(extent));
        p.position = extent;
        assert!(p.in_bounds(extent));
        p.position.x = 10.01;
        assert!(!p.in_bounds(extent));
    }
}
