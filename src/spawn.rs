//! Spawn context and seed distributions for particle initialization.
//!
//! A material's initial layout is described by a [`SeedDistribution`]; the
//! store samples it through a [`SpawnContext`], which wraps the injected
//! random source and the canvas extent.

use glam::{Vec2, Vec3};
use rand::Rng;
use std::f32::consts::TAU;

/// Where a material's particles appear after a reset.
///
/// All extents are fractions of the canvas so that a layout scales with the
/// window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SeedDistribution {
    /// Random point in a disk around the canvas center.
    ///
    /// * `radius` - disk radius as a fraction of canvas width
    /// * `falloff` - exponent applied to the uniform radial sample. `0.5`
    ///   gives a uniform disk; larger values concentrate particles toward
    ///   the center.
    Disk { radius: f32, falloff: f32 },
    /// Uniform random point in a centered rectangle.
    ///
    /// The rectangle is `width / divisor` by `height / divisor`.
    Rect { divisor: f32 },
    /// Uniform random point anywhere on the canvas.
    Canvas,
}

impl SeedDistribution {
    /// Sample one position.
    pub fn sample<R: Rng + ?Sized>(&self, ctx: &mut SpawnContext<'_, R>) -> Vec2 {
        let center = ctx.extent * 0.5;
        match *self {
            SeedDistribution::Disk { radius, falloff } => {
                ctx.random_in_disk(center, ctx.extent.x * radius, falloff)
            }
            SeedDistribution::Rect { divisor } => ctx.random_in_rect(center, ctx.extent / divisor),
            SeedDistribution::Canvas => ctx.random_in_canvas(),
        }
    }
}

/// Context handed to the spawner for a whole reset.
///
/// ```ignore
/// let mut ctx = SpawnContext::new(Vec2::new(640.0, 480.0), &mut rng);
/// let position = ctx.random_in_disk(ctx.extent * 0.5, 160.0, 1.0);
/// ```
pub struct SpawnContext<'a, R: Rng + ?Sized> {
    /// Canvas size in pixels.
    pub extent: Vec2,
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> SpawnContext<'a, R> {
    pub fn new(extent: Vec2, rng: &'a mut R) -> Self {
        Self { extent, rng }
    }

    /// Random f32 centered on zero with total width `span`.
    #[inline]
    pub fn random_symmetric(&mut self, span: f32) -> f32 {
        (self.rng.gen::<f32>() - 0.5) * span
    }

    // ========== Position helpers ==========

    /// Random point in a disk.
    ///
    /// The radial sample is `u^falloff`; `falloff = 0.5` is area-uniform.
    pub fn random_in_disk(&mut self, center: Vec2, radius: f32, falloff: f32) -> Vec2 {
        let angle = self.rng.gen_range(0.0..TAU);
        let r = self.rng.gen::<f32>().powf(falloff) * radius;
        center + Vec2::new(angle.cos(), angle.sin()) * r
    }

    /// Random point in an axis-aligned rectangle of the given size.
    pub fn random_in_rect(&mut self, center: Vec2, size: Vec2) -> Vec2 {
        let min = center - size * 0.5;
        min + Vec2::new(self.rng.gen::<f32>() * size.x, self.rng.gen::<f32>() * size.y)
    }

    /// Random point anywhere on the canvas.
    pub fn random_in_canvas(&mut self) -> Vec2 {
        Vec2::new(
            self.rng.gen::<f32>() * self.extent.x,
            self.rng.gen::<f32>() * self.extent.y,
        )
    }

    // ========== Per-particle attributes ==========

    /// Velocity with each component uniform in `[-speed/2, speed/2)`.
    pub fn random_velocity(&mut self, speed: f32) -> Vec2 {
        if speed <= 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(self.random_symmetric(speed), self.random_symmetric(speed))
    }

    /// `nominal` scaled by a factor uniform in `[1 - jitter, 1 + jitter)`.
    pub fn jitter_size(&mut self, nominal: f32, jitter: f32) -> f32 {
        nominal * (1.0 - jitter + self.rng.gen::<f32>() * 2.0 * jitter)
    }

    /// Base color with each channel shifted by up to `±variation / 2` (0-255 scale).
    pub fn jitter_color(&mut self, base: [u8; 3], variation: f32) -> Vec3 {
        let mut channel = |c: u8| {
            let shifted = c as f32 + self.random_symmetric(variation);
            shifted.round().clamp(0.0, 255.0) / 255.0
        };
        Vec3::new(channel(base[0]), channel(base[1]), channel(base[2]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn extent() -> Vec2 {
        Vec2::new(640.0, 480.0)
    }

    #[test]
    fn test_random_in_disk_bounds() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut ctx = SpawnContext::new(extent(), &mut rng);
        let center = Vec2::new(320.0, 240.0);
        for _ in 0..500 {
            let p = ctx.random_in_disk(center, 80.0, 0.6);
            assert!(p.distance(center) <= 80.0 + 0.001);
        }
    }

    #[test]
    fn test_disk_falloff_concentrates_center() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut ctx = SpawnContext::new(extent(), &mut rng);
        fn inner(ctx: &mut SpawnContext<'_, SmallRng>, falloff: f32) -> usize {
            (0..4000)
                .filter(|_| ctx.random_in_disk(Vec2::ZERO, 100.0, falloff).length() < 50.0)
                .count()
        }
        let uniform = inner(&mut ctx, 0.5);
        let linear = inner(&mut ctx, 1.0);
        // Area-uniform puts a quarter inside half the radius, linear puts half.
        assert!(uniform < linear);
    }

    #[test]
    fn test_random_in_rect_bounds() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut ctx = SpawnContext::new(extent(), &mut rng);
        for _ in 0..500 {
            let p = ctx.random_in_rect(Vec2::new(320.0, 240.0), Vec2::new(100.0, 50.0));
            assert!(p.x >= 270.0 && p.x <= 370.0);
            assert!(p.y >= 215.0 && p.y <= 265.0);
        }
    }

    #[test]
    fn test_jitter_size_range() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut ctx = SpawnContext::new(extent(), &mut rng);
        for _ in 0..500 {
            let s = ctx.jitter_size(5.0, 0.2);
            assert!((4.0..=6.0).contains(&s));
        }
    }

    #[test]
    fn test_jitter_color_stays_near_base() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut ctx = SpawnContext::new(extent(), &mut rng);
        for _ in 0..200 {
            let c = ctx.jitter_color([250, 128, 3], 20.0);
            assert!(c.x <= 1.0 && c.z >= 0.0);
            assert!((c.y * 255.0 - 128.0).abs() <= 10.5);
        }
    }
}
