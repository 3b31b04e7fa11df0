//! Gesture force field.
//!
//! Turns hand observations into velocity changes on the particles. Each
//! hand contributes, in order:
//!
//! 1. its gesture effect (grab, push, spread or wave) inside a disk of
//!    radius `0.12 × width` around the palm,
//! 2. a push from each fingertip, followed by the whole-hand shape effect,
//! 3. either the velocity trail (multi-hand path) or the hand drag
//!    (single-hand path).
//!
//! Hands are applied one after another with no conflict resolution, so
//! their contributions simply add up. Positions are never written here;
//! only velocities and `fixed` flags change.
//!
//! Material differences live entirely in
//! [`MaterialBehavior`](crate::behavior::MaterialBehavior); every effect
//! below dispatches on its style enums.

use std::f32::consts::PI;

use glam::{Vec2, Vec3};
use rand::Rng;

use crate::behavior::{FingertipStyle, GrabStyle, ShapeStyle, SpreadStyle};
use crate::hand::{Fingertips, Gesture, HandObservation};
use crate::material::MaterialDefinition;
use crate::particle::Particle;
use crate::spatial::SpatialIndex;
use crate::tracker::{HandKey, HandTracker};

/// Gesture disk radius as a fraction of canvas width.
pub const GESTURE_RADIUS: f32 = 0.12;
/// Fingertip disk radius as a fraction of canvas width.
pub const FINGERTIP_RADIUS: f32 = 0.05;
/// Whole-hand shape and hand-drag radius as a fraction of canvas width.
pub const HAND_RADIUS: f32 = 0.15;

/// Hand speed (pixels per tick) below which no trail is drawn.
const TRAIL_MIN_SPEED: f32 = 0.5;
/// Hand speed above which the trail releases fixed particles.
const TRAIL_RELEASE_SPEED: f32 = 5.0;

/// Strength multiplier derived from hand speed.
///
/// Below 1 pixel/tick the scale rises linearly from 0.3 to 1.0; above it
/// grows by 0.1 per pixel/tick, capped at 3.0.
pub fn movement_scale(magnitude: f32) -> f32 {
    const THRESHOLD: f32 = 1.0;
    if magnitude < THRESHOLD {
        0.3 + (magnitude / THRESHOLD) * 0.7
    } else {
        1.0 + ((magnitude - THRESHOLD) / 10.0).min(2.0)
    }
}

/// Everything an effect needs besides the particles.
#[derive(Debug, Clone, Copy)]
pub struct EffectContext<'a> {
    pub material: &'a MaterialDefinition,
    /// Canvas size in pixels.
    pub extent: Vec2,
    /// Simulation time in seconds.
    pub elapsed: f32,
    /// Angular frequency of the wave effect, radians per second.
    pub wave_frequency: f32,
    /// Velocity of the hand being applied, pixels per tick.
    pub hand_velocity: Vec2,
    pub movement_scale: f32,
}

impl<'a> EffectContext<'a> {
    /// Context for a hand at rest.
    pub fn new(material: &'a MaterialDefinition, extent: Vec2, elapsed: f32, wave_frequency: f32) -> Self {
        Self {
            material,
            extent,
            elapsed,
            wave_frequency,
            hand_velocity: Vec2::ZERO,
            movement_scale: movement_scale(0.0),
        }
    }

    /// Same context for a hand moving at `velocity`.
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.hand_velocity = velocity;
        self.movement_scale = movement_scale(velocity.length());
        self
    }

    /// Normalized position to canvas pixels.
    #[inline]
    pub fn to_pixels(&self, normalized: Vec3) -> Vec2 {
        normalized.truncate() * self.extent
    }

    #[inline]
    fn strength(&self) -> f32 {
        self.material.interaction_strength
    }
}

/// Offset from `center` to `p` and its length.
#[inline]
fn offset(p: &Particle, center: Vec2) -> (Vec2, f32) {
    let d = p.position - center;
    (d, d.length())
}

/// Unit vector along `d` by angle, `(1, 0)` for a zero offset.
#[inline]
fn heading(d: Vec2) -> Vec2 {
    Vec2::from_angle(d.y.atan2(d.x))
}

/// Velocity change pulling particle `i` toward or away from its neighbors
/// within `radius`, relative to a spacing of `1.2 × (size₁ + size₂)`.
///
/// `index` must be built over `particles` with a cell size of at least
/// `radius`. Fixed particles get nothing.
pub fn local_cohesion(index: &SpatialIndex, particles: &[Particle], i: usize, radius: f32) -> Vec2 {
    const SPACING: f32 = 1.2;
    const COEFFICIENT: f32 = 0.03;

    let target = &particles[i];
    if target.fixed {
        return Vec2::ZERO;
    }
    let radius_sq = radius * radius;
    let mut dv = Vec2::ZERO;
    for j in index.near(target.position) {
        if j == i {
            continue;
        }
        let other = &particles[j];
        let d = other.position - target.position;
        let dist_sq = d.length_squared();
        if dist_sq >= radius_sq || dist_sq == 0.0 {
            continue;
        }
        let dist = dist_sq.sqrt();
        let optimal = (other.size + target.size) * SPACING;
        dv += d * COEFFICIENT * (dist - optimal) / dist;
    }
    dv
}

/// Pull toward `center`; particles outside the affected area are released.
pub fn grab<R: Rng + ?Sized>(
    particles: &mut [Particle],
    center: Vec2,
    radius: f32,
    ctx: &EffectContext<'_>,
    rng: &mut R,
) {
    let strength = ctx.strength();
    match ctx.material.behavior.grab {
        GrabStyle::Pull { core, core_fix } => {
            for p in particles.iter_mut() {
                let (d, dist) = offset(p, center);
                if dist < radius {
                    let force = (1.0 - dist / radius) * 0.2 * strength * ctx.movement_scale;
                    p.velocity -= d * force;
                    if dist < radius * core {
                        core_fix.apply(&mut p.fixed, rng);
                    }
                } else {
                    p.fixed = false;
                }
            }
        }
        GrabStyle::Clump {
            core,
            reach,
            core_fix,
            cohesion_radius,
        } => {
            let core_radius = radius * core;
            let outer_radius = radius * reach;
            let cohesion_radius = radius * cohesion_radius;
            let index = SpatialIndex::build(particles, cohesion_radius);

            for i in 0..particles.len() {
                let (d, dist) = offset(&particles[i], center);
                if dist >= outer_radius {
                    particles[i].fixed = false;
                } else if dist < core_radius {
                    let force = (1.0 - dist / core_radius) * 0.3 * strength;
                    let p = &mut particles[i];
                    p.velocity -= d * force;
                    core_fix.apply(&mut p.fixed, rng);
                } else {
                    let force = (1.0 - dist / outer_radius) * 0.1 * strength;
                    let cohesion = local_cohesion(&index, particles, i, cohesion_radius);
                    particles[i].velocity += cohesion - d * force;
                }
            }
        }
    }
}

/// Push away from `center`, releasing every touched particle.
///
/// The velocity change is always along the outward offset.
pub fn push(particles: &mut [Particle], center: Vec2, radius: f32, ctx: &EffectContext<'_>) {
    let strength = ctx.strength();
    for p in particles.iter_mut() {
        let (d, dist) = offset(p, center);
        if dist < radius {
            let force = (1.0 - dist / radius) * 0.5 * strength * ctx.movement_scale;
            p.velocity += d * force;
            p.fixed = false;
        }
    }
}

/// Radial outward push scaled by the material's spread factor.
pub fn spread(particles: &mut [Particle], center: Vec2, radius: f32, ctx: &EffectContext<'_>) {
    let strength = ctx.strength() * ctx.material.spread * ctx.movement_scale;
    match ctx.material.behavior.spread {
        SpreadStyle::Radial => {
            for p in particles.iter_mut() {
                let (d, dist) = offset(p, center);
                if dist < radius {
                    let force = (1.0 - dist / radius) * 0.3 * strength;
                    p.velocity += heading(d) * force;
                    p.fixed = false;
                }
            }
        }
        SpreadStyle::Banded { bands, reach } => {
            let band_width = radius / bands;
            let outer_radius = radius * reach;
            let cohesion_radius = band_width * 1.5;

            for p in particles.iter_mut() {
                if offset(p, center).1 < outer_radius {
                    p.fixed = false;
                }
            }

            let index = SpatialIndex::build(particles, cohesion_radius);
            for i in 0..particles.len() {
                let (d, dist) = offset(&particles[i], center);
                if dist >= outer_radius || dist <= 0.0 {
                    continue;
                }
                let band = (dist / band_width).floor();
                let force = (band * band_width / radius) * 0.2 * strength;
                let cohesion = local_cohesion(&index, particles, i, cohesion_radius);
                particles[i].velocity += d / dist * force + cohesion;
            }
        }
    }
}

/// Outward push whose direction swings with `sin(elapsed)`.
pub fn wave(particles: &mut [Particle], center: Vec2, radius: f32, ctx: &EffectContext<'_>) {
    let strength = ctx.strength() * ctx.movement_scale;
    let swing = (ctx.elapsed * ctx.wave_frequency).sin() * 2.0;
    for p in particles.iter_mut() {
        let (d, dist) = offset(p, center);
        if dist < radius {
            let force = (1.0 - dist / radius) * 0.2 * strength;
            let angle = d.y.atan2(d.x) + swing;
            p.velocity += Vec2::from_angle(angle) * force;
            p.fixed = false;
        }
    }
}

/// Apply the effect for `gesture` centered on `center`. `Gesture::None` does nothing.
pub fn apply_gesture<R: Rng + ?Sized>(
    particles: &mut [Particle],
    gesture: Gesture,
    center: Vec2,
    ctx: &EffectContext<'_>,
    rng: &mut R,
) {
    let radius = ctx.extent.x * GESTURE_RADIUS;
    match gesture {
        Gesture::Grab => grab(particles, center, radius, ctx, rng),
        Gesture::Push => push(particles, center, radius, ctx),
        Gesture::Spread => spread(particles, center, radius, ctx),
        Gesture::Wave => wave(particles, center, radius, ctx),
        Gesture::None => {}
    }
}

/// Per-fingertip push plus the material's fingertip behavior, then the
/// whole-hand shape effect.
pub fn fingertips<R: Rng + ?Sized>(
    particles: &mut [Particle],
    tips: &Fingertips,
    ctx: &EffectContext<'_>,
    rng: &mut R,
) {
    let radius = ctx.extent.x * FINGERTIP_RADIUS;
    let strength = ctx.strength() * 0.7;
    let style = ctx.material.behavior.fingertip;

    for (finger, tip) in tips.iter() {
        let tip = ctx.to_pixels(tip);
        let finger_strength = finger.strength();
        for p in particles.iter_mut() {
            let (d, dist) = offset(p, tip);
            if dist >= radius {
                continue;
            }
            let force =
                (1.0 - dist / radius) * 0.3 * strength * finger_strength * ctx.movement_scale;
            p.velocity += heading(d) * force * 0.7;
            if dist < radius * 0.5 {
                p.velocity += ctx.hand_velocity * 0.2;
            }

            match style {
                FingertipStyle::Plain => {}
                FingertipStyle::Mold {
                    inner,
                    inner_pull,
                    outer_pull,
                    fix,
                } => {
                    if dist < radius * inner {
                        p.velocity -= d * force * inner_pull;
                        fix.apply(&mut p.fixed, rng);
                    } else {
                        p.velocity -= d * force * outer_pull;
                    }
                }
                FingertipStyle::Stick {
                    inner,
                    fix,
                    outer_push,
                } => {
                    if dist < radius * inner {
                        fix.apply(&mut p.fixed, rng);
                    } else {
                        p.velocity += d * force * outer_push;
                    }
                }
                FingertipStyle::Flow { follow } => {
                    p.velocity += ctx.hand_velocity * follow;
                }
            }
        }
    }

    hand_shape(particles, tips, ctx, rng);
}

/// Effect of the hand as a whole.
///
/// The fingertips and their centroid form a set of landmarks. Particles
/// within `0.15 × width` of the centroid react to their nearest landmark
/// when it is closer than half that radius.
pub fn hand_shape<R: Rng + ?Sized>(
    particles: &mut [Particle],
    tips: &Fingertips,
    ctx: &EffectContext<'_>,
    rng: &mut R,
) {
    let radius = ctx.extent.x * HAND_RADIUS;
    let near_radius = radius * 0.5;
    let strength = ctx.strength() * 1.5 * ctx.movement_scale;

    let centroid = tips.centroid() * ctx.extent;
    let mut landmarks = [centroid; 6];
    for (slot, (_, tip)) in landmarks.iter_mut().zip(tips.iter()) {
        *slot = ctx.to_pixels(tip);
    }

    for p in particles.iter_mut() {
        if offset(p, centroid).1 >= radius {
            continue;
        }
        let (d, dist) = landmarks
            .iter()
            .map(|&l| offset(p, l))
            .fold((Vec2::ZERO, f32::INFINITY), |best, cur| {
                if cur.1 < best.1 {
                    cur
                } else {
                    best
                }
            });
        if dist >= near_radius {
            continue;
        }
        let force = (1.0 - dist / near_radius) * 0.2 * strength;

        match ctx.material.behavior.shape {
            ShapeStyle::Push { gain } => p.velocity += d * force * gain,
            ShapeStyle::Flow { gain } => p.velocity += ctx.hand_velocity * force * gain,
            ShapeStyle::Mold {
                gain,
                fix_within,
                fix,
            } => {
                p.velocity -= d * force * gain;
                if dist < radius * fix_within {
                    fix.apply(&mut p.fixed, rng);
                }
            }
            ShapeStyle::Stick {
                inner,
                pull,
                fix,
                outer_push,
            } => {
                if dist < radius * inner {
                    p.velocity -= d * force * pull;
                    fix.apply(&mut p.fixed, rng);
                } else {
                    p.velocity += d * force * outer_push;
                }
            }
            ShapeStyle::Scatter { gain } => {
                let angle = d.y.atan2(d.x) + rng.gen::<f32>() * PI;
                p.velocity += Vec2::from_angle(angle) * force * gain;
            }
        }
    }
}

/// Drag particles along the hand's motion with a randomized sideways
/// scatter. Does nothing for hands slower than 0.5 pixels/tick.
pub fn velocity_trail<R: Rng + ?Sized>(
    particles: &mut [Particle],
    center: Vec2,
    radius: f32,
    ctx: &EffectContext<'_>,
    rng: &mut R,
) {
    let speed = ctx.hand_velocity.length();
    if speed < TRAIL_MIN_SPEED {
        return;
    }
    let dir = ctx.hand_velocity / speed;
    let perp = dir.perp();
    let trail = ctx.material.behavior.trail;
    let radius = radius * trail.radius_scale;
    let strength =
        (speed / 5.0).min(3.0) * ctx.movement_scale * ctx.strength() * trail.strength_scale;

    for p in particles.iter_mut() {
        let dist = offset(p, center).1;
        if dist >= radius {
            continue;
        }
        let force = (1.0 - dist / radius) * strength;
        let scatter = (rng.gen::<f32>() - 0.5) * force * trail.spread * speed;
        p.velocity += dir * force + perp * scatter;
        if speed > TRAIL_RELEASE_SPEED {
            p.fixed = false;
        }
    }
}

/// Drag particles near the palm along the hand's velocity.
pub fn hand_drag(particles: &mut [Particle], palm: Vec2, ctx: &EffectContext<'_>) {
    let radius = ctx.extent.x * HAND_RADIUS;
    let factor = ctx.strength() * 0.3 * ctx.movement_scale;
    for p in particles.iter_mut() {
        let dist = offset(p, palm).1;
        if dist < radius {
            p.velocity += ctx.hand_velocity * (1.0 - dist / radius) * factor;
        }
    }
}

/// Every effect of one hand on the multi-hand path.
///
/// `ctx` must already carry this hand's velocity
/// (see [`EffectContext::with_velocity`]).
pub fn apply_hand<R: Rng + ?Sized>(
    particles: &mut [Particle],
    hand: &HandObservation,
    ctx: &EffectContext<'_>,
    rng: &mut R,
) {
    let palm = ctx.to_pixels(hand.palm);
    apply_gesture(particles, hand.gesture, palm, ctx, rng);
    fingertips(particles, &hand.fingertips, ctx, rng);
    velocity_trail(particles, palm, ctx.extent.x * GESTURE_RADIUS, ctx, rng);
}

/// Owns per-hand history and applies hands to the particle set.
#[derive(Debug, Clone)]
pub struct GestureForceField {
    tracker: HandTracker,
}

impl GestureForceField {
    pub fn new(hand_timeout_ticks: u32) -> Self {
        Self {
            tracker: HandTracker::new(hand_timeout_ticks),
        }
    }

    pub fn tracker(&self) -> &HandTracker {
        &self.tracker
    }

    /// Apply every hand of this tick, then age out hands that were not seen.
    pub fn apply_hands<R: Rng + ?Sized>(
        &mut self,
        particles: &mut [Particle],
        hands: &[HandObservation],
        base: &EffectContext<'_>,
        rng: &mut R,
    ) {
        for (i, hand) in hands.iter().enumerate() {
            let velocity = self
                .tracker
                .observe(HandKey::Index(i), base.to_pixels(hand.palm));
            let ctx = base.with_velocity(velocity);
            apply_hand(particles, hand, &ctx, rng);
        }
        self.tracker.end_tick();
    }

    /// Single-hand path: gesture, optional fingertips and hand drag.
    pub fn apply_primary<R: Rng + ?Sized>(
        &mut self,
        particles: &mut [Particle],
        gesture: Gesture,
        palm: Vec3,
        tips: Option<&Fingertips>,
        base: &EffectContext<'_>,
        rng: &mut R,
    ) {
        let palm = base.to_pixels(palm);
        let velocity = self.tracker.observe(HandKey::Primary, palm);
        let ctx = base.with_velocity(velocity);

        apply_gesture(particles, gesture, palm, &ctx, rng);
        if let Some(tips) = tips {
            fingertips(particles, tips, &ctx, rng);
        }
        hand_drag(particles, palm, &ctx);
    }

    /// Forget every tracked hand.
    pub fn reset(&mut self) {
        self.tracker.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{CLAY, LIGHT, SAND, SLIME, WATER};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    const EXTENT: Vec2 = Vec2::new(640.0, 480.0);
    const CENTER: Vec2 = Vec2::new(320.0, 240.0);

    fn at(x: f32, y: f32) -> Particle {
        Particle::new(Vec2::new(x, y), Vec2::ZERO, Vec3::ONE, 3.0, 1.0)
    }

    fn ring(n: usize, r: f32) -> Vec<Particle> {
        (0..n)
            .map(|i| {
                let a = i as f32 / n as f32 * std::f32::consts::TAU;
                let p = CENTER + Vec2::from_angle(a) * r;
                at(p.x, p.y)
            })
            .collect()
    }

    fn ctx(material: &MaterialDefinition) -> EffectContext<'_> {
        EffectContext::new(material, EXTENT, 0.0, 5.0)
    }

    #[test]
    fn test_movement_scale_curve() {
        assert!((movement_scale(0.0) - 0.3).abs() < 1e-6);
        assert!((movement_scale(0.5) - 0.65).abs() < 1e-6);
        assert!((movement_scale(1.0) - 1.0).abs() < 1e-6);
        assert!((movement_scale(11.0) - 2.0).abs() < 1e-6);
        assert!((movement_scale(100.0) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_grab_pulls_inward_and_releases_outside() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut ps = vec![at(340.0, 240.0), at(600.0, 240.0)];
        ps[1].fixed = true;
        grab(&mut ps, CENTER, 76.8, &ctx(&SAND), &mut rng);
        assert!(ps[0].velocity.x < 0.0);
        assert!(!ps[1].fixed);
        assert_eq!(ps[1].velocity, Vec2::ZERO);
    }

    #[test]
    fn test_clay_grab_fixes_core_fraction() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut ps: Vec<Particle> = (0..2000).map(|_| at(325.0, 240.0)).collect();
        grab(&mut ps, CENTER, 76.8, &ctx(&CLAY), &mut rng);
        let fraction = ps.iter().filter(|p| p.fixed).count() as f32 / 2000.0;
        assert!((fraction - 0.3).abs() < 0.05, "fraction {}", fraction);
    }

    #[test]
    fn test_slime_grab_ring_releases_beyond_reach() {
        let mut rng = SmallRng::seed_from_u64(3);
        let radius = 76.8;
        let mut ps = vec![at(320.0 + radius * 1.2, 240.0), at(320.0 + radius * 1.6, 240.0)];
        ps[1].fixed = true;
        grab(&mut ps, CENTER, radius, &ctx(&SLIME), &mut rng);
        // Inside 1.5r the ring still pulls inward
        assert!(ps[0].velocity.x < 0.0);
        assert!(!ps[1].fixed);
    }

    #[test]
    fn test_push_moves_outward() {
        let mut ps = ring(16, 30.0);
        for p in &mut ps {
            p.fixed = true;
        }
        push(&mut ps, CENTER, 76.8, &ctx(&WATER));
        for p in &ps {
            let outward = (p.position - CENTER).normalize();
            assert!(p.velocity.dot(outward) > 0.0);
            assert!(!p.fixed);
        }
    }

    #[test]
    fn test_spread_scales_with_material() {
        let mut sand = ring(8, 30.0);
        let mut light = ring(8, 30.0);
        spread(&mut sand, CENTER, 76.8, &ctx(&SAND));
        spread(&mut light, CENTER, 76.8, &ctx(&LIGHT));
        // light: spread 1.5 × strength 0.7 vs sand: 0.8 × 1.0
        let ratio = light[0].velocity.length() / sand[0].velocity.length();
        assert!((ratio - 1.05 / 0.8).abs() < 1e-4);
    }

    #[test]
    fn test_slime_spread_inner_band_has_no_radial_push() {
        let mut ps = vec![at(330.0, 240.0)];
        ps[0].fixed = true;
        spread(&mut ps, CENTER, 76.8, &ctx(&SLIME));
        assert!(!ps[0].fixed);
        assert_eq!(ps[0].velocity, Vec2::ZERO);

        let mut ps = vec![at(380.0, 240.0)];
        spread(&mut ps, CENTER, 76.8, &ctx(&SLIME));
        assert!(ps[0].velocity.x > 0.0);
    }

    #[test]
    fn test_wave_direction_follows_time() {
        let mut at_rest = vec![at(340.0, 240.0)];
        wave(&mut at_rest, CENTER, 76.8, &ctx(&SAND));
        // sin(0) = 0: straight out
        assert!(at_rest[0].velocity.y.abs() < 1e-6);
        assert!(at_rest[0].velocity.x > 0.0);

        let mut later = vec![at(340.0, 240.0)];
        let c = EffectContext::new(&SAND, EXTENT, 0.3, 5.0);
        wave(&mut later, CENTER, 76.8, &c);
        assert!(later[0].velocity.y.abs() > 1e-3);
    }

    #[test]
    fn test_fingertip_push_is_outward_for_sand() {
        let mut rng = SmallRng::seed_from_u64(4);
        let tips = Fingertips::splayed(Vec2::new(0.1, 0.9), 0.05);
        let tip = tips.get(crate::hand::Finger::Middle).truncate() * EXTENT;
        let mut ps = vec![at(tip.x + 10.0, tip.y)];
        fingertips(&mut ps, &tips, &ctx(&SAND), &mut rng);
        assert!(ps[0].velocity.x > 0.0);
    }

    #[test]
    fn test_water_fingertip_follows_hand() {
        let mut rng = SmallRng::seed_from_u64(5);
        let tips = Fingertips::splayed(Vec2::new(0.5, 0.5), 0.05);
        let tip = tips.get(crate::hand::Finger::Thumb).truncate() * EXTENT;
        let mut still = vec![at(tip.x, tip.y + 5.0)];
        let mut moving = still.clone();
        fingertips(&mut still, &tips, &ctx(&WATER), &mut rng);
        let c = ctx(&WATER).with_velocity(Vec2::new(0.0, -0.4));
        fingertips(&mut moving, &tips, &c, &mut rng);
        assert!(moving[0].velocity.y < still[0].velocity.y);
    }

    #[test]
    fn test_velocity_trail_needs_speed() {
        let mut rng = SmallRng::seed_from_u64(6);
        let mut ps = vec![at(330.0, 240.0)];
        let slow = ctx(&SAND).with_velocity(Vec2::new(0.3, 0.0));
        velocity_trail(&mut ps, CENTER, 76.8, &slow, &mut rng);
        assert_eq!(ps[0].velocity, Vec2::ZERO);

        let fast = ctx(&SAND).with_velocity(Vec2::new(6.0, 0.0));
        ps[0].fixed = true;
        velocity_trail(&mut ps, CENTER, 76.8, &fast, &mut rng);
        assert!(ps[0].velocity.x > 0.0);
        assert!(!ps[0].fixed);
    }

    #[test]
    fn test_hand_drag_follows_velocity() {
        let mut ps = vec![at(330.0, 240.0), at(600.0, 240.0)];
        let c = ctx(&CLAY).with_velocity(Vec2::new(0.0, 2.0));
        hand_drag(&mut ps, CENTER, &c);
        assert!(ps[0].velocity.y > 0.0);
        assert_eq!(ps[1].velocity, Vec2::ZERO);
    }

    #[test]
    fn test_local_cohesion_skips_fixed() {
        let mut ps = vec![at(100.0, 100.0), at(120.0, 100.0)];
        let index = SpatialIndex::build(&ps, 30.0);
        let dv = local_cohesion(&index, &ps, 0, 30.0);
        // 20 apart, optimal 7.2: pulled toward the partner
        assert!(dv.x > 0.0);
        ps[0].fixed = true;
        assert_eq!(local_cohesion(&index, &ps, 0, 30.0), Vec2::ZERO);
    }

    #[test]
    fn test_field_first_sight_has_rest_velocity() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut field = GestureForceField::new(1);
        let hand = HandObservation::new(
            Vec3::new(0.5, 0.5, 0.0),
            Fingertips::splayed(Vec2::new(0.9, 0.1), 0.02),
            Gesture::None,
        );
        let mut ps = vec![at(320.0, 240.0)];
        field.apply_hands(&mut ps, &[hand], &ctx(&SAND), &mut rng);
        assert_eq!(field.tracker().tracked_count(), 1);
        field.apply_hands(&mut ps, &[], &ctx(&SAND), &mut rng);
        assert_eq!(field.tracker().tracked_count(), 0);
    }
}
