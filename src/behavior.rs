//! Per-material behavior records.
//!
//! Every material owns one [`MaterialBehavior`]. The gesture force field and
//! the interaction engine never branch on the material itself; they read the
//! style enums below and dispatch on those. Adding or retuning a material
//! therefore only touches its record in [`crate::material`].

use rand::Rng;

/// How a random roll writes a particle's `fixed` flag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FixRule {
    /// Leave the flag untouched.
    Keep,
    /// Overwrite the flag: fixed with probability `p`, free otherwise.
    ///
    /// A re-roll can release a particle that was already fixed.
    Reroll(f32),
    /// With probability `p` set the flag; never clears it.
    Latch(f32),
}

impl FixRule {
    /// Apply the rule to `fixed`, drawing from `rng` when a roll is needed.
    pub fn apply<R: Rng + ?Sized>(self, fixed: &mut bool, rng: &mut R) {
        match self {
            FixRule::Keep => {}
            FixRule::Reroll(p) => *fixed = rng.gen::<f32>() < p,
            FixRule::Latch(p) => {
                if rng.gen::<f32>() < p {
                    *fixed = true;
                }
            }
        }
    }
}

/// Response to the grab gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GrabStyle {
    /// Pull toward the palm inside the gesture disk, release everything outside.
    ///
    /// Particles closer than `core × radius` additionally go through `core_fix`.
    Pull { core: f32, core_fix: FixRule },
    /// Clumping: a strong core that latches particles in place and a wide
    /// cohesive ring around it.
    ///
    /// * `core` - core radius as a fraction of the gesture radius
    /// * `reach` - outer radius of the affected ring as a fraction of the gesture radius
    /// * `cohesion_radius` - local cohesion range for ring particles, fraction of the gesture radius
    Clump {
        core: f32,
        reach: f32,
        core_fix: FixRule,
        cohesion_radius: f32,
    },
}

/// Response to the spread gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpreadStyle {
    /// Push radially outward with `(1 - d/r)` falloff.
    Radial,
    /// Sort particles into concentric bands of width `radius / bands` out to
    /// `reach × radius`; outer bands move faster and each particle keeps
    /// local cohesion with its band.
    Banded { bands: f32, reach: f32 },
}

/// Secondary response to a single fingertip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FingertipStyle {
    /// Only the radial push and near-tip velocity following.
    Plain,
    /// Particles are drawn in toward the tip; the inner zone is pinned.
    Mold {
        inner: f32,
        inner_pull: f32,
        outer_pull: f32,
        fix: FixRule,
    },
    /// Particles right at the tip stick to it; the rest drift outward.
    Stick {
        inner: f32,
        fix: FixRule,
        outer_push: f32,
    },
    /// Particles follow the hand's velocity.
    Flow { follow: f32 },
}

/// Response to the whole-hand landmark shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShapeStyle {
    /// Pushed away from the nearest landmark.
    Push { gain: f32 },
    /// Carried along the hand's velocity.
    Flow { gain: f32 },
    /// Drawn toward the nearest landmark; pinned when very close.
    Mold { gain: f32, fix_within: f32, fix: FixRule },
    /// Sticky core around each landmark, gentle outward drift beyond it.
    Stick {
        inner: f32,
        pull: f32,
        fix: FixRule,
        outer_push: f32,
    },
    /// Scattered at a randomized angle.
    Scatter { gain: f32 },
}

/// Velocity-trail tuning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailStyle {
    /// Multiplier on the gesture radius.
    pub radius_scale: f32,
    /// Multiplier on the trail strength.
    pub strength_scale: f32,
    /// Perpendicular scatter factor.
    pub spread: f32,
}

/// The full set of behavior choices for one material.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialBehavior {
    /// Whether neighbor cohesion is active in the interaction stage.
    pub cohesive: bool,
    pub grab: GrabStyle,
    pub spread: SpreadStyle,
    pub fingertip: FingertipStyle,
    pub shape: ShapeStyle,
    pub trail: TrailStyle,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_keep_never_changes_flag() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut fixed = true;
        for _ in 0..100 {
            FixRule::Keep.apply(&mut fixed, &mut rng);
        }
        assert!(fixed);
    }

    #[test]
    fn test_latch_never_releases() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut fixed = true;
        for _ in 0..1000 {
            FixRule::Latch(0.1).apply(&mut fixed, &mut rng);
            assert!(fixed);
        }
    }

    #[test]
    fn test_reroll_fraction_matches_probability() {
        let mut rng = SmallRng::seed_from_u64(3);
        let trials = 10_000;
        let mut count = 0;
        for _ in 0..trials {
            let mut fixed = false;
            FixRule::Reroll(0.3).apply(&mut fixed, &mut rng);
            if fixed {
                count += 1;
            }
        }
        let fraction = count as f32 / trials as f32;
        assert!((fraction - 0.3).abs() < 0.03, "fraction was {}", fraction);
    }

    #[test]
    fn test_reroll_can_release() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut released = false;
        for _ in 0..100 {
            let mut fixed = true;
            FixRule::Reroll(0.5).apply(&mut fixed, &mut rng);
            released |= !fixed;
        }
        assert!(released);
    }
}
