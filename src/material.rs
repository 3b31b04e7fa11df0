//! Material catalog.
//!
//! Five materials are built in. Each is an immutable [`MaterialDefinition`]
//! looked up by name; nothing here changes after start-up.
//!
//! ```ignore
//! let water = tactile::material::lookup("water")?;
//! assert_eq!(water.friction, 0.95);
//! ```

use std::fmt;
use std::str::FromStr;

use glam::{Vec3, Vec4};

use crate::behavior::{
    FingertipStyle, FixRule, GrabStyle, MaterialBehavior, ShapeStyle, SpreadStyle, TrailStyle,
};
use crate::error::MaterialError;
use crate::spawn::SeedDistribution;

/// Material key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Material {
    #[default]
    Sand,
    Water,
    Clay,
    Slime,
    Light,
}

impl Material {
    /// Every material, in selector order.
    pub const ALL: [Material; 5] = [
        Material::Sand,
        Material::Water,
        Material::Clay,
        Material::Slime,
        Material::Light,
    ];

    /// Lower-case name used by the catalog.
    pub fn name(&self) -> &'static str {
        match self {
            Material::Sand => "sand",
            Material::Water => "water",
            Material::Clay => "clay",
            Material::Slime => "slime",
            Material::Light => "light",
        }
    }

    /// The material's definition.
    pub fn definition(&self) -> &'static MaterialDefinition {
        match self {
            Material::Sand => &SAND,
            Material::Water => &WATER,
            Material::Clay => &CLAY,
            Material::Slime => &SLIME,
            Material::Light => &LIGHT,
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Material {
    type Err = MaterialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Material::ALL
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(key))
            .ok_or_else(|| MaterialError::UnknownMaterial(s.to_string()))
    }
}

/// Canvas compositing mode used when drawing a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Standard alpha blending (default).
    ///
    /// Particles cover what is beneath them according to their alpha.
    #[default]
    SourceOver,

    /// Screen blending.
    ///
    /// Inverts, multiplies and inverts again; brightens without clipping as
    /// hard as additive. Used for the wet, glossy materials.
    Screen,

    /// Additive blending.
    ///
    /// Overlapping particles become brighter, saturating at white. Used for
    /// glowing particles.
    Lighter,
}

/// Immutable physical and visual coefficients for one material.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialDefinition {
    pub material: Material,
    /// Base particle color, 0-255 per channel.
    pub color: [u8; 3],
    /// Velocity multiplier applied every tick, in (0, 1].
    pub friction: f32,
    pub repulsion: f32,
    pub cohesion: f32,
    /// Nominal particle radius in pixels.
    pub particle_size: f32,
    /// Spread-gesture multiplier.
    pub spread: f32,
    /// Probability per tick of a random velocity kick.
    pub randomness: f32,
    pub blend_mode: BlendMode,
    /// Shadow color, 0-255 per channel.
    pub shadow_color: [u8; 3],
    pub shadow_alpha: f32,
    /// Multiplier on every gesture force.
    pub interaction_strength: f32,
    /// Initial layout after a reset.
    pub seed: SeedDistribution,
    /// Width of the uniform initial velocity range per axis.
    pub initial_speed: f32,
    pub mass: f32,
    pub behavior: MaterialBehavior,
}

impl MaterialDefinition {
    /// Base color as normalized RGB.
    pub fn base_color(&self) -> Vec3 {
        rgb(self.color)
    }

    /// Shadow tint as normalized RGBA.
    pub fn shadow_tint(&self) -> Vec4 {
        rgb(self.shadow_color).extend(self.shadow_alpha)
    }
}

fn rgb(c: [u8; 3]) -> Vec3 {
    Vec3::new(c[0] as f32, c[1] as f32, c[2] as f32) / 255.0
}

/// Look up a material definition by name.
///
/// Names are matched case-insensitively. Unknown names yield
/// [`MaterialError::UnknownMaterial`].
pub fn lookup(name: &str) -> Result<&'static MaterialDefinition, MaterialError> {
    name.parse::<Material>().map(|m| m.definition())
}

const PLAIN_GRAB: GrabStyle = GrabStyle::Pull {
    core: 0.3,
    core_fix: FixRule::Keep,
};

pub const SAND: MaterialDefinition = MaterialDefinition {
    material: Material::Sand,
    color: [0xE2, 0xC0, 0x78],
    friction: 0.9,
    repulsion: 0.05,
    cohesion: 0.01,
    particle_size: 3.0,
    spread: 0.8,
    randomness: 0.3,
    blend_mode: BlendMode::SourceOver,
    shadow_color: [0, 0, 0],
    shadow_alpha: 0.3,
    interaction_strength: 1.0,
    seed: SeedDistribution::Disk {
        radius: 0.25,
        falloff: 1.0,
    },
    initial_speed: 0.0,
    mass: 1.0,
    behavior: MaterialBehavior {
        cohesive: false,
        grab: PLAIN_GRAB,
        spread: SpreadStyle::Radial,
        fingertip: FingertipStyle::Plain,
        shape: ShapeStyle::Push { gain: 0.5 },
        trail: TrailStyle {
            radius_scale: 1.5,
            strength_scale: 1.0,
            spread: 0.5,
        },
    },
};

pub const WATER: MaterialDefinition = MaterialDefinition {
    material: Material::Water,
    color: [0x5D, 0xA2, 0xD5],
    friction: 0.95,
    repulsion: 0.02,
    cohesion: 0.05,
    particle_size: 4.0,
    spread: 1.2,
    randomness: 0.4,
    blend_mode: BlendMode::Screen,
    shadow_color: [0, 100, 255],
    shadow_alpha: 0.2,
    interaction_strength: 1.2,
    seed: SeedDistribution::Rect { divisor: 2.5 },
    initial_speed: 0.5,
    mass: 0.8,
    behavior: MaterialBehavior {
        cohesive: true,
        grab: PLAIN_GRAB,
        spread: SpreadStyle::Radial,
        fingertip: FingertipStyle::Flow { follow: 0.2 },
        shape: ShapeStyle::Flow { gain: 1.5 },
        trail: TrailStyle {
            radius_scale: 1.8,
            strength_scale: 1.0,
            spread: 0.6,
        },
    },
};

pub const CLAY: MaterialDefinition = MaterialDefinition {
    material: Material::Clay,
    color: [0x8D, 0x6E, 0x63],
    friction: 0.7,
    repulsion: 0.08,
    cohesion: 0.15,
    particle_size: 5.0,
    spread: 0.5,
    randomness: 0.1,
    blend_mode: BlendMode::SourceOver,
    shadow_color: [50, 20, 0],
    shadow_alpha: 0.4,
    interaction_strength: 1.5,
    seed: SeedDistribution::Disk {
        radius: 0.125,
        falloff: 0.5,
    },
    initial_speed: 0.0,
    mass: 1.2,
    behavior: MaterialBehavior {
        cohesive: true,
        grab: GrabStyle::Pull {
            core: 0.3,
            core_fix: FixRule::Reroll(0.3),
        },
        spread: SpreadStyle::Radial,
        fingertip: FingertipStyle::Mold {
            inner: 0.4,
            inner_pull: 0.5,
            outer_pull: 0.2,
            fix: FixRule::Reroll(0.3),
        },
        shape: ShapeStyle::Mold {
            gain: 0.8,
            fix_within: 0.2,
            fix: FixRule::Reroll(0.5),
        },
        trail: TrailStyle {
            radius_scale: 0.8,
            strength_scale: 0.7,
            spread: 0.2,
        },
    },
};

pub const SLIME: MaterialDefinition = MaterialDefinition {
    material: Material::Slime,
    color: [0x76, 0xFF, 0x03],
    friction: 0.8,
    repulsion: 0.03,
    cohesion: 0.3,
    particle_size: 6.0,
    spread: 0.3,
    randomness: 0.05,
    blend_mode: BlendMode::Screen,
    shadow_color: [50, 200, 0],
    shadow_alpha: 0.3,
    interaction_strength: 0.8,
    seed: SeedDistribution::Disk {
        radius: 1.0 / 6.0,
        falloff: 0.6,
    },
    initial_speed: 0.0,
    mass: 0.9,
    behavior: MaterialBehavior {
        cohesive: true,
        grab: GrabStyle::Clump {
            core: 0.4,
            reach: 1.5,
            core_fix: FixRule::Latch(0.7),
            cohesion_radius: 0.8,
        },
        spread: SpreadStyle::Banded {
            bands: 4.0,
            reach: 1.5,
        },
        fingertip: FingertipStyle::Stick {
            inner: 0.3,
            fix: FixRule::Reroll(0.7),
            outer_push: 0.1,
        },
        shape: ShapeStyle::Stick {
            inner: 0.3,
            pull: 0.6,
            fix: FixRule::Reroll(0.7),
            outer_push: 0.1,
        },
        trail: TrailStyle {
            radius_scale: 1.2,
            strength_scale: 0.8,
            spread: 0.4,
        },
    },
};

pub const LIGHT: MaterialDefinition = MaterialDefinition {
    material: Material::Light,
    color: [0xFF, 0xEB, 0x3B],
    friction: 0.98,
    repulsion: 0.01,
    cohesion: 0.0,
    particle_size: 2.0,
    spread: 1.5,
    randomness: 0.6,
    blend_mode: BlendMode::Lighter,
    shadow_color: [255, 255, 100],
    shadow_alpha: 0.3,
    interaction_strength: 0.7,
    seed: SeedDistribution::Canvas,
    initial_speed: 1.5,
    mass: 0.5,
    behavior: MaterialBehavior {
        cohesive: false,
        grab: PLAIN_GRAB,
        spread: SpreadStyle::Radial,
        fingertip: FingertipStyle::Plain,
        shape: ShapeStyle::Scatter { gain: 2.0 },
        trail: TrailStyle {
            radius_scale: 2.0,
            strength_scale: 1.0,
            spread: 0.7,
        },
    },
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_every_material() {
        for m in Material::ALL {
            let def = lookup(m.name()).unwrap();
            assert_eq!(def.material, m);
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(lookup(" Water ").unwrap().material, Material::Water);
        assert_eq!("SLIME".parse::<Material>().unwrap(), Material::Slime);
    }

    #[test]
    fn test_unknown_material() {
        assert_eq!(
            lookup("lava"),
            Err(MaterialError::UnknownMaterial("lava".into()))
        );
    }

    #[test]
    fn test_friction_in_unit_interval() {
        for m in Material::ALL {
            let f = m.definition().friction;
            assert!(f > 0.0 && f <= 1.0, "{} friction {}", m, f);
        }
    }

    #[test]
    fn test_cohesive_materials() {
        let cohesive: Vec<_> = Material::ALL
            .iter()
            .filter(|m| m.definition().behavior.cohesive)
            .copied()
            .collect();
        assert_eq!(cohesive, vec![Material::Water, Material::Clay, Material::Slime]);
    }

    #[test]
    fn test_trail_spread_factors() {
        let spreads: Vec<f32> = Material::ALL
            .iter()
            .map(|m| m.definition().behavior.trail.spread)
            .collect();
        assert_eq!(spreads, vec![0.5, 0.6, 0.2, 0.4, 0.7]);
    }

    #[test]
    fn test_base_color_normalized() {
        let c = SLIME.base_color();
        assert!((c.y - 1.0).abs() < 1e-6);
        assert!((SAND.shadow_tint().w - 0.3).abs() < 1e-6);
    }
}
