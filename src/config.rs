//! Simulation configuration.
//!
//! `SimConfig` is plain data, loadable from JSON. Every field has a default,
//! so a config file only needs the values it changes:
//!
//! ```json
//! { "material": "slime", "max_particles": 1500, "seed": 42 }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, MaterialError};
use crate::material::Material;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Particles per material selection.
    pub max_particles: usize,
    /// Initial material name.
    pub material: String,
    /// Above this particle count the grid interaction strategy is used.
    pub interaction_threshold: usize,
    /// Cell size of the interaction grid, pixels.
    pub grid_cell_size: f32,
    /// Neighbor interaction range, pixels.
    pub interaction_range: f32,
    /// Consecutive missed ticks after which a hand's history is dropped.
    pub hand_timeout_ticks: u32,
    /// RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Mirror horizontally when presenting or exporting frames.
    pub mirror_x: bool,
    /// Angular frequency of the wave gesture, radians per second.
    pub wave_frequency: f32,
    /// Alpha of the black fill that fades the previous frame.
    pub trail_fade: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            max_particles: 2000,
            material: "sand".into(),
            interaction_threshold: 1000,
            grid_cell_size: 20.0,
            interaction_range: 10.0,
            hand_timeout_ticks: 1,
            seed: None,
            mirror_x: true,
            wave_frequency: 5.0,
            trail_fade: 0.1,
        }
    }
}

impl SimConfig {
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parsed initial material.
    pub fn initial_material(&self) -> Result<Material, ConfigError> {
        self.material
            .parse()
            .map_err(|e: MaterialError| ConfigError::Invalid(e.to_string()))
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "canvas must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.max_particles == 0 {
            return Err(ConfigError::Invalid("max_particles must be at least 1".into()));
        }
        if self.interaction_range.is_nan() || self.interaction_range <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "interaction_range must be positive, got {}",
                self.interaction_range
            )));
        }
        if self.grid_cell_size.is_nan() || self.grid_cell_size < self.interaction_range {
            return Err(ConfigError::Invalid(format!(
                "grid_cell_size ({}) must be at least interaction_range ({})",
                self.grid_cell_size, self.interaction_range
            )));
        }
        if self.hand_timeout_ticks == 0 {
            return Err(ConfigError::Invalid("hand_timeout_ticks must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.trail_fade) {
            return Err(ConfigError::Invalid(format!(
                "trail_fade must be in [0, 1], got {}",
                self.trail_fade
            )));
        }
        if !self.wave_frequency.is_finite() {
            return Err(ConfigError::Invalid("wave_frequency must be finite".into()));
        }
        self.initial_material()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.initial_material().unwrap(), Material::Sand);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SimConfig::from_json(r#"{ "material": "slime", "seed": 42 }"#).unwrap();
        assert_eq!(config.material, "slime");
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.max_particles, 2000);
        assert_eq!(config.width, 640);
    }

    #[test]
    fn test_unknown_material_rejected() {
        let err = SimConfig::from_json(r#"{ "material": "lava" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_bad_json_rejected() {
        let err = SimConfig::from_json("{ width: }").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut c = SimConfig::default();
        c.width = 0;
        assert!(c.validate().is_err());

        let mut c = SimConfig::default();
        c.grid_cell_size = 5.0;
        assert!(c.validate().is_err());

        let mut c = SimConfig::default();
        c.interaction_range = f32::NAN;
        assert!(c.validate().is_err());

        let mut c = SimConfig::default();
        c.max_particles = 0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("tactile-config-{}.json", std::process::id()));
        let mut config = SimConfig::default();
        config.material = "water".into();
        config.seed = Some(7);
        config.save(&path).unwrap();
        let loaded = SimConfig::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SimConfig::load("/nonexistent/tactile.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
