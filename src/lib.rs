//! # Tactile - gesture-driven material particle sandbox
//!
//! A 2D particle simulation whose dynamics depend on a selected material
//! (sand, water, clay, slime, light) and which is pushed around by hands.
//! Hands come from an external sensing pipeline as normalized palm and
//! fingertip positions plus a gesture label; the mouse can stand in for one.
//!
//! ## Quick Start
//!
//! ```ignore
//! use tactile::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut sim = Simulation::new().with_material("slime").with_seed(42);
//!
//!     let palm = Vec3::new(0.5, 0.5, 0.0);
//!     for _ in 0..60 {
//!         sim.apply_gesture_effect(Gesture::Grab, palm, None);
//!         sim.tick();
//!     }
//!     sim.save_frame("slime.png")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Materials
//!
//! Every material is an immutable [`MaterialDefinition`]: friction,
//! repulsion, cohesion, particle size, spread, randomness, blend mode,
//! shadow tint and interaction strength, plus a [`MaterialBehavior`]
//! record that holds everything the gesture effects do differently per
//! material. Selecting a material discards every particle and seeds a
//! fresh set from the material's spawn distribution.
//!
//! ### The tick
//!
//! One [`Simulation::tick`] runs, in order:
//!
//! ```text
//! gesture forces → neighbor interactions → friction/randomness → integrate → render
//! ```
//!
//! Each stage reads the velocity left by the previous one and adds to it,
//! so with a seeded RNG identical input sequences give identical runs.
//!
//! ### Hands and gestures
//!
//! | gesture | effect inside `0.12 × width` of the palm |
//! |---|---|
//! | grab | pull toward the palm; clay and slime stick |
//! | push | push away, releasing stuck particles |
//! | spread | push radially outward, slime moves in cohesive bands |
//! | wave | oscillating sideways push |
//!
//! Fingertips push locally, the whole hand shapes nearby particles and a
//! moving hand drags a trail behind it. Several hands add up with no
//! conflict resolution.
//!
//! ### Fixed particles
//!
//! Clay and slime particles can become `fixed`: the integrator skips them
//! so they hold their shape until a push, spread, wave or fast hand
//! releases them.
//!
//! ## Neighbor Interactions
//!
//! Pairwise repulsion and cohesion run exhaustively up to
//! `interaction_threshold` particles and on a uniform grid above it
//! (see [`interactions`]). The grid pass halves its forces to compensate
//! for counting every pair from both sides.
//!
//! ## Coordinates
//!
//! Physics uses the sensor's normalized coordinates scaled to pixels. The
//! selfie-style horizontal mirror is applied only when a frame is
//! presented or saved.

pub mod behavior;
pub mod config;
pub mod error;
pub mod gesture;
pub mod hand;
pub mod input;
pub mod integrator;
pub mod interactions;
pub mod material;
pub mod particle;
pub mod render;
pub mod replay;
mod simulation;
pub mod spatial;
pub mod spawn;
pub mod store;
pub mod time;
pub mod tracker;
mod window;

pub use behavior::MaterialBehavior;
pub use config::SimConfig;
pub use error::{ConfigError, GpuError, HandError, MaterialError, RenderError, ViewerError};
pub use glam::{Vec2, Vec3, Vec4};
pub use hand::{Finger, Fingertips, Gesture, HandObservation, Handedness, RawHandObservation};
pub use material::{BlendMode, Material, MaterialDefinition};
pub use particle::{Particle, ParticleSnapshot};
pub use replay::HandReplay;
pub use simulation::{Simulation, SimulationStats};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use tactile::prelude::*;
/// ```
///
/// This imports:
/// - [`Simulation`] - the simulation facade
/// - [`SimConfig`] - its configuration
/// - [`Material`], [`Gesture`], [`Finger`] - the input vocabularies
/// - [`HandObservation`], [`RawHandObservation`], [`Fingertips`] - hand input
/// - [`Vec2`], [`Vec3`] - glam vector types
pub mod prelude {
    pub use crate::config::SimConfig;
    pub use crate::hand::{Finger, Fingertips, Gesture, HandObservation, Handedness, RawHandObservation};
    pub use crate::material::Material;
    pub use crate::replay::HandReplay;
    pub use crate::simulation::{Simulation, SimulationStats};
    pub use glam::{Vec2, Vec3};
}
