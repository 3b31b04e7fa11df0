//! Simulation facade.
//!
//! [`Simulation`] owns the particle store, the gesture force field, the
//! interaction engine, the integrator, the renderer and the clock, and
//! drives them in a fixed order once per [`tick`](Simulation::tick):
//!
//! 1. gesture forces from the hands delivered since the last tick,
//! 2. neighbor interactions,
//! 3. friction, random kicks and position integration,
//! 4. rendering into the pixel buffer.
//!
//! Hand input is latched, not applied on delivery: `update_hands` and
//! `apply_gesture_effect` store the latest snapshot, and the next tick
//! consumes it. A tick with nothing delivered applies no gesture force.
//!
//! ```ignore
//! use tactile::prelude::*;
//!
//! let mut sim = Simulation::new().with_seed(7);
//! sim.apply_gesture_effect(Gesture::Grab, Vec3::new(0.5, 0.5, 0.0), None);
//! sim.tick();
//! sim.set_material("slime")?;
//! ```

use std::path::Path;

use glam::{Vec2, Vec3};
use image::RgbaImage;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::config::SimConfig;
use crate::error::{ConfigError, MaterialError, RenderError, ViewerError};
use crate::gesture::{EffectContext, GestureForceField};
use crate::hand::{Fingertips, Gesture, HandObservation, RawHandObservation};
use crate::integrator::Integrator;
use crate::interactions::{InteractionEngine, InteractionParams, StrategyKind};
use crate::material::{Material, MaterialDefinition};
use crate::particle::{Particle, ParticleSnapshot};
use crate::render::Renderer;
use crate::store::ParticleStore;
use crate::time::Time;

/// Legacy single-hand input, latched until the next tick.
#[derive(Clone, Copy, Debug)]
struct PrimaryHand {
    gesture: Gesture,
    palm: Vec3,
    fingertips: Option<Fingertips>,
}

/// Point-in-time diagnostics.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationStats {
    pub material: Material,
    pub particle_count: usize,
    pub fixed_count: usize,
    pub tracked_hands: usize,
    /// Strategy used by the most recent interaction pass.
    pub strategy: Option<StrategyKind>,
    pub frame: u64,
}

/// The particle sandbox.
pub struct Simulation {
    config: SimConfig,
    store: ParticleStore,
    field: GestureForceField,
    engine: InteractionEngine,
    integrator: Integrator,
    renderer: Renderer,
    time: Time,
    rng: SmallRng,
    hands: Vec<HandObservation>,
    primary: Option<PrimaryHand>,
}

impl Simulation {
    /// A sand simulation with the default configuration.
    pub fn new() -> Self {
        // The default config is valid and names a known material.
        Self::build(SimConfig::default(), Material::Sand)
    }

    /// Build from a configuration, validating it first.
    pub fn from_config(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let material = config.initial_material()?;
        Ok(Self::build(config, material))
    }

    fn build(config: SimConfig, material: Material) -> Self {
        let extent = Vec2::new(config.width as f32, config.height as f32);
        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let mut store = ParticleStore::new(config.max_particles, extent);
        store.reset(material, &mut rng);
        log::info!(
            "Simulation {}x{} with {} {} particles",
            config.width,
            config.height,
            store.particle_count(),
            material
        );

        Self {
            field: GestureForceField::new(config.hand_timeout_ticks),
            engine: InteractionEngine::new(config.interaction_threshold, config.grid_cell_size),
            integrator: Integrator,
            renderer: Renderer::new(config.width, config.height)
                .with_trail_fade(config.trail_fade)
                .with_mirror(config.mirror_x),
            time: Time::new(),
            rng,
            store,
            config,
            hands: Vec::new(),
            primary: None,
        }
    }

    /// Switch material and reseed.
    ///
    /// An unknown name is logged at `warn` and otherwise ignored; call
    /// [`set_material`](Self::set_material) to get the error.
    pub fn with_material(mut self, name: &str) -> Self {
        let _ = self.set_material(name);
        self
    }

    /// Set the particle count and reseed.
    pub fn with_max_particles(mut self, count: usize) -> Self {
        self.config.max_particles = count.max(1);
        let extent = self.store.extent();
        let material = self.store.current_material();
        self.store = ParticleStore::new(self.config.max_particles, extent);
        self.store.reset(material, &mut self.rng);
        self
    }

    /// Reseed the RNG and regenerate the particles from it.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self.rng = SmallRng::seed_from_u64(seed);
        self.store.reset(self.store.current_material(), &mut self.rng);
        self
    }

    /// Set the canvas size in pixels and reseed.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.resize(width, height);
        self.store.reset(self.store.current_material(), &mut self.rng);
        self
    }

    /// Advance the clock by exactly `delta` seconds per tick.
    pub fn with_fixed_delta(mut self, delta: f32) -> Self {
        self.time.set_fixed_delta(Some(delta));
        self
    }

    /// Select a material by name.
    ///
    /// Selecting the current material again does nothing. An unknown name
    /// leaves material and particles untouched.
    pub fn set_material(&mut self, name: &str) -> Result<(), MaterialError> {
        let material: Material = name.parse().map_err(|e| {
            log::warn!("{}", e);
            e
        })?;
        if material == self.store.current_material() {
            return Ok(());
        }
        self.store.reset(material, &mut self.rng);
        self.field.reset();
        log::info!("Material changed to {}", material);
        Ok(())
    }

    /// Regenerate the current material's particles.
    pub fn reset(&mut self) {
        self.store.reset(self.store.current_material(), &mut self.rng);
        self.field.reset();
    }

    /// Latch the legacy single-hand input for the next tick.
    pub fn apply_gesture_effect(&mut self, gesture: Gesture, palm: Vec3, fingertips: Option<&Fingertips>) {
        self.primary = Some(PrimaryHand {
            gesture,
            palm,
            fingertips: fingertips.copied(),
        });
    }

    /// Latch this tick's hands, skipping malformed ones.
    pub fn update_hands(&mut self, hands: &[RawHandObservation]) {
        self.hands.clear();
        for (i, raw) in hands.iter().enumerate() {
            match raw.validate(i) {
                Ok(hand) => self.hands.push(hand),
                Err(e) => log::warn!("Skipping hand: {}", e),
            }
        }
    }

    /// Latch already-validated hands.
    pub fn set_hands(&mut self, hands: &[HandObservation]) {
        self.hands.clear();
        self.hands.extend_from_slice(hands);
    }

    /// Advance one tick and render.
    pub fn tick(&mut self) {
        if self.step() {
            self.renderer
                .render(self.store.particles(), self.store.current_material().definition());
        }
    }

    /// Advance one tick without rendering.
    ///
    /// Returns `false` if the clock is paused and nothing moved.
    pub fn step(&mut self) -> bool {
        let (elapsed, _) = self.time.update();
        let primary = self.primary.take();
        let hands = std::mem::take(&mut self.hands);
        if self.time.is_paused() {
            return false;
        }

        let def: &'static MaterialDefinition = self.store.current_material().definition();
        let extent = self.store.extent();
        let ctx = EffectContext::new(def, extent, elapsed, self.config.wave_frequency);
        let particles = self.store.particles_mut();

        if let Some(p) = primary {
            self.field.apply_primary(
                particles,
                p.gesture,
                p.palm,
                p.fingertips.as_ref(),
                &ctx,
                &mut self.rng,
            );
        }
        self.field.apply_hands(particles, &hands, &ctx, &mut self.rng);

        let params = InteractionParams::for_material(def, self.config.interaction_range);
        self.engine.apply(particles, &params);

        self.integrator.step(particles, def, extent, &mut self.rng);

        // Keep the allocation for the next delivery.
        self.hands = hands;
        self.hands.clear();
        true
    }

    pub fn toggle_pause(&mut self) {
        self.time.toggle_pause();
        log::info!("{}", if self.time.is_paused() { "Paused" } else { "Resumed" });
    }

    pub fn is_paused(&self) -> bool {
        self.time.is_paused()
    }

    /// Change the canvas size. Particles outside the new extent are clamped
    /// onto its edge.
    pub fn resize(&mut self, width: u32, height: u32) {
        let (width, height) = (width.max(1), height.max(1));
        self.config.width = width;
        self.config.height = height;
        self.store.resize(Vec2::new(width as f32, height as f32));
        self.renderer.resize(width, height);
    }

    pub fn material(&self) -> Material {
        self.store.current_material()
    }

    pub fn material_name(&self) -> &'static str {
        self.store.current_material().name()
    }

    pub fn particle_count(&self) -> usize {
        self.store.particle_count()
    }

    pub fn particles(&self) -> &[Particle] {
        self.store.particles()
    }

    /// Per-particle state for diagnostics.
    pub fn snapshot(&self) -> Vec<ParticleSnapshot> {
        self.store.particles().iter().map(Particle::snapshot).collect()
    }

    /// Rendered frame in simulation coordinates.
    pub fn frame(&self) -> &RgbaImage {
        self.renderer.frame()
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn stats(&self) -> SimulationStats {
        SimulationStats {
            material: self.store.current_material(),
            particle_count: self.store.particle_count(),
            fixed_count: self.store.fixed_count(),
            tracked_hands: self.field.tracker().tracked_count(),
            strategy: self.engine.active(),
            frame: self.time.frame(),
        }
    }

    /// Write the presented frame (mirrored if configured) as PNG.
    pub fn save_frame(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        self.renderer.save_png(path)
    }

    /// Open the viewer window. Blocks until it is closed.
    pub fn run(self) -> Result<(), ViewerError> {
        crate::window::run(self)
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}
