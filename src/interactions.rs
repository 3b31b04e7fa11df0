//! Neighbor interactions between particles of the current material.
//!
//! Every pair closer than the interaction range exchanges a repulsion
//! force, and for cohesive materials a cohesion force that pulls pairs
//! back toward an optimal spacing of `0.75 × (size₁ + size₂)`.
//!
//! Two strategies implement [`NeighborInteractionStrategy`]:
//!
//! - [`ExhaustiveInteractions`] visits every unordered pair once and applies
//!   equal and opposite velocity changes. Exact, O(n²).
//! - [`GridInteractions`] buckets particles in a [`SpatialIndex`] and lets
//!   each particle accumulate from its 3×3 cell neighborhood on its own.
//!   Every pair is therefore seen from both sides, so forces are halved.
//!
//! [`InteractionEngine`] picks one per tick from the particle count.
//!
//! # Example
//!
//! ```ignore
//! let mut engine = InteractionEngine::new(1000, 20.0);
//! let params = InteractionParams::for_material(material::lookup("water")?, 10.0);
//! engine.apply(store.particles_mut(), &params);
//! ```

use glam::Vec2;

use crate::material::MaterialDefinition;
use crate::particle::Particle;
use crate::spatial::SpatialIndex;

/// Offset added to the pair distance before inverting it.
const FORCE_SOFTENING: f32 = 0.1;
/// Optimal pair spacing as a fraction of the summed radii.
const OPTIMAL_SPACING: f32 = 0.75;
/// Grid path force scale; compensates for each pair being visited twice.
const GRID_FORCE_SCALE: f32 = 0.5;

/// Coefficients for one interaction pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InteractionParams {
    pub repulsion: f32,
    pub cohesion: f32,
    /// Whether cohesion is applied at all.
    pub cohesive: bool,
    /// Pairs with squared distance below this interact.
    pub range_sq: f32,
}

impl InteractionParams {
    /// Parameters for `material` with interaction range `range` in pixels.
    pub fn for_material(material: &MaterialDefinition, range: f32) -> Self {
        Self {
            repulsion: material.repulsion,
            cohesion: material.cohesion,
            cohesive: material.behavior.cohesive,
            range_sq: range * range,
        }
    }
}

/// Velocity change for the particle at `a` caused by the particle at `b`.
///
/// `None` when the pair is out of range. The partner's change is the
/// negation.
#[inline]
pub fn pair_force(a: &Particle, b: &Particle, params: &InteractionParams) -> Option<Vec2> {
    let d = b.position - a.position;
    let dist_sq = d.length_squared();
    if dist_sq >= params.range_sq {
        return None;
    }
    let dist = dist_sq.sqrt();
    let force = 1.0 / (dist + FORCE_SOFTENING);

    let mut dv = -d * params.repulsion * force;

    if params.cohesive {
        let optimal = (a.size + b.size) * OPTIMAL_SPACING;
        if dist > optimal {
            dv += d * params.cohesion * (dist - optimal) / dist;
        }
    }
    Some(dv)
}

/// A way of applying neighbor forces to the whole particle set.
pub trait NeighborInteractionStrategy {
    /// Short name for logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Add neighbor forces to the velocities of non-fixed particles.
    /// Positions are read but not written.
    fn apply(&mut self, particles: &mut [Particle], params: &InteractionParams);
}

/// Exact pairwise interactions.
#[derive(Debug, Default, Clone)]
pub struct ExhaustiveInteractions;

impl NeighborInteractionStrategy for ExhaustiveInteractions {
    fn name(&self) -> &'static str {
        "exhaustive"
    }

    fn apply(&mut self, particles: &mut [Particle], params: &InteractionParams) {
        let n = particles.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = (particles[i], particles[j]);
                let Some(dv) = pair_force(&a, &b, params) else {
                    continue;
                };
                if !a.fixed {
                    particles[i].velocity += dv;
                }
                if !b.fixed {
                    particles[j].velocity -= dv;
                }
            }
        }
    }
}

/// Grid-accelerated interactions.
#[derive(Debug, Clone)]
pub struct GridInteractions {
    cell_size: f32,
    index: SpatialIndex,
    deltas: Vec<Vec2>,
}

impl GridInteractions {
    /// `cell_size` must be at least the interaction range for the 3×3
    /// neighborhood to cover every in-range pair.
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            index: SpatialIndex::new(),
            deltas: Vec::new(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }
}

impl NeighborInteractionStrategy for GridInteractions {
    fn name(&self) -> &'static str {
        "grid"
    }

    fn apply(&mut self, particles: &mut [Particle], params: &InteractionParams) {
        self.index.rebuild(particles, self.cell_size);
        self.deltas.clear();
        self.deltas.resize(particles.len(), Vec2::ZERO);

        for (i, a) in particles.iter().enumerate() {
            if a.fixed {
                continue;
            }
            let mut dv = Vec2::ZERO;
            for j in self.index.neighbors_of(i) {
                if j == i {
                    continue;
                }
                if let Some(f) = pair_force(a, &particles[j], params) {
                    dv += f;
                }
            }
            self.deltas[i] = dv * GRID_FORCE_SCALE;
        }

        for (p, dv) in particles.iter_mut().zip(&self.deltas) {
            p.velocity += *dv;
        }
    }
}

/// Which strategy ran on the last pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyKind {
    Exhaustive,
    Grid,
}

/// Chooses between the exhaustive and grid strategies by particle count.
#[derive(Debug, Clone)]
pub struct InteractionEngine {
    threshold: usize,
    exhaustive: ExhaustiveInteractions,
    grid: GridInteractions,
    active: Option<StrategyKind>,
}

impl InteractionEngine {
    /// Counts strictly above `threshold` use the grid strategy.
    pub fn new(threshold: usize, cell_size: f32) -> Self {
        Self {
            threshold,
            exhaustive: ExhaustiveInteractions,
            grid: GridInteractions::new(cell_size),
            active: None,
        }
    }

    pub fn select(&self, particle_count: usize) -> StrategyKind {
        if particle_count > self.threshold {
            StrategyKind::Grid
        } else {
            StrategyKind::Exhaustive
        }
    }

    /// Strategy used on the most recent pass, if any.
    pub fn active(&self) -> Option<StrategyKind> {
        self.active
    }

    pub fn apply(&mut self, particles: &mut [Particle], params: &InteractionParams) {
        let kind = self.select(particles.len());
        let strategy: &mut dyn NeighborInteractionStrategy = match kind {
            StrategyKind::Exhaustive => &mut self.exhaustive,
            StrategyKind::Grid => &mut self.grid,
        };
        if self.active != Some(kind) {
            log::debug!(
                "Interaction strategy: {} ({} particles)",
                strategy.name(),
                particles.len()
            );
        }
        strategy.apply(particles, params);
        self.active = Some(kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{CLAY, SAND};
    use glam::Vec3;

    fn at(x: f32, y: f32, size: f32) -> Particle {
        Particle::new(Vec2::new(x, y), Vec2::ZERO, Vec3::ONE, size, 1.0)
    }

    #[test]
    fn test_out_of_range_pair_ignored() {
        let params = InteractionParams::for_material(&SAND, 10.0);
        assert!(pair_force(&at(0.0, 0.0, 3.0), &at(10.0, 0.0, 3.0), &params).is_none());
        assert!(pair_force(&at(0.0, 0.0, 3.0), &at(9.9, 0.0, 3.0), &params).is_some());
    }

    #[test]
    fn test_repulsion_pushes_apart() {
        let params = InteractionParams::for_material(&SAND, 10.0);
        let mut ps = vec![at(100.0, 100.0, 3.0), at(104.0, 100.0, 3.0)];
        ExhaustiveInteractions.apply(&mut ps, &params);
        assert!(ps[0].velocity.x < 0.0);
        assert!(ps[1].velocity.x > 0.0);
        // Equal and opposite
        assert!((ps[0].velocity + ps[1].velocity).length() < 1e-6);
        // dx * repulsion / (dist + 0.1)
        let expected = 4.0 * 0.05 / 4.1;
        assert!((ps[1].velocity.x - expected).abs() < 1e-6);
    }

    #[test]
    fn test_cohesion_pulls_distant_pairs() {
        let params = InteractionParams::for_material(&CLAY, 10.0);
        // optimal = 0.75 * 4 = 3, dist = 9.
        let mut ps = vec![at(100.0, 100.0, 2.0), at(109.0, 100.0, 2.0)];
        ExhaustiveInteractions.apply(&mut ps, &params);
        let repulsion = 9.0 * 0.08 / 9.1;
        let cohesion = 9.0 * 0.15 * (9.0 - 3.0) / 9.0;
        assert!((ps[0].velocity.x - (cohesion - repulsion)).abs() < 1e-5);
        assert!(ps[0].velocity.x > 0.0);
    }

    #[test]
    fn test_fixed_particles_untouched() {
        let params = InteractionParams::for_material(&SAND, 10.0);
        let mut ps = vec![at(100.0, 100.0, 3.0), at(103.0, 100.0, 3.0)];
        ps[0].fixed = true;
        ExhaustiveInteractions.apply(&mut ps, &params);
        assert_eq!(ps[0].velocity, Vec2::ZERO);
        assert!(ps[1].velocity.x > 0.0);

        let mut ps = vec![at(100.0, 100.0, 3.0), at(103.0, 100.0, 3.0)];
        ps[0].fixed = true;
        GridInteractions::new(20.0).apply(&mut ps, &params);
        assert_eq!(ps[0].velocity, Vec2::ZERO);
        assert!(ps[1].velocity.x > 0.0);
    }

    #[test]
    fn test_grid_is_half_of_exhaustive() {
        let params = InteractionParams::for_material(&CLAY, 10.0);
        let base: Vec<Particle> = (0..60)
            .map(|i| at(200.0 + (i % 10) as f32 * 4.0, 200.0 + (i / 10) as f32 * 4.0, 5.0))
            .collect();
        let mut exact = base.clone();
        ExhaustiveInteractions.apply(&mut exact, &params);
        let mut grid = base.clone();
        GridInteractions::new(20.0).apply(&mut grid, &params);
        for (e, g) in exact.iter().zip(&grid) {
            assert!((e.velocity * 0.5 - g.velocity).length() < 1e-4);
        }
    }

    #[test]
    fn test_engine_threshold() {
        let engine = InteractionEngine::new(1000, 20.0);
        assert_eq!(engine.select(1000), StrategyKind::Exhaustive);
        assert_eq!(engine.select(1001), StrategyKind::Grid);
    }

    #[test]
    fn test_engine_records_active_strategy() {
        let params = InteractionParams::for_material(&SAND, 10.0);
        let mut engine = InteractionEngine::new(1, 20.0);
        assert_eq!(engine.active(), None);
        let mut ps = vec![at(0.0, 0.0, 3.0), at(5.0, 0.0, 3.0)];
        engine.apply(&mut ps, &params);
        assert_eq!(engine.active(), Some(StrategyKind::Grid));
    }
}
