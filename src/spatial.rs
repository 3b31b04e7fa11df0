//! Uniform-grid spatial index for neighbor queries.
//!
//! Particles are bucketed by cell `(floor(x / cell_size), floor(y / cell_size))`
//! with a counting sort: one pass counts particles per cell, a prefix sum
//! turns counts into `cell_start` offsets, and a second pass scatters
//! particle indices into `sorted`. Particles of cell `c` are then
//! `sorted[cell_start[c]..cell_start[c + 1]]`.
//!
//! The grid covers the bounding box of the particles at rebuild time, so
//! positions outside the canvas still index correctly.

use glam::{IVec2, Vec2};

use crate::particle::Particle;

/// Grid of particle indices, rebuilt every tick.
#[derive(Debug, Clone, Default)]
pub struct SpatialIndex {
    cell_size: f32,
    /// Cell coordinate of the grid's first column/row.
    origin: IVec2,
    /// Number of columns and rows.
    dims: IVec2,
    /// Offset into `sorted` for each cell, plus one trailing entry.
    cell_start: Vec<u32>,
    /// Particle indices ordered by cell.
    sorted: Vec<u32>,
    /// Cell of each particle, by particle index.
    particle_cell: Vec<u32>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index over `particles` in one call.
    pub fn build(particles: &[Particle], cell_size: f32) -> Self {
        let mut index = Self::new();
        index.rebuild(particles, cell_size);
        index
    }

    /// Grid cell containing `position`.
    #[inline]
    pub fn cell_of(position: Vec2, cell_size: f32) -> IVec2 {
        (position / cell_size).floor().as_ivec2()
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn len(&self) -> usize {
        self.particle_cell.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particle_cell.is_empty()
    }

    /// Re-bucket every particle. Reuses the existing allocations.
    pub fn rebuild(&mut self, particles: &[Particle], cell_size: f32) {
        self.cell_size = cell_size;
        self.sorted.clear();
        self.particle_cell.clear();
        self.cell_start.clear();

        if particles.is_empty() {
            self.origin = IVec2::ZERO;
            self.dims = IVec2::ZERO;
            return;
        }

        let mut min = IVec2::MAX;
        let mut max = IVec2::MIN;
        for p in particles {
            let c = Self::cell_of(p.position, cell_size);
            min = min.min(c);
            max = max.max(c);
        }
        self.origin = min;
        self.dims = max - min + IVec2::ONE;
        let cells = (self.dims.x * self.dims.y) as usize;

        // Count
        self.cell_start.resize(cells + 1, 0);
        for p in particles {
            let cell = self.flat(Self::cell_of(p.position, cell_size));
            self.particle_cell.push(cell);
            self.cell_start[cell as usize + 1] += 1;
        }

        // Prefix sum
        for c in 0..cells {
            self.cell_start[c + 1] += self.cell_start[c];
        }

        // Scatter
        let mut cursor = self.cell_start.clone();
        self.sorted.resize(particles.len(), 0);
        for (i, &cell) in self.particle_cell.iter().enumerate() {
            let slot = &mut cursor[cell as usize];
            self.sorted[*slot as usize] = i as u32;
            *slot += 1;
        }
    }

    /// Particles in the same cell as particle `index` and the 8 cells around
    /// it. Includes `index` itself.
    pub fn neighbors_of(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        let cell = self.particle_cell.get(index).map(|&flat| self.unflat(flat));
        self.around(cell)
    }

    /// Particles in the 3×3 block of cells around `position`.
    ///
    /// Covers every particle within `cell_size` of `position`.
    pub fn near(&self, position: Vec2) -> impl Iterator<Item = usize> + '_ {
        let cell = (!self.is_empty()).then(|| Self::cell_of(position, self.cell_size));
        self.around(cell)
    }

    fn around(&self, center: Option<IVec2>) -> impl Iterator<Item = usize> + '_ {
        center
            .into_iter()
            .flat_map(|c| {
                (-1..=1).flat_map(move |dy| {
                    (-1..=1).map(move |dx| c.saturating_add(IVec2::new(dx, dy)))
                })
            })
            .filter_map(move |c| self.local(c))
            .flat_map(move |cell| {
                let start = self.cell_start[cell] as usize;
                let end = self.cell_start[cell + 1] as usize;
                self.sorted[start..end].iter().map(|&i| i as usize)
            })
    }

    #[inline]
    fn flat(&self, cell: IVec2) -> u32 {
        let local = cell - self.origin;
        (local.y * self.dims.x + local.x) as u32
    }

    #[inline]
    fn unflat(&self, flat: u32) -> IVec2 {
        let flat = flat as i32;
        self.origin + IVec2::new(flat % self.dims.x, flat / self.dims.x)
    }

    /// Flat index of `cell`, or `None` if it lies outside the grid.
    #[inline]
    fn local(&self, cell: IVec2) -> Option<usize> {
        let local = cell.saturating_sub(self.origin);
        if local.x < 0 || local.y < 0 || local.x >= self.dims.x || local.y >= self.dims.y {
            return None;
        }
        Some((local.y * self.dims.x + local.x) as usize)
    }
}
