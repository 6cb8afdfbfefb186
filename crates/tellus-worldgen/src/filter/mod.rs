//! Neighbourhood filters over tiles of cells.
//!
//! Filters need more than one point at a time, so they run on a [`Tile`]: a
//! square of cells plus a border wide enough that the interior is unaffected
//! by the tile edge. Each filter is reseeded per tile from the world seed and
//! tile coordinates, so a tile's result never depends on which thread built it.

mod erosion;
mod smoothing;
mod steepness;

pub use erosion::Erosion;
pub use smoothing::Smoothing;
pub use steepness::Steepness;

use tellus_config::FilterConfig;

use crate::cell::Cell;
use crate::levels::Levels;
use crate::seed;

/// A square of cells with a border.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    x: i32,
    z: i32,
    size: usize,
    border: usize,
    cells: Vec<Cell>,
}

impl Tile {
    /// An unfilled tile at tile coordinates `(x, z)`.
    pub fn new(x: i32, z: i32, size: usize, border: usize) -> Self {
        let stride = size + 2 * border;
        Self {
            x,
            z,
            size,
            border,
            cells: vec![Cell::default(); stride * stride],
        }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn z(&self) -> i32 {
        self.z
    }

    /// Interior side length.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn border(&self) -> usize {
        self.border
    }

    /// Buffer side length, border included.
    pub fn stride(&self) -> usize {
        self.size + 2 * self.border
    }

    /// World position of buffer cell `(ix, iz)`.
    pub fn world_pos(&self, ix: usize, iz: usize) -> (i64, i64) {
        let size = self.size as i64;
        let border = self.border as i64;
        (
            self.x as i64 * size - border + ix as i64,
            self.z as i64 * size - border + iz as i64,
        )
    }

    #[inline]
    pub fn index(&self, ix: usize, iz: usize) -> usize {
        iz * self.stride() + ix
    }

    /// Buffer cell, border included.
    #[inline]
    pub fn cell(&self, ix: usize, iz: usize) -> &Cell {
        &self.cells[self.index(ix, iz)]
    }

    #[inline]
    pub fn cell_mut(&mut self, ix: usize, iz: usize) -> &mut Cell {
        let index = self.index(ix, iz);
        &mut self.cells[index]
    }

    /// Buffer cell with coordinates clamped into the buffer.
    #[inline]
    pub fn cell_clamped(&self, ix: isize, iz: isize) -> &Cell {
        let last = self.stride() as isize - 1;
        self.cell(ix.clamp(0, last) as usize, iz.clamp(0, last) as usize)
    }

    /// Interior cell at `(dx, dz)`, `0 <= d < size`.
    #[inline]
    pub fn get(&self, dx: usize, dz: usize) -> &Cell {
        self.cell(dx + self.border, dz + self.border)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Interior cells in row-major order.
    pub fn interior(&self) -> impl Iterator<Item = &Cell> + '_ {
        (0..self.size).flat_map(move |dz| (0..self.size).map(move |dx| self.get(dx, dz)))
    }
}

/// A pass that reads and rewrites a whole tile.
pub trait Filter: Send + Sync {
    fn name(&self) -> &'static str;

    /// `seed` is derived from the world seed, the tile coordinates and the
    /// filter's position in the chain.
    fn apply(&self, tile: &mut Tile, seed: u64);
}

/// Ordered filters applied to every tile.
pub struct FilterChain {
    world_seed: i64,
    filters: Vec<Box<dyn Filter>>,
}

impl FilterChain {
    pub fn new(world_seed: i64) -> Self {
        Self {
            world_seed,
            filters: Vec::new(),
        }
    }

    /// Erosion, then smoothing (each if enabled), then steepness.
    pub fn from_config(world_seed: i64, levels: Levels, config: &FilterConfig) -> Self {
        let mut chain = Self::new(world_seed);
        if config.erosion.enabled {
            chain.push(Erosion::new(levels, &config.erosion));
        }
        if config.smoothing.enabled {
            chain.push(Smoothing::new(&config.smoothing));
        }
        chain.push(Steepness::new(levels, &config.steepness));
        chain
    }

    pub fn push(&mut self, filter: impl Filter + 'static) {
        self.filters.push(Box::new(filter));
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    pub fn apply(&self, tile: &mut Tile) {
        for (i, filter) in self.filters.iter().enumerate() {
            let seed = seed::region_seed(self.world_seed.wrapping_add(i as i64), tile.x, tile.z);
            let _span = tracing::trace_span!("filter", name = filter.name()).entered();
            filter.apply(tile, seed);
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// A tile whose heights come from `f(world_x, world_z)`.
    pub fn tile_from(size: usize, border: usize, f: impl Fn(i64, i64) -> f32) -> Tile {
        let mut tile = Tile::new(0, 0, size, border);
        let stride = tile.stride();
        for iz in 0..stride {
            for ix in 0..stride {
                let (x, z) = tile.world_pos(ix, iz);
                tile.cell_mut(ix, iz).value = f(x, z);
            }
        }
        tile
    }
}
