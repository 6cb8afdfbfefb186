//! The assembled per-world generator.
//!
//! Point sampling runs heightmap, climate and rivers, estimates steepness
//! from neighbouring surface heights and then decorates. Tile generation
//! samples a bordered square the same way, runs the filter chain over it and
//! decorates afterwards, so filters see undecorated terrain.

use std::sync::Arc;

use tellus_pool::{Batcher, Workers};

use crate::cell::Cell;
use crate::climate::Climate;
use crate::context::GeneratorContext;
use crate::decorator::DecoratorChain;
use crate::error::WorldgenError;
use crate::filter::{FilterChain, Steepness, Tile};
use crate::geology::Geology;
use crate::heightmap::Heightmap;
use crate::levels::Levels;
use crate::river::Rivers;
use crate::terrain::Terrains;

pub struct WorldGenerator {
    levels: Levels,
    terrains: Terrains,
    heightmap: Heightmap,
    climate: Climate,
    rivers: Rivers,
    filters: FilterChain,
    decorators: DecoratorChain,
    steepness: Steepness,
    geology: Geology<String>,
    workers: Arc<Workers>,
    tile_size: usize,
    tile_border: usize,
    batch_capacity: usize,
}

impl WorldGenerator {
    /// Build every component from a private copy of `ctx`.
    ///
    /// # Errors
    ///
    /// Fails on settings the heightmap or geology cannot be built from, or a
    /// zero tile size.
    pub fn new(ctx: &GeneratorContext) -> Result<Self, WorldgenError> {
        let GeneratorContext {
            mut seed,
            levels,
            mut terrains,
            settings,
            workers,
        } = ctx.copy();

        if settings.threads.tile_size == 0 {
            return Err(WorldgenError::InvalidSettings(
                "tile_size must be positive".to_string(),
            ));
        }

        let heightmap = Heightmap::new(&mut seed, levels, &settings, &mut terrains)?;
        let climate = Climate::new(&mut seed, levels, &settings.climate);
        let rivers = Rivers::new(&mut seed, levels, &settings.rivers, &terrains);
        let decorators =
            DecoratorChain::from_config(&mut seed, levels, &settings.decorators, &terrains);
        let geology = Geology::from_config(&mut seed, &settings.geology)?;
        let filters = FilterChain::from_config(seed.root(), levels, &settings.filters);
        let steepness = Steepness::new(levels, &settings.filters.steepness);

        tracing::info!(
            terrains = terrains.len(),
            filters = ?filters.names(),
            decorators = decorators.len(),
            "world generator ready"
        );

        Ok(Self {
            levels,
            terrains,
            heightmap,
            climate,
            rivers,
            filters,
            decorators,
            steepness,
            geology,
            workers,
            tile_size: settings.threads.tile_size as usize,
            tile_border: settings.threads.tile_border as usize,
            batch_capacity: settings.threads.batch_capacity.max(1),
        })
    }

    pub fn levels(&self) -> &Levels {
        &self.levels
    }

    /// Every terrain registered for this world, including blended pairs.
    pub fn terrains(&self) -> &Terrains {
        &self.terrains
    }

    pub fn geology(&self) -> &Geology<String> {
        &self.geology
    }

    pub fn climate(&self) -> &Climate {
        &self.climate
    }

    pub fn decorators(&self) -> &DecoratorChain {
        &self.decorators
    }

    pub fn workers(&self) -> &Arc<Workers> {
        &self.workers
    }

    /// Continent and landform height alone, before climate or rivers.
    pub fn base_height(&self, x: f64, z: f64) -> f32 {
        let mut cell = Cell::default();
        self.heightmap.apply(&mut cell, x, z);
        cell.value
    }

    /// Undecorated surface: heightmap, climate and rivers.
    pub fn heightmap(&self, cell: &mut Cell, x: f64, z: f64) {
        cell.reset();
        self.heightmap.apply(cell, x, z);
        self.climate.apply(cell, x, z);
        self.rivers.apply(cell, x, z, &|x, z| self.base_height(x, z));
    }

    fn surface_height(&self, x: f64, z: f64) -> f32 {
        let mut cell = Cell::default();
        self.heightmap(&mut cell, x, z);
        cell.value
    }

    /// Fully sample one point.
    pub fn apply(&self, cell: &mut Cell, x: f64, z: f64) {
        self.heightmap(cell, x, z);
        cell.steepness = self.steepness.estimate(
            self.surface_height(x + 1.0, z),
            self.surface_height(x - 1.0, z),
            self.surface_height(x, z - 1.0),
            self.surface_height(x, z + 1.0),
        );
        self.decorators.apply(cell, x, z);
    }

    /// Generate the tile at tile coordinates `(tx, tz)`.
    pub fn generate_tile(&self, tx: i32, tz: i32) -> Tile {
        let _span = tracing::debug_span!("tile", tx, tz).entered();
        let mut tile = Tile::new(tx, tz, self.tile_size, self.tile_border);
        let stride = tile.stride();

        for iz in 0..stride {
            for ix in 0..stride {
                let (x, z) = tile.world_pos(ix, iz);
                self.heightmap(tile.cell_mut(ix, iz), x as f64, z as f64);
            }
        }

        self.filters.apply(&mut tile);

        for iz in 0..stride {
            for ix in 0..stride {
                let (x, z) = tile.world_pos(ix, iz);
                self.decorators.apply(tile.cell_mut(ix, iz), x as f64, z as f64);
            }
        }
        tile
    }

    /// Generate many tiles on the worker pool, returned in request order.
    ///
    /// Must not be called from one of the pool's own workers.
    ///
    /// # Errors
    ///
    /// Fails if the pool has shut down or any tile panics.
    pub fn generate_tiles(
        self: &Arc<Self>,
        coords: &[(i32, i32)],
    ) -> Result<Vec<Tile>, WorldgenError> {
        let _span = tracing::info_span!("generate_tiles", tiles = coords.len()).entered();
        let pool = self.workers.get();
        let mut tiles: Vec<Option<Tile>> = vec![None; coords.len()];

        for (chunk_index, chunk) in coords.chunks(self.batch_capacity).enumerate() {
            let (done_tx, done_rx) = crossbeam_channel::unbounded();
            let mut batch = Batcher::new(Arc::clone(&pool), chunk.len());

            for (offset, &(tx, tz)) in chunk.iter().enumerate() {
                let index = chunk_index * self.batch_capacity + offset;
                let generator = Arc::clone(self);
                let done_tx = done_tx.clone();
                batch.submit(move || {
                    let tile = generator.generate_tile(tx, tz);
                    let _ = done_tx.send((index, tile));
                })?;
            }
            drop(done_tx);
            batch.close()?;

            for (index, tile) in done_rx.try_iter() {
                tiles[index] = Some(tile);
            }
        }

        tracing::debug!(tiles = tiles.len(), "tiles generated");
        Ok(tiles.into_iter().flatten().collect())
    }
}
