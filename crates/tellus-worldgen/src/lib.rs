//! Deterministic terrain field synthesis.
//!
//! A [`WorldGenerator`] turns a world seed and a [`Config`](tellus_config::Config)
//! into a function from plane coordinates to [`Cell`] samples: elevation,
//! climate, biome, terrain tag, steepness and river proximity. The same seed
//! and settings always produce the same samples, on any thread and in any
//! order.
//!
//! Tiles of cells can be generated in parallel over the context's worker pool
//! with [`WorldGenerator::generate_tiles`].

pub mod cell;
pub mod climate;
pub mod context;
pub mod decorator;
pub mod error;
pub mod filter;
pub mod generator;
pub mod geology;
pub mod heightmap;
pub mod levels;
pub mod noise;
pub mod populator;
pub mod region;
pub mod river;
pub mod seed;
pub mod strata;
pub mod terrain;

pub use cell::{BiomeType, Cell};
pub use context::GeneratorContext;
pub use error::WorldgenError;
pub use filter::Tile;
pub use generator::WorldGenerator;
pub use geology::Geology;
pub use levels::Levels;
pub use seed::Seed;
pub use strata::{Strata, Stratum};
pub use terrain::{Terrain, TerrainKind, Terrains};
