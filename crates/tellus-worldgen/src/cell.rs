//! The per-point record every stage reads and writes.

use crate::terrain::Terrain;

/// Coarse climate class derived from temperature and moisture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BiomeType {
    Tundra,
    Taiga,
    ColdSteppe,
    Steppe,
    #[default]
    Grassland,
    TemperateForest,
    TemperateRainforest,
    Savanna,
    Desert,
    TropicalRainforest,
}

impl BiomeType {
    pub const ALL: [BiomeType; 10] = [
        BiomeType::Tundra,
        BiomeType::Taiga,
        BiomeType::ColdSteppe,
        BiomeType::Steppe,
        BiomeType::Grassland,
        BiomeType::TemperateForest,
        BiomeType::TemperateRainforest,
        BiomeType::Savanna,
        BiomeType::Desert,
        BiomeType::TropicalRainforest,
    ];

    /// Arid climates, where dunes and dry landforms belong.
    pub fn is_dry(self) -> bool {
        matches!(
            self,
            BiomeType::Tundra | BiomeType::ColdSteppe | BiomeType::Steppe | BiomeType::Desert
        )
    }
}

/// Mutable per-point record.
///
/// All fractional fields are normalized to `[0, 1]`. `value` is height,
/// where [`Levels::water`](crate::Levels::water) marks the sea surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub value: f32,
    /// Continent shape sample; low values are ocean.
    pub continent: f32,
    pub moisture: f32,
    pub temperature: f32,
    pub biome_type: BiomeType,
    /// Identity of the climate cell.
    pub biome: f32,
    /// `0` at a climate cell's center, rising to `1` at its border.
    pub biome_edge: f32,
    /// `1 - biome_edge`.
    pub biome_mask: f32,
    /// Identity of the terrain region.
    pub region: f32,
    /// `0` inside a terrain region, rising to `1` at its border.
    pub region_edge: f32,
    /// Multiplicative product of every river valley this point falls in.
    pub river_mask: f32,
    pub steepness: f32,
    pub tag: Terrain,
}

impl Cell {
    /// Restore the freshly constructed state.
    pub fn reset(&mut self) {
        *self = Cell::default();
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            value: 0.0,
            continent: 0.0,
            moisture: 0.0,
            temperature: 0.0,
            biome_type: BiomeType::default(),
            biome: 0.0,
            biome_edge: 0.0,
            biome_mask: 1.0,
            region: 0.0,
            region_edge: 0.0,
            river_mask: 1.0,
            steepness: 0.0,
            tag: Terrain::NONE,
        }
    }
}
