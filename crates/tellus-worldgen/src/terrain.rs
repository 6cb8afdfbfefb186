//! Terrain identity tokens and their registry.
//!
//! A [`Terrain`] is a small `Copy` token carried on every [`Cell`](crate::Cell).
//! Names live in the [`Terrains`] registry. Blended landforms get composite
//! tokens whose id is derived from the product of their parents' ids; parents
//! are given distinct prime ids so no two pairs can produce the same composite.

use hashbrown::HashMap;

use crate::error::WorldgenError;

/// First id available to composite terrains is `ID_START + 1 + a * b`.
pub const ID_START: i32 = 10;

/// Distinct primes handed to landforms in registration order.
const LANDFORM_IDS: [i32; 24] = [
    13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97, 101, 103, 107,
    109,
];

/// Broad behaviour class of a terrain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TerrainKind {
    #[default]
    Land,
    Water,
    River,
    /// Wetland terrains keep their tag when a river passes through.
    Wetland,
}

/// Terrain identity token.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Terrain {
    id: i32,
    weight: f32,
    kind: TerrainKind,
}

impl Terrain {
    /// Untagged placeholder.
    pub const NONE: Terrain = Terrain::new(0, 1.0, TerrainKind::Land);

    pub const fn new(id: i32, weight: f32, kind: TerrainKind) -> Self {
        Self { id, weight, kind }
    }

    pub fn id(self) -> i32 {
        self.id
    }

    /// Relative selection weight of this terrain in a region selector.
    pub fn weight(self) -> f32 {
        self.weight
    }

    pub fn kind(self) -> TerrainKind {
        self.kind
    }

    pub fn is_water(self) -> bool {
        self.kind == TerrainKind::Water
    }

    pub fn is_river(self) -> bool {
        self.kind == TerrainKind::River
    }

    /// Whether this tag survives a river carving through it.
    pub fn overrides_river(self) -> bool {
        self.kind == TerrainKind::Wetland
    }

    /// Token for the blend of `a` and `b`. Symmetric in its arguments.
    pub fn combine(a: Terrain, b: Terrain) -> Terrain {
        Terrain {
            id: ID_START + 1 + a.id * b.id,
            weight: a.weight.min(b.weight),
            kind: TerrainKind::Land,
        }
    }
}

impl Default for Terrain {
    fn default() -> Self {
        Terrain::NONE
    }
}

/// Registry of every terrain a generator can emit.
///
/// The fixed water, coast and decoration terrains are created up front.
/// Landforms and their blends are added while the generator is built.
#[derive(Clone, Debug)]
pub struct Terrains {
    names: HashMap<i32, String>,
    by_name: HashMap<String, Terrain>,
    landforms: usize,
    pub deep_ocean: Terrain,
    pub ocean: Terrain,
    pub coast: Terrain,
    pub beach: Terrain,
    pub river: Terrain,
    pub riverbank: Terrain,
    pub wetlands: Terrain,
    pub swamp: Terrain,
    pub dunes: Terrain,
}

impl Terrains {
    pub fn new() -> Self {
        let mut terrains = Self {
            names: HashMap::new(),
            by_name: HashMap::new(),
            landforms: 0,
            deep_ocean: Terrain::new(1, 1.0, TerrainKind::Water),
            ocean: Terrain::new(2, 1.0, TerrainKind::Water),
            coast: Terrain::new(3, 1.0, TerrainKind::Land),
            beach: Terrain::new(4, 1.0, TerrainKind::Land),
            river: Terrain::new(5, 1.0, TerrainKind::River),
            riverbank: Terrain::new(6, 1.0, TerrainKind::River),
            wetlands: Terrain::new(7, 1.0, TerrainKind::Wetland),
            swamp: Terrain::new(8, 1.0, TerrainKind::Wetland),
            dunes: Terrain::new(9, 1.0, TerrainKind::Land),
        };
        for (terrain, name) in [
            (Terrain::NONE, "none"),
            (terrains.deep_ocean, "deep_ocean"),
            (terrains.ocean, "ocean"),
            (terrains.coast, "coast"),
            (terrains.beach, "beach"),
            (terrains.river, "river"),
            (terrains.riverbank, "riverbank"),
            (terrains.wetlands, "wetlands"),
            (terrains.swamp, "swamp"),
            (terrains.dunes, "dunes"),
        ] {
            terrains.insert(terrain, name.to_string());
        }
        terrains
    }

    /// Register a landform terrain under a fresh prime id.
    ///
    /// # Errors
    ///
    /// [`WorldgenError::DuplicateTerrain`] if the name is taken, or
    /// [`WorldgenError::InvalidSettings`] once the id table is exhausted.
    pub fn register_landform(&mut self, name: &str, weight: f32) -> Result<Terrain, WorldgenError> {
        if self.by_name.contains_key(name) {
            return Err(WorldgenError::DuplicateTerrain(name.to_string()));
        }
        let id = LANDFORM_IDS.get(self.landforms).copied().ok_or_else(|| {
            WorldgenError::InvalidSettings(format!(
                "at most {} landforms can be registered",
                LANDFORM_IDS.len()
            ))
        })?;
        self.landforms += 1;
        let terrain = Terrain::new(id, weight, TerrainKind::Land);
        self.insert(terrain, name.to_string());
        Ok(terrain)
    }

    /// Register (or look up) the composite of two terrains.
    ///
    /// `combine(a, b)` and `combine(b, a)` return the same token; the name
    /// recorded is whichever order was registered first.
    pub fn combine(&mut self, a: Terrain, b: Terrain) -> Terrain {
        let terrain = Terrain::combine(a, b);
        if !self.names.contains_key(&terrain.id) {
            let name = format!("{}-{}", self.name(a), self.name(b));
            self.insert(terrain, name);
        }
        terrain
    }

    /// Name of a registered terrain, or `"unknown"`.
    pub fn name(&self, terrain: Terrain) -> &str {
        self.names
            .get(&terrain.id)
            .map(String::as_str)
            .unwrap_or("unknown")
    }

    /// Look a terrain up by name.
    pub fn get(&self, name: &str) -> Option<Terrain> {
        self.by_name.get(name).copied()
    }

    /// Number of registered terrains, including [`Terrain::NONE`].
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn insert(&mut self, terrain: Terrain, name: String) {
        self.by_name.insert(name.clone(), terrain);
        self.names.insert(terrain.id, name);
    }
}

impl Default for Terrains {
    fn default() -> Self {
        Self::new()
    }
}
