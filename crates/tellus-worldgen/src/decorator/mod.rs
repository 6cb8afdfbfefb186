//! Climate-driven surface decorators.
//!
//! Decorators run last, after rivers and filters, and nudge heights for a
//! local feature. One that reports it claimed a cell re-tags it. A river tag
//! only gives way to a wetland-kind terrain.

mod dunes;
mod swamp;
mod wetlands;

pub use dunes::DesertDunes;
pub use swamp::SwampPools;
pub use wetlands::Wetlands;

use tellus_config::DecoratorConfig;

use crate::cell::Cell;
use crate::levels::Levels;
use crate::seed::Seed;
use crate::terrain::{Terrain, Terrains};

pub trait Decorator: Send + Sync {
    /// Modify `cell`; `true` if the cell now belongs to this decorator's terrain.
    fn apply(&self, cell: &mut Cell, x: f64, z: f64) -> bool;

    fn terrain(&self) -> Terrain;
}

#[derive(Default)]
pub struct DecoratorChain {
    decorators: Vec<Box<dyn Decorator>>,
}

impl DecoratorChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dunes, swamps and wetlands, each if enabled.
    pub fn from_config(
        seed: &mut Seed,
        levels: Levels,
        config: &DecoratorConfig,
        terrains: &Terrains,
    ) -> Self {
        let mut chain = Self::new();
        if config.dunes.enabled {
            chain.push(DesertDunes::new(seed, levels, &config.dunes, terrains.dunes));
        }
        if config.swamp.enabled {
            chain.push(SwampPools::new(seed, levels, &config.swamp, terrains.swamp));
        }
        if config.wetlands.enabled {
            chain.push(Wetlands::new(levels, &config.wetlands, terrains.wetlands));
        }
        chain
    }

    pub fn push(&mut self, decorator: impl Decorator + 'static) {
        self.decorators.push(Box::new(decorator));
    }

    pub fn len(&self) -> usize {
        self.decorators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decorators.is_empty()
    }

    pub fn apply(&self, cell: &mut Cell, x: f64, z: f64) {
        for decorator in &self.decorators {
            if !decorator.apply(cell, x, z) {
                continue;
            }
            let terrain = decorator.terrain();
            if !cell.tag.is_river() || terrain.overrides_river() {
                cell.tag = terrain;
            }
        }
    }
}
