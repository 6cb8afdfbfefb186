use std::sync::Arc;

use super::{Populator, Weighted};
use crate::cell::Cell;
use crate::error::WorldgenError;

/// Chooses one populator per region from the cell's region identity.
///
/// Each populator occupies `round(weight / min_weight)` slots, so a terrain
/// with twice the weight of the lightest one covers twice as many regions.
pub struct RegionSelector<P> {
    slots: Vec<Arc<P>>,
    distinct: usize,
}

impl<P: Populator + Weighted> RegionSelector<P> {
    /// # Errors
    ///
    /// [`WorldgenError::EmptyPopulators`] for an empty list and
    /// [`WorldgenError::InvalidWeight`] for a non-finite or non-positive weight.
    pub fn new(populators: Vec<P>) -> Result<Self, WorldgenError> {
        if populators.is_empty() {
            return Err(WorldgenError::EmptyPopulators);
        }
        for (index, populator) in populators.iter().enumerate() {
            let weight = populator.weight();
            if !weight.is_finite() || weight <= 0.0 {
                return Err(WorldgenError::InvalidWeight { index, weight });
            }
        }

        let min = populators
            .iter()
            .map(Weighted::weight)
            .fold(f32::INFINITY, f32::min);
        let distinct = populators.len();
        let mut slots = Vec::new();
        for populator in populators {
            let count = (populator.weight() / min).round().max(1.0) as usize;
            let populator = Arc::new(populator);
            slots.extend(std::iter::repeat_n(populator, count));
        }

        tracing::debug!(populators = distinct, slots = slots.len(), "region selector built");
        Ok(Self { slots, distinct })
    }

    /// Number of weighted slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of distinct populators.
    pub fn populators(&self) -> usize {
        self.distinct
    }

    /// Slot for a region identity in `[0, 1]`.
    #[inline]
    pub fn index(&self, identity: f32) -> usize {
        let last = self.slots.len() - 1;
        ((identity.clamp(0.0, 1.0) * self.slots.len() as f32) as usize).min(last)
    }

    #[inline]
    pub fn get(&self, identity: f32) -> &P {
        &self.slots[self.index(identity)]
    }
}

impl<P: Populator + Weighted> Populator for RegionSelector<P> {
    fn apply(&self, cell: &mut Cell, x: f64, z: f64) {
        self.get(cell.region).apply(cell, x, z);
    }

    fn tag(&self, cell: &mut Cell, x: f64, z: f64) {
        self.get(cell.region).tag(cell, x, z);
    }
}
