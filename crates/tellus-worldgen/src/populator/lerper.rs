use super::Populator;
use crate::cell::Cell;
use crate::noise::lerp;

/// Blends two populators across a region border using `cell.region_edge`.
///
/// Interior points (`edge == 0`) run only `lower`; boundary points
/// (`edge == 1`) run only `upper`. Anything in between evaluates both.
pub struct RegionLerper<L, U> {
    lower: L,
    upper: U,
}

impl<L: Populator, U: Populator> RegionLerper<L, U> {
    pub fn new(lower: L, upper: U) -> Self {
        Self { lower, upper }
    }

    pub fn lower(&self) -> &L {
        &self.lower
    }
}

impl<L: Populator, U: Populator> Populator for RegionLerper<L, U> {
    fn apply(&self, cell: &mut Cell, x: f64, z: f64) {
        let alpha = cell.region_edge;
        if alpha <= 0.0 {
            self.lower.apply(cell, x, z);
            return;
        }
        if alpha >= 1.0 {
            self.upper.apply(cell, x, z);
            return;
        }

        self.lower.apply(cell, x, z);
        let lower = cell.value;
        self.upper.apply(cell, x, z);
        let upper = cell.value;
        cell.value = lerp(lower, upper, alpha);
    }

    fn tag(&self, cell: &mut Cell, x: f64, z: f64) {
        if cell.region_edge > 0.0 {
            self.upper.tag(cell, x, z);
        } else {
            self.lower.tag(cell, x, z);
        }
    }
}
