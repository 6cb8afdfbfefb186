//! Vertical material layers for one column.
//!
//! Each layer samples its own depth noise. At a column the samples are
//! normalised against their sum, so the layers always fill exactly the
//! column's height, whatever the individual noise values are.

use tellus_pool::ObjectPool;

use crate::error::WorldgenError;
use crate::noise::Noise;

/// Depth buffers kept for reuse across columns.
const BUFFER_POOL: usize = 32;

/// Sums at or below this are treated as zero.
const MIN_TOTAL_DEPTH: f32 = 1e-6;

/// One material with its relative depth field.
pub struct Stratum<T> {
    material: T,
    depth: Noise,
}

impl<T> Stratum<T> {
    pub fn new(material: T, depth: Noise) -> Self {
        Self { material, depth }
    }

    pub fn material(&self) -> &T {
        &self.material
    }

    /// Relative depth at a column, never negative.
    pub fn depth(&self, x: f64, z: f64) -> f32 {
        self.depth.get(x, z).max(0.0)
    }
}

/// Scratch space for one column's layer heights.
#[derive(Debug, Default)]
pub struct DepthBuffer {
    depths: Vec<f32>,
    heights: Vec<i32>,
}

impl DepthBuffer {
    /// Whole-block heights per layer, summing to `total`.
    pub fn heights(&self) -> &[i32] {
        &self.heights
    }

    fn fill<T>(&mut self, layers: &[Stratum<T>], x: f64, z: f64, total: i32) {
        self.depths.clear();
        self.depths.extend(layers.iter().map(|layer| layer.depth(x, z)));
        self.heights.clear();
        self.heights.resize(layers.len(), 0);

        let total = total.max(0);
        let sum: f32 = self.depths.iter().sum();
        let last = layers.len() - 1;
        if !sum.is_finite() || sum <= MIN_TOTAL_DEPTH {
            self.heights[last] = total;
            return;
        }

        let mut remaining = total;
        for (height, depth) in self.heights[..last].iter_mut().zip(&self.depths) {
            let blocks = libm::roundf(depth / sum * total as f32) as i32;
            *height = blocks.clamp(0, remaining);
            remaining -= *height;
        }
        self.heights[last] = remaining;
    }
}

/// An ordered stack of materials, shallowest first.
pub struct Strata<T> {
    layers: Vec<Stratum<T>>,
    buffers: ObjectPool<DepthBuffer>,
}

impl<T> Strata<T> {
    /// # Errors
    ///
    /// Returns [`WorldgenError::InvalidSettings`] if `layers` is empty.
    pub fn new(layers: Vec<Stratum<T>>) -> Result<Self, WorldgenError> {
        if layers.is_empty() {
            return Err(WorldgenError::InvalidSettings(
                "strata need at least one layer".to_string(),
            ));
        }
        Ok(Self {
            layers,
            buffers: ObjectPool::new(BUFFER_POOL, DepthBuffer::default),
        })
    }

    pub fn layers(&self) -> &[Stratum<T>] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Block heights per layer for a column whose surface is at `y`.
    pub fn heights(&self, x: f64, y: i32, z: f64) -> Vec<i32> {
        let mut buffer = self.buffers.get();
        buffer.fill(&self.layers, x, z, y + 1);
        buffer.heights().to_vec()
    }

    /// Visit blocks from the surface `y` down to `0`, shallowest layer first.
    ///
    /// The visitor returns `false` to stop.
    pub fn downwards(&self, x: f64, y: i32, z: f64, mut visitor: impl FnMut(i32, &T) -> bool) {
        let mut buffer = self.buffers.get();
        buffer.fill(&self.layers, x, z, y + 1);

        let mut cursor = y;
        for (layer, &height) in self.layers.iter().zip(buffer.heights()) {
            for _ in 0..height {
                if cursor < 0 || !visitor(cursor, &layer.material) {
                    return;
                }
                cursor -= 1;
            }
        }
    }

    /// Visit blocks from `0` up to the surface `y`, deepest layer first.
    ///
    /// The visitor returns `false` to stop.
    pub fn upwards(&self, x: f64, y: i32, z: f64, mut visitor: impl FnMut(i32, &T) -> bool) {
        let mut buffer = self.buffers.get();
        buffer.fill(&self.layers, x, z, y + 1);

        let mut cursor = 0;
        for (layer, &height) in self.layers.iter().zip(buffer.heights()).rev() {
            for _ in 0..height {
                if cursor > y || !visitor(cursor, &layer.material) {
                    return;
                }
                cursor += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise;

    fn fixed(depths: &[(&'static str, f32)]) -> Strata<&'static str> {
        Strata::new(
            depths
                .iter()
                .map(|&(name, depth)| Stratum::new(name, noise::constant(depth)))
                .collect(),
        )
        .unwrap()
    }

    fn collect_down(strata: &Strata<&'static str>, y: i32) -> Vec<(i32, &'static str)> {
        let mut out = Vec::new();
        strata.downwards(0.0, y, 0.0, |y, m| {
            out.push((y, *m));
            true
        });
        out
    }

    #[test]
    fn test_empty_strata_rejected() {
        assert!(matches!(
            Strata::<u8>::new(Vec::new()),
            Err(WorldgenError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_heights_sum_to_column() {
        let strata = fixed(&[("soil", 0.1), ("clay", 0.3), ("stone", 0.6)]);
        for y in [0, 1, 7, 63, 200] {
            let heights = strata.heights(0.0, y, 0.0);
            assert_eq!(heights.iter().sum::<i32>(), y + 1, "column {y}");
        }
        assert_eq!(strata.heights(0.0, 99, 0.0), vec![10, 30, 60]);
    }

    #[test]
    fn test_zero_depths_use_deepest_layer() {
        let strata = fixed(&[("soil", 0.0), ("stone", 0.0)]);
        let visited = collect_down(&strata, 4);
        assert_eq!(visited.len(), 5);
        assert!(visited.iter().all(|&(_, m)| m == "stone"));
    }

    #[test]
    fn test_downwards_walks_surface_to_bottom() {
        let strata = fixed(&[("soil", 0.2), ("stone", 0.8)]);
        let visited = collect_down(&strata, 9);
        let ys: Vec<i32> = visited.iter().map(|&(y, _)| y).collect();
        assert_eq!(ys, (0..=9).rev().collect::<Vec<_>>());
        assert_eq!(visited[0].1, "soil");
        assert_eq!(visited[1].1, "soil");
        assert_eq!(visited[2].1, "stone");
        assert_eq!(visited[9].1, "stone");
    }

    #[test]
    fn test_upwards_mirrors_downwards() {
        let strata = fixed(&[("soil", 0.2), ("stone", 0.8)]);
        let mut down = collect_down(&strata, 9);
        let mut up = Vec::new();
        strata.upwards(0.0, 9, 0.0, |y, m| {
            up.push((y, *m));
            true
        });
        down.reverse();
        assert_eq!(up, down);
    }

    #[test]
    fn test_visitor_can_stop_early() {
        let strata = fixed(&[("soil", 0.5), ("stone", 0.5)]);
        let mut count = 0;
        strata.downwards(0.0, 50, 0.0, |_, _| {
            count += 1;
            count < 3
        });
        assert_eq!(count, 3);
    }

    #[test]
    fn test_negative_surface_visits_nothing() {
        let strata = fixed(&[("stone", 1.0)]);
        assert!(collect_down(&strata, -5).is_empty());
    }

    #[test]
    fn test_buffers_are_recycled() {
        let strata = fixed(&[("soil", 0.5), ("stone", 0.5)]);
        collect_down(&strata, 10);
        collect_down(&strata, 10);
        assert_eq!(strata.buffers.retained(), 1);
    }
}
