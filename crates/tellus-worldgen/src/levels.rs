//! Vertical scale of the world in normalized units.

/// Converts between block heights and the `[0, 1]` values noise works in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Levels {
    world_height: f32,
    /// One block in normalized units.
    pub unit: f32,
    /// Normalized height of the water surface.
    pub water: f32,
    /// Normalized height of the first block above water.
    pub ground: f32,
}

impl Levels {
    pub fn new(world_height: u32, sea_level: u32) -> Self {
        let world_height = world_height.max(1) as f32;
        let unit = 1.0 / world_height;
        let sea_level = (sea_level as f32).min(world_height - 1.0);
        Self {
            world_height,
            unit,
            water: sea_level * unit,
            ground: (sea_level + 1.0) * unit,
        }
    }

    /// World height in blocks.
    pub fn world_height(&self) -> f32 {
        self.world_height
    }

    /// `blocks` in normalized units.
    #[inline]
    pub fn scale(&self, blocks: f32) -> f32 {
        blocks * self.unit
    }

    /// The water level offset by `blocks`, clamped to `[0, 1]`.
    #[inline]
    pub fn water(&self, blocks: f32) -> f32 {
        (self.water + self.scale(blocks)).clamp(0.0, 1.0)
    }

    /// The ground level offset by `blocks`, clamped to `[0, 1]`.
    #[inline]
    pub fn ground(&self, blocks: f32) -> f32 {
        (self.ground + self.scale(blocks)).clamp(0.0, 1.0)
    }

    /// Normalized height above water, `0` at or below the surface.
    #[inline]
    pub fn elevation(&self, value: f32) -> f32 {
        if value <= self.water {
            return 0.0;
        }
        ((value - self.water) / (1.0 - self.water)).clamp(0.0, 1.0)
    }

    /// Block height of a normalized value.
    #[inline]
    pub fn to_height(&self, value: f32) -> i32 {
        (value * self.world_height) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_world() {
        let levels = Levels::new(256, 63);
        assert_eq!(levels.unit, 1.0 / 256.0);
        assert_eq!(levels.to_height(levels.water), 63);
        assert_eq!(levels.to_height(levels.ground), 64);
    }

    #[test]
    fn test_offsets_clamp() {
        let levels = Levels::new(256, 63);
        assert_eq!(levels.water(-1000.0), 0.0);
        assert_eq!(levels.ground(1000.0), 1.0);
        assert!((levels.water(5.0) - 68.0 / 256.0).abs() < 1e-6);
    }

    #[test]
    fn test_elevation() {
        let levels = Levels::new(256, 63);
        assert_eq!(levels.elevation(0.0), 0.0);
        assert_eq!(levels.elevation(levels.water), 0.0);
        assert_eq!(levels.elevation(1.0), 1.0);
        let mid = levels.elevation((levels.water + 1.0) / 2.0);
        assert!((mid - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_sea_level_above_world_is_capped() {
        let levels = Levels::new(16, 100);
        assert!(levels.ground <= 1.0);
    }
}
