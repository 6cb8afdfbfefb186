use tellus_config::ChannelConfig;

use super::Line;
use crate::cell::Cell;
use crate::levels::Levels;
use crate::noise::lerp;
use crate::terrain::Terrain;

/// Channel profile resolved into world units.
///
/// Widths are full widths in blocks. Heights are normalized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RiverShape {
    pub bed_width: f64,
    pub bank_width: f64,
    pub valley_width: f64,
    pub water: f32,
    pub bed_depth: f32,
    pub min_bank: f32,
    pub max_bank: f32,
    pub fade_in: f64,
    pub fade_out: f64,
}

impl RiverShape {
    pub fn new(levels: &Levels, config: &ChannelConfig) -> Self {
        let bed_width = config.bed_width.max(0.0) as f64;
        let bank_width = (config.bank_width as f64).max(bed_width);
        let valley_width = (config.valley_width as f64).max(bank_width);
        Self {
            bed_width,
            bank_width,
            valley_width,
            water: levels.water,
            bed_depth: levels.scale(config.bed_depth.max(0.0)),
            min_bank: levels.water(config.min_bank_height),
            max_bank: levels.water(config.max_bank_height.max(config.min_bank_height)),
            fade_in: config.fade_in.max(0.0) as f64,
            fade_out: config.fade_out.max(0.0) as f64,
        }
    }

    /// Width multiplier along the river at parameter `t` in `[0, 1]`.
    #[inline]
    pub fn fade(&self, t: f64) -> f64 {
        let mut fade: f64 = 1.0;
        if self.fade_in > 0.0 {
            fade = fade.min(t / self.fade_in);
        }
        if self.fade_out > 0.0 {
            fade = fade.min((1.0 - t) / self.fade_out);
        }
        fade.clamp(0.0, 1.0)
    }
}

/// Tags a river writes on the cells it carves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RiverTags {
    pub river: Terrain,
    pub riverbank: Terrain,
}

/// One straight river segment with nested valley, bank and bed profiles.
#[derive(Clone, Debug, PartialEq)]
pub struct River {
    line: Line,
    shape: RiverShape,
    connecting: bool,
}

impl River {
    /// `connecting` rivers end where they join their parent and must not
    /// carve past that point.
    pub fn new(line: Line, shape: RiverShape, connecting: bool) -> Self {
        Self {
            line,
            shape,
            connecting,
        }
    }

    pub fn line(&self) -> &Line {
        &self.line
    }

    pub fn shape(&self) -> &RiverShape {
        &self.shape
    }

    pub fn is_connecting(&self) -> bool {
        self.connecting
    }

    /// Carve this river into `cell`.
    ///
    /// `river_mask` is multiplied by the valley falloff. Heights are only
    /// ever lowered: toward a bank height across the valley, toward the bed
    /// height across the banks, and clamped to the bed within the bed itself.
    /// `variance` in `[0, 1]` scales bank height.
    pub fn apply(&self, cell: &mut Cell, x: f64, z: f64, variance: f32, tags: &RiverTags) {
        let shape = &self.shape;
        if !self.line.near(x, z, shape.valley_width * 0.5) {
            return;
        }

        let t = self.line.project(x, z);
        let tc = t.clamp(0.0, 1.0);
        let d2 = self.line.distance_sq_at(x, z, tc);
        let fade = shape.fade(tc);

        let valley = falloff(d2, shape.valley_width * 0.5 * fade);
        if valley <= 0.0 {
            return;
        }
        cell.river_mask *= 1.0 - valley;

        if self.connecting && t > 1.0 {
            return;
        }

        let elevation = if cell.value > shape.water {
            ((cell.value - shape.water) / (1.0 - shape.water)).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let bank_height = lerp(shape.min_bank, shape.max_bank, elevation * variance);
        if cell.value > bank_height {
            cell.value = lerp(cell.value, bank_height, valley);
        }

        let banks = falloff(d2, shape.bank_width * 0.5 * fade);
        if banks <= 0.0 {
            return;
        }
        let bed_height = (shape.water - shape.bed_depth * fade as f32).max(0.0);
        if cell.value > bed_height {
            cell.value = lerp(cell.value, bed_height, banks);
        }
        if !cell.tag.overrides_river() {
            cell.tag = tags.riverbank;
        }

        let bed = falloff(d2, shape.bed_width * 0.5 * fade);
        if bed <= 0.0 {
            return;
        }
        cell.value = cell.value.min(bed_height);
        if !cell.tag.overrides_river() {
            cell.tag = tags.river;
        }
    }
}

/// `1` on the line falling to `0` at `radius`.
#[inline]
fn falloff(d2: f64, radius: f64) -> f32 {
    if radius <= 0.0 {
        return 0.0;
    }
    let r2 = radius * radius;
    if d2 >= r2 {
        return 0.0;
    }
    (1.0 - d2 / r2) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::Terrains;

    fn setup() -> (Levels, RiverShape, RiverTags, Terrains) {
        let levels = Levels::new(256, 63);
        let shape = RiverShape::new(
            &levels,
            &ChannelConfig {
                fade_in: 0.0,
                fade_out: 0.0,
                ..ChannelConfig::default()
            },
        );
        let terrains = Terrains::new();
        let tags = RiverTags {
            river: terrains.river,
            riverbank: terrains.riverbank,
        };
        (levels, shape, tags, terrains)
    }

    fn land(levels: &Levels) -> Cell {
        Cell {
            value: levels.water(20.0),
            ..Cell::default()
        }
    }

    #[test]
    fn test_carving_never_raises() {
        let (levels, shape, tags, _) = setup();
        let river = River::new(Line::new(0.0, 0.0, 200.0, 0.0), shape, false);
        for z in -60..=60 {
            for h in [-10.0, 0.0, 2.0, 30.0, 100.0] {
                let mut cell = Cell {
                    value: levels.water(h),
                    ..Cell::default()
                };
                let before = cell.value;
                river.apply(&mut cell, 100.0, z as f64, 1.0, &tags);
                assert!(cell.value <= before, "raised at z={z} h={h}");
            }
        }
    }

    #[test]
    fn test_profile_across_channel() {
        let (levels, shape, tags, terrains) = setup();
        let river = River::new(Line::new(0.0, 0.0, 200.0, 0.0), shape, false);

        let mut center = land(&levels);
        river.apply(&mut center, 100.0, 0.0, 0.5, &tags);
        assert_eq!(center.tag, terrains.river);
        assert!(center.value <= levels.water - levels.scale(4.0) + 1e-6);
        assert_eq!(center.river_mask, 0.0);

        let mut bank = land(&levels);
        river.apply(&mut bank, 100.0, 4.0, 0.5, &tags);
        assert_eq!(bank.tag, terrains.riverbank);

        let mut valley = land(&levels);
        river.apply(&mut valley, 100.0, 30.0, 0.5, &tags);
        assert_eq!(valley.tag, Terrain::NONE);
        assert!(valley.value < levels.water(20.0));
        assert!(valley.river_mask > 0.0 && valley.river_mask < 1.0);

        let mut outside = land(&levels);
        river.apply(&mut outside, 100.0, 50.0, 0.5, &tags);
        assert_eq!(outside, land(&levels));
    }

    #[test]
    fn test_bed_stays_above_zero_with_shallow_sea() {
        let levels = Levels::new(256, 2);
        let shape = RiverShape::new(
            &levels,
            &ChannelConfig {
                fade_in: 0.0,
                fade_out: 0.0,
                ..ChannelConfig::default()
            },
        );
        assert!(shape.bed_depth > shape.water);
        let terrains = Terrains::new();
        let tags = RiverTags {
            river: terrains.river,
            riverbank: terrains.riverbank,
        };
        let river = River::new(Line::new(0.0, 0.0, 200.0, 0.0), shape, false);
        for z in -6..=6 {
            let mut cell = land(&levels);
            river.apply(&mut cell, 100.0, z as f64, 1.0, &tags);
            assert!(
                (0.0..=1.0).contains(&cell.value),
                "value {} out of range at z={z}",
                cell.value
            );
        }
        let mut center = land(&levels);
        river.apply(&mut center, 100.0, 0.0, 1.0, &tags);
        assert_eq!(center.value, 0.0);
    }

    #[test]
    fn test_overriding_tag_survives() {
        let (levels, shape, tags, terrains) = setup();
        let river = River::new(Line::new(0.0, 0.0, 200.0, 0.0), shape, false);
        let mut cell = Cell {
            tag: terrains.swamp,
            ..land(&levels)
        };
        river.apply(&mut cell, 100.0, 0.0, 0.5, &tags);
        assert_eq!(cell.tag, terrains.swamp);
        assert!(cell.value < levels.water);
    }

    #[test]
    fn test_connecting_river_stops_at_junction() {
        let (levels, shape, tags, _) = setup();
        let river = River::new(Line::new(0.0, 0.0, 100.0, 0.0), shape, true);
        let mut past = land(&levels);
        river.apply(&mut past, 110.0, 0.0, 0.5, &tags);
        assert_eq!(past.value, levels.water(20.0), "carved past the junction");
        assert!(past.river_mask < 1.0, "mask still reaches past the junction");
    }

    #[test]
    fn test_fade_in_narrows_source() {
        let (levels, _, tags, _) = setup();
        let shape = RiverShape::new(&levels, &ChannelConfig::default());
        assert_eq!(shape.fade(0.0), 0.0);
        assert_eq!(shape.fade(1.0), 1.0);
        let river = River::new(Line::new(0.0, 0.0, 200.0, 0.0), shape, false);
        let mut source = land(&levels);
        river.apply(&mut source, 0.0, 0.0, 0.5, &tags);
        assert_eq!(source, land(&levels), "zero width at the source");
    }

    #[test]
    fn test_masks_multiply() {
        let (levels, shape, tags, _) = setup();
        let a = River::new(Line::new(0.0, 0.0, 200.0, 0.0), shape, false);
        let b = River::new(Line::new(100.0, -100.0, 100.0, 100.0), shape, false);
        let (x, z) = (110.0, 10.0);

        let mut only_a = land(&levels);
        a.apply(&mut only_a, x, z, 0.5, &tags);
        let mut only_b = land(&levels);
        b.apply(&mut only_b, x, z, 0.5, &tags);
        let mut both = land(&levels);
        a.apply(&mut both, x, z, 0.5, &tags);
        b.apply(&mut both, x, z, 0.5, &tags);

        assert!((both.river_mask - only_a.river_mask * only_b.river_mask).abs() < 1e-6);
    }
}
