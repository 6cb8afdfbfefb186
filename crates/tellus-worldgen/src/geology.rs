//! Per-column strata selection.
//!
//! The plane is split into cellular regions and each region picks one of a
//! fixed set of [`Strata`] variants by its cell identity.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tellus_config::GeologyConfig;

use crate::error::WorldgenError;
use crate::noise::{self, Noise};
use crate::seed::{self, Seed};
use crate::strata::{Strata, Stratum};

const SELECTOR_JITTER: f32 = 0.8;

/// Chance that an optional layer appears in a generated variant.
const LAYER_CHANCE: f64 = 0.75;

pub struct Geology<T> {
    selector: Noise,
    variants: Vec<Strata<T>>,
}

impl<T> Geology<T> {
    /// `selector` yields values in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldgenError::InvalidSettings`] if `variants` is empty.
    pub fn new(selector: Noise, variants: Vec<Strata<T>>) -> Result<Self, WorldgenError> {
        if variants.is_empty() {
            return Err(WorldgenError::InvalidSettings(
                "geology needs at least one strata variant".to_string(),
            ));
        }
        Ok(Self { selector, variants })
    }

    pub fn variants(&self) -> &[Strata<T>] {
        &self.variants
    }

    /// Index of the variant used at a column.
    pub fn variant_at(&self, x: f64, z: f64) -> usize {
        let value = self.selector.get(x, z).clamp(0.0, 1.0);
        ((value * self.variants.len() as f32) as usize).min(self.variants.len() - 1)
    }

    pub fn strata_at(&self, x: f64, z: f64) -> &Strata<T> {
        &self.variants[self.variant_at(x, z)]
    }
}

impl Geology<String> {
    /// Build named-material variants from settings.
    ///
    /// Every variant keeps the configured layer order. The deepest layer is
    /// always present; shallower ones are dropped at random per variant.
    pub fn from_config(seed: &mut Seed, config: &GeologyConfig) -> Result<Self, WorldgenError> {
        if config.layers.is_empty() {
            return Err(WorldgenError::InvalidSettings(
                "geology needs at least one layer".to_string(),
            ));
        }

        let last = config.layers.len() - 1;
        let mut variants = Vec::with_capacity(config.variants.max(1) as usize);
        for _ in 0..config.variants.max(1) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed::mix64(seed.next() as u64));
            let mut layers = Vec::new();
            for (index, layer) in config.layers.iter().enumerate() {
                if index != last && !rng.random_bool(LAYER_CHANCE) {
                    continue;
                }
                let depth = noise::perlin(seed.next(), layer.scale as f64, 2)
                    .map(layer.min_depth, layer.max_depth);
                layers.push(Stratum::new(layer.material.clone(), depth));
            }
            variants.push(Strata::new(layers)?);
        }

        let selector = noise::cell_value(seed.next(), config.region_size as f64, SELECTOR_JITTER);
        tracing::debug!(variants = variants.len(), "geology built");
        Self::new(selector, variants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geology() -> Geology<String> {
        Geology::from_config(&mut Seed::new(7), &GeologyConfig::default()).unwrap()
    }

    #[test]
    fn test_variants_end_on_deepest_layer() {
        let geology = geology();
        assert_eq!(geology.variants().len(), 4);
        for strata in geology.variants() {
            let deepest = strata.layers().last().unwrap().material();
            assert_eq!(deepest, "deepslate");
        }
    }

    #[test]
    fn test_selection_is_stable_within_a_column() {
        let geology = geology();
        for i in 0..50 {
            let (x, z) = (i as f64 * 97.0, i as f64 * -41.0);
            assert_eq!(geology.variant_at(x, z), geology.variant_at(x, z));
            assert!(geology.variant_at(x, z) < geology.variants().len());
        }
    }

    #[test]
    fn test_columns_fill_to_surface() {
        let geology = geology();
        let mut blocks = 0;
        geology.strata_at(120.0, -340.0).downwards(120.0, 80, -340.0, |_, _| {
            blocks += 1;
            true
        });
        assert_eq!(blocks, 81);
    }

    #[test]
    fn test_same_seed_same_geology() {
        let a = geology();
        let b = geology();
        for i in 0..20 {
            let (x, z) = (i as f64 * 311.0, i as f64 * 173.0);
            let sa = a.strata_at(x, z);
            let sb = b.strata_at(x, z);
            assert_eq!(sa.heights(x, 64, z), sb.heights(x, 64, z));
        }
    }

    #[test]
    fn test_empty_layers_rejected() {
        let config = GeologyConfig {
            layers: Vec::new(),
            ..GeologyConfig::default()
        };
        assert!(Geology::from_config(&mut Seed::new(1), &config).is_err());
    }
}
