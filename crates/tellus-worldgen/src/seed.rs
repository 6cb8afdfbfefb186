//! Deterministic seed sequencing and hashing.
//!
//! Every noise field in the pipeline draws its seed from a single [`Seed`]
//! in construction order, so two generators built from the same root value
//! produce identical fields. Lattice hashing and per-region RNG derivation
//! are pure functions of their inputs and never touch global state.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// ---------------------------------------------------------------------------
// Seed sequence
// ---------------------------------------------------------------------------

/// A mutable integer seed handed out in construction order.
///
/// `next()` returns the current value and then increments it, wrapping on
/// overflow. Builders call it once per noise field they create.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Seed {
    root: i64,
    value: i32,
}

impl Seed {
    /// Start a sequence from a world seed.
    pub fn new(root: i64) -> Self {
        Self {
            root,
            value: fold(root),
        }
    }

    /// The world seed this sequence was created from.
    pub fn root(&self) -> i64 {
        self.root
    }

    /// The value the next call to [`next`](Self::next) will return.
    pub fn get(&self) -> i32 {
        self.value
    }

    /// Return the current value and advance.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> i32 {
        let value = self.value;
        self.value = self.value.wrapping_add(1);
        value
    }

    /// Start an independent sequence derived from the next value.
    ///
    /// Used by builders that create an open-ended number of fields, so adding
    /// one does not shift every seed handed out after it.
    pub fn split(&mut self) -> Seed {
        let salt = self.next();
        Seed::new(mix64(self.root as u64 ^ (salt as u32 as u64).rotate_left(32)) as i64)
    }
}

fn fold(root: i64) -> i32 {
    (root ^ (root >> 32)) as i32
}

// ---------------------------------------------------------------------------
// Lattice hashing
// ---------------------------------------------------------------------------

/// Hash an integer lattice point.
#[inline]
pub fn hash2(seed: i32, x: i32, y: i32) -> u32 {
    let mut h = (seed as u32)
        ^ (x as u32).wrapping_mul(0x27d4_eb2d)
        ^ (y as u32).wrapping_mul(0x1656_67b1);
    h ^= h >> 15;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^ (h >> 16)
}

/// Hash a lattice point to a value in `[0, 1]`.
#[inline]
pub fn unit2(seed: i32, x: i32, y: i32) -> f32 {
    (hash2(seed, x, y) as f64 / u32::MAX as f64) as f32
}

/// SplitMix64 finalizer.
#[inline]
pub fn mix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

// ---------------------------------------------------------------------------
// Region RNG
// ---------------------------------------------------------------------------

/// Derive a u64 seed for a grid region from the world seed and its coordinates.
pub fn region_seed(world_seed: i64, rx: i32, rz: i32) -> u64 {
    let packed = ((rx as u32 as u64) << 32) | rz as u32 as u64;
    mix64(mix64(world_seed as u64) ^ packed)
}

/// Derive a deterministic RNG for a grid region.
///
/// The same `(world_seed, rx, rz)` always yields the same sequence,
/// regardless of which thread asks or in what order.
pub fn region_rng(world_seed: i64, rx: i32, rz: i32) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(region_seed(world_seed, rx, rz))
}
