//! Coordinate folding and the seeded hasher handle.
//!
//! Multi-dimensional integer coordinates are folded into a single index by
//! multiply-accumulate with a distinct prime per axis, then mixed with the
//! seed. Any coordinate can be hashed independently in O(1), which is what
//! makes every generator in this crate stateless and parallel-safe.

use glam::{IVec2, IVec3, IVec4};

use crate::convert::{to_signed, to_unit};
use crate::hash::{HashWord, NoiseType, mix};

/// Fold a 1D coordinate into a hash index.
///
/// The x axis carries weight 1 in every fold: the index goes straight into
/// [`mix`], whose avalanche spreads it over all output bits, and keeping
/// `fold1` the identity makes `unit_noise(i, seed)` and `unit1(i)` agree.
/// The y, z and w axes each get their own odd prime, so no two axes share a
/// multiplier.
#[inline]
pub fn fold1<W: HashWord>(x: i64) -> W {
    W::from_i64(x)
}

/// Fold a 2D coordinate into a hash index.
#[inline]
pub fn fold2<W: HashWord>(x: i64, y: i64) -> W {
    let [py, _, _] = W::AXIS_PRIMES;
    W::from_i64(x).wrapping_add(W::from_i64(y).wrapping_mul(py))
}

/// Fold a 3D coordinate into a hash index.
#[inline]
pub fn fold3<W: HashWord>(x: i64, y: i64, z: i64) -> W {
    let [_, pz, _] = W::AXIS_PRIMES;
    fold2::<W>(x, y).wrapping_add(W::from_i64(z).wrapping_mul(pz))
}

/// Fold a 4D coordinate into a hash index.
#[inline]
pub fn fold4<W: HashWord>(x: i64, y: i64, z: i64, w: i64) -> W {
    let [_, _, pw] = W::AXIS_PRIMES;
    fold3::<W>(x, y, z).wrapping_add(W::from_i64(w).wrapping_mul(pw))
}

// ---------------------------------------------------------------------------
// NoiseHasher
// ---------------------------------------------------------------------------

/// A seed paired with a mixing schedule: everything needed to hash a
/// coordinate.
///
/// `Copy` and immutable; pass it by value into any generator. Octaves and
/// sub-fields derive their own hashers with [`NoiseHasher::reseed`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NoiseHasher<W: HashWord = u64> {
    seed: W,
    kind: NoiseType,
}

impl<W: HashWord> NoiseHasher<W> {
    /// Create a hasher from a seed and mixing schedule.
    pub const fn new(seed: W, kind: NoiseType) -> Self {
        Self { seed, kind }
    }

    /// Create a hasher from a 64-bit seed (truncated to the width) using the
    /// default [`NoiseType`].
    pub fn from_seed(seed: u64) -> Self {
        Self::new(W::from_u64(seed), NoiseType::default())
    }

    /// The seed.
    pub fn seed(&self) -> W {
        self.seed
    }

    /// The mixing schedule.
    pub fn kind(&self) -> NoiseType {
        self.kind
    }

    /// Derive an independent hasher by mixing `salt` into the seed.
    ///
    /// Used for per-octave and per-axis decorrelation.
    #[inline]
    pub fn reseed(&self, salt: u64) -> Self {
        Self::new(mix(W::from_u64(salt), self.seed, self.kind), self.kind)
    }

    /// Mix a raw index.
    #[inline]
    pub fn hash(&self, index: W) -> W {
        mix(index, self.seed, self.kind)
    }

    /// Hash a 1D coordinate.
    #[inline]
    pub fn hash1(&self, x: i64) -> W {
        self.hash(fold1(x))
    }

    /// Hash a 2D coordinate.
    #[inline]
    pub fn hash2(&self, x: i64, y: i64) -> W {
        self.hash(fold2(x, y))
    }

    /// Hash a 3D coordinate.
    #[inline]
    pub fn hash3(&self, x: i64, y: i64, z: i64) -> W {
        self.hash(fold3(x, y, z))
    }

    /// Hash a 4D coordinate.
    #[inline]
    pub fn hash4(&self, x: i64, y: i64, z: i64, w: i64) -> W {
        self.hash(fold4(x, y, z, w))
    }

    /// Hash a lattice point.
    #[inline]
    pub fn hash_ivec2(&self, p: IVec2) -> W {
        self.hash2(i64::from(p.x), i64::from(p.y))
    }

    /// Hash a lattice point.
    #[inline]
    pub fn hash_ivec3(&self, p: IVec3) -> W {
        self.hash3(i64::from(p.x), i64::from(p.y), i64::from(p.z))
    }

    /// Hash a lattice point.
    #[inline]
    pub fn hash_ivec4(&self, p: IVec4) -> W {
        self.hash4(i64::from(p.x), i64::from(p.y), i64::from(p.z), i64::from(p.w))
    }

    /// `[0, 1)` value for a 1D coordinate.
    #[inline]
    pub fn unit1(&self, x: i64) -> f32 {
        to_unit(self.hash1(x))
    }

    /// `[0, 1)` value for a 2D coordinate.
    #[inline]
    pub fn unit2(&self, x: i64, y: i64) -> f32 {
        to_unit(self.hash2(x, y))
    }

    /// `[0, 1)` value for a 3D coordinate.
    #[inline]
    pub fn unit3(&self, x: i64, y: i64, z: i64) -> f32 {
        to_unit(self.hash3(x, y, z))
    }

    /// `[0, 1)` value for a 4D coordinate.
    #[inline]
    pub fn unit4(&self, x: i64, y: i64, z: i64, w: i64) -> f32 {
        to_unit(self.hash4(x, y, z, w))
    }

    /// `[-1, 1)` value for a 1D coordinate.
    #[inline]
    pub fn signed1(&self, x: i64) -> f32 {
        to_signed(self.hash1(x))
    }

    /// `[-1, 1)` value for a 2D coordinate.
    #[inline]
    pub fn signed2(&self, x: i64, y: i64) -> f32 {
        to_signed(self.hash2(x, y))
    }

    /// `[-1, 1)` value for a 3D coordinate.
    #[inline]
    pub fn signed3(&self, x: i64, y: i64, z: i64) -> f32 {
        to_signed(self.hash3(x, y, z))
    }

    /// `[-1, 1)` value for a 4D coordinate.
    #[inline]
    pub fn signed4(&self, x: i64, y: i64, z: i64, w: i64) -> f32 {
        to_signed(self.hash4(x, y, z, w))
    }
}

impl<W: HashWord> Default for NoiseHasher<W> {
    fn default() -> Self {
        Self::from_seed(0)
    }
}

// ---------------------------------------------------------------------------
// Stateless convenience functions (64-bit, default schedule)
// ---------------------------------------------------------------------------

/// `[0, 1)` value for `index` under `seed`.
#[inline]
pub fn unit_noise(index: u64, seed: u64) -> f32 {
    to_unit(mix(index, seed, NoiseType::default()))
}

/// `[-1, 1)` value for `index` under `seed`.
#[inline]
pub fn signed_noise(index: u64, seed: u64) -> f32 {
    to_signed(mix(index, seed, NoiseType::default()))
}

/// `[0, 1)` value for a 2D coordinate under `seed`.
#[inline]
pub fn unit_noise_2d(x: i64, y: i64, seed: u64) -> f32 {
    NoiseHasher::<u64>::from_seed(seed).unit2(x, y)
}

/// `[0, 1)` value for a 3D coordinate under `seed`.
#[inline]
pub fn unit_noise_3d(x: i64, y: i64, z: i64, seed: u64) -> f32 {
    NoiseHasher::<u64>::from_seed(seed).unit3(x, y, z)
}

/// `[0, 1)` value for a 4D coordinate under `seed`.
#[inline]
pub fn unit_noise_4d(x: i64, y: i64, z: i64, w: i64, seed: u64) -> f32 {
    NoiseHasher::<u64>::from_seed(seed).unit4(x, y, z, w)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_fold_reduces_to_lower_dimension_at_zero() {
        assert_eq!(fold2::<u64>(17, 0), fold1::<u64>(17));
        assert_eq!(fold3::<u32>(-4, 9, 0), fold2::<u32>(-4, 9));
        assert_eq!(fold4::<u64>(1, 2, 3, 0), fold3::<u64>(1, 2, 3));
    }

    #[test]
    fn test_neighbouring_cells_are_distinct() {
        let hasher = NoiseHasher::<u32>::from_seed(3);
        let mut seen = HashSet::new();
        for x in -16..16 {
            for y in -16..16 {
                seen.insert(hasher.hash2(x, y));
            }
        }
        assert_eq!(seen.len(), 32 * 32, "adjacent 2D cells collided");
    }

    #[test]
    fn test_axes_are_not_interchangeable() {
        let hasher = NoiseHasher::<u64>::from_seed(11);
        assert_ne!(hasher.hash2(1, 2), hasher.hash2(2, 1));
        assert_ne!(hasher.hash3(1, 2, 3), hasher.hash3(3, 2, 1));
        assert_ne!(hasher.hash4(0, 0, 0, 1), hasher.hash4(1, 0, 0, 0));
    }

    #[test]
    fn test_negative_coordinates_hash() {
        let hasher = NoiseHasher::<u64>::from_seed(5);
        assert_ne!(hasher.hash1(-1), hasher.hash1(1));
        assert_ne!(hasher.hash2(-1, -1), hasher.hash2(1, 1));
    }

    #[test]
    fn test_order_independence() {
        let hasher = NoiseHasher::<u32>::new(77, NoiseType::Rotational);
        let forward: Vec<u32> = (0..100).map(|i| hasher.hash3(i, -i, 2 * i)).collect();
        let backward: Vec<u32> = (0..100).rev().map(|i| hasher.hash3(i, -i, 2 * i)).collect();
        let reversed: Vec<u32> = backward.into_iter().rev().collect();
        assert_eq!(forward, reversed, "hash must not depend on evaluation order");
    }

    #[test]
    fn test_far_coordinates_cost_nothing_extra() {
        let hasher = NoiseHasher::<u64>::from_seed(1);
        let far = hasher.unit2(i64::MAX, i64::MIN);
        assert!((0.0..1.0).contains(&far));
    }

    #[test]
    fn test_reseed_decorrelates() {
        let base = NoiseHasher::<u64>::from_seed(42);
        let a = base.reseed(0);
        let b = base.reseed(1);
        assert_ne!(a.seed(), b.seed());
        assert_ne!(a.seed(), base.seed());
        assert_eq!(a.kind(), base.kind());
        assert_eq!(base.reseed(0), a, "reseed must be deterministic");
    }

    #[test]
    fn test_reseed_from_zero_seed_moves_off_zero() {
        for kind in NoiseType::ALL {
            let narrow = NoiseHasher::<u32>::new(0, kind);
            let wide = NoiseHasher::<u64>::new(0, kind);
            assert_ne!(narrow.reseed(0).seed(), 0, "{kind} 32-bit octave 0 kept seed 0");
            assert_ne!(wide.reseed(0).seed(), 0, "{kind} 64-bit octave 0 kept seed 0");
        }
    }

    #[test]
    fn test_axis_multipliers_are_distinct_and_odd() {
        let narrow = <u32 as HashWord>::AXIS_PRIMES;
        let wide = <u64 as HashWord>::AXIS_PRIMES;
        for (i, p) in narrow.iter().enumerate() {
            assert_eq!(p & 1, 1, "32-bit axis multiplier {i} is even");
            assert!(*p > 1, "32-bit axis multiplier {i} collapses onto the x axis");
            assert!(!narrow[i + 1..].contains(p), "32-bit axis multipliers repeat");
        }
        for (i, p) in wide.iter().enumerate() {
            assert_eq!(p & 1, 1, "64-bit axis multiplier {i} is even");
            assert!(*p > 1, "64-bit axis multiplier {i} collapses onto the x axis");
            assert!(!wide[i + 1..].contains(p), "64-bit axis multipliers repeat");
        }
        assert_eq!(fold1::<u64>(-3), fold2::<u64>(-3, 0));
    }

    #[test]
    fn test_unit_noise_matches_hasher() {
        let hasher = NoiseHasher::<u64>::from_seed(9);
        for i in 0..64 {
            assert_eq!(unit_noise(i as u64, 9), hasher.unit1(i));
        }
        assert_eq!(unit_noise_2d(3, 4, 9), hasher.unit2(3, 4));
        assert_eq!(unit_noise_3d(3, 4, 5, 9), hasher.unit3(3, 4, 5));
        assert_eq!(unit_noise_4d(3, 4, 5, 6, 9), hasher.unit4(3, 4, 5, 6));
    }

    #[test]
    fn test_signed_noise_range() {
        for i in 0..1000 {
            let v = signed_noise(i, 1234);
            assert!((-1.0..1.0).contains(&v), "signed noise out of range: {v}");
        }
    }
}
