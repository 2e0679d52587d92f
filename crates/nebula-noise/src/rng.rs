//! Sequential random-number façade over the stateless hash.
//!
//! [`NoiseRng`] is nothing more than `(seed, position)`. Every draw hashes
//! the current position (and, for multi-component draws, the following
//! positions) and then advances past the words it consumed. Because each
//! value is a pure function of its position, [`NoiseRng::seek`] to `p`
//! followed by a draw yields the same value as stepping there one draw at a
//! time.
//!
//! The position is a `u64` that wraps on overflow. The hash index is the
//! position truncated to the word width, so a 32-bit façade repeats after
//! `2^32` words.
//!
//! Words consumed per draw: one for every scalar draw and for
//! [`direction_2d`](NoiseRng::direction_2d); two for
//! [`direction_3d`](NoiseRng::direction_3d),
//! [`point_in_disc`](NoiseRng::point_in_disc) and
//! [`normal`](NoiseRng::normal); three for
//! [`rotation`](NoiseRng::rotation), [`direction_4d`](NoiseRng::direction_4d)
//! and [`point_in_sphere`](NoiseRng::point_in_sphere). 64-bit integer draws
//! on a 32-bit façade take two words.

use std::f32::consts::TAU;

use glam::{Quat, Vec2, Vec3, Vec4};

use crate::convert::{to_signed, to_unit, to_unit_f64};
use crate::coords::NoiseHasher;
use crate::hash::{HashWord, NoiseType, mix};
use crate::math::{det_cbrt, det_cos, det_ln, det_sin, det_sqrt};

/// Seekable, stream-splittable random number generator.
///
/// Not meant to be shared for mutation across threads: give each worker its
/// own instance, typically via [`NoiseRng::for_stream`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoiseRng<W: HashWord = u64> {
    seed: W,
    position: u64,
    kind: NoiseType,
}

impl<W: HashWord> NoiseRng<W> {
    /// Start at position 0 with the default [`NoiseType`].
    pub fn new(seed: W) -> Self {
        Self::with_kind(seed, NoiseType::default())
    }

    /// Start at position 0 with an explicit mixing schedule.
    pub fn with_kind(seed: W, kind: NoiseType) -> Self {
        Self {
            seed,
            position: 0,
            kind,
        }
    }

    /// Independent generator for `stream_id`, derived by mixing the id into
    /// `seed`. Streams with different ids do not overlap in practice.
    pub fn for_stream(seed: W, stream_id: u64) -> Self {
        let derived = NoiseHasher::new(seed, NoiseType::default()).reseed(stream_id);
        Self::new(derived.seed())
    }

    /// The seed.
    pub fn seed(&self) -> W {
        self.seed
    }

    /// The mixing schedule.
    pub fn kind(&self) -> NoiseType {
        self.kind
    }

    /// Index of the next word to be drawn.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Jump to `position`.
    pub fn seek(&mut self, position: u64) {
        self.position = position;
    }

    /// Advance by `n` words without drawing them.
    pub fn skip(&mut self, n: u64) {
        self.position = self.position.wrapping_add(n);
    }

    /// Replace the seed and rewind to position 0.
    pub fn reset(&mut self, seed: W) {
        self.seed = seed;
        self.position = 0;
    }

    /// The word at `position`, without moving.
    #[inline]
    pub fn word_at(&self, position: u64) -> W {
        mix(W::from_u64(position), self.seed, self.kind)
    }

    #[inline]
    fn next_word(&mut self) -> W {
        let word = self.word_at(self.position);
        self.position = self.position.wrapping_add(1);
        word
    }

    // -- scalars ------------------------------------------------------------

    /// Uniform `f32` in `[0, 1)`.
    pub fn value(&mut self) -> f32 {
        to_unit(self.next_word())
    }

    /// Uniform `f64` in `[0, 1)`.
    pub fn value_f64(&mut self) -> f64 {
        to_unit_f64(self.next_word())
    }

    /// Uniform `f32` in `[-1, 1)`.
    pub fn signed(&mut self) -> f32 {
        to_signed(self.next_word())
    }

    /// Uniform `u32`.
    pub fn next_u32(&mut self) -> u32 {
        self.next_word().top_bits(32)
    }

    /// Uniform `u64`.
    pub fn next_u64(&mut self) -> u64 {
        if W::BITS >= 64 {
            self.next_word().to_u64()
        } else {
            let hi = u64::from(self.next_u32());
            let lo = u64::from(self.next_u32());
            (hi << 32) | lo
        }
    }

    /// Uniform byte.
    pub fn next_u8(&mut self) -> u8 {
        self.next_word().top_bits(8) as u8
    }

    /// Uniform `u16`.
    pub fn next_u16(&mut self) -> u16 {
        self.next_word().top_bits(16) as u16
    }

    /// Uniform `i32`.
    pub fn next_i32(&mut self) -> i32 {
        self.next_u32() as i32
    }

    /// Uniform `i64`.
    pub fn next_i64(&mut self) -> i64 {
        self.next_u64() as i64
    }

    /// Fair coin.
    pub fn next_bool(&mut self) -> bool {
        self.next_word().top_bits(1) == 1
    }

    /// `true` with probability `p`. `p <= 0` never succeeds, `p >= 1` always does.
    pub fn chance(&mut self, p: f32) -> bool {
        self.value() < p
    }

    /// Uniform `f32` in `[min, max)`.
    pub fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.value()
    }

    /// Uniform integer in `[min, max)`. Returns `min` when `min >= max`; one
    /// word is consumed either way.
    pub fn range_i32(&mut self, min: i32, max: i32) -> i32 {
        let draw = u64::from(self.next_u32());
        if min >= max {
            return min;
        }
        let span = (i64::from(max) - i64::from(min)) as u64;
        let offset = (draw * span) >> 32;
        (i64::from(min) + offset as i64) as i32
    }

    /// Uniform integer in `[min, max)`. Returns `min` when `min >= max`.
    pub fn range_i64(&mut self, min: i64, max: i64) -> i64 {
        let draw = u128::from(self.next_u64());
        if min >= max {
            return min;
        }
        let span = (i128::from(max) - i128::from(min)) as u128;
        let offset = (draw * span) >> 64;
        (i128::from(min) + offset as i128) as i64
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        if len as u64 <= u64::from(u32::MAX) {
            ((u64::from(self.next_u32()) * len as u64) >> 32) as usize
        } else {
            ((u128::from(self.next_u64()) * len as u128) >> 64) as usize
        }
    }

    /// Gaussian sample via Box–Muller.
    pub fn normal(&mut self, mean: f32, std_dev: f32) -> f32 {
        // 1 - u lies in (0, 1], so the logarithm is finite.
        let u1 = 1.0 - self.value();
        let u2 = self.value();
        let radius = det_sqrt(-2.0 * det_ln(u1));
        mean + std_dev * radius * det_cos(TAU * u2)
    }

    // -- geometry -----------------------------------------------------------

    /// Uniform unit vector in the plane.
    pub fn direction_2d(&mut self) -> Vec2 {
        let angle = TAU * self.value();
        Vec2::new(det_cos(angle), det_sin(angle))
    }

    /// Uniform unit vector on the sphere.
    pub fn direction_3d(&mut self) -> Vec3 {
        let z = self.signed();
        let angle = TAU * self.value();
        let r = det_sqrt((1.0 - z * z).max(0.0));
        Vec3::new(r * det_cos(angle), r * det_sin(angle), z)
    }

    /// Uniform unit vector on the 3-sphere (the components of a uniform
    /// rotation).
    pub fn direction_4d(&mut self) -> Vec4 {
        Vec4::from(self.rotation())
    }

    /// Uniform rotation (Shoemake's method).
    pub fn rotation(&mut self) -> Quat {
        let u1 = self.value();
        let a = TAU * self.value();
        let b = TAU * self.value();
        let s1 = det_sqrt(1.0 - u1);
        let s2 = det_sqrt(u1);
        Quat::from_xyzw(s1 * det_sin(a), s1 * det_cos(a), s2 * det_sin(b), s2 * det_cos(b))
    }

    /// Uniform point in the unit disc.
    pub fn point_in_disc(&mut self) -> Vec2 {
        let direction = self.direction_2d();
        direction * det_sqrt(self.value())
    }

    /// Uniform point in the unit ball.
    pub fn point_in_sphere(&mut self) -> Vec3 {
        let direction = self.direction_3d();
        direction * det_cbrt(self.value())
    }

    // -- collections --------------------------------------------------------

    /// Fill `dest` with random bytes, one word per `W::BITS / 8` bytes.
    pub fn fill_bytes(&mut self, dest: &mut [u8]) {
        let width = (W::BITS / 8) as usize;
        for chunk in dest.chunks_mut(width) {
            let bytes = self.next_word().to_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    /// Fisher–Yates shuffle in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.index(i + 1);
            items.swap(i, j);
        }
    }

    /// Uniformly chosen element, or `None` (without drawing) when empty.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let i = self.index(items.len());
        items.get(i)
    }

    /// Index drawn with probability proportional to its weight.
    ///
    /// Negative and non-finite weights count as zero. Returns `None`
    /// (without drawing) when no weight is positive.
    pub fn weighted_index(&mut self, weights: &[f32]) -> Option<usize> {
        let usable = |w: f32| if w.is_finite() && w > 0.0 { w } else { 0.0 };
        let total: f32 = weights.iter().copied().map(usable).sum();
        if total <= 0.0 {
            return None;
        }
        let target = self.value() * total;
        let mut cumulative = 0.0;
        let mut last = None;
        for (i, &w) in weights.iter().enumerate() {
            let w = usable(w);
            if w > 0.0 {
                cumulative += w;
                last = Some(i);
                if target < cumulative {
                    return Some(i);
                }
            }
        }
        last
    }
}

impl<W: HashWord> Default for NoiseRng<W> {
    fn default() -> Self {
        Self::new(W::default())
    }
}

impl<W: HashWord> rand::RngCore for NoiseRng<W> {
    fn next_u32(&mut self) -> u32 {
        NoiseRng::next_u32(self)
    }

    fn next_u64(&mut self) -> u64 {
        NoiseRng::next_u64(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        NoiseRng::fill_bytes(self, dest)
    }
}

impl<W: HashWord> rand::SeedableRng for NoiseRng<W> {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(W::from_u64(u64::from_le_bytes(seed)))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(W::from_u64(state))
    }
}
