//! Integer bit-mixing: the entropy source for every other layer.
//!
//! [`mix`] turns an `(index, seed)` pair into a uniformly distributed word of
//! the same width. The schedule is chosen by [`NoiseType`]; every schedule is
//! written once against [`HashWord`] so the 32-bit and 64-bit variants cannot
//! drift apart.

use std::fmt;
use std::hash::Hash;
use std::ops::{BitAnd, BitOr, BitXor, Shl, Shr};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// HashWord
// ---------------------------------------------------------------------------

/// An unsigned integer width the hash core can operate on (`u32` or `u64`).
///
/// Carries the per-width mixing constants so a single generic implementation
/// of every [`NoiseType`] serves both widths.
pub trait HashWord:
    Copy
    + Default
    + fmt::Debug
    + fmt::LowerHex
    + PartialEq
    + Eq
    + Hash
    + Send
    + Sync
    + BitXor<Output = Self>
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + Shr<u32, Output = Self>
    + Shl<u32, Output = Self>
    + 'static
{
    /// Number of bits in the word.
    const BITS: u32;

    /// Multipliers for the shift-xor schedule (all odd).
    const SHIFT_XOR: [Self; 5];
    /// Right-shift amounts for the shift-xor schedule.
    const SHIFT_XOR_SHIFTS: [u32; 5];

    /// Multipliers for the balanced finalizer (both odd).
    const BALANCED: [Self; 2];
    /// Shift amounts for the balanced finalizer.
    const BALANCED_SHIFTS: [u32; 3];
    /// Golden-ratio increment applied before finalizing.
    const GOLDEN: Self;
    /// Odd multiplier that spreads the seed before it meets the index.
    const SEED_SPREAD: Self;

    /// Multiplier used twice by the rotational schedule.
    const ROTATIONAL: Self;
    /// Right-rotation amounts for the rotational schedule.
    const ROTATIONAL_ROTATIONS: [u32; 2];
    /// Xor-shift amount for the rotational schedule.
    const ROTATIONAL_SHIFT: u32;

    /// Rotation amounts of one ChaCha quarter round at this width.
    const QUARTER_ROTATIONS: [u32; 4];
    /// "expand k" style constants that fill the unused ChaCha lanes.
    const CHACHA: [Self; 4];

    /// Per-axis prime multipliers for the y, z and w coordinates.
    const AXIS_PRIMES: [Self; 3];

    /// Modular addition.
    fn wrapping_add(self, rhs: Self) -> Self;
    /// Modular multiplication.
    fn wrapping_mul(self, rhs: Self) -> Self;
    /// Bitwise left rotation.
    fn rotate_left(self, n: u32) -> Self;
    /// Bitwise right rotation.
    fn rotate_right(self, n: u32) -> Self;
    /// Number of set bits.
    fn count_ones(self) -> u32;
    /// Truncating conversion from `u64`.
    fn from_u64(value: u64) -> Self;
    /// Zero-extending conversion to `u64`.
    fn to_u64(self) -> u64;

    /// Two's-complement reinterpretation of a signed coordinate.
    #[inline]
    fn from_i64(value: i64) -> Self {
        Self::from_u64(value as u64)
    }

    /// The `n` most significant bits, right-aligned. `n` must be in `1..=32`.
    #[inline]
    fn top_bits(self, n: u32) -> u32 {
        debug_assert!((1..=32).contains(&n), "top_bits takes 1..=32 bits, got {n}");
        (self.to_u64() >> (Self::BITS - n)) as u32
    }
}

macro_rules! impl_hash_word {
    ($ty:ty, {
        bits: $bits:expr,
        shift_xor: $sx:expr,
        shift_xor_shifts: $sxs:expr,
        balanced: $bal:expr,
        balanced_shifts: $bals:expr,
        golden: $golden:expr,
        seed_spread: $spread:expr,
        rotational: $rot:expr,
        rotational_rotations: $rotr:expr,
        rotational_shift: $rots:expr,
        quarter_rotations: $qr:expr,
        chacha: $chacha:expr,
        axis_primes: $primes:expr $(,)?
    }) => {
        impl HashWord for $ty {
            const BITS: u32 = $bits;
            const SHIFT_XOR: [Self; 5] = $sx;
            const SHIFT_XOR_SHIFTS: [u32; 5] = $sxs;
            const BALANCED: [Self; 2] = $bal;
            const BALANCED_SHIFTS: [u32; 3] = $bals;
            const GOLDEN: Self = $golden;
            const SEED_SPREAD: Self = $spread;
            const ROTATIONAL: Self = $rot;
            const ROTATIONAL_ROTATIONS: [u32; 2] = $rotr;
            const ROTATIONAL_SHIFT: u32 = $rots;
            const QUARTER_ROTATIONS: [u32; 4] = $qr;
            const CHACHA: [Self; 4] = $chacha;
            const AXIS_PRIMES: [Self; 3] = $primes;

            #[inline(always)]
            fn wrapping_add(self, rhs: Self) -> Self {
                <$ty>::wrapping_add(self, rhs)
            }

            #[inline(always)]
            fn wrapping_mul(self, rhs: Self) -> Self {
                <$ty>::wrapping_mul(self, rhs)
            }

            #[inline(always)]
            fn rotate_left(self, n: u32) -> Self {
                <$ty>::rotate_left(self, n)
            }

            #[inline(always)]
            fn rotate_right(self, n: u32) -> Self {
                <$ty>::rotate_right(self, n)
            }

            #[inline(always)]
            fn count_ones(self) -> u32 {
                <$ty>::count_ones(self)
            }

            #[inline(always)]
            fn from_u64(value: u64) -> Self {
                value as $ty
            }

            #[inline(always)]
            fn to_u64(self) -> u64 {
                u64::from(self)
            }
        }
    };
}

impl_hash_word!(u32, {
    bits: 32,
    shift_xor: [0xD2A8_0A3F, 0xA884_F197, 0x6C73_6F4B, 0xB79F_3ABB, 0x1B56_C4F5],
    shift_xor_shifts: [9, 11, 13, 15, 17],
    balanced: [0x7FEB_352D, 0x846C_A68B],
    balanced_shifts: [16, 15, 16],
    golden: 0x9E37_79B9,
    seed_spread: 0x85EB_CA77,
    rotational: 0x9FB2_1C65,
    rotational_rotations: [25, 12],
    rotational_shift: 14,
    quarter_rotations: [16, 12, 8, 7],
    chacha: [0x6170_7865, 0x3320_646E, 0x7962_2D32, 0x6B20_6574],
    axis_primes: [198_491_317, 6_542_989, 357_239],
});

impl_hash_word!(u64, {
    bits: 64,
    shift_xor: [
        0xD6E8_FEB8_6659_FD93,
        0xA076_1D64_78BD_642F,
        0xE703_7ED1_A0B4_28DB,
        0x8EBC_6AF0_9C88_C6E3,
        0x5899_65CC_7537_4CC3,
    ],
    shift_xor_shifts: [18, 22, 26, 30, 34],
    balanced: [0xBF58_476D_1CE4_E5B9, 0x94D0_49BB_1331_11EB],
    balanced_shifts: [30, 27, 31],
    golden: 0x9E37_79B9_7F4A_7C15,
    seed_spread: 0xC2B2_AE3D_27D4_EB4F,
    rotational: 0x9FB2_1C65_1E98_DF25,
    rotational_rotations: [49, 24],
    rotational_shift: 28,
    quarter_rotations: [32, 24, 16, 63],
    chacha: [
        0x6170_7865_3320_6E64,
        0x7962_2D32_6B20_6574,
        0x3320_646E_6170_7865,
        0x6B20_6574_7962_2D32,
    ],
    axis_primes: [0x9E37_79B1_85EB_CA87, 0xC2B2_AE3D_27D4_EB4F, 0x1656_67B1_9E37_79F9],
});

// ---------------------------------------------------------------------------
// NoiseType
// ---------------------------------------------------------------------------

/// Mixing schedule used to turn `(index, seed)` into hash bits.
///
/// All variants share the same contract (deterministic, avalanche, uniform
/// bits); they differ only in the sequence of operations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseType {
    /// Five alternating multiply/add stages, each followed by a right xor-shift.
    ShiftXor,
    /// Seed-spread index passed through a two-multiply xor-shift finalizer.
    #[default]
    Balanced,
    /// Rotate-xor-rotate diffusion followed by two multiply/xor-shift rounds.
    Rotational,
    /// Two ChaCha quarter rounds over `(index, seed, k0, k1)`.
    #[serde(rename = "chacha_quarter")]
    ChaChaQuarter,
    /// Four ChaCha quarter rounds with the lanes rotated between rounds.
    #[serde(rename = "chacha_double")]
    ChaChaDouble,
}

impl NoiseType {
    /// Every variant, in declaration order.
    pub const ALL: [NoiseType; 5] = [
        NoiseType::ShiftXor,
        NoiseType::Balanced,
        NoiseType::Rotational,
        NoiseType::ChaChaQuarter,
        NoiseType::ChaChaDouble,
    ];

    /// Stable lowercase name, accepted back by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            NoiseType::ShiftXor => "shift_xor",
            NoiseType::Balanced => "balanced",
            NoiseType::Rotational => "rotational",
            NoiseType::ChaChaQuarter => "chacha_quarter",
            NoiseType::ChaChaDouble => "chacha_double",
        }
    }
}

impl fmt::Display for NoiseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a string does not name a [`NoiseType`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown noise type `{0}` (expected shift_xor, balanced, rotational, chacha_quarter or chacha_double)")]
pub struct ParseNoiseTypeError(pub String);

impl FromStr for NoiseType {
    type Err = ParseNoiseTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        NoiseType::ALL
            .into_iter()
            .find(|kind| kind.name() == normalized)
            .ok_or_else(|| ParseNoiseTypeError(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Mixing
// ---------------------------------------------------------------------------

/// Mix `index` and `seed` into a uniformly distributed word.
///
/// Pure and total: the same `(index, seed, kind)` yields the same bits on
/// every thread, run and platform.
#[inline]
pub fn mix<W: HashWord>(index: W, seed: W, kind: NoiseType) -> W {
    match kind {
        NoiseType::ShiftXor => shift_xor(index, seed),
        NoiseType::Balanced => balanced(index, seed),
        NoiseType::Rotational => rotational(index, seed),
        NoiseType::ChaChaQuarter => chacha_quarter(index, seed),
        NoiseType::ChaChaDouble => chacha_double(index, seed),
    }
}

#[inline(always)]
fn shift_xor<W: HashWord>(index: W, seed: W) -> W {
    let k = W::SHIFT_XOR;
    let s = W::SHIFT_XOR_SHIFTS;
    let mut x = index.wrapping_mul(k[0]).wrapping_add(seed);
    x = x ^ (x >> s[0]);
    x = x.wrapping_add(k[1]);
    x = x ^ (x >> s[1]);
    x = x.wrapping_mul(k[2]);
    x = x ^ (x >> s[2]);
    x = x.wrapping_add(k[3]);
    x = x ^ (x >> s[3]);
    x = x.wrapping_mul(k[4]);
    x ^ (x >> s[4])
}

#[inline(always)]
fn balanced<W: HashWord>(index: W, seed: W) -> W {
    let [m0, m1] = W::BALANCED;
    let [s0, s1, s2] = W::BALANCED_SHIFTS;
    let mut x = (index ^ seed.wrapping_mul(W::SEED_SPREAD)).wrapping_add(W::GOLDEN);
    x = x ^ (x >> s0);
    x = x.wrapping_mul(m0);
    x = x ^ (x >> s1);
    x = x.wrapping_mul(m1);
    x ^ (x >> s2)
}

#[inline(always)]
fn rotational<W: HashWord>(index: W, seed: W) -> W {
    let [r0, r1] = W::ROTATIONAL_ROTATIONS;
    // Offset by the golden constant so (0, 0) is not a fixed point.
    let mut x = (index.wrapping_mul(W::SHIFT_XOR[0]) ^ seed).wrapping_add(W::GOLDEN);
    x = x ^ x.rotate_right(r0) ^ x.rotate_right(r1);
    x = x.wrapping_mul(W::ROTATIONAL);
    x = x ^ (x >> W::ROTATIONAL_SHIFT);
    x = x.wrapping_mul(W::ROTATIONAL);
    x ^ (x >> W::ROTATIONAL_SHIFT)
}

#[inline(always)]
fn quarter_round<W: HashWord>(mut a: W, mut b: W, mut c: W, mut d: W) -> (W, W, W, W) {
    let [r0, r1, r2, r3] = W::QUARTER_ROTATIONS;
    a = a.wrapping_add(b);
    d = (d ^ a).rotate_left(r0);
    c = c.wrapping_add(d);
    b = (b ^ c).rotate_left(r1);
    a = a.wrapping_add(b);
    d = (d ^ a).rotate_left(r2);
    c = c.wrapping_add(d);
    b = (b ^ c).rotate_left(r3);
    (a, b, c, d)
}

#[inline(always)]
fn chacha_quarter<W: HashWord>(index: W, seed: W) -> W {
    let (a, b, c, d) = quarter_round(index, seed, W::CHACHA[0], W::CHACHA[1]);
    let (a, b, c, d) = quarter_round(a, b, c, d);
    (a ^ c).wrapping_add(b ^ d)
}

#[inline(always)]
fn chacha_double<W: HashWord>(index: W, seed: W) -> W {
    let (mut a, mut b, mut c, mut d) = (index, W::CHACHA[2], seed, W::CHACHA[3]);
    for _ in 0..2 {
        (a, b, c, d) = quarter_round(a, b, c, d);
        (b, c, d, a) = quarter_round(b, c, d, a);
    }
    a.wrapping_add(b) ^ c.wrapping_add(d)
}
