//! Hash bits to floating-point ranges.
//!
//! Only the top mantissa-width bits of a hash are used, so the division by
//! `2^bits` is exact and `to_unit` can never round up to `1.0`.

use crate::hash::HashWord;

const F32_MANTISSA_BITS: u32 = 24;
const F64_MANTISSA_BITS: u32 = 53;

/// Map hash bits to `[0, 1)` as `f32`.
#[inline]
pub fn to_unit<W: HashWord>(hash: W) -> f32 {
    hash.top_bits(F32_MANTISSA_BITS) as f32 * (1.0 / (1_u32 << F32_MANTISSA_BITS) as f32)
}

/// Map hash bits to `[-1, 1)` as `f32`.
#[inline]
pub fn to_signed<W: HashWord>(hash: W) -> f32 {
    to_unit(hash) * 2.0 - 1.0
}

/// Map hash bits to `[0, 1)` as `f64`.
///
/// 32-bit hashes are used whole (`h / 2^32`); 64-bit hashes keep their top
/// 53 bits.
#[inline]
pub fn to_unit_f64<W: HashWord>(hash: W) -> f64 {
    let bits = W::BITS.min(F64_MANTISSA_BITS);
    let top = hash.to_u64() >> (W::BITS - bits);
    top as f64 / (1_u64 << bits) as f64
}

/// Map hash bits to `[-1, 1)` as `f64`.
#[inline]
pub fn to_signed_f64<W: HashWord>(hash: W) -> f64 {
    to_unit_f64(hash) * 2.0 - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_bounds() {
        assert_eq!(to_unit(0_u32), 0.0);
        assert_eq!(to_unit(0_u64), 0.0);
        assert!(to_unit(u32::MAX) < 1.0, "u32::MAX must stay below 1.0");
        assert!(to_unit(u64::MAX) < 1.0, "u64::MAX must stay below 1.0");
        assert!(to_unit_f64(u32::MAX) < 1.0);
        assert!(to_unit_f64(u64::MAX) < 1.0);
    }

    #[test]
    fn test_unit_f64_is_exact_division_for_u32() {
        let h = 0x8000_0001_u32;
        assert_eq!(to_unit_f64(h), f64::from(h) / 4_294_967_296.0);
    }

    #[test]
    fn test_half_maps_to_half() {
        assert_eq!(to_unit(0x8000_0000_u32), 0.5);
        assert_eq!(to_unit(0x8000_0000_0000_0000_u64), 0.5);
        assert_eq!(to_signed(0x8000_0000_u32), 0.0);
    }

    #[test]
    fn test_signed_bounds() {
        assert_eq!(to_signed(0_u64), -1.0);
        let top = to_signed(u64::MAX);
        assert!(top < 1.0 && top > 0.999_999, "signed max out of range: {top}");
        assert_eq!(to_signed_f64(0_u32), -1.0);
    }

    #[test]
    fn test_widths_agree_on_top_bits() {
        // Same top 24 bits produce the same f32 regardless of width.
        let narrow = 0xABCD_EF12_u32;
        let wide = 0xABCD_EF12_0000_0000_u64;
        assert_eq!(to_unit(narrow), to_unit(wide));
    }
}
