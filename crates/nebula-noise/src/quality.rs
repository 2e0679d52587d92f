//! Statistical self-checks for the mixing schedules.
//!
//! These are the measurements used to accept a [`NoiseType`]: single-bit
//! avalanche on the index and on the seed, least-significant-bit balance,
//! and per-bit balance. They are deterministic (fixed sample schedule), so
//! a regression shows up as a changed number, never as flakiness.

use crate::hash::{HashWord, NoiseType, mix};

/// Accepted range for the mean fraction of output bits flipped by a
/// single-bit input change.
pub const AVALANCHE_BOUNDS: (f64, f64) = (0.40, 0.60);
/// Accepted range for the frequency of a set least-significant bit.
pub const LSB_BOUNDS: (f64, f64) = (0.46, 0.54);
/// Sample count used by the default checks.
pub const DEFAULT_SAMPLES: u64 = 8192;

const INDEX_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;
const SEED_STRIDE: u64 = 0xC2B2_AE3D_27D4_EB4F;
const SEED_OFFSET: u64 = 12_345;
const LSB_SEED: u64 = 42;

/// Mean fraction of output bits flipped per single-bit input flip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Avalanche {
    /// Flipping one bit of the index.
    pub index: f64,
    /// Flipping one bit of the seed.
    pub seed: f64,
}

/// Measure avalanche over `samples` pseudo-random `(index, seed)` pairs,
/// cycling the flipped bit through every position.
pub fn avalanche<W: HashWord>(kind: NoiseType, samples: u64) -> Avalanche {
    if samples == 0 {
        return Avalanche { index: 0.0, seed: 0.0 };
    }
    let mut index_flips = 0_u64;
    let mut seed_flips = 0_u64;
    for k in 0..samples {
        let index = W::from_u64(k.wrapping_mul(INDEX_STRIDE));
        let seed = W::from_u64(k.wrapping_mul(SEED_STRIDE).wrapping_add(SEED_OFFSET));
        let flip = W::from_u64(1) << (k % u64::from(W::BITS)) as u32;

        let base = mix(index, seed, kind);
        index_flips += u64::from((base ^ mix(index ^ flip, seed, kind)).count_ones());
        seed_flips += u64::from((base ^ mix(index, seed ^ flip, kind)).count_ones());
    }
    let total = (samples * u64::from(W::BITS)) as f64;
    Avalanche {
        index: index_flips as f64 / total,
        seed: seed_flips as f64 / total,
    }
}

/// Frequency of a set lowest bit over indices `0..samples` with a fixed seed.
pub fn lsb_frequency<W: HashWord>(kind: NoiseType, samples: u64) -> f64 {
    if samples == 0 {
        return 0.0;
    }
    let seed = W::from_u64(LSB_SEED);
    let ones = (0..samples)
        .filter(|&i| mix(W::from_u64(i), seed, kind).to_u64() & 1 == 1)
        .count();
    ones as f64 / samples as f64
}

/// Frequency of a set bit at every position (index 0 is the lowest bit),
/// over indices `0..samples` with a fixed seed.
pub fn bit_bias<W: HashWord>(kind: NoiseType, samples: u64) -> Vec<f64> {
    let mut counts = vec![0_u64; W::BITS as usize];
    let seed = W::from_u64(LSB_SEED);
    for i in 0..samples {
        let h = mix(W::from_u64(i), seed, kind).to_u64();
        for (bit, count) in counts.iter_mut().enumerate() {
            *count += (h >> bit) & 1;
        }
    }
    counts
        .into_iter()
        .map(|c| if samples == 0 { 0.0 } else { c as f64 / samples as f64 })
        .collect()
}

/// All measurements for one `(NoiseType, width)` pair.
#[derive(Clone, Debug, PartialEq)]
pub struct QualityReport {
    /// Schedule measured.
    pub kind: NoiseType,
    /// Word width in bits.
    pub bits: u32,
    /// Samples per measurement.
    pub samples: u64,
    /// Index and seed avalanche.
    pub avalanche: Avalanche,
    /// Least-significant-bit frequency.
    pub lsb_frequency: f64,
    /// Largest `|frequency - 0.5|` over all bit positions.
    pub worst_bit_bias: f64,
}

impl QualityReport {
    /// Run every measurement.
    pub fn measure<W: HashWord>(kind: NoiseType, samples: u64) -> Self {
        let worst_bit_bias = bit_bias::<W>(kind, samples)
            .into_iter()
            .map(|f| (f - 0.5).abs())
            .fold(0.0, f64::max);
        Self {
            kind,
            bits: W::BITS,
            samples,
            avalanche: avalanche::<W>(kind, samples),
            lsb_frequency: lsb_frequency::<W>(kind, samples),
            worst_bit_bias,
        }
    }

    /// `true` when avalanche and LSB frequency are inside their bounds.
    pub fn passes(&self) -> bool {
        let within = |v: f64, (lo, hi): (f64, f64)| (lo..=hi).contains(&v);
        within(self.avalanche.index, AVALANCHE_BOUNDS)
            && within(self.avalanche.seed, AVALANCHE_BOUNDS)
            && within(self.lsb_frequency, LSB_BOUNDS)
    }
}

/// Reports for every [`NoiseType`] at both widths.
pub fn measure_all(samples: u64) -> Vec<QualityReport> {
    NoiseType::ALL
        .into_iter()
        .flat_map(|kind| {
            [
                QualityReport::measure::<u32>(kind, samples),
                QualityReport::measure::<u64>(kind, samples),
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_schedule_avalanches() {
        for kind in NoiseType::ALL {
            for a in [avalanche::<u32>(kind, DEFAULT_SAMPLES), avalanche::<u64>(kind, DEFAULT_SAMPLES)] {
                assert!(
                    (0.4..=0.6).contains(&a.index),
                    "{kind} index avalanche out of bounds: {}",
                    a.index
                );
                assert!(
                    (0.4..=0.6).contains(&a.seed),
                    "{kind} seed avalanche out of bounds: {}",
                    a.seed
                );
            }
        }
    }

    #[test]
    fn test_every_schedule_has_balanced_lsb() {
        for kind in NoiseType::ALL {
            let narrow = lsb_frequency::<u32>(kind, DEFAULT_SAMPLES);
            let wide = lsb_frequency::<u64>(kind, DEFAULT_SAMPLES);
            assert!((0.46..=0.54).contains(&narrow), "{kind} 32-bit LSB frequency: {narrow}");
            assert!((0.46..=0.54).contains(&wide), "{kind} 64-bit LSB frequency: {wide}");
        }
    }

    #[test]
    fn test_reports_pass() {
        let reports = measure_all(DEFAULT_SAMPLES);
        assert_eq!(reports.len(), NoiseType::ALL.len() * 2);
        for report in &reports {
            assert!(report.passes(), "quality check failed: {report:?}");
            assert!(report.worst_bit_bias < 0.5);
        }
    }

    #[test]
    fn test_bit_bias_shape() {
        let bias = bit_bias::<u32>(NoiseType::Balanced, 1024);
        assert_eq!(bias.len(), 32);
        assert!(bias.iter().all(|f| (0.0..=1.0).contains(f)));
        assert_eq!(bias[0], lsb_frequency::<u32>(NoiseType::Balanced, 1024));
    }

    #[test]
    fn test_zero_samples() {
        assert_eq!(lsb_frequency::<u64>(NoiseType::ShiftXor, 0), 0.0);
        assert_eq!(avalanche::<u64>(NoiseType::ShiftXor, 0).index, 0.0);
        assert!(bit_bias::<u64>(NoiseType::ShiftXor, 0).iter().all(|&f| f == 0.0));
    }

    #[test]
    fn test_measurements_are_deterministic() {
        assert_eq!(
            QualityReport::measure::<u64>(NoiseType::Rotational, 2048),
            QualityReport::measure::<u64>(NoiseType::Rotational, 2048)
        );
    }
}
