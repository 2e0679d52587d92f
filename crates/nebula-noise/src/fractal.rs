//! Multi-octave fractal composition over Perlin or Simplex noise.
//!
//! Every octave samples the base noise at `frequency * lacunarity^i` with a
//! hasher re-seeded by the octave index, and weights it by
//! `amplitude * gain^i`. Three combinators are provided:
//!
//! - **fBm**: plain weighted sum.
//! - **Billow**: `|n| * 2 - 1` per octave, folding negative lobes upward.
//! - **Ridge**: `max(offset - |n|, 0)^sharpness`, multiplied by a weight
//!   carried over from the previous octave so ridges connect across scales.
//!
//! With `normalize` set, the sum is divided by the total octave amplitude,
//! which keeps results near `[-1, 1]` regardless of octave count.

use std::fmt;
use std::str::FromStr;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::coords::NoiseHasher;
use crate::hash::HashWord;
use crate::math::det_pow;
use crate::perlin::{perlin_2d, perlin_3d};
use crate::simplex::{simplex_2d, simplex_3d};

/// Carry factor applied to a ridge octave before it weights the next one.
const RIDGE_WEIGHT_CARRY: f32 = 0.9;

/// Gradient noise sampled by each fractal octave.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseNoise {
    /// Lattice gradient noise.
    #[default]
    Perlin,
    /// Simplex-lattice gradient noise.
    Simplex,
}

impl BaseNoise {
    /// Every base noise, in declaration order.
    pub const ALL: [BaseNoise; 2] = [BaseNoise::Perlin, BaseNoise::Simplex];

    /// Sample the base noise at a 2D point.
    #[inline]
    pub fn sample_2d<W: HashWord>(self, point: Vec2, hasher: NoiseHasher<W>) -> f32 {
        match self {
            BaseNoise::Perlin => perlin_2d(point, hasher),
            BaseNoise::Simplex => simplex_2d(point, hasher),
        }
    }

    /// Sample the base noise at a 3D point.
    #[inline]
    pub fn sample_3d<W: HashWord>(self, point: Vec3, hasher: NoiseHasher<W>) -> f32 {
        match self {
            BaseNoise::Perlin => perlin_3d(point, hasher),
            BaseNoise::Simplex => simplex_3d(point, hasher),
        }
    }

    /// Stable lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            BaseNoise::Perlin => "perlin",
            BaseNoise::Simplex => "simplex",
        }
    }
}

impl fmt::Display for BaseNoise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a string does not name a [`BaseNoise`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown base noise `{0}` (expected perlin or simplex)")]
pub struct ParseBaseNoiseError(pub String);

impl FromStr for BaseNoise {
    type Err = ParseBaseNoiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        BaseNoise::ALL
            .into_iter()
            .find(|base| base.name() == normalized)
            .ok_or_else(|| ParseBaseNoiseError(s.to_string()))
    }
}

/// How octaves are combined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FractalKind {
    /// Fractional Brownian motion.
    #[default]
    Fbm,
    /// Absolute-value folded fBm.
    Billow,
    /// Inverted, sharpened and weighted ridges.
    Ridge,
}

/// Octave settings shared by every [`FractalKind`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FractalParams {
    /// Noise sampled by each octave.
    pub base: BaseNoise,
    /// Number of octaves. Zero yields a constant `0.0`.
    pub octaves: u32,
    /// Frequency of the first octave.
    pub frequency: f32,
    /// Amplitude of the first octave.
    pub amplitude: f32,
    /// Frequency multiplier between octaves.
    pub lacunarity: f32,
    /// Amplitude multiplier between octaves.
    pub gain: f32,
    /// Ridge only: value `|n|` is subtracted from.
    pub ridge_offset: f32,
    /// Ridge only: exponent applied to each ridge octave.
    pub ridge_sharpness: f32,
    /// Divide by the total octave amplitude.
    pub normalize: bool,
}

impl Default for FractalParams {
    fn default() -> Self {
        Self {
            base: BaseNoise::Perlin,
            octaves: 5,
            frequency: 1.0,
            amplitude: 1.0,
            lacunarity: 2.0,
            gain: 0.5,
            ridge_offset: 1.0,
            ridge_sharpness: 2.0,
            normalize: true,
        }
    }
}

impl FractalParams {
    /// `amplitude * sum(gain^i)` over the configured octaves.
    pub fn amplitude_sum(&self) -> f32 {
        let mut sum = 0.0;
        let mut amplitude = self.amplitude;
        for _ in 0..self.octaves {
            sum += amplitude;
            amplitude *= self.gain;
        }
        sum
    }
}

/// Run the octave loop. `sample` receives the octave frequency and hasher.
fn accumulate<W, F>(hasher: NoiseHasher<W>, params: &FractalParams, kind: FractalKind, sample: F) -> f32
where
    W: HashWord,
    F: Fn(f32, NoiseHasher<W>) -> f32,
{
    let mut sum = 0.0;
    let mut frequency = params.frequency;
    let mut amplitude = params.amplitude;
    let mut amplitude_sum = 0.0;
    let mut weight = 1.0;

    for octave in 0..params.octaves {
        let n = sample(frequency, hasher.reseed(u64::from(octave)));
        let contribution = match kind {
            FractalKind::Fbm => n,
            FractalKind::Billow => n.abs() * 2.0 - 1.0,
            FractalKind::Ridge => {
                let ridge = (params.ridge_offset - n.abs()).max(0.0);
                let r = det_pow(ridge, params.ridge_sharpness) * weight;
                weight = (r * RIDGE_WEIGHT_CARRY).clamp(0.0, 1.0);
                r
            }
        };
        sum += contribution * amplitude;
        amplitude_sum += amplitude;

        frequency *= params.lacunarity;
        amplitude *= params.gain;
    }

    if params.normalize && amplitude_sum > 0.0 {
        sum / amplitude_sum
    } else {
        sum
    }
}

/// Fractal noise at a 2D point.
pub fn fractal_2d<W: HashWord>(
    point: Vec2,
    hasher: NoiseHasher<W>,
    params: &FractalParams,
    kind: FractalKind,
) -> f32 {
    accumulate(hasher, params, kind, |frequency, h| {
        params.base.sample_2d(point * frequency, h)
    })
}

/// Fractal noise at a 3D point.
pub fn fractal_3d<W: HashWord>(
    point: Vec3,
    hasher: NoiseHasher<W>,
    params: &FractalParams,
    kind: FractalKind,
) -> f32 {
    accumulate(hasher, params, kind, |frequency, h| {
        params.base.sample_3d(point * frequency, h)
    })
}

/// fBm at a 2D point.
pub fn fbm_2d<W: HashWord>(point: Vec2, hasher: NoiseHasher<W>, params: &FractalParams) -> f32 {
    fractal_2d(point, hasher, params, FractalKind::Fbm)
}

/// fBm at a 3D point.
pub fn fbm_3d<W: HashWord>(point: Vec3, hasher: NoiseHasher<W>, params: &FractalParams) -> f32 {
    fractal_3d(point, hasher, params, FractalKind::Fbm)
}

/// Billow at a 2D point.
pub fn billow_2d<W: HashWord>(point: Vec2, hasher: NoiseHasher<W>, params: &FractalParams) -> f32 {
    fractal_2d(point, hasher, params, FractalKind::Billow)
}

/// Billow at a 3D point.
pub fn billow_3d<W: HashWord>(point: Vec3, hasher: NoiseHasher<W>, params: &FractalParams) -> f32 {
    fractal_3d(point, hasher, params, FractalKind::Billow)
}

/// Ridge at a 2D point.
pub fn ridge_2d<W: HashWord>(point: Vec2, hasher: NoiseHasher<W>, params: &FractalParams) -> f32 {
    fractal_2d(point, hasher, params, FractalKind::Ridge)
}

/// Ridge at a 3D point.
pub fn ridge_3d<W: HashWord>(point: Vec3, hasher: NoiseHasher<W>, params: &FractalParams) -> f32 {
    fractal_3d(point, hasher, params, FractalKind::Ridge)
}

/// Seeded fractal generator.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Fractal<W: HashWord = u64> {
    /// Base hasher; octaves derive theirs with `reseed(octave)`.
    pub hasher: NoiseHasher<W>,
    /// Octave settings.
    pub params: FractalParams,
    /// Combinator.
    pub kind: FractalKind,
}

impl<W: HashWord> Fractal<W> {
    /// Create a generator.
    pub fn new(hasher: NoiseHasher<W>, params: FractalParams, kind: FractalKind) -> Self {
        Self {
            hasher,
            params,
            kind,
        }
    }

    /// Sample at a 2D point.
    pub fn sample_2d(&self, point: Vec2) -> f32 {
        fractal_2d(point, self.hasher, &self.params, self.kind)
    }

    /// Sample at a 3D point.
    pub fn sample_3d(&self, point: Vec3) -> f32 {
        fractal_3d(point, self.hasher, &self.params, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::NoiseType;

    const KINDS: [FractalKind; 3] = [FractalKind::Fbm, FractalKind::Billow, FractalKind::Ridge];

    #[test]
    fn test_fractal_deterministic() {
        let h = NoiseHasher::<u64>::from_seed(42);
        let params = FractalParams::default();
        for kind in KINDS {
            for i in 0..50 {
                let p = Vec3::new(i as f32 * 0.31, i as f32 * -0.17, 2.0);
                assert_eq!(
                    fractal_3d(p, h, &params, kind),
                    fractal_3d(p, h, &params, kind),
                    "{kind:?} must be deterministic"
                );
            }
        }
    }

    #[test]
    fn test_normalized_range() {
        let h = NoiseHasher::<u64>::new(1337, NoiseType::Balanced);
        for base in BaseNoise::ALL {
            let params = FractalParams {
                base,
                octaves: 6,
                frequency: 0.8,
                ..Default::default()
            };
            for kind in KINDS {
                for i in 0..120 {
                    for j in 0..120 {
                        let p = Vec2::new(i as f32 * 0.061, j as f32 * 0.057);
                        let v2 = fractal_2d(p, h, &params, kind);
                        let v3 = fractal_3d(p.extend(0.5 * i as f32), h, &params, kind);
                        assert!(
                            (-1.2..=1.2).contains(&v2) && (-1.2..=1.2).contains(&v3),
                            "{base}/{kind:?} out of range at {p}: {v2}, {v3}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_zero_octaves_is_zero() {
        let h = NoiseHasher::<u32>::from_seed(5);
        let params = FractalParams {
            octaves: 0,
            ..Default::default()
        };
        for kind in KINDS {
            assert_eq!(fractal_2d(Vec2::new(0.3, 0.7), h, &params, kind), 0.0);
        }
    }

    #[test]
    fn test_single_octave_fbm_is_base_noise() {
        let h = NoiseHasher::<u64>::from_seed(8);
        let params = FractalParams {
            octaves: 1,
            frequency: 2.5,
            amplitude: 3.0,
            normalize: false,
            ..Default::default()
        };
        let p = Vec2::new(0.37, 1.91);
        let expected = perlin_2d(p * 2.5, h.reseed(0)) * 3.0;
        assert!((fbm_2d(p, h, &params) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_zero_amplitude_falls_back_to_raw_sum() {
        let h = NoiseHasher::<u64>::from_seed(8);
        let params = FractalParams {
            amplitude: 0.0,
            ..Default::default()
        };
        assert_eq!(params.amplitude_sum(), 0.0);
        let v = fbm_3d(Vec3::new(1.1, 2.2, 3.3), h, &params);
        assert!(v.is_finite(), "zero amplitude sum must not divide by zero");
        assert_eq!(v, 0.0);
    }

    #[test]
    fn test_amplitude_sum() {
        let params = FractalParams {
            octaves: 3,
            amplitude: 2.0,
            gain: 0.5,
            ..Default::default()
        };
        assert!((params.amplitude_sum() - 3.5).abs() < 1e-6);
    }

    #[test]
    fn test_ridge_non_negative() {
        let h = NoiseHasher::<u64>::from_seed(99);
        let params = FractalParams::default();
        for i in 0..500 {
            let p = Vec2::new(i as f32 * 0.113, i as f32 * 0.071);
            let v = ridge_2d(p, h, &params);
            assert!((0.0..=1.0).contains(&v), "normalized ridge out of [0, 1]: {v}");
        }
    }

    #[test]
    fn test_billow_folds_single_octave() {
        let h = NoiseHasher::<u64>::from_seed(4);
        let params = FractalParams {
            octaves: 1,
            normalize: false,
            ..Default::default()
        };
        let p = Vec3::new(0.4, 0.9, 1.6);
        let n = perlin_3d(p, h.reseed(0));
        assert!((billow_3d(p, h, &params) - (n.abs() * 2.0 - 1.0)).abs() < 1e-6);
    }

    #[test]
    fn test_octaves_are_decorrelated() {
        let h = NoiseHasher::<u64>::from_seed(12);
        let p = Vec2::new(0.45, 0.85);
        assert_ne!(perlin_2d(p, h.reseed(0)), perlin_2d(p, h.reseed(1)));
    }

    #[test]
    fn test_generator_matches_free_functions() {
        let h = NoiseHasher::<u32>::new(3, NoiseType::ChaChaQuarter);
        let params = FractalParams {
            base: BaseNoise::Simplex,
            ..Default::default()
        };
        let fractal = Fractal::new(h, params, FractalKind::Ridge);
        let p = Vec3::new(2.0, -1.5, 0.25);
        assert_eq!(fractal.sample_3d(p), ridge_3d(p, h, &params));
        assert_eq!(fractal.sample_2d(p.truncate()), ridge_2d(p.truncate(), h, &params));
    }

    #[test]
    fn test_base_noise_parse() {
        assert_eq!("Simplex".parse::<BaseNoise>(), Ok(BaseNoise::Simplex));
        assert_eq!(BaseNoise::Perlin.to_string(), "perlin");
        assert!("value".parse::<BaseNoise>().is_err());
    }
}
