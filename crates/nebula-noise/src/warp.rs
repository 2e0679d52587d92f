//! Domain warping and the composite "uber" field.
//!
//! A warp samples one fBm per axis, each from its own re-seeded hasher, and
//! displaces the query point by that vector before the target fractal is
//! evaluated. With zero warp amplitude the displaced point is the input
//! point, so the result is exactly the target fractal.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::coords::NoiseHasher;
use crate::fractal::{FractalKind, FractalParams, fractal_2d, fractal_3d};
use crate::hash::HashWord;

/// Salt for the per-axis warp hashers; axis `i` uses `WARP_AXIS_SALT + i`.
const WARP_AXIS_SALT: u64 = 0x7761_7270_0000_0000;
const UBER_FIRST_WARP_SALT: u64 = 0x7562_6572_0000_0001;
const UBER_SECOND_WARP_SALT: u64 = 0x7562_6572_0000_0002;
const UBER_RIDGE_SALT: u64 = 0x7562_6572_0000_0003;

/// Settings for the displacement field of a domain warp.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarpParams {
    /// Scale applied to the displacement vector.
    pub amplitude: f32,
    /// Frequency of the displacement fBm.
    pub frequency: f32,
    /// Octaves of the displacement fBm.
    pub octaves: u32,
}

impl Default for WarpParams {
    fn default() -> Self {
        Self {
            amplitude: 0.5,
            frequency: 0.5,
            octaves: 3,
        }
    }
}

impl WarpParams {
    /// Normalized fBm settings for one displacement axis. Base noise,
    /// lacunarity and gain follow the target fractal.
    fn displacement(&self, target: &FractalParams) -> FractalParams {
        FractalParams {
            octaves: self.octaves,
            frequency: self.frequency,
            amplitude: 1.0,
            normalize: true,
            ..*target
        }
    }
}

/// Displacement vector at a 2D point, before amplitude scaling.
pub fn warp_offset_2d<W: HashWord>(
    point: Vec2,
    hasher: NoiseHasher<W>,
    warp: &WarpParams,
    target: &FractalParams,
) -> Vec2 {
    let field = warp.displacement(target);
    Vec2::new(
        fractal_2d(point, hasher.reseed(WARP_AXIS_SALT), &field, FractalKind::Fbm),
        fractal_2d(point, hasher.reseed(WARP_AXIS_SALT + 1), &field, FractalKind::Fbm),
    )
}

/// Displacement vector at a 3D point, before amplitude scaling.
pub fn warp_offset_3d<W: HashWord>(
    point: Vec3,
    hasher: NoiseHasher<W>,
    warp: &WarpParams,
    target: &FractalParams,
) -> Vec3 {
    let field = warp.displacement(target);
    Vec3::new(
        fractal_3d(point, hasher.reseed(WARP_AXIS_SALT), &field, FractalKind::Fbm),
        fractal_3d(point, hasher.reseed(WARP_AXIS_SALT + 1), &field, FractalKind::Fbm),
        fractal_3d(point, hasher.reseed(WARP_AXIS_SALT + 2), &field, FractalKind::Fbm),
    )
}

/// Warped point: `point + amplitude * offset(point)`.
#[inline]
pub fn warp_point_2d<W: HashWord>(
    point: Vec2,
    hasher: NoiseHasher<W>,
    warp: &WarpParams,
    target: &FractalParams,
) -> Vec2 {
    if warp.amplitude == 0.0 {
        return point;
    }
    point + warp_offset_2d(point, hasher, warp, target) * warp.amplitude
}

/// Warped point: `point + amplitude * offset(point)`.
#[inline]
pub fn warp_point_3d<W: HashWord>(
    point: Vec3,
    hasher: NoiseHasher<W>,
    warp: &WarpParams,
    target: &FractalParams,
) -> Vec3 {
    if warp.amplitude == 0.0 {
        return point;
    }
    point + warp_offset_3d(point, hasher, warp, target) * warp.amplitude
}

/// Target fractal evaluated at the warped 2D point.
pub fn domain_warp_2d<W: HashWord>(
    point: Vec2,
    hasher: NoiseHasher<W>,
    warp: &WarpParams,
    target: &FractalParams,
    kind: FractalKind,
) -> f32 {
    let q = warp_point_2d(point, hasher, warp, target);
    fractal_2d(q, hasher, target, kind)
}

/// Target fractal evaluated at the warped 3D point.
pub fn domain_warp_3d<W: HashWord>(
    point: Vec3,
    hasher: NoiseHasher<W>,
    warp: &WarpParams,
    target: &FractalParams,
    kind: FractalKind,
) -> f32 {
    let q = warp_point_3d(point, hasher, warp, target);
    fractal_3d(q, hasher, target, kind)
}

/// Seeded domain-warp generator.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DomainWarp<W: HashWord = u64> {
    /// Hasher for the target fractal; warp axes derive their own.
    pub hasher: NoiseHasher<W>,
    /// Displacement settings.
    pub warp: WarpParams,
    /// Fractal evaluated at the displaced point.
    pub target: FractalParams,
    /// Combinator of the target fractal.
    pub kind: FractalKind,
}

impl<W: HashWord> DomainWarp<W> {
    /// Create a generator.
    pub fn new(hasher: NoiseHasher<W>, warp: WarpParams, target: FractalParams, kind: FractalKind) -> Self {
        Self {
            hasher,
            warp,
            target,
            kind,
        }
    }

    /// Sample at a 2D point.
    pub fn sample_2d(&self, point: Vec2) -> f32 {
        domain_warp_2d(point, self.hasher, &self.warp, &self.target, self.kind)
    }

    /// Sample at a 3D point.
    pub fn sample_3d(&self, point: Vec3) -> f32 {
        domain_warp_3d(point, self.hasher, &self.warp, &self.target, self.kind)
    }
}

// ---------------------------------------------------------------------------
// Uber noise
// ---------------------------------------------------------------------------

/// Settings for the composite field: two chained warps, then fBm minus a
/// scaled ridge term.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UberParams {
    /// Octave settings for the fBm and ridge terms.
    pub fractal: FractalParams,
    /// Broad first warp.
    pub warp: WarpParams,
    /// Finer warp applied to the already-warped point.
    pub second_warp: WarpParams,
    /// Weight of the ridge term subtracted from the fBm.
    pub ridge_mix: f32,
    /// Frequency multiplier for the ridge term.
    pub ridge_scale: f32,
}

impl Default for UberParams {
    fn default() -> Self {
        Self {
            fractal: FractalParams::default(),
            warp: WarpParams::default(),
            second_warp: WarpParams {
                amplitude: 0.25,
                frequency: 1.0,
                octaves: 2,
            },
            ridge_mix: 0.35,
            ridge_scale: 2.0,
        }
    }
}

/// Composite noise at a 2D point, clamped to `[-1, 1]`.
pub fn uber_2d<W: HashWord>(point: Vec2, hasher: NoiseHasher<W>, params: &UberParams) -> f32 {
    let fractal = &params.fractal;
    let q1 = warp_point_2d(point, hasher.reseed(UBER_FIRST_WARP_SALT), &params.warp, fractal);
    let q2 = warp_point_2d(q1, hasher.reseed(UBER_SECOND_WARP_SALT), &params.second_warp, fractal);
    let base = fractal_2d(q2, hasher, fractal, FractalKind::Fbm);
    let ridge = fractal_2d(
        q2 * params.ridge_scale,
        hasher.reseed(UBER_RIDGE_SALT),
        fractal,
        FractalKind::Ridge,
    );
    (base - params.ridge_mix * ridge).clamp(-1.0, 1.0)
}

/// Composite noise at a 3D point, clamped to `[-1, 1]`.
pub fn uber_3d<W: HashWord>(point: Vec3, hasher: NoiseHasher<W>, params: &UberParams) -> f32 {
    let fractal = &params.fractal;
    let q1 = warp_point_3d(point, hasher.reseed(UBER_FIRST_WARP_SALT), &params.warp, fractal);
    let q2 = warp_point_3d(q1, hasher.reseed(UBER_SECOND_WARP_SALT), &params.second_warp, fractal);
    let base = fractal_3d(q2, hasher, fractal, FractalKind::Fbm);
    let ridge = fractal_3d(
        q2 * params.ridge_scale,
        hasher.reseed(UBER_RIDGE_SALT),
        fractal,
        FractalKind::Ridge,
    );
    (base - params.ridge_mix * ridge).clamp(-1.0, 1.0)
}

/// Seeded composite generator.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Uber<W: HashWord = u64> {
    /// Base hasher.
    pub hasher: NoiseHasher<W>,
    /// Composite settings.
    pub params: UberParams,
}

impl<W: HashWord> Uber<W> {
    /// Create a generator.
    pub fn new(hasher: NoiseHasher<W>, params: UberParams) -> Self {
        Self { hasher, params }
    }

    /// Sample at a 2D point.
    pub fn sample_2d(&self, point: Vec2) -> f32 {
        uber_2d(point, self.hasher, &self.params)
    }

    /// Sample at a 3D point.
    pub fn sample_3d(&self, point: Vec3) -> f32 {
        uber_3d(point, self.hasher, &self.params)
    }
}
