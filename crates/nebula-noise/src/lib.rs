//! Deterministic, position-addressable noise: integer hashing, gradient and
//! cellular noise, fractal composition, domain warping, and a seekable RNG.
//!
//! Every sampling function is a pure function of `(coordinate, seed,
//! NoiseType)` and is generic over the hash width (`u32` or `u64`).

mod cellular;
mod convert;
mod coords;
mod field;
mod fractal;
mod hash;
mod perlin;
mod rng;
mod simplex;
mod warp;

pub mod grid;
pub mod interop;
pub mod math;
pub mod quality;

pub use cellular::{
    Cellular, CellularOutput, CellularParams, CellularResult, CellularResult2, CellularResult3,
    DistanceMetric, ParseMetricError, cellular_2d, cellular_3d,
};
pub use convert::{to_signed, to_signed_f64, to_unit, to_unit_f64};
pub use coords::{
    NoiseHasher, fold1, fold2, fold3, fold4, signed_noise, unit_noise, unit_noise_2d,
    unit_noise_3d, unit_noise_4d,
};
pub use field::NoiseField;
pub use fractal::{
    BaseNoise, Fractal, FractalKind, FractalParams, ParseBaseNoiseError, billow_2d, billow_3d,
    fbm_2d, fbm_3d, fractal_2d, fractal_3d, ridge_2d, ridge_3d,
};
pub use hash::{HashWord, NoiseType, ParseNoiseTypeError, mix};
pub use perlin::{
    NoiseSample, Perlin, finite_difference_2d, finite_difference_3d, perlin_2d,
    perlin_2d_with_gradient, perlin_3d, perlin_3d_with_gradient,
};
pub use rng::NoiseRng;
pub use simplex::{SIMPLEX_2D_SCALE, SIMPLEX_3D_SCALE, Simplex, simplex_2d, simplex_3d};
pub use warp::{
    DomainWarp, Uber, UberParams, WarpParams, domain_warp_2d, domain_warp_3d, uber_2d, uber_3d,
    warp_offset_2d, warp_offset_3d, warp_point_2d, warp_point_3d,
};
