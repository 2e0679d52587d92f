//! `noise` crate interop.
//!
//! Every generator implements [`noise::NoiseFn`] for `[f64; 2]` and
//! `[f64; 3]`, so it can be fed to noise-rs combinators and modifiers.
//! Coordinates are narrowed to `f32` before sampling.

use glam::{Vec2, Vec3};
use noise::NoiseFn;

use crate::cellular::Cellular;
use crate::fractal::Fractal;
use crate::hash::HashWord;
use crate::perlin::Perlin;
use crate::simplex::Simplex;
use crate::warp::{DomainWarp, Uber};

macro_rules! impl_noise_fn {
    ($($generator:ident),* $(,)?) => {
        $(
            impl<W: HashWord> NoiseFn<f64, 2> for $generator<W> {
                fn get(&self, point: [f64; 2]) -> f64 {
                    let p = Vec2::new(point[0] as f32, point[1] as f32);
                    f64::from(self.sample_2d(p))
                }
            }

            impl<W: HashWord> NoiseFn<f64, 3> for $generator<W> {
                fn get(&self, point: [f64; 3]) -> f64 {
                    let p = Vec3::new(point[0] as f32, point[1] as f32, point[2] as f32);
                    f64::from(self.sample_3d(p))
                }
            }
        )*
    };
}

impl_noise_fn!(Perlin, Simplex, Fractal, Cellular, DomainWarp, Uber);
