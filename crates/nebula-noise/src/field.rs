//! Object-safe sampling interface shared by every generator.

use glam::{Vec2, Vec3};

use crate::cellular::Cellular;
use crate::fractal::Fractal;
use crate::hash::HashWord;
use crate::perlin::Perlin;
use crate::simplex::Simplex;
use crate::warp::{DomainWarp, Uber};

/// A scalar field that can be sampled at 2D and 3D points.
///
/// Implementations are pure: the same point always yields the same value,
/// from any thread. Hosts that pick a generator at runtime hold a
/// `Box<dyn NoiseField>`.
pub trait NoiseField: Send + Sync {
    /// Sample at a 2D point.
    fn sample_2d(&self, point: Vec2) -> f32;

    /// Sample at a 3D point.
    fn sample_3d(&self, point: Vec3) -> f32;
}

macro_rules! impl_noise_field {
    ($($generator:ident),* $(,)?) => {
        $(
            impl<W: HashWord> NoiseField for $generator<W> {
                #[inline]
                fn sample_2d(&self, point: Vec2) -> f32 {
                    $generator::sample_2d(self, point)
                }

                #[inline]
                fn sample_3d(&self, point: Vec3) -> f32 {
                    $generator::sample_3d(self, point)
                }
            }
        )*
    };
}

impl_noise_field!(Perlin, Simplex, Fractal, Cellular, DomainWarp, Uber);

impl<F: NoiseField + ?Sized> NoiseField for &F {
    fn sample_2d(&self, point: Vec2) -> f32 {
        (**self).sample_2d(point)
    }

    fn sample_3d(&self, point: Vec3) -> f32 {
        (**self).sample_3d(point)
    }
}

impl<F: NoiseField + ?Sized> NoiseField for Box<F> {
    fn sample_2d(&self, point: Vec2) -> f32 {
        (**self).sample_2d(point)
    }

    fn sample_3d(&self, point: Vec3) -> f32 {
        (**self).sample_3d(point)
    }
}
