//! Gradient (Perlin) lattice noise in 2D and 3D, with analytic derivatives.
//!
//! Each lattice corner is hashed through [`NoiseHasher`]; the top hash bits
//! pick a gradient from a fixed table. Corner contributions are blended with
//! the quintic [`fade`] curve, so the field is C2 continuous across cell
//! boundaries.
//!
//! Gradient tables:
//! - 2D: the four axis directions followed by the four diagonals, indexed by
//!   the top 3 bits.
//! - 3D: the twelve cube-edge midpoints padded to sixteen entries, indexed by
//!   the top 4 bits.

use glam::{IVec2, IVec3, Vec2, Vec3};

use crate::coords::NoiseHasher;
use crate::hash::HashWord;
use crate::math::{fade, fade_derivative, lerp};

const GRADIENTS_2D: [Vec2; 8] = [
    Vec2::new(1.0, 0.0),
    Vec2::new(-1.0, 0.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(0.0, -1.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(-1.0, 1.0),
    Vec2::new(1.0, -1.0),
    Vec2::new(-1.0, -1.0),
];

pub(crate) const GRADIENTS_3D: [Vec3; 16] = [
    Vec3::new(1.0, 1.0, 0.0),
    Vec3::new(-1.0, 1.0, 0.0),
    Vec3::new(1.0, -1.0, 0.0),
    Vec3::new(-1.0, -1.0, 0.0),
    Vec3::new(1.0, 0.0, 1.0),
    Vec3::new(-1.0, 0.0, 1.0),
    Vec3::new(1.0, 0.0, -1.0),
    Vec3::new(-1.0, 0.0, -1.0),
    Vec3::new(0.0, 1.0, 1.0),
    Vec3::new(0.0, -1.0, 1.0),
    Vec3::new(0.0, 1.0, -1.0),
    Vec3::new(0.0, -1.0, -1.0),
    Vec3::new(1.0, 1.0, 0.0),
    Vec3::new(0.0, -1.0, 1.0),
    Vec3::new(-1.0, 1.0, 0.0),
    Vec3::new(0.0, -1.0, -1.0),
];

/// Pseudo-random gradient for a 2D lattice corner.
#[inline]
pub(crate) fn gradient_2d<W: HashWord>(hasher: NoiseHasher<W>, corner: IVec2) -> Vec2 {
    GRADIENTS_2D[hasher.hash_ivec2(corner).top_bits(3) as usize]
}

/// Pseudo-random gradient for a 3D lattice corner.
#[inline]
pub(crate) fn gradient_3d<W: HashWord>(hasher: NoiseHasher<W>, corner: IVec3) -> Vec3 {
    GRADIENTS_3D[hasher.hash_ivec3(corner).top_bits(4) as usize]
}

/// A noise value together with its spatial gradient.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseSample<V> {
    /// The noise value.
    pub value: f32,
    /// Partial derivatives of the value along each axis.
    pub gradient: V,
}

/// 2D Perlin noise, approximately in `[-1, 1]`.
///
/// Lattice coordinates are `floor(point)` cast to `i32`; keep `|point|` well
/// inside the `i32` range.
pub fn perlin_2d<W: HashWord>(point: Vec2, hasher: NoiseHasher<W>) -> f32 {
    let cell = point.floor();
    let base = cell.as_ivec2();
    let f = point - cell;

    let n00 = gradient_2d(hasher, base).dot(f);
    let n10 = gradient_2d(hasher, base + IVec2::X).dot(f - Vec2::X);
    let n01 = gradient_2d(hasher, base + IVec2::Y).dot(f - Vec2::Y);
    let n11 = gradient_2d(hasher, base + IVec2::ONE).dot(f - Vec2::ONE);

    let u = fade(f.x);
    let v = fade(f.y);
    lerp(lerp(n00, n10, u), lerp(n01, n11, u), v)
}

/// 3D Perlin noise, approximately in `[-1, 1]`.
///
/// Lattice coordinates are `floor(point)` cast to `i32`; keep `|point|` well
/// inside the `i32` range.
pub fn perlin_3d<W: HashWord>(point: Vec3, hasher: NoiseHasher<W>) -> f32 {
    let cell = point.floor();
    let base = cell.as_ivec3();
    let f = point - cell;

    let corner = |offset: IVec3| gradient_3d(hasher, base + offset).dot(f - offset.as_vec3());
    let n000 = corner(IVec3::new(0, 0, 0));
    let n100 = corner(IVec3::new(1, 0, 0));
    let n010 = corner(IVec3::new(0, 1, 0));
    let n110 = corner(IVec3::new(1, 1, 0));
    let n001 = corner(IVec3::new(0, 0, 1));
    let n101 = corner(IVec3::new(1, 0, 1));
    let n011 = corner(IVec3::new(0, 1, 1));
    let n111 = corner(IVec3::new(1, 1, 1));

    let u = fade(f.x);
    let v = fade(f.y);
    let w = fade(f.z);
    let x00 = lerp(n000, n100, u);
    let x10 = lerp(n010, n110, u);
    let x01 = lerp(n001, n101, u);
    let x11 = lerp(n011, n111, u);
    lerp(lerp(x00, x10, v), lerp(x01, x11, v), w)
}

/// 2D Perlin noise with its analytic gradient.
///
/// The value is identical (up to rounding) to [`perlin_2d`].
pub fn perlin_2d_with_gradient<W: HashWord>(point: Vec2, hasher: NoiseHasher<W>) -> NoiseSample<Vec2> {
    let cell = point.floor();
    let base = cell.as_ivec2();
    let f = point - cell;

    let ga = gradient_2d(hasher, base);
    let gb = gradient_2d(hasher, base + IVec2::X);
    let gc = gradient_2d(hasher, base + IVec2::Y);
    let gd = gradient_2d(hasher, base + IVec2::ONE);

    let a = ga.dot(f);
    let b = gb.dot(f - Vec2::X);
    let c = gc.dot(f - Vec2::Y);
    let d = gd.dot(f - Vec2::ONE);

    let u = fade(f.x);
    let v = fade(f.y);
    let du = fade_derivative(f.x);
    let dv = fade_derivative(f.y);

    // value = a + k1*u + k2*v + k3*u*v
    let k1 = b - a;
    let k2 = c - a;
    let k3 = a - b - c + d;
    let value = a + k1 * u + k2 * v + k3 * u * v;

    let interpolated = ga + (gb - ga) * u + (gc - ga) * v + (ga - gb - gc + gd) * (u * v);
    let gradient = interpolated + Vec2::new(du * (k1 + k3 * v), dv * (k2 + k3 * u));

    NoiseSample { value, gradient }
}

/// 3D Perlin noise with its analytic gradient.
///
/// The value is identical (up to rounding) to [`perlin_3d`].
pub fn perlin_3d_with_gradient<W: HashWord>(point: Vec3, hasher: NoiseHasher<W>) -> NoiseSample<Vec3> {
    let cell = point.floor();
    let base = cell.as_ivec3();
    let f = point - cell;

    let grad = |offset: IVec3| gradient_3d(hasher, base + offset);
    let g000 = grad(IVec3::new(0, 0, 0));
    let g100 = grad(IVec3::new(1, 0, 0));
    let g010 = grad(IVec3::new(0, 1, 0));
    let g110 = grad(IVec3::new(1, 1, 0));
    let g001 = grad(IVec3::new(0, 0, 1));
    let g101 = grad(IVec3::new(1, 0, 1));
    let g011 = grad(IVec3::new(0, 1, 1));
    let g111 = grad(IVec3::new(1, 1, 1));

    let n000 = g000.dot(f);
    let n100 = g100.dot(f - Vec3::new(1.0, 0.0, 0.0));
    let n010 = g010.dot(f - Vec3::new(0.0, 1.0, 0.0));
    let n110 = g110.dot(f - Vec3::new(1.0, 1.0, 0.0));
    let n001 = g001.dot(f - Vec3::new(0.0, 0.0, 1.0));
    let n101 = g101.dot(f - Vec3::new(1.0, 0.0, 1.0));
    let n011 = g011.dot(f - Vec3::new(0.0, 1.0, 1.0));
    let n111 = g111.dot(f - Vec3::ONE);

    let u = fade(f.x);
    let v = fade(f.y);
    let w = fade(f.z);
    let du = fade_derivative(f.x);
    let dv = fade_derivative(f.y);
    let dw = fade_derivative(f.z);

    // Trilinear blend expanded into polynomial coefficients.
    let k0 = n000;
    let k1 = n100 - n000;
    let k2 = n010 - n000;
    let k3 = n001 - n000;
    let k4 = n000 - n100 - n010 + n110;
    let k5 = n000 - n010 - n001 + n011;
    let k6 = n000 - n100 - n001 + n101;
    let k7 = -n000 + n100 + n010 - n110 + n001 - n101 - n011 + n111;

    let value = k0 + k1 * u + k2 * v + k3 * w + k4 * u * v + k5 * v * w + k6 * w * u + k7 * u * v * w;

    let d0 = g000;
    let d1 = g100 - g000;
    let d2 = g010 - g000;
    let d3 = g001 - g000;
    let d4 = g000 - g100 - g010 + g110;
    let d5 = g000 - g010 - g001 + g011;
    let d6 = g000 - g100 - g001 + g101;
    let d7 = -g000 + g100 + g010 - g110 + g001 - g101 - g011 + g111;

    let interpolated =
        d0 + d1 * u + d2 * v + d3 * w + d4 * (u * v) + d5 * (v * w) + d6 * (w * u) + d7 * (u * v * w);
    let gradient = interpolated
        + Vec3::new(
            du * (k1 + k4 * v + k6 * w + k7 * v * w),
            dv * (k2 + k5 * w + k4 * u + k7 * w * u),
            dw * (k3 + k6 * u + k5 * v + k7 * u * v),
        );

    NoiseSample { value, gradient }
}

/// Central-difference gradient of any 2D field, for verifying analytic
/// derivatives.
pub fn finite_difference_2d(field: impl Fn(Vec2) -> f32, point: Vec2, epsilon: f32) -> Vec2 {
    let dx = Vec2::new(epsilon, 0.0);
    let dy = Vec2::new(0.0, epsilon);
    Vec2::new(
        (field(point + dx) - field(point - dx)) / (2.0 * epsilon),
        (field(point + dy) - field(point - dy)) / (2.0 * epsilon),
    )
}

/// Central-difference gradient of any 3D field, for verifying analytic
/// derivatives.
pub fn finite_difference_3d(field: impl Fn(Vec3) -> f32, point: Vec3, epsilon: f32) -> Vec3 {
    let axis = |a: Vec3| (field(point + a * epsilon) - field(point - a * epsilon)) / (2.0 * epsilon);
    Vec3::new(axis(Vec3::X), axis(Vec3::Y), axis(Vec3::Z))
}

/// Seeded Perlin generator.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Perlin<W: HashWord = u64> {
    /// Seed and mixing schedule for lattice corners.
    pub hasher: NoiseHasher<W>,
}

impl<W: HashWord> Perlin<W> {
    /// Create a generator.
    pub fn new(hasher: NoiseHasher<W>) -> Self {
        Self { hasher }
    }

    /// Sample at a 2D point.
    pub fn sample_2d(&self, point: Vec2) -> f32 {
        perlin_2d(point, self.hasher)
    }

    /// Sample at a 3D point.
    pub fn sample_3d(&self, point: Vec3) -> f32 {
        perlin_3d(point, self.hasher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::NoiseType;

    fn hasher() -> NoiseHasher<u32> {
        NoiseHasher::new(1337, NoiseType::Balanced)
    }

    #[test]
    fn test_zero_at_lattice_points() {
        let h = hasher();
        for x in -5..5 {
            for y in -5..5 {
                let p = Vec2::new(x as f32, y as f32);
                assert_eq!(perlin_2d(p, h), 0.0, "gradient noise must vanish at lattice point {p}");
                assert_eq!(perlin_3d(p.extend(2.0), h), 0.0);
            }
        }
    }

    #[test]
    fn test_continuity_across_lattice_boundaries() {
        let h = hasher();
        let eps = 1e-3;
        for k in -20..20 {
            for j in 0..10 {
                let edge = k as f32;
                let across = j as f32 * 0.37 + 0.11;
                let left = perlin_2d(Vec2::new(edge - eps, across), h);
                let right = perlin_2d(Vec2::new(edge + eps, across), h);
                assert!(
                    (left - right).abs() <= 1e-2,
                    "2D discontinuity at x={edge}: {left} vs {right}"
                );
                let below = perlin_3d(Vec3::new(across, edge - eps, 0.5), h);
                let above = perlin_3d(Vec3::new(across, edge + eps, 0.5), h);
                assert!(
                    (below - above).abs() <= 1e-2,
                    "3D discontinuity at y={edge}: {below} vs {above}"
                );
            }
        }
    }

    #[test]
    fn test_range() {
        let h = NoiseHasher::<u64>::from_seed(8);
        for i in 0..200 {
            for j in 0..200 {
                let p = Vec2::new(i as f32 * 0.173, j as f32 * 0.131);
                let v2 = perlin_2d(p, h);
                let v3 = perlin_3d(p.extend(i as f32 * 0.07), h);
                assert!(v2.abs() <= 1.05, "2D Perlin out of range: {v2}");
                assert!(v3.abs() <= 1.05, "3D Perlin out of range: {v3}");
            }
        }
    }

    #[test]
    fn test_seed_changes_field() {
        let a = Perlin::new(NoiseHasher::<u64>::from_seed(1));
        let b = Perlin::new(NoiseHasher::<u64>::from_seed(2));
        let differs = (0..50).any(|i| {
            let p = Vec2::new(i as f32 * 0.61 + 0.3, 0.45);
            a.sample_2d(p) != b.sample_2d(p)
        });
        assert!(differs, "different seeds should produce different fields");
    }

    #[test]
    fn test_gradient_value_matches_plain_2d() {
        let h = hasher();
        for i in 0..100 {
            let p = Vec2::new(i as f32 * 0.37 - 10.0, i as f32 * 0.23 - 7.0);
            let plain = perlin_2d(p, h);
            let sample = perlin_2d_with_gradient(p, h);
            assert!((plain - sample.value).abs() < 1e-5, "value mismatch at {p}");
        }
    }

    #[test]
    fn test_gradient_value_matches_plain_3d() {
        let h = hasher();
        for i in 0..100 {
            let p = Vec3::new(i as f32 * 0.37 - 10.0, i as f32 * 0.23 - 7.0, i as f32 * 0.11);
            let plain = perlin_3d(p, h);
            let sample = perlin_3d_with_gradient(p, h);
            assert!((plain - sample.value).abs() < 1e-5, "value mismatch at {p}");
        }
    }

    #[test]
    fn test_analytic_gradient_matches_finite_difference_2d() {
        let h = hasher();
        for i in 0..100 {
            let p = Vec2::new(i as f32 * 0.173 + 0.05, i as f32 * 0.291 - 3.05);
            let analytic = perlin_2d_with_gradient(p, h).gradient;
            let numeric = finite_difference_2d(|q| perlin_2d(q, h), p, 1e-3);
            assert!(
                (analytic - numeric).abs().max_element() < 2e-2,
                "2D gradient mismatch at {p}: analytic {analytic} vs numeric {numeric}"
            );
        }
    }

    #[test]
    fn test_analytic_gradient_matches_finite_difference_3d() {
        let h = hasher();
        for i in 0..100 {
            let p = Vec3::new(i as f32 * 0.173 + 0.05, i as f32 * 0.291 - 3.05, i as f32 * 0.117 + 0.4);
            let analytic = perlin_3d_with_gradient(p, h).gradient;
            let numeric = finite_difference_3d(|q| perlin_3d(q, h), p, 1e-3);
            assert!(
                (analytic - numeric).abs().max_element() < 2e-2,
                "3D gradient mismatch at {p}: analytic {analytic} vs numeric {numeric}"
            );
        }
    }

    #[test]
    fn test_both_widths_produce_valid_fields() {
        let narrow = Perlin::new(NoiseHasher::<u32>::from_seed(5));
        let wide = Perlin::new(NoiseHasher::<u64>::from_seed(5));
        let p = Vec3::new(0.3, 1.7, -2.2);
        assert!(narrow.sample_3d(p).is_finite());
        assert!(wide.sample_3d(p).is_finite());
    }
}
