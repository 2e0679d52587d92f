//! Simplex noise in 2D and 3D.
//!
//! The sample is skewed into simplex space, the enclosing simplex's corners
//! are ordered by comparing the unskewed fractional coordinates, and each
//! corner contributes `(r^2 - |d|^2)^4 * (g . d)` with `r^2 = 0.5` (2D) or
//! `0.6` (3D). Gradients come from the same sixteen-entry cube-edge table as
//! 3D Perlin noise.

use glam::{IVec2, IVec3, Vec2, Vec3};

use crate::coords::NoiseHasher;
use crate::hash::HashWord;
use crate::perlin::GRADIENTS_3D;

/// Output scale that maps the 2D corner sum to roughly `[-1, 1]`.
pub const SIMPLEX_2D_SCALE: f32 = 70.0;
/// Output scale that maps the 3D corner sum to roughly `[-1, 1]`.
pub const SIMPLEX_3D_SCALE: f32 = 32.0;

// (sqrt(3) - 1) / 2 and (3 - sqrt(3)) / 6
const SKEW_2D: f32 = 0.366_025_42;
const UNSKEW_2D: f32 = 0.211_324_87;
const SKEW_3D: f32 = 1.0 / 3.0;
const UNSKEW_3D: f32 = 1.0 / 6.0;

#[inline]
fn corner_gradient<W: HashWord>(hash: W) -> Vec3 {
    GRADIENTS_3D[hash.top_bits(4) as usize]
}

#[inline]
fn falloff(radius_sq: f32, offset_sq: f32) -> f32 {
    let t = (radius_sq - offset_sq).max(0.0);
    let t2 = t * t;
    t2 * t2
}

/// 2D simplex noise, approximately in `[-1, 1]`.
///
/// Simplex cells are cast to `i32`; keep `|point|` well inside the `i32`
/// range.
pub fn simplex_2d<W: HashWord>(point: Vec2, hasher: NoiseHasher<W>) -> f32 {
    let skew = (point.x + point.y) * SKEW_2D;
    let cell = (point + Vec2::splat(skew)).floor();
    let base = cell.as_ivec2();
    let unskew = (cell.x + cell.y) * UNSKEW_2D;
    let d0 = point - (cell - Vec2::splat(unskew));

    let step = if d0.x > d0.y { IVec2::X } else { IVec2::Y };
    let d1 = d0 - step.as_vec2() + Vec2::splat(UNSKEW_2D);
    let d2 = d0 - Vec2::ONE + Vec2::splat(2.0 * UNSKEW_2D);

    let mut sum = 0.0;
    for (offset, d) in [(IVec2::ZERO, d0), (step, d1), (IVec2::ONE, d2)] {
        let weight = falloff(0.5, d.length_squared());
        if weight > 0.0 {
            let g = corner_gradient(hasher.hash_ivec2(base + offset)).truncate();
            sum += weight * g.dot(d);
        }
    }
    sum * SIMPLEX_2D_SCALE
}

/// 3D simplex noise, approximately in `[-1, 1]`.
///
/// Simplex cells are cast to `i32`; keep `|point|` well inside the `i32`
/// range.
pub fn simplex_3d<W: HashWord>(point: Vec3, hasher: NoiseHasher<W>) -> f32 {
    let skew = point.element_sum() * SKEW_3D;
    let cell = (point + Vec3::splat(skew)).floor();
    let base = cell.as_ivec3();
    let unskew = cell.element_sum() * UNSKEW_3D;
    let d0 = point - (cell - Vec3::splat(unskew));

    let (first, second) = simplex_order_3d(d0);
    let corners = [IVec3::ZERO, first, second, IVec3::ONE];

    let mut sum = 0.0;
    for (rank, offset) in corners.into_iter().enumerate() {
        let d = d0 - offset.as_vec3() + Vec3::splat(rank as f32 * UNSKEW_3D);
        let weight = falloff(0.6, d.length_squared());
        if weight > 0.0 {
            let g = corner_gradient(hasher.hash_ivec3(base + offset));
            sum += weight * g.dot(d);
        }
    }
    sum * SIMPLEX_3D_SCALE
}

/// Offsets of the second and third corners of the 3D simplex containing `d`.
fn simplex_order_3d(d: Vec3) -> (IVec3, IVec3) {
    if d.x >= d.y {
        if d.y >= d.z {
            (IVec3::X, IVec3::new(1, 1, 0))
        } else if d.x >= d.z {
            (IVec3::X, IVec3::new(1, 0, 1))
        } else {
            (IVec3::Z, IVec3::new(1, 0, 1))
        }
    } else if d.y < d.z {
        (IVec3::Z, IVec3::new(0, 1, 1))
    } else if d.x < d.z {
        (IVec3::Y, IVec3::new(0, 1, 1))
    } else {
        (IVec3::Y, IVec3::new(1, 1, 0))
    }
}

/// Seeded simplex generator.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Simplex<W: HashWord = u64> {
    /// Seed and mixing schedule for simplex corners.
    pub hasher: NoiseHasher<W>,
}

impl<W: HashWord> Simplex<W> {
    /// Create a generator.
    pub fn new(hasher: NoiseHasher<W>) -> Self {
        Self { hasher }
    }

    /// Sample at a 2D point.
    pub fn sample_2d(&self, point: Vec2) -> f32 {
        simplex_2d(point, self.hasher)
    }

    /// Sample at a 3D point.
    pub fn sample_3d(&self, point: Vec3) -> f32 {
        simplex_3d(point, self.hasher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::NoiseType;

    #[test]
    fn test_simplex_deterministic() {
        let a = Simplex::new(NoiseHasher::<u32>::new(42, NoiseType::ShiftXor));
        let b = Simplex::new(NoiseHasher::<u32>::new(42, NoiseType::ShiftXor));
        for i in 0..100 {
            let p = Vec3::new(i as f32 * 0.1, i as f32 * 0.13, i as f32 * -0.07);
            assert_eq!(a.sample_3d(p), b.sample_3d(p));
            assert_eq!(a.sample_2d(p.truncate()), b.sample_2d(p.truncate()));
        }
    }

    #[test]
    fn test_simplex_range() {
        let h = NoiseHasher::<u64>::from_seed(7);
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for i in 0..300 {
            for j in 0..300 {
                let p = Vec2::new(i as f32 * 0.047, j as f32 * 0.053);
                let v2 = simplex_2d(p, h);
                let v3 = simplex_3d(p.extend((i + j) as f32 * 0.021), h);
                min = min.min(v2).min(v3);
                max = max.max(v2).max(v3);
            }
        }
        assert!(min >= -1.05 && max <= 1.05, "simplex out of range: [{min}, {max}]");
        assert!(max - min > 0.5, "simplex output suspiciously flat: [{min}, {max}]");
    }

    #[test]
    fn test_simplex_is_continuous() {
        let h = NoiseHasher::<u64>::from_seed(3);
        let eps = 1e-3;
        for i in 0..2000 {
            let p = Vec2::new(i as f32 * 0.0173 - 5.0, 0.37);
            let a = simplex_2d(p, h);
            let b = simplex_2d(p + Vec2::new(eps, 0.0), h);
            assert!((a - b).abs() < 2e-2, "simplex jump at {p}: {a} vs {b}");
        }
    }

    #[test]
    fn test_simplex_order_covers_all_permutations() {
        let cases = [
            (Vec3::new(0.3, 0.2, 0.1), IVec3::X, IVec3::new(1, 1, 0)),
            (Vec3::new(0.3, 0.1, 0.2), IVec3::X, IVec3::new(1, 0, 1)),
            (Vec3::new(0.2, 0.1, 0.3), IVec3::Z, IVec3::new(1, 0, 1)),
            (Vec3::new(0.1, 0.2, 0.3), IVec3::Z, IVec3::new(0, 1, 1)),
            (Vec3::new(0.1, 0.3, 0.2), IVec3::Y, IVec3::new(0, 1, 1)),
            (Vec3::new(0.2, 0.3, 0.1), IVec3::Y, IVec3::new(1, 1, 0)),
        ];
        for (d, first, second) in cases {
            assert_eq!(simplex_order_3d(d), (first, second), "wrong traversal for {d}");
        }
    }

    #[test]
    fn test_simplex_large_in_range_coordinates() {
        let h = NoiseHasher::<u64>::from_seed(9);
        for v in [1.0e9_f32, -1.0e9] {
            let a = simplex_2d(Vec2::new(v, 0.25), h);
            let b = simplex_3d(Vec3::new(v, 0.25, -0.5), h);
            assert!(a.is_finite() && b.is_finite(), "non-finite simplex sample at {v}");
        }
    }

    #[test]
    fn test_simplex_differs_from_perlin() {
        let h = NoiseHasher::<u64>::from_seed(1);
        let p = Vec2::new(1.3, 2.7);
        assert_ne!(simplex_2d(p, h), crate::perlin::perlin_2d(p, h));
    }
}
