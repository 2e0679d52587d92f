//! Row-major batch sampling over a regular 2D grid.
//!
//! Sampling is a pure map from pixel coordinates to field values, so a host
//! can split the rows of one [`GridSpec`] across any number of workers with
//! [`sample_rows`] and stitch the results back together in row order.

use std::ops::Range;

use glam::Vec2;

/// A `width` x `height` lattice of sample points starting at `origin`,
/// spaced `step` apart on both axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSpec {
    /// Samples per row.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
    /// Position of sample `(0, 0)`.
    pub origin: Vec2,
    /// Distance between neighbouring samples.
    pub step: f32,
}

impl GridSpec {
    /// Grid with its first sample at `origin`.
    pub fn new(width: u32, height: u32, origin: Vec2, step: f32) -> Self {
        Self {
            width,
            height,
            origin,
            step,
        }
    }

    /// Grid of `width` x `height` samples covering `extent` units horizontally,
    /// centred on `center`.
    pub fn centered(width: u32, height: u32, center: Vec2, extent: f32) -> Self {
        let step = if width > 0 { extent / width as f32 } else { 0.0 };
        let half = Vec2::new(width as f32, height as f32) * step * 0.5;
        Self::new(width, height, center - half, step)
    }

    /// Total number of samples.
    pub fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// `true` when the grid has no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Position of sample `(x, y)`.
    #[inline]
    pub fn point(&self, x: u32, y: u32) -> Vec2 {
        self.origin + Vec2::new(x as f32, y as f32) * self.step
    }

    /// All sample positions in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Vec2> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| self.point(x, y)))
    }
}

/// Sample every grid point, row-major.
pub fn sample_grid(spec: &GridSpec, field: impl Fn(Vec2) -> f32) -> Vec<f32> {
    sample_rows(spec, 0..spec.height, field)
}

/// Sample rows `rows` (clamped to the grid), row-major.
pub fn sample_rows(spec: &GridSpec, rows: Range<u32>, field: impl Fn(Vec2) -> f32) -> Vec<f32> {
    let rows = rows.start.min(spec.height)..rows.end.min(spec.height);
    let mut values = Vec::with_capacity(rows.len() * spec.width as usize);
    for y in rows {
        for x in 0..spec.width {
            values.push(field(spec.point(x, y)));
        }
    }
    values
}

/// Summary statistics of a batch of samples.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueRange {
    /// Smallest value.
    pub min: f32,
    /// Largest value.
    pub max: f32,
    /// Arithmetic mean.
    pub mean: f32,
}

impl ValueRange {
    /// Map `value` from `[min, max]` to `[0, 1]`. A flat range maps to `0.5`.
    pub fn normalize(&self, value: f32) -> f32 {
        let span = self.max - self.min;
        if span > 0.0 {
            ((value - self.min) / span).clamp(0.0, 1.0)
        } else {
            0.5
        }
    }
}

/// Min, max and mean of `values`, ignoring non-finite entries. `None` when
/// nothing finite remains.
pub fn value_range(values: &[f32]) -> Option<ValueRange> {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    let mut sum = 0.0_f64;
    let mut count = 0_usize;
    for &v in values.iter().filter(|v| v.is_finite()) {
        min = min.min(v);
        max = max.max(v);
        sum += f64::from(v);
        count += 1;
    }
    (count > 0).then(|| ValueRange {
        min,
        max,
        mean: (sum / count as f64) as f32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::NoiseHasher;
    use crate::perlin::perlin_2d;

    #[test]
    fn test_points_are_row_major() {
        let spec = GridSpec::new(3, 2, Vec2::new(1.0, 2.0), 0.5);
        let points: Vec<Vec2> = spec.points().collect();
        assert_eq!(points.len(), spec.len());
        assert_eq!(points[0], Vec2::new(1.0, 2.0));
        assert_eq!(points[1], Vec2::new(1.5, 2.0));
        assert_eq!(points[3], Vec2::new(1.0, 2.5));
        assert_eq!(points[5], Vec2::new(2.0, 2.5));
    }

    #[test]
    fn test_rows_concatenate_to_grid() {
        let h = NoiseHasher::<u64>::from_seed(17);
        let spec = GridSpec::centered(32, 24, Vec2::ZERO, 4.0);
        let field = |p: Vec2| perlin_2d(p, h);
        let whole = sample_grid(&spec, field);
        let mut stitched = sample_rows(&spec, 0..10, field);
        stitched.extend(sample_rows(&spec, 10..24, field));
        assert_eq!(whole, stitched, "row batches must reproduce the full grid");
    }

    #[test]
    fn test_rows_clamped_to_grid() {
        let spec = GridSpec::new(4, 4, Vec2::ZERO, 1.0);
        assert_eq!(sample_rows(&spec, 2..100, |_| 1.0).len(), 8);
        assert!(sample_rows(&spec, 10..20, |_| 1.0).is_empty());
    }

    #[test]
    fn test_centered_grid() {
        let spec = GridSpec::centered(4, 2, Vec2::new(10.0, 10.0), 8.0);
        assert_eq!(spec.step, 2.0);
        assert_eq!(spec.origin, Vec2::new(6.0, 8.0));
        assert!(GridSpec::centered(0, 0, Vec2::ZERO, 1.0).is_empty());
    }

    #[test]
    fn test_value_range() {
        let stats = value_range(&[1.0, -2.0, f32::NAN, 4.0]).expect("finite values present");
        assert_eq!(stats.min, -2.0);
        assert_eq!(stats.max, 4.0);
        assert!((stats.mean - 1.0).abs() < 1e-6);
        assert_eq!(stats.normalize(1.0), 0.5);
        assert!(value_range(&[]).is_none());
        assert!(value_range(&[f32::INFINITY]).is_none());
    }

    #[test]
    fn test_flat_range_normalizes_to_half() {
        let stats = value_range(&[3.0, 3.0]).expect("non-empty");
        assert_eq!(stats.normalize(3.0), 0.5);
    }
}
