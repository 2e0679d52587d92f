//! Cellular (Worley) noise: distances to one jittered feature point per cell.
//!
//! The query point is scaled by `frequency`, and the 3x3 (2D) or 3x3x3 (3D)
//! block of cells around it is scanned. Each cell's feature point sits at
//! `cell + jitter * hash + (1 - jitter) / 2` per axis, so `jitter = 0` puts
//! every feature at its cell centre. The nearest (`F1`) and second-nearest
//! (`F2`) distances are tracked under the chosen [`DistanceMetric`]; all
//! distances are in scaled (cell) units.

use std::fmt;
use std::str::FromStr;

use glam::{IVec2, IVec3, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::coords::NoiseHasher;
use crate::hash::HashWord;
use crate::math::{det_exp, smoothstep};

// ---------------------------------------------------------------------------
// DistanceMetric
// ---------------------------------------------------------------------------

/// Distance function used to compare the query point with feature points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Straight-line distance `|d|`.
    #[default]
    Euclidean,
    /// Sum of absolute components.
    Manhattan,
    /// Largest absolute component.
    Chebyshev,
}

impl DistanceMetric {
    /// Every metric, in declaration order.
    pub const ALL: [DistanceMetric; 3] = [
        DistanceMetric::Euclidean,
        DistanceMetric::Manhattan,
        DistanceMetric::Chebyshev,
    ];

    /// Distance of a 2D offset.
    #[inline]
    pub fn distance_2d(self, d: Vec2) -> f32 {
        match self {
            DistanceMetric::Euclidean => d.length(),
            DistanceMetric::Manhattan => d.abs().element_sum(),
            DistanceMetric::Chebyshev => d.abs().max_element(),
        }
    }

    /// Distance of a 3D offset.
    #[inline]
    pub fn distance_3d(self, d: Vec3) -> f32 {
        match self {
            DistanceMetric::Euclidean => d.length(),
            DistanceMetric::Manhattan => d.abs().element_sum(),
            DistanceMetric::Chebyshev => d.abs().max_element(),
        }
    }

    /// Stable lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            DistanceMetric::Euclidean => "euclidean",
            DistanceMetric::Manhattan => "manhattan",
            DistanceMetric::Chebyshev => "chebyshev",
        }
    }

    /// Largest `F1` a query can see in `dims` dimensions, given `jitter`.
    ///
    /// Feature points stay within `0.5 * (1 + jitter)` of their cell centre
    /// along each axis; the bound is that per-axis reach combined under the
    /// metric.
    pub fn max_distance(self, dims: u32, jitter: f32) -> f32 {
        let reach = 0.5 * (1.0 + jitter.clamp(0.0, 1.0));
        match self {
            DistanceMetric::Euclidean => reach * (dims as f32).sqrt(),
            DistanceMetric::Manhattan => reach * dims as f32,
            DistanceMetric::Chebyshev => reach,
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a string does not name a [`DistanceMetric`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown distance metric `{0}` (expected euclidean, manhattan or chebyshev)")]
pub struct ParseMetricError(pub String);

impl FromStr for DistanceMetric {
    type Err = ParseMetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        DistanceMetric::ALL
            .into_iter()
            .find(|metric| metric.name() == normalized)
            .ok_or_else(|| ParseMetricError(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Configuration for cellular noise and its derived signals.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellularParams {
    /// Cells per unit of input space.
    pub frequency: f32,
    /// Feature displacement from the cell centre, clamped to `[0, 1]`.
    pub jitter: f32,
    /// Distance function.
    pub metric: DistanceMetric,
    /// Width of the `F2 - F1` band that counts as a vein.
    pub edge_width: f32,
    /// Steepness of the exponential vein falloff.
    pub vein_contrast: f32,
}

impl Default for CellularParams {
    fn default() -> Self {
        Self::wormy()
    }
}

impl CellularParams {
    /// Organic, tunnel-like veins: full jitter, Euclidean distance.
    pub fn wormy() -> Self {
        Self {
            frequency: 1.0,
            jitter: 1.0,
            metric: DistanceMetric::Euclidean,
            edge_width: 0.1,
            vein_contrast: 4.0,
        }
    }

    /// Crystalline, block-like cells: moderate jitter, Chebyshev distance.
    pub fn blocky() -> Self {
        Self {
            frequency: 1.0,
            jitter: 0.35,
            metric: DistanceMetric::Chebyshev,
            edge_width: 0.05,
            vein_contrast: 8.0,
        }
    }

    /// Largest expected `F1` for these settings in `dims` dimensions.
    pub fn max_distance(&self, dims: u32) -> f32 {
        self.metric.max_distance(dims, self.jitter)
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Nearest and second-nearest feature distances for one query.
///
/// Invariant: `0 <= f1 <= f2`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellularResult<V, C> {
    /// Distance to the nearest feature point.
    pub f1: f32,
    /// Distance to the second-nearest feature point.
    pub f2: f32,
    /// Position of the nearest feature point, in scaled space.
    pub feature_point: V,
    /// Integer cell owning the nearest feature point.
    pub cell: C,
}

/// 2D cellular query result.
pub type CellularResult2 = CellularResult<Vec2, IVec2>;
/// 3D cellular query result.
pub type CellularResult3 = CellularResult<Vec3, IVec3>;

impl<V, C> CellularResult<V, C> {
    /// `F2 - F1`, zero on cell borders.
    #[inline]
    pub fn edge(&self) -> f32 {
        self.f2 - self.f1
    }

    /// `F1` divided by `max_distance`, clamped to `[0, 1]`.
    #[inline]
    pub fn fill(&self, max_distance: f32) -> f32 {
        if max_distance <= 0.0 {
            return 0.0;
        }
        (self.f1 / max_distance).clamp(0.0, 1.0)
    }

    /// Smooth `[0, 1]` vein signal: 1 on cell borders, 0 once `F2 - F1`
    /// exceeds `edge_width`. A non-positive width keeps only the borders.
    #[inline]
    pub fn vein(&self, edge_width: f32) -> f32 {
        if edge_width <= 0.0 {
            return border_only(self.edge());
        }
        1.0 - smoothstep(0.0, edge_width, self.edge())
    }

    /// Exponential vein: `exp(-contrast * (F2 - F1) / edge_width)`.
    #[inline]
    pub fn vein_sharp(&self, edge_width: f32, contrast: f32) -> f32 {
        if edge_width <= 0.0 {
            return border_only(self.edge());
        }
        det_exp(-contrast * self.edge() / edge_width).clamp(0.0, 1.0)
    }

    /// [`fill`](Self::fill) remapped to `[-1, 1]`.
    #[inline]
    pub fn signed_fill(&self, max_distance: f32) -> f32 {
        self.fill(max_distance) * 2.0 - 1.0
    }

    /// [`vein`](Self::vein) remapped to `[-1, 1]`.
    #[inline]
    pub fn signed_vein(&self, edge_width: f32) -> f32 {
        self.vein(edge_width) * 2.0 - 1.0
    }

    /// [`vein_sharp`](Self::vein_sharp) remapped to `[-1, 1]`.
    #[inline]
    pub fn signed_vein_sharp(&self, edge_width: f32, contrast: f32) -> f32 {
        self.vein_sharp(edge_width, contrast) * 2.0 - 1.0
    }
}

#[inline]
fn border_only(edge: f32) -> f32 {
    if edge <= 0.0 { 1.0 } else { 0.0 }
}

/// Tracks the two smallest distances seen so far.
struct NearestTwo<V, C> {
    f1: f32,
    f2: f32,
    feature_point: V,
    cell: C,
}

impl<V: Copy, C: Copy> NearestTwo<V, C> {
    fn new(feature_point: V, cell: C) -> Self {
        Self {
            f1: f32::MAX,
            f2: f32::MAX,
            feature_point,
            cell,
        }
    }

    #[inline]
    fn offer(&mut self, distance: f32, feature_point: V, cell: C) {
        if distance < self.f1 {
            self.f2 = self.f1;
            self.f1 = distance;
            self.feature_point = feature_point;
            self.cell = cell;
        } else if distance < self.f2 {
            self.f2 = distance;
        }
    }

    fn finish(self) -> CellularResult<V, C> {
        CellularResult {
            f1: self.f1,
            f2: self.f2,
            feature_point: self.feature_point,
            cell: self.cell,
        }
    }
}

/// Feature point of a 2D cell. Each axis uses its own hash of the cell.
#[inline]
fn feature_point_2d<W: HashWord>(hasher: NoiseHasher<W>, cell: IVec2, jitter: f32) -> Vec2 {
    let bias = (1.0 - jitter) * 0.5;
    let (x, y) = (i64::from(cell.x), i64::from(cell.y));
    let offset = Vec2::new(hasher.unit3(x, y, 0), hasher.unit3(x, y, 1));
    cell.as_vec2() + offset * jitter + Vec2::splat(bias)
}

/// Feature point of a 3D cell. Each axis uses its own hash of the cell.
#[inline]
fn feature_point_3d<W: HashWord>(hasher: NoiseHasher<W>, cell: IVec3, jitter: f32) -> Vec3 {
    let bias = (1.0 - jitter) * 0.5;
    let (x, y, z) = (i64::from(cell.x), i64::from(cell.y), i64::from(cell.z));
    let offset = Vec3::new(
        hasher.unit4(x, y, z, 0),
        hasher.unit4(x, y, z, 1),
        hasher.unit4(x, y, z, 2),
    );
    cell.as_vec3() + offset * jitter + Vec3::splat(bias)
}

/// 2D cellular noise at `point`.
///
/// Cells are `floor(point * frequency)` cast to `i32`; keep
/// `|point * frequency|` well inside the `i32` range.
pub fn cellular_2d<W: HashWord>(
    point: Vec2,
    hasher: NoiseHasher<W>,
    frequency: f32,
    jitter: f32,
    metric: DistanceMetric,
) -> CellularResult2 {
    let jitter = jitter.clamp(0.0, 1.0);
    let q = point * frequency;
    let base = q.floor().as_ivec2();

    let mut nearest = NearestTwo::new(Vec2::ZERO, base);
    for dy in -1..=1 {
        for dx in -1..=1 {
            let cell = base + IVec2::new(dx, dy);
            let feature = feature_point_2d(hasher, cell, jitter);
            nearest.offer(metric.distance_2d(feature - q), feature, cell);
        }
    }
    nearest.finish()
}

/// 3D cellular noise at `point`.
///
/// Cells are `floor(point * frequency)` cast to `i32`; keep
/// `|point * frequency|` well inside the `i32` range.
pub fn cellular_3d<W: HashWord>(
    point: Vec3,
    hasher: NoiseHasher<W>,
    frequency: f32,
    jitter: f32,
    metric: DistanceMetric,
) -> CellularResult3 {
    let jitter = jitter.clamp(0.0, 1.0);
    let q = point * frequency;
    let base = q.floor().as_ivec3();

    let mut nearest = NearestTwo::new(Vec3::ZERO, base);
    for dz in -1..=1 {
        for dy in -1..=1 {
            for dx in -1..=1 {
                let cell = base + IVec3::new(dx, dy, dz);
                let feature = feature_point_3d(hasher, cell, jitter);
                nearest.offer(metric.distance_3d(feature - q), feature, cell);
            }
        }
    }
    nearest.finish()
}

// ---------------------------------------------------------------------------
// Scalar outputs
// ---------------------------------------------------------------------------

/// Which scalar a [`Cellular`] generator reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellularOutput {
    /// Nearest distance.
    #[default]
    F1,
    /// Second-nearest distance.
    F2,
    /// `F2 - F1`.
    Edge,
    /// Normalized `F1` in `[0, 1]`.
    Fill,
    /// Smooth vein in `[0, 1]`.
    Vein,
    /// Exponential vein in `[0, 1]`.
    VeinSharp,
    /// Normalized `F1` in `[-1, 1]`.
    SignedFill,
    /// Smooth vein in `[-1, 1]`.
    SignedVein,
    /// Exponential vein in `[-1, 1]`.
    SignedVeinSharp,
}

impl CellularOutput {
    /// Reduce a query result to this scalar.
    pub fn apply<V, C>(self, result: &CellularResult<V, C>, params: &CellularParams, dims: u32) -> f32 {
        match self {
            CellularOutput::F1 => result.f1,
            CellularOutput::F2 => result.f2,
            CellularOutput::Edge => result.edge(),
            CellularOutput::Fill => result.fill(params.max_distance(dims)),
            CellularOutput::Vein => result.vein(params.edge_width),
            CellularOutput::VeinSharp => result.vein_sharp(params.edge_width, params.vein_contrast),
            CellularOutput::SignedFill => result.signed_fill(params.max_distance(dims)),
            CellularOutput::SignedVein => result.signed_vein(params.edge_width),
            CellularOutput::SignedVeinSharp => {
                result.signed_vein_sharp(params.edge_width, params.vein_contrast)
            }
        }
    }
}

/// Seeded cellular generator reporting one [`CellularOutput`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Cellular<W: HashWord = u64> {
    /// Seed and mixing schedule for feature points.
    pub hasher: NoiseHasher<W>,
    /// Frequency, jitter, metric and vein settings.
    pub params: CellularParams,
    /// Scalar reported by `sample_*`.
    pub output: CellularOutput,
}

impl<W: HashWord> Cellular<W> {
    /// Create a generator.
    pub fn new(hasher: NoiseHasher<W>, params: CellularParams, output: CellularOutput) -> Self {
        Self {
            hasher,
            params,
            output,
        }
    }

    /// Full 2D query.
    pub fn query_2d(&self, point: Vec2) -> CellularResult2 {
        cellular_2d(point, self.hasher, self.params.frequency, self.params.jitter, self.params.metric)
    }

    /// Full 3D query.
    pub fn query_3d(&self, point: Vec3) -> CellularResult3 {
        cellular_3d(point, self.hasher, self.params.frequency, self.params.jitter, self.params.metric)
    }

    /// Selected scalar at a 2D point.
    pub fn sample_2d(&self, point: Vec2) -> f32 {
        self.output.apply(&self.query_2d(point), &self.params, 2)
    }

    /// Selected scalar at a 3D point.
    pub fn sample_3d(&self, point: Vec3) -> f32 {
        self.output.apply(&self.query_3d(point), &self.params, 3)
    }
}
