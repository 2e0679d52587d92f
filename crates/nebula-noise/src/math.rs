//! Deterministic math helpers.
//!
//! Transcendental functions go through `libm` rather than the platform libc
//! so that trig, `exp` and `pow` round identically on every target. Pure
//! IEEE operations (`+ - * /`, `sqrt`, `floor`) are already exact and are
//! used directly.

/// Deterministic sine using libm.
#[inline]
pub fn det_sin(x: f32) -> f32 {
    libm::sinf(x)
}

/// Deterministic cosine using libm.
#[inline]
pub fn det_cos(x: f32) -> f32 {
    libm::cosf(x)
}

/// Deterministic two-argument arctangent using libm.
#[inline]
pub fn det_atan2(y: f32, x: f32) -> f32 {
    libm::atan2f(y, x)
}

/// Deterministic square root using libm.
#[inline]
pub fn det_sqrt(x: f32) -> f32 {
    libm::sqrtf(x)
}

/// Deterministic cube root using libm.
#[inline]
pub fn det_cbrt(x: f32) -> f32 {
    libm::cbrtf(x)
}

/// Deterministic `e^x` using libm.
#[inline]
pub fn det_exp(x: f32) -> f32 {
    libm::expf(x)
}

/// Deterministic natural logarithm using libm.
#[inline]
pub fn det_ln(x: f32) -> f32 {
    libm::logf(x)
}

/// Deterministic `base^exponent` using libm.
#[inline]
pub fn det_pow(base: f32, exponent: f32) -> f32 {
    libm::powf(base, exponent)
}

/// Quintic fade curve `6t^5 - 15t^4 + 10t^3`.
///
/// First and second derivatives vanish at `t = 0` and `t = 1`.
#[inline]
pub fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Derivative of [`fade`]: `30t^4 - 60t^3 + 30t^2`.
#[inline]
pub fn fade_derivative(t: f32) -> f32 {
    30.0 * t * t * (t * (t - 2.0) + 1.0)
}

/// Linear interpolation from `a` (at `t = 0`) to `b` (at `t = 1`).
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Hermite smoothstep of `x` between `edge0` and `edge1`, in `[0, 1]`.
///
/// A degenerate interval acts as a hard step at `edge0`.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge1 <= edge0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
