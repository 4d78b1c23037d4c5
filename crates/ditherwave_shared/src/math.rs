//! Scalar helpers shared by the compositor and the modulation driver.

use crate::color::Color;
use crate::constants::LUMA_WEIGHTS;

/// Linear interpolation between `a` and `b`.
///
/// `t = 0` returns `a`, `t = 1` returns `b`. `t` is not clamped.
#[inline]
#[must_use]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    (1.0 - t) * a + t * b
}

/// Weighted brightness of a color (Rec. 601 weights).
#[inline]
#[must_use]
pub fn luma(color: Color) -> f32 {
    LUMA_WEIGHTS[0] * color.r + LUMA_WEIGHTS[1] * color.g + LUMA_WEIGHTS[2] * color.b
}
