//! Floating-point helpers shared by the intersection kernel.
//!
//! Every comparison against zero in the renderer goes through [`align_zero`]
//! so that rounding noise from a previous computation (typically a ray that
//! starts on the surface it just left) is treated as an exact zero.

/// Values with a magnitude below this threshold are treated as zero.
pub const EPSILON: f64 = 1e-10;

/// Returns true if `value` is zero within [`EPSILON`].
#[inline]
pub fn is_zero(value: f64) -> bool {
    value.abs() < EPSILON
}

/// Rounds `value` to exactly `0.0` when it lies within [`EPSILON`] of zero.
#[inline]
pub fn align_zero(value: f64) -> f64 {
    if is_zero(value) {
        0.0
    } else {
        value
    }
}
