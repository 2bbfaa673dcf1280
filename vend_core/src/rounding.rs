//! Decimal rounding for reported figures.
//!
//! Two tie rules are in use. Accuracies and speeds round half away from zero
//! (`f64::round`). Signed comparisons (improvement percent, vibration delta)
//! round half up toward +∞, so `-62.5` becomes `-62`. Both agree on
//! non-negative values. None of the helpers panic on non-finite input.

/// Round `x` to `places` decimal digits, half away from zero.
#[inline]
pub fn round_places(x: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (x * factor).round() / factor
}

/// Round to the nearest integer with ties toward +∞.
///
/// `floor(x + 0.5)` misrounds the largest double below 0.5, so the tie is
/// decided on the exact fractional part instead.
#[inline]
pub fn round_half_up(x: f64) -> f64 {
    let r = x.floor();
    if x - r >= 0.5 { r + 1.0 } else { r }
}

/// Round `x` to `places` decimal digits, ties toward +∞.
#[inline]
pub fn round_half_up_places(x: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    round_half_up(x * factor) / factor
}

fn clamp_to_i64(r: f64) -> i64 {
    if r >= i64::MAX as f64 {
        i64::MAX
    } else if r <= i64::MIN as f64 {
        i64::MIN
    } else {
        r as i64
    }
}

/// Round half away from zero, clamping to the `i64` range.
/// Returns `None` for NaN/±Inf.
#[inline]
pub fn round_to_i64(x: f64) -> Option<i64> {
    x.is_finite().then(|| clamp_to_i64(x.round()))
}

/// Round with ties toward +∞, clamping to the `i64` range.
/// Returns `None` for NaN/±Inf.
#[inline]
pub fn round_half_up_to_i64(x: f64) -> Option<i64> {
    x.is_finite().then(|| clamp_to_i64(round_half_up(x)))
}
