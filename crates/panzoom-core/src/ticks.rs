//! Discrete logarithmic zoom.
//!
//! Scale is never compounded directly. Every zoom request is snapped to an
//! integer number of ticks from the identity, where `sensitivity` ticks make
//! one octave, so zooming in and back out by the same number of ticks lands
//! on exactly the same scale (and tick 0 is exactly 1.0).

use crate::consts::MAX_ZOOM_OCTAVES;

/// Convert a tick count to a device:image scale, `2^(ticks / sensitivity)`.
///
/// `sensitivity` must be at least 1; zero is treated as 1.
pub fn ticks_to_scale(ticks: i32, sensitivity: u32) -> f64 {
    let s = f64::from(sensitivity.max(1));
    (f64::from(ticks) / s).exp2()
}

/// Convert a scale to the nearest tick count at `sensitivity`.
///
/// Rounding is symmetric about zero. Scales below 1 go through
/// `log2(1/scale)` so both halves of the range are computed the same way.
/// `scale` must be finite and positive.
pub fn scale_to_ticks(scale: f64, sensitivity: u32) -> i32 {
    let s = f64::from(sensitivity.max(1));
    if scale >= 1.0 {
        (scale.log2() * s).round() as i32
    } else {
        -((1.0 / scale).log2() * s).round() as i32
    }
}

/// Clamp a tick count to [`MAX_ZOOM_OCTAVES`] octaves either side of zero.
pub fn clamp_ticks(ticks: i32, sensitivity: u32) -> i32 {
    let limit = (i64::from(MAX_ZOOM_OCTAVES) * i64::from(sensitivity.max(1)))
        .min(i64::from(i32::MAX)) as i32;
    ticks.clamp(-limit, limit)
}

/// Snap `scale` to the tick grid, returning the ticks and the snapped scale.
/// The result is clamped like [`clamp_ticks`].
pub fn quantize_scale(scale: f64, sensitivity: u32) -> (i32, f64) {
    let ticks = clamp_ticks(scale_to_ticks(scale, sensitivity), sensitivity);
    (ticks, ticks_to_scale(ticks, sensitivity))
}
