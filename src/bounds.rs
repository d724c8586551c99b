//! Travel limits, clamping and the rubber-band resistance curve.
//!
//! Content is laid out centered in the canvas, so a translation of zero keeps
//! it centered. On each axis the content may travel by half of the amount it
//! overflows the canvas; content smaller than the canvas cannot move.
//!
//! Resistance beyond a limit follows an exponential saturation:
//!
//! ```text
//! rubber_band(d, r) = sign(d) · r · (1 − e^(−|d| / r))
//! ```
//!
//! It has slope 1 at the limit, so entering the elastic zone causes no visible
//! jump, and it never exceeds `r`.

#[cfg(test)]
#[path = "bounds_test.rs"]
mod bounds_test;

use crate::config::ZoomRange;
use crate::consts;
use crate::geometry::{Size, Vector};

/// Maximum translation from center per axis for content drawn at `scale`.
#[must_use]
pub fn travel_limit(canvas: Size, content: Size, scale: f64) -> Vector {
    let scaled = content.scale(scale);
    Vector::new(
        ((scaled.width - canvas.width) * 0.5).max(0.0),
        ((scaled.height - canvas.height) * 0.5).max(0.0),
    )
}

/// Clamp `offset` into `[-limit, limit]` per axis.
#[must_use]
pub fn clamp_offset(offset: Vector, limit: Vector) -> Vector {
    Vector::new(offset.x.clamp(-limit.x, limit.x), offset.y.clamp(-limit.y, limit.y))
}

/// Whether `offset` lies within `[-limit, limit]` on both axes.
#[must_use]
pub fn is_within(offset: Vector, limit: Vector) -> bool {
    offset.x.abs() <= limit.x && offset.y.abs() <= limit.y
}

/// Diminishing displacement for an `overshoot` past a limit.
#[must_use]
pub fn rubber_band(overshoot: f64, range: f64) -> f64 {
    if range <= 0.0 || !overshoot.is_finite() {
        return 0.0;
    }
    overshoot.signum() * range * (1.0 - (-overshoot.abs() / range).exp())
}

/// Clamp `value` into `[-limit, limit]`, letting the excess through the
/// resistance curve.
#[must_use]
pub fn rubber_band_axis(value: f64, limit: f64, range: f64) -> f64 {
    let clamped = value.clamp(-limit, limit);
    clamped + rubber_band(value - clamped, range)
}

/// Apply [`rubber_band_axis`] on both axes, with a resistance range
/// proportional to the canvas dimension on that axis.
#[must_use]
pub fn rubber_band_offset(offset: Vector, limit: Vector, canvas: Size, overscroll_fraction: f64) -> Vector {
    Vector::new(
        rubber_band_axis(offset.x, limit.x, canvas.width * overscroll_fraction),
        rubber_band_axis(offset.y, limit.y, canvas.height * overscroll_fraction),
    )
}

/// Soft-clamp a zoom multiplier into `range`.
///
/// Inside the range the value passes through unchanged. Outside, it saturates
/// toward `range.min × ZOOM_BOUNCE_MIN_FACTOR` below and
/// `range.max × ZOOM_BOUNCE_MAX_FACTOR` above.
#[must_use]
pub fn soft_clamp_zoom(zoom: f64, range: ZoomRange) -> f64 {
    if zoom > range.max {
        let give = range.max * (consts::ZOOM_BOUNCE_MAX_FACTOR - 1.0);
        range.max + rubber_band(zoom - range.max, give)
    } else if zoom < range.min {
        let give = range.min * (1.0 - consts::ZOOM_BOUNCE_MIN_FACTOR);
        range.min + rubber_band(zoom - range.min, give)
    } else {
        zoom
    }
}
