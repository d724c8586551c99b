//! Shared numeric constants for the gesture canvas.
//!
//! These are the defaults behind [`crate::config::GestureTuning`]; hosts that
//! need different feel override them there rather than here.

// ── Zoom ────────────────────────────────────────────────────────

/// Default lower zoom multiplier applied on top of fit-scale.
pub const DEFAULT_ZOOM_RANGE_MIN: f64 = 1.0;

/// Default upper zoom multiplier applied on top of fit-scale.
pub const DEFAULT_ZOOM_RANGE_MAX: f64 = 20.0;

/// Zoom multiplier a double tap zooms into from fit-scale.
pub const DOUBLE_TAP_SCALE: f64 = 3.0;

/// A pinch may stretch below `zoom_range.min` by at most this factor.
pub const ZOOM_BOUNCE_MIN_FACTOR: f64 = 0.7;

/// A pinch may stretch above `zoom_range.max` by at most this factor.
pub const ZOOM_BOUNCE_MAX_FACTOR: f64 = 1.5;

/// Smallest change of the effective scale that is reported to the host.
pub const SCALE_REPORT_EPSILON: f64 = 1e-4;

/// Tolerance used when deciding whether the zoom is back at fit-scale.
pub const AT_REST_EPSILON: f64 = 1e-9;

// ── Pan ─────────────────────────────────────────────────────────

/// Distance in pixels a pointer must travel before a drag starts (touch slop).
pub const TOUCH_SLOP_PX: f64 = 8.0;

/// Release speed in px/s below which no fling decay is started.
pub const FLING_VELOCITY_THRESHOLD: f64 = 50.0;

/// Per-millisecond velocity retention of the pan decay animation.
pub const PAN_DECAY_DECELERATION: f64 = 0.9915;

/// Overscroll resistance range as a fraction of the canvas dimension.
pub const OVERSCROLL_FRACTION: f64 = 0.25;

/// Window of pointer samples used to estimate release velocity.
pub const VELOCITY_WINDOW_MS: f64 = 100.0;

// ── Tap ─────────────────────────────────────────────────────────

/// Maximum gap between the first release and the second press of a double tap.
pub const DOUBLE_TAP_INTERVAL_MS: f64 = 300.0;

/// Maximum distance between the two presses of a double tap.
pub const DOUBLE_TAP_SLOP_PX: f64 = 40.0;

/// A press held longer than this is not a tap.
pub const TAP_MAX_PRESS_MS: f64 = 500.0;

// ── Springs ─────────────────────────────────────────────────────

pub const SPRING_MASS: f64 = 1.0;
pub const SPRING_STIFFNESS: f64 = 1000.0;
pub const SPRING_DAMPING: f64 = 500.0;

/// A spring is at rest once it is this close to its target...
pub const SPRING_REST_DISPLACEMENT: f64 = 1e-3;

/// ...and moving slower than this (units per second).
pub const SPRING_REST_SPEED: f64 = 1e-2;

/// A decay stops once its speed drops below this (px/s).
pub const DECAY_REST_SPEED: f64 = 1.0;

// ── Pinch ───────────────────────────────────────────────────────

/// Pinch pointers closer than this are treated as coincident.
pub const MIN_PINCH_DISTANCE_PX: f64 = 1e-3;
