//! Tap recognizer: single and double taps.
//!
//! A press becomes a tap when it is released within `tap_max_press_ms` and
//! `touch_slop` of where it went down. A released tap then waits up to
//! `double_tap_interval_ms` for a second press near it:
//!
//! ```text
//! Idle ──down──▶ Pressed ──up──▶ Waiting ──down (near, in time)──▶ Pressed{first} ──up──▶ double tap
//!                   │                │
//!                   │                └──interval expires / far press──▶ single tap
//!                   └──slop / second pointer / pan──▶ Failed
//! ```
//!
//! Whether a single tap may actually fire is the coordinator's call; this
//! module only reports candidates.

#[cfg(test)]
#[path = "tap_test.rs"]
mod tap_test;

use crate::bounds;
use crate::config::GestureTuning;
use crate::consts;
use crate::geometry::{Point, Vector};
use crate::transform::{TransformState, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum TapState {
    #[default]
    Idle,
    Pressed {
        origin: Point,
        down_ms: f64,
        /// A released first tap this press may complete into a double tap.
        first: Option<Point>,
    },
    Waiting {
        point: Point,
        up_ms: f64,
    },
    /// The current press can no longer be a tap.
    Failed,
}

/// What a pointer release meant to the tap recognizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TapRelease {
    None,
    /// A first tap was released and now waits for a second press.
    Waiting,
    /// The second press of a double tap was released at `point`.
    Double(Point),
    /// The press was too long or moved; `first` is a waiting first tap that
    /// can no longer be doubled.
    Failed { first: Option<Point> },
}

/// Where a double tap should take the transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DoubleTapTarget {
    ZoomIn { zoom: f64, offset: Vector },
    /// Already zoomed in: go back to fit-scale.
    ZoomOut,
}

#[derive(Debug, Clone, Default)]
pub struct TapRecognizer {
    state: TapState,
}

impl TapRecognizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// First tap waiting for a second press, if any.
    #[must_use]
    pub fn waiting(&self) -> Option<Point> {
        match self.state {
            TapState::Waiting { point, .. } => Some(point),
            _ => None,
        }
    }

    /// When a waiting first tap stops accepting a second press.
    #[must_use]
    pub fn deadline_ms(&self, tuning: &GestureTuning) -> Option<f64> {
        match self.state {
            TapState::Waiting { up_ms, .. } => Some(up_ms + tuning.double_tap_interval_ms),
            _ => None,
        }
    }

    #[cfg(test)]
    #[must_use]
    pub(crate) fn is_pressed(&self) -> bool {
        matches!(self.state, TapState::Pressed { .. })
    }

    /// A pointer went down with no other pointer in contact.
    ///
    /// Returns a waiting first tap that this press is too late or too far
    /// away to complete.
    pub fn on_down(&mut self, point: Point, time_ms: f64, tuning: &GestureTuning) -> Option<Point> {
        let mut orphan = None;
        let mut first = None;
        if let TapState::Waiting { point: waiting, up_ms } = self.state {
            let in_time = time_ms - up_ms <= tuning.double_tap_interval_ms;
            if in_time && waiting.distance(point) <= tuning.double_tap_slop {
                first = Some(waiting);
            } else {
                orphan = Some(waiting);
            }
        }
        self.state = TapState::Pressed { origin: point, down_ms: time_ms, first };
        orphan
    }

    /// Whether the pressed pointer has wandered too far to be a tap.
    #[must_use]
    pub fn moved_beyond_slop(&self, point: Point, tuning: &GestureTuning) -> bool {
        match self.state {
            TapState::Pressed { origin, .. } => origin.distance(point) > tuning.touch_slop,
            _ => false,
        }
    }

    /// The current press can no longer be a tap. Returns the first tap it was
    /// going to complete, if any.
    pub fn fail(&mut self) -> Option<Point> {
        match self.state {
            TapState::Pressed { first, .. } => {
                self.state = TapState::Failed;
                first
            }
            _ => None,
        }
    }

    pub fn on_up(&mut self, point: Point, time_ms: f64, tuning: &GestureTuning) -> TapRelease {
        match self.state {
            TapState::Pressed { origin, down_ms, first } => {
                if time_ms - down_ms > tuning.tap_max_press_ms || origin.distance(point) > tuning.touch_slop {
                    self.state = TapState::Idle;
                    return TapRelease::Failed { first };
                }
                if first.is_some() {
                    self.state = TapState::Idle;
                    TapRelease::Double(origin)
                } else {
                    self.state = TapState::Waiting { point: origin, up_ms: time_ms };
                    TapRelease::Waiting
                }
            }
            TapState::Failed => {
                self.state = TapState::Idle;
                TapRelease::None
            }
            TapState::Idle | TapState::Waiting { .. } => TapRelease::None,
        }
    }

    /// Returns the waiting first tap once no second press can follow it.
    pub fn poll(&mut self, now_ms: f64, tuning: &GestureTuning) -> Option<Point> {
        match self.state {
            TapState::Waiting { point, up_ms } if now_ms - up_ms > tuning.double_tap_interval_ms => {
                self.state = TapState::Idle;
                Some(point)
            }
            _ => None,
        }
    }

    /// Forget everything, including a waiting first tap.
    pub fn clear(&mut self) {
        self.state = TapState::Idle;
    }
}

/// Target of a double tap at `point` (canvas pixels).
///
/// From fit-scale or below, zoom to `double_tap_scale` (clamped into the zoom
/// range) and translate so the tapped content point moves toward the canvas
/// center, as far as the travel limits allow. Taps outside the content are
/// treated as taps on its nearest edge.
#[must_use]
pub fn double_tap_target(
    state: &TransformState,
    viewport: &Viewport,
    tuning: &GestureTuning,
    point: Point,
) -> DoubleTapTarget {
    let current = state.zoom_scale.value();
    if current > 1.0 + consts::AT_REST_EPSILON {
        return DoubleTapTarget::ZoomOut;
    }
    let zoom = viewport.zoom_range.clamp(tuning.double_tap_scale);
    let extent = viewport.half_extent(current);
    let tapped = point - viewport.center() - state.translate();
    let tapped = Vector::new(tapped.x.clamp(-extent.x, extent.x), tapped.y.clamp(-extent.y, extent.y));
    let offset = bounds::clamp_offset(-(tapped * (zoom / current)), viewport.travel_limit(zoom));
    DoubleTapTarget::ZoomIn { zoom, offset }
}
