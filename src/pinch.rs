//! Pinch recognizer: two-pointer zoom anchored at the initial focal point.
//!
//! DESIGN
//! ======
//! At pinch start the visual zoom `s0` and offset `o0` are captured together
//! with the focal point `F0` (midpoint of the two pointers, relative to the
//! canvas center). For a distance ratio `k` the requested zoom `s0·k` is
//! soft-clamped to `z'`, and with `k' = z'/s0`:
//!
//! ```text
//! pinch_scale  = k'
//! pinch_offset = (1 − k')(F0 − o0)
//! ```
//!
//! which keeps the content point under `F0` fixed. Motion of the focal point
//! itself is the pan recognizer's job; both run at once.
//!
//! On release the zoom is clamped into range and the offset rescaled about
//! the last focal point, then both are committed. Whatever the commit changed
//! on screen is left in `pinch_scale`/`pinch_offset` and springs back to
//! identity, so an overshoot bounces instead of snapping.

#[cfg(test)]
#[path = "pinch_test.rs"]
mod pinch_test;

use tracing::debug;

use crate::bounds;
use crate::config::GestureTuning;
use crate::consts;
use crate::geometry::{Point, Vector};
use crate::transform::{TransformState, Viewport};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Session {
    initial_distance: f64,
    start_zoom: f64,
    /// `F0 − o0`.
    anchor: Vector,
    /// Focal point of the latest update, relative to the canvas center.
    focal: Vector,
    zoom: f64,
}

/// Result of a finished pinch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchRelease {
    /// Committed `zoom_scale`, inside the zoom range.
    pub zoom: f64,
    /// The committed state differs from what was on screen and is springing in.
    pub bounced: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PinchRecognizer {
    session: Option<Session>,
}

impl PinchRecognizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Soft-clamped zoom of the latest update.
    #[cfg(test)]
    #[must_use]
    pub(crate) fn zoom(&self) -> Option<f64> {
        self.session.map(|s| s.zoom)
    }

    /// Start a pinch between `a` and `b`.
    ///
    /// A release bounce still running from a previous pinch is committed first,
    /// so the new pinch starts from what is on screen.
    pub fn begin(&mut self, a: Point, b: Point, state: &mut TransformState, viewport: &Viewport) {
        let zoom = state.effective_zoom();
        let offset = state.pan_offset.value() + state.pinch_offset.value();
        state.zoom_scale.set(zoom);
        state.pan_offset.set(offset);
        state.pinch_scale.set(1.0);
        state.pinch_offset.set(Vector::ZERO);

        let focal = a.midpoint(b) - viewport.center();
        self.session = Some(Session {
            initial_distance: a.distance(b),
            start_zoom: zoom,
            anchor: focal - state.translate(),
            focal,
            zoom,
        });
    }

    /// Track the pointers. Returns the soft-clamped zoom now on screen.
    pub fn update(&mut self, a: Point, b: Point, state: &mut TransformState, viewport: &Viewport) -> Option<f64> {
        let session = self.session.as_mut()?;
        let distance = a.distance(b);
        let factor = if session.initial_distance < consts::MIN_PINCH_DISTANCE_PX
            || distance < consts::MIN_PINCH_DISTANCE_PX
            || !distance.is_finite()
        {
            debug!(distance, initial = session.initial_distance, "degenerate pinch distance; holding scale");
            1.0
        } else {
            distance / session.initial_distance
        };

        let zoom = bounds::soft_clamp_zoom(session.start_zoom * factor, viewport.zoom_range);
        let k = zoom / session.start_zoom;
        state.pinch_scale.set(k);
        state.pinch_offset.set(session.anchor * (1.0 - k));
        session.focal = a.midpoint(b) - viewport.center();
        session.zoom = zoom;
        Some(zoom)
    }

    /// Commit the pinch. Any live pan translation is folded in as well.
    pub fn release(
        &mut self,
        state: &mut TransformState,
        viewport: &Viewport,
        tuning: &GestureTuning,
    ) -> Option<PinchRelease> {
        let session = self.session.take()?;
        let shown_zoom = state.effective_zoom();
        let shown_offset = state.translate();

        let zoom = viewport.zoom_range.clamp(shown_zoom);
        let rescaled = session.focal - (session.focal - shown_offset) * (zoom / shown_zoom);
        let offset = bounds::clamp_offset(rescaled, viewport.travel_limit(zoom));

        state.zoom_scale.set(zoom);
        state.pan_offset.set(offset);
        state.pan_translate.set(Vector::ZERO);
        state.pinch_scale.set(shown_zoom / zoom);
        state.pinch_offset.set(shown_offset - offset);
        state.pinch_scale.spring_to(1.0, tuning.spring);
        state.pinch_offset.spring_to(Vector::ZERO, tuning.spring);

        Some(PinchRelease { zoom, bounced: state.pinch_scale.is_animating() || state.pinch_offset.is_animating() })
    }

    /// Forget the pinch without touching the transform.
    pub fn clear(&mut self) {
        self.session = None;
    }
}
