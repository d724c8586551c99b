//! Pan recognizer: drag tracking, overscroll resistance and release inertia.
//!
//! The recognizer follows the centroid of every pointer down. When the number
//! of pointers changes the centroid jumps, so the reference is rebased and
//! only real motion is accumulated. Horizontal motion is dropped while an
//! enclosing pager is turning a page.
//!
//! While active, the displayed translation is `pan_offset + raw` with the part
//! beyond the travel limit passed through [`bounds::rubber_band`]. On release
//! the translation is folded into `pan_offset`; out-of-bounds axes spring back
//! to their limit, otherwise a fast release starts a clamped decay.

#[cfg(test)]
#[path = "pan_test.rs"]
mod pan_test;

use crate::animation::DecayConfig;
use crate::bounds;
use crate::config::GestureTuning;
use crate::geometry::{Point, Vector};
use crate::input::VelocityTracker;
use crate::pager::PagerSignals;
use crate::transform::{TransformState, Viewport};

/// What a pointer move meant to the pan recognizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanUpdate {
    /// Not tracking a drag.
    Idle,
    /// Still inside the touch slop.
    Pending,
    /// Past the slop; the coordinator decides whether it may activate.
    ReadyToActivate,
    /// The drag is horizontal and the pager owns it; the pan failed.
    YieldedToPager,
    /// Active drag moved.
    Moved,
}

/// How an active drag finished.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanRelease {
    NotActive,
    /// Released inside the limits, too slow to fling.
    Rest,
    /// Released past a limit; the offending axes spring back.
    SpringBack { target: Vector },
    /// Released fast inside the limits; a decay continues the motion.
    Fling { velocity: Vector },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Track {
    raw: Vector,
    last_centroid: Point,
    active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PanRecognizer {
    track: Option<Track>,
    velocity: VelocityTracker,
}

impl PanRecognizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a new drag at `centroid`.
    pub fn begin(&mut self, centroid: Point, time_ms: f64) {
        self.track = Some(Track { raw: Vector::ZERO, last_centroid: centroid, active: false });
        self.velocity.clear();
        self.velocity.push(time_ms, Vector::ZERO);
    }

    /// The pointer set changed; continue from `centroid` without a jump.
    pub fn rebase(&mut self, centroid: Point) {
        if let Some(track) = &mut self.track {
            track.last_centroid = centroid;
        }
    }

    #[cfg(test)]
    #[must_use]
    pub(crate) fn is_tracking(&self) -> bool {
        self.track.is_some()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.track.is_some_and(|t| t.active)
    }

    /// Accumulated drag since the pan began, after pager suppression.
    #[cfg(test)]
    #[must_use]
    pub(crate) fn raw_translation(&self) -> Vector {
        self.track.map_or(Vector::ZERO, |t| t.raw)
    }

    pub fn update(&mut self, centroid: Point, time_ms: f64, tuning: &GestureTuning, pager: PagerSignals) -> PanUpdate {
        let Some(track) = &mut self.track else {
            return PanUpdate::Idle;
        };
        let mut delta = centroid - track.last_centroid;
        track.last_centroid = centroid;
        if pager.is_swiping_in_pager {
            delta.x = 0.0;
        }
        track.raw = track.raw + delta;
        let raw = track.raw;
        let active = track.active;
        self.velocity.push(time_ms, raw);

        if active {
            return PanUpdate::Moved;
        }
        if raw.length() <= tuning.touch_slop {
            return PanUpdate::Pending;
        }
        if pager.should_pager_scroll && raw.x.abs() > raw.y.abs() {
            self.track = None;
            return PanUpdate::YieldedToPager;
        }
        PanUpdate::ReadyToActivate
    }

    pub fn activate(&mut self) {
        if let Some(track) = &mut self.track {
            track.active = true;
        }
    }

    /// Stop tracking without touching the transform.
    pub fn fail(&mut self) {
        self.track = None;
        self.velocity.clear();
    }

    /// Write the rubber-banded drag into `pan_translate`.
    pub fn apply(&self, state: &mut TransformState, viewport: &Viewport, tuning: &GestureTuning) {
        let Some(track) = self.track.filter(|t| t.active) else {
            return;
        };
        let offset = state.pan_offset.value();
        let limit = viewport.travel_limit(state.effective_zoom());
        let banded = bounds::rubber_band_offset(offset + track.raw, limit, viewport.canvas, tuning.overscroll_fraction);
        state.pan_translate.set(banded - offset);
    }

    /// The live translation was folded into `pan_offset` elsewhere; keep
    /// dragging from zero.
    pub fn absorb(&mut self) {
        if let Some(track) = &mut self.track {
            track.raw = Vector::ZERO;
        }
        self.velocity.clear();
    }

    /// Finish the drag: fold, then spring back or fling.
    pub fn release(
        &mut self,
        state: &mut TransformState,
        viewport: &Viewport,
        tuning: &GestureTuning,
        time_ms: f64,
    ) -> PanRelease {
        let velocity = self.velocity.velocity_at(time_ms);
        self.velocity.clear();
        let Some(track) = self.track.take() else {
            return PanRelease::NotActive;
        };
        if !track.active {
            return PanRelease::NotActive;
        }

        let offset = state.pan_offset.value() + state.pan_translate.value();
        state.pan_translate.set(Vector::ZERO);
        state.pan_offset.set(offset);

        // Limits where the zoom is headed, so a zoom spring cannot strand the offset.
        let zoom = state.zoom_scale.target().unwrap_or_else(|| state.zoom_scale.value());
        let limit = viewport.travel_limit(zoom);
        if !bounds::is_within(offset, limit) {
            let target = bounds::clamp_offset(offset, limit);
            state.pan_offset.spring_to(target, tuning.spring);
            return PanRelease::SpringBack { target };
        }
        if velocity.length() <= tuning.fling_velocity_threshold {
            return PanRelease::Rest;
        }
        let decay = DecayConfig::new(tuning.pan_decay_deceleration);
        if limit.x > 0.0 {
            state.pan_offset.x.decay(velocity.x, decay.with_clamp(-limit.x, limit.x));
        }
        if limit.y > 0.0 {
            state.pan_offset.y.decay(velocity.y, decay.with_clamp(-limit.y, limit.y));
        }
        PanRelease::Fling { velocity }
    }

    /// The gesture was interrupted: stop any inertia and keep the offset
    /// where it is.
    pub fn cancel(&mut self, state: &mut TransformState) {
        if self.is_active() {
            let offset = state.pan_offset.value() + state.pan_translate.value();
            state.pan_translate.set(Vector::ZERO);
            state.pan_offset.set(offset);
        }
        self.fail();
        state.pan_offset.cancel();
    }
}
