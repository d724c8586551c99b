//! Return-to-identity, animated or immediate.
//!
//! A reset is requested programmatically or by the host marking the canvas
//! inactive after it had been active. The activity trigger is edge-based:
//! the value seen at construction never triggers anything.
//!
//! Every value returns to identity on its own spring; the controller is done
//! once none of them is still moving.

#[cfg(test)]
#[path = "reset_test.rs"]
mod reset_test;

use serde::Serialize;

use crate::animation::SpringConfig;
use crate::geometry::Vector;
use crate::transform::TransformState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResetMode {
    Animated,
    Immediate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResetState {
    #[default]
    Idle,
    Resetting(ResetMode),
}

#[derive(Debug, Clone)]
pub struct ResetController {
    state: ResetState,
    was_active: bool,
}

impl ResetController {
    #[must_use]
    pub fn new(is_active: bool) -> Self {
        Self { state: ResetState::Idle, was_active: is_active }
    }

    #[must_use]
    pub fn state(&self) -> ResetState {
        self.state
    }

    #[must_use]
    pub fn is_resetting(&self) -> bool {
        matches!(self.state, ResetState::Resetting(_))
    }

    /// Record the host's activity flag. Returns the reset to run when the
    /// canvas just went from active to inactive.
    pub fn observe_active(&mut self, is_active: bool) -> Option<ResetMode> {
        let fell = self.was_active && !is_active;
        self.was_active = is_active;
        fell.then_some(ResetMode::Animated)
    }

    /// Drive every value back to identity.
    pub fn start(&mut self, mode: ResetMode, state: &mut TransformState, spring: SpringConfig) {
        state.pan_offset.cancel();
        state.pinch_scale.set(1.0);
        match mode {
            ResetMode::Immediate => {
                state.pan_offset.set(Vector::ZERO);
                state.pan_translate.set(Vector::ZERO);
                state.pinch_offset.set(Vector::ZERO);
                state.zoom_scale.set(1.0);
                self.state = ResetState::Idle;
            }
            ResetMode::Animated => {
                state.pan_offset.spring_to(Vector::ZERO, spring);
                state.pan_translate.spring_to(Vector::ZERO, spring);
                state.pinch_offset.spring_to(Vector::ZERO, spring);
                state.zoom_scale.spring_to(1.0, spring);
                self.state = if state.is_animating() { ResetState::Resetting(mode) } else { ResetState::Idle };
            }
        }
    }

    /// Check for arrival. Returns `true` on the call that finishes a reset.
    pub fn poll(&mut self, state: &TransformState) -> bool {
        if self.is_resetting() && !state.is_animating() {
            self.state = ResetState::Idle;
            return true;
        }
        false
    }

    /// Abandon a running reset, leaving the values where they are.
    pub fn interrupt(&mut self) {
        self.state = ResetState::Idle;
    }
}
