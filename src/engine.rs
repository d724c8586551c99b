//! Engine core: pointer input in, transform and host actions out.
//!
//! DESIGN
//! ======
//! `EngineCore` owns the transform state and every recognizer. The host feeds
//! it pointer events and frame ticks; each handler returns the [`Action`]s the
//! host must process. Nothing here touches a screen or a clock, so the whole
//! gesture pipeline runs under plain unit tests.
//!
//! Every handler ends in `finish`, which reports a changed zoom, publishes the
//! pager flag and asks for a render when the transform moved.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::bounds;
use crate::config::{self, CanvasConfig, ConfigError, GestureTuning, ZoomRange};
use crate::consts;
use crate::coordinator::{GestureCoordinator, GestureKind, Phase};
use crate::fit::{FitScale, FitScaleCache};
use crate::geometry::{Point, Size};
use crate::input::{PointerEvent, PointerId, PointerTracker};
use crate::pager::{PagerBridge, PagerLink};
use crate::pan::{PanRecognizer, PanRelease, PanUpdate};
use crate::pinch::PinchRecognizer;
use crate::reset::{ResetController, ResetMode, ResetState};
use crate::tap::{self, DoubleTapTarget, TapRecognizer, TapRelease};
use crate::transform::{Transform, TransformState, Viewport};

/// Actions returned from handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// The effective zoom multiplier changed.
    ScaleChanged { scale: f64 },
    /// A single tap was recognized at `point` (canvas pixels).
    Tap { point: Point },
    /// A pinch started or finished.
    PinchGestureChanged { running: bool, scale: f64 },
    RenderNeeded,
}

pub struct EngineCore {
    id: Uuid,
    fit: FitScaleCache,
    zoom_range: ZoomRange,
    errors: Vec<ConfigError>,
    tuning: GestureTuning,
    state: TransformState,
    pointers: PointerTracker,
    coordinator: GestureCoordinator,
    pan: PanRecognizer,
    pinch: PinchRecognizer,
    tap: TapRecognizer,
    reset: ResetController,
    pager: PagerBridge,
    is_active: bool,
    last_tick_ms: Option<f64>,
    reported_scale: f64,
    torn_down: bool,
}

impl EngineCore {
    /// Mount a canvas. Invalid configuration values are replaced by their
    /// fallbacks and kept in [`EngineCore::config_errors`].
    #[must_use]
    pub fn new(config: &CanvasConfig, tuning: GestureTuning, pager: Option<PagerLink>) -> Self {
        let id = Uuid::new_v4();
        let (resolved, errors) = config.resolve();
        for err in &errors {
            warn!(instance = %id, error = %err, "invalid canvas configuration; using fallback");
        }
        let fit = FitScaleCache::new(resolved.canvas_size, resolved.content_size).unwrap_or_else(|err| {
            warn!(instance = %id, error = %err, "fit scale unavailable; using unit sizes");
            FitScaleCache::default()
        });

        let mut engine = Self {
            id,
            fit,
            zoom_range: resolved.zoom_range,
            errors,
            tuning,
            state: TransformState::new(),
            pointers: PointerTracker::new(),
            coordinator: GestureCoordinator::default(),
            pan: PanRecognizer::new(),
            pinch: PinchRecognizer::new(),
            tap: TapRecognizer::new(),
            reset: ResetController::new(resolved.is_active),
            pager: PagerBridge::new(pager),
            is_active: resolved.is_active,
            last_tick_ms: None,
            reported_scale: 1.0,
            torn_down: false,
        };
        engine.pager.publish(engine.state.is_at_rest_for_pager());
        info!(
            instance = %id,
            canvas_width = resolved.canvas_size.width,
            canvas_height = resolved.canvas_size.height,
            min_scale = engine.fit.get().min_scale,
            pager = engine.pager.is_attached(),
            "canvas engine created"
        );
        engine
    }

    // --- Queries ---

    #[must_use]
    pub fn instance_id(&self) -> Uuid {
        self.id
    }

    /// What the presentation layer should draw right now.
    #[must_use]
    pub fn transform(&self) -> Transform {
        self.state.transform(&self.viewport())
    }

    #[must_use]
    pub fn state(&self) -> &TransformState {
        &self.state
    }

    #[must_use]
    pub fn fit_scale(&self) -> FitScale {
        self.fit.get()
    }

    #[must_use]
    pub fn zoom_range(&self) -> ZoomRange {
        self.zoom_range
    }

    /// Problems found in the mount configuration.
    #[must_use]
    pub fn config_errors(&self) -> &[ConfigError] {
        &self.errors
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    #[must_use]
    pub fn reset_state(&self) -> ResetState {
        self.reset.state()
    }

    #[must_use]
    pub fn phase(&self, kind: GestureKind) -> Phase {
        self.coordinator.phase(kind)
    }

    #[must_use]
    pub fn pointer_count(&self) -> usize {
        self.pointers.count()
    }

    /// Something is still moving without input.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.state.is_animating() || self.reset.is_resetting()
    }

    /// A pending single tap resolves on the first tick after this time.
    #[must_use]
    pub fn next_deadline_ms(&self) -> Option<f64> {
        if self.torn_down {
            return None;
        }
        self.tap.deadline_ms(&self.tuning)
    }

    /// The host must keep calling [`tick`](Self::tick): something is moving
    /// or a single tap is waiting out the double-tap window.
    #[must_use]
    pub fn needs_tick(&self) -> bool {
        self.is_animating() || self.next_deadline_ms().is_some()
    }

    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    fn viewport(&self) -> Viewport {
        Viewport {
            canvas: self.fit.canvas(),
            content: self.fit.content(),
            fit: self.fit.get(),
            zoom_range: self.zoom_range,
        }
    }

    // --- Pointer input ---

    /// Route a pointer event to its handler.
    pub fn handle_pointer(&mut self, event: PointerEvent, time_ms: f64) -> Vec<Action> {
        match event {
            PointerEvent::Down { id, point } => self.on_pointer_down(id, point, time_ms),
            PointerEvent::Move { id, point } => self.on_pointer_move(id, point, time_ms),
            PointerEvent::Up { id, point } => self.on_pointer_up(id, point, time_ms),
            PointerEvent::Cancel { id } => self.on_pointer_cancel(id, time_ms),
        }
    }

    pub fn on_pointer_down(&mut self, id: PointerId, point: Point, time_ms: f64) -> Vec<Action> {
        if self.torn_down {
            return Vec::new();
        }
        if !point.is_finite() || !time_ms.is_finite() {
            debug!(instance = %self.id, pointer = id.0, "ignoring pointer down with non-finite input");
            return Vec::new();
        }
        if self.pointers.position(id).is_some() {
            return self.on_pointer_move(id, point, time_ms);
        }

        let before = self.transform();
        let mut actions = Vec::new();
        self.expire_tap(time_ms, &mut actions);

        if self.pointers.is_empty() {
            if let Some(first) = self.tap.on_down(point, time_ms, &self.tuning) {
                self.resolve_single_tap(first, &mut actions);
            }
            self.coordinator.begin_sequence();
            if self.state.pan_offset.cancel_decay() {
                debug!(instance = %self.id, "touch caught fling");
            }
            self.pointers.down(id, point);
            self.pan.begin(point, time_ms);
        } else {
            self.pointers.down(id, point);
            self.fail_tap(&mut actions);
            if let Some(centroid) = self.pointers.centroid() {
                self.pan.rebase(centroid);
            }
            if self.pointers.count() == 2 {
                self.start_pinch(&mut actions);
            }
        }
        self.finish(before, actions)
    }

    pub fn on_pointer_move(&mut self, id: PointerId, point: Point, time_ms: f64) -> Vec<Action> {
        if self.torn_down || !point.is_finite() || !time_ms.is_finite() {
            return Vec::new();
        }
        if !self.pointers.update(id, point) {
            return Vec::new();
        }

        let before = self.transform();
        let mut actions = Vec::new();
        self.expire_tap(time_ms, &mut actions);
        let viewport = self.viewport();

        if self.pointers.primary() == Some(id) && self.tap.moved_beyond_slop(point, &self.tuning) {
            self.fail_tap(&mut actions);
        }

        if let Some((a, b)) = self.pointers.pair() {
            if let Some(scale) = self.pinch.update(a, b, &mut self.state, &viewport) {
                actions.push(Action::PinchGestureChanged { running: true, scale });
            }
        }

        if let Some(centroid) = self.pointers.centroid() {
            let mut signals = self.pager.signals();
            // Pinch owns the fingers; their drift moves the content, not the pager.
            if self.pinch.is_active() {
                signals.should_pager_scroll = false;
            }
            match self.pan.update(centroid, time_ms, &self.tuning, signals) {
                PanUpdate::ReadyToActivate => {
                    if self.coordinator.claim(GestureKind::Pan) {
                        self.pan.activate();
                        debug!(instance = %self.id, "pan activated");
                        self.fail_tap(&mut actions);
                    } else {
                        self.pan.fail();
                        debug!(instance = %self.id, phase = ?self.coordinator.phase(GestureKind::Pan), "pan denied");
                    }
                }
                PanUpdate::YieldedToPager => {
                    self.coordinator.fail(GestureKind::Pan);
                    debug!(instance = %self.id, "horizontal drag yielded to pager");
                }
                PanUpdate::Idle | PanUpdate::Pending | PanUpdate::Moved => {}
            }
            self.pan.apply(&mut self.state, &viewport, &self.tuning);
        }
        self.finish(before, actions)
    }

    pub fn on_pointer_up(&mut self, id: PointerId, point: Point, time_ms: f64) -> Vec<Action> {
        if self.torn_down || !time_ms.is_finite() {
            return Vec::new();
        }
        let Some(last) = self.pointers.up(id) else {
            return Vec::new();
        };
        let point = if point.is_finite() { point } else { last };

        let before = self.transform();
        let mut actions = Vec::new();
        self.expire_tap(time_ms, &mut actions);
        let viewport = self.viewport();

        if self.pinch.is_active() {
            match self.pointers.pair() {
                // A third finger takes over; restart from what is on screen.
                Some((a, b)) => self.pinch.begin(a, b, &mut self.state, &viewport),
                None => self.end_pinch(&viewport, &mut actions),
            }
        }
        if let Some(centroid) = self.pointers.centroid() {
            self.pan.rebase(centroid);
        }
        if self.pointers.is_empty() {
            self.end_sequence(point, time_ms, &viewport, &mut actions);
        }
        self.finish(before, actions)
    }

    /// The platform took the pointer away. Running gestures are interrupted
    /// and the content stays where it is.
    pub fn on_pointer_cancel(&mut self, id: PointerId, time_ms: f64) -> Vec<Action> {
        if self.torn_down {
            return Vec::new();
        }
        if self.pointers.up(id).is_none() {
            return Vec::new();
        }
        debug!(instance = %self.id, pointer = id.0, time_ms, "pointer cancelled");

        let before = self.transform();
        let mut actions = Vec::new();
        let viewport = self.viewport();

        if self.pinch.is_active() {
            self.end_pinch(&viewport, &mut actions);
        }
        self.pan.cancel(&mut self.state);
        self.coordinator.cancel(GestureKind::Pan);
        self.fail_tap(&mut actions);
        if self.pointers.is_empty() {
            self.tap.clear();
            self.coordinator.fail(GestureKind::Pinch);
        }
        self.finish(before, actions)
    }

    // --- Host inputs ---

    /// Advance animations to `now_ms` and resolve any tap whose double-tap
    /// window has passed.
    pub fn tick(&mut self, now_ms: f64) -> Vec<Action> {
        if self.torn_down || !now_ms.is_finite() {
            return Vec::new();
        }
        let before = self.transform();
        let mut actions = Vec::new();

        let dt = self.last_tick_ms.map_or(0.0, |last| now_ms - last);
        self.last_tick_ms = Some(now_ms);
        if dt > 0.0 {
            self.state.step(dt);
        }
        if self.reset.poll(&self.state) {
            debug!(instance = %self.id, "reset finished");
        }
        // The host may stop ticking once idle; the next motion starts from its
        // first frame.
        if !self.is_animating() {
            self.last_tick_ms = None;
        }
        self.expire_tap(now_ms, &mut actions);
        self.finish(before, actions)
    }

    /// Return to identity, animated or at once.
    pub fn reset_transform(&mut self, animated: bool) -> Vec<Action> {
        if self.torn_down {
            return Vec::new();
        }
        let before = self.transform();
        let mut actions = Vec::new();
        let mode = if animated { ResetMode::Animated } else { ResetMode::Immediate };
        self.start_reset(mode, &mut actions);
        self.finish(before, actions)
    }

    /// The host's activity flag. Going inactive resets the transform.
    pub fn set_active(&mut self, is_active: bool) -> Vec<Action> {
        if self.torn_down {
            return Vec::new();
        }
        let before = self.transform();
        let mut actions = Vec::new();
        self.is_active = is_active;
        if let Some(mode) = self.reset.observe_active(is_active) {
            self.start_reset(mode, &mut actions);
        }
        self.finish(before, actions)
    }

    /// The canvas was laid out again. Invalid sizes are ignored.
    pub fn set_canvas_size(&mut self, size: Size) -> Vec<Action> {
        if self.torn_down {
            return Vec::new();
        }
        let (canvas, err) = config::sanitize_canvas(size);
        if let Some(err) = err {
            warn!(instance = %self.id, error = %err, "ignoring canvas size");
            return Vec::new();
        }
        let content = self.fit.content();
        self.resize(canvas, content)
    }

    /// The content's intrinsic size became known. Invalid sizes are ignored.
    pub fn set_content_size(&mut self, size: Size) -> Vec<Action> {
        if self.torn_down {
            return Vec::new();
        }
        let (content, err) = config::sanitize_content(size);
        if let Some(err) = err {
            warn!(instance = %self.id, error = %err, "ignoring content size");
            return Vec::new();
        }
        let canvas = self.fit.canvas();
        self.resize(canvas, content)
    }

    /// Unmount: stop every animation and forget all input. Later calls are
    /// no-ops.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.state.cancel_all();
        self.pan.fail();
        self.pinch.clear();
        self.tap.clear();
        self.coordinator.cancel_all();
        self.pointers.clear();
        self.reset.interrupt();
        self.torn_down = true;
        info!(instance = %self.id, "canvas engine torn down");
    }

    // --- Internals ---

    fn resize(&mut self, canvas: Size, content: Size) -> Vec<Action> {
        let before = self.transform();
        match self.fit.update(canvas, content) {
            Ok(true) => {
                debug!(instance = %self.id, min_scale = self.fit.get().min_scale, "fit scale recomputed");
                if !self.pan.is_active() && !self.pinch.is_active() && !self.state.pan_offset.is_animating() {
                    let limit = self.viewport().travel_limit(self.state.zoom_scale.value());
                    let offset = self.state.pan_offset.value();
                    let clamped = bounds::clamp_offset(offset, limit);
                    if clamped != offset {
                        self.state.pan_offset.set(clamped);
                    }
                }
            }
            Ok(false) => {}
            Err(err) => warn!(instance = %self.id, error = %err, "fit scale unchanged"),
        }
        self.finish(before, Vec::new())
    }

    fn start_pinch(&mut self, actions: &mut Vec<Action>) {
        let Some((a, b)) = self.pointers.pair() else {
            return;
        };
        if !self.coordinator.claim(GestureKind::Pinch) {
            return;
        }
        let viewport = self.viewport();
        self.pinch.begin(a, b, &mut self.state, &viewport);
        let scale = self.state.effective_zoom();
        debug!(instance = %self.id, scale, "pinch started");
        actions.push(Action::PinchGestureChanged { running: true, scale });
    }

    fn end_pinch(&mut self, viewport: &Viewport, actions: &mut Vec<Action>) {
        let Some(release) = self.pinch.release(&mut self.state, viewport, &self.tuning) else {
            return;
        };
        self.pan.absorb();
        self.coordinator.end(GestureKind::Pinch);
        debug!(instance = %self.id, zoom = release.zoom, bounced = release.bounced, "pinch released");
        actions.push(Action::PinchGestureChanged { running: false, scale: release.zoom });
    }

    /// The last pointer lifted.
    fn end_sequence(&mut self, point: Point, time_ms: f64, viewport: &Viewport, actions: &mut Vec<Action>) {
        match self.pan.release(&mut self.state, viewport, &self.tuning, time_ms) {
            PanRelease::NotActive => self.coordinator.fail(GestureKind::Pan),
            outcome => {
                self.coordinator.end(GestureKind::Pan);
                debug!(instance = %self.id, ?outcome, "pan released");
            }
        }
        self.coordinator.fail(GestureKind::Pinch);

        match self.tap.on_up(point, time_ms, &self.tuning) {
            TapRelease::Double(at) => self.double_tap(at, viewport, actions),
            TapRelease::Waiting => debug!(instance = %self.id, "tap waiting for a second press"),
            TapRelease::Failed { first } => {
                if let Some(first) = first {
                    self.resolve_single_tap(first, actions);
                }
                self.coordinator.fail(GestureKind::SingleTap);
                self.coordinator.fail(GestureKind::DoubleTap);
            }
            TapRelease::None => {
                self.coordinator.fail(GestureKind::SingleTap);
                self.coordinator.fail(GestureKind::DoubleTap);
            }
        }
    }

    fn double_tap(&mut self, at: Point, viewport: &Viewport, actions: &mut Vec<Action>) {
        if !self.coordinator.claim(GestureKind::DoubleTap) {
            debug!(instance = %self.id, "double tap denied");
            return;
        }
        match tap::double_tap_target(&self.state, viewport, &self.tuning, at) {
            DoubleTapTarget::ZoomIn { zoom, offset } => {
                debug!(instance = %self.id, zoom, x = offset.x, y = offset.y, "double tap zoom in");
                self.reset.interrupt();
                self.state.zoom_scale.spring_to(zoom, self.tuning.spring);
                self.state.pan_offset.spring_to(offset, self.tuning.spring);
            }
            DoubleTapTarget::ZoomOut => self.start_reset(ResetMode::Animated, actions),
        }
    }

    /// The current press can no longer be a tap.
    fn fail_tap(&mut self, actions: &mut Vec<Action>) {
        if let Some(first) = self.tap.fail() {
            self.resolve_single_tap(first, actions);
        }
        self.coordinator.fail(GestureKind::SingleTap);
        self.coordinator.fail(GestureKind::DoubleTap);
    }

    /// A first tap will not become a double tap.
    fn resolve_single_tap(&mut self, point: Point, actions: &mut Vec<Action>) {
        self.coordinator.fail(GestureKind::DoubleTap);
        if self.coordinator.claim(GestureKind::SingleTap) {
            debug!(instance = %self.id, x = point.x, y = point.y, "single tap");
            actions.push(Action::Tap { point });
        } else {
            debug!(instance = %self.id, phase = ?self.coordinator.phase(GestureKind::SingleTap), "single tap dropped");
        }
    }

    fn expire_tap(&mut self, now_ms: f64, actions: &mut Vec<Action>) {
        if let Some(point) = self.tap.poll(now_ms, &self.tuning) {
            self.resolve_single_tap(point, actions);
        }
    }

    fn start_reset(&mut self, mode: ResetMode, actions: &mut Vec<Action>) {
        info!(instance = %self.id, ?mode, "resetting transform");
        if self.pinch.is_active() {
            actions.push(Action::PinchGestureChanged { running: false, scale: 1.0 });
        }
        self.pinch.clear();
        self.pan.fail();
        self.tap.clear();
        let interrupted = self.coordinator.cancel_all();
        if !interrupted.is_empty() {
            debug!(instance = %self.id, ?interrupted, "gestures interrupted by reset");
        }
        self.reset.start(mode, &mut self.state, self.tuning.spring);
    }

    fn finish(&mut self, before: Transform, mut actions: Vec<Action>) -> Vec<Action> {
        let scale = self.state.effective_zoom();
        let settling =
            self.pinch.is_active() || self.state.zoom_scale.is_animating() || self.state.pinch_scale.is_animating();
        let threshold = if settling { consts::SCALE_REPORT_EPSILON } else { 0.0 };
        if (scale - self.reported_scale).abs() > threshold {
            self.reported_scale = scale;
            actions.push(Action::ScaleChanged { scale });
        }

        let at_rest = self.state.is_at_rest_for_pager();
        if self.pager.publish(at_rest) {
            debug!(instance = %self.id, at_rest, "pager flag published");
        }

        if self.transform() != before {
            actions.push(Action::RenderNeeded);
        }
        actions
    }
}
