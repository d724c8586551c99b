#![allow(clippy::float_cmp)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;
use crate::geometry::Vector;

const FRAME_MS: f64 = 16.0;
const EPSILON: f64 = 1e-6;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn engine(canvas: Size, content: Size, min: f64, max: f64) -> EngineCore {
    let config =
        CanvasConfig::new(canvas).with_content_size(content.width, content.height).with_zoom_range(min, max);
    EngineCore::new(&config, GestureTuning::default(), None)
}

/// Portrait canvas, landscape content: fit-scale 2.
fn portrait(min: f64, max: f64) -> EngineCore {
    engine(Size::new(400.0, 800.0), Size::new(200.0, 100.0), min, max)
}

/// Tick every frame from `now` until nothing moves. Returns the last tick
/// time and every action produced.
fn settle(engine: &mut EngineCore, mut now: f64) -> (f64, Vec<Action>) {
    let mut actions = engine.tick(now);
    for _ in 0..2_000 {
        if !engine.is_animating() {
            break;
        }
        now += FRAME_MS;
        actions.extend(engine.tick(now));
    }
    assert!(!engine.is_animating(), "still animating at {now}");
    (now, actions)
}

fn tap(engine: &mut EngineCore, point: Point, t: f64) -> Vec<Action> {
    let mut actions = engine.on_pointer_down(PointerId(1), point, t);
    actions.extend(engine.on_pointer_up(PointerId(1), point, t + 40.0));
    actions
}

fn double_tap(engine: &mut EngineCore, point: Point, t: f64) -> Vec<Action> {
    let mut actions = tap(engine, point, t);
    actions.extend(tap(engine, point, t + 120.0));
    actions
}

/// Press at `from` and move to `to` in `steps` moves. Returns the time of the
/// last move; the pointer stays down.
fn drag(engine: &mut EngineCore, from: Point, to: Point, t0: f64, steps: u32, step_ms: f64) -> (f64, Vec<Action>) {
    let mut actions = engine.on_pointer_down(PointerId(1), from, t0);
    let delta = to - from;
    let mut t = t0;
    for i in 1..=steps {
        t = t0 + f64::from(i) * step_ms;
        let point = from + delta * (f64::from(i) / f64::from(steps));
        actions.extend(engine.on_pointer_move(PointerId(1), point, t));
    }
    (t, actions)
}

/// Two horizontal fingers around `center` spreading from `from` to `to`
/// apart, then lifted. Returns the time of the last lift.
fn pinch(engine: &mut EngineCore, center: Point, from: f64, to: f64, t0: f64) -> (f64, Vec<Action>) {
    let at = |sep: f64| (Point::new(center.x - sep / 2.0, center.y), Point::new(center.x + sep / 2.0, center.y));
    let (a, b) = at(from);
    let mut actions = engine.on_pointer_down(PointerId(1), a, t0);
    actions.extend(engine.on_pointer_down(PointerId(2), b, t0 + 5.0));

    let steps = ((to - from).abs() / 10.0).ceil().max(1.0);
    let mut t = t0 + 5.0;
    let mut i = 1.0;
    while i <= steps {
        let (a, b) = at(from + (to - from) * (i / steps));
        t += 8.0;
        actions.extend(engine.on_pointer_move(PointerId(1), a, t));
        actions.extend(engine.on_pointer_move(PointerId(2), b, t + 1.0));
        i += 1.0;
    }
    let (a, b) = at(to);
    actions.extend(engine.on_pointer_up(PointerId(2), b, t + 10.0));
    actions.extend(engine.on_pointer_up(PointerId(1), a, t + 20.0));
    (t + 20.0, actions)
}

fn taps(actions: &[Action]) -> Vec<Point> {
    actions
        .iter()
        .filter_map(|a| match a {
            Action::Tap { point } => Some(*point),
            _ => None,
        })
        .collect()
}

fn reported_scales(actions: &[Action]) -> Vec<f64> {
    actions
        .iter()
        .filter_map(|a| match a {
            Action::ScaleChanged { scale } => Some(*scale),
            _ => None,
        })
        .collect()
}

/// Double tap the canvas center and let the zoom settle at 3.
fn zoomed_in(engine: &mut EngineCore) -> f64 {
    double_tap(engine, Point::new(200.0, 400.0), 0.0);
    let (t, _) = settle(engine, 200.0);
    assert!(approx_eq(engine.state().zoom_scale.value(), 3.0));
    t
}

// --- Mounting ---

#[test]
fn fit_scale_for_portrait_canvas() {
    let engine = portrait(1.0, 20.0);
    assert_eq!(engine.fit_scale().min_scale, 2.0);
    let transform = engine.transform();
    assert_eq!(transform.scale, 2.0);
    assert_eq!(transform.zoom, 1.0);
    assert_eq!(transform.translate, Vector::ZERO);
    assert!(engine.config_errors().is_empty());
}

#[test]
fn invalid_config_falls_back_and_is_reported() {
    let config = CanvasConfig::new(Size::new(0.0, 800.0)).with_content_size(200.0, 100.0).with_zoom_range(5.0, 2.0);
    let engine = EngineCore::new(&config, GestureTuning::default(), None);
    assert_eq!(engine.config_errors().len(), 2);
    assert_eq!(engine.zoom_range(), ZoomRange::default());
    assert!(engine.transform().scale.is_finite());
    assert!(engine.transform().scale > 0.0);
}

#[test]
fn instances_have_distinct_ids() {
    let a = portrait(1.0, 20.0);
    let b = portrait(1.0, 20.0);
    assert_ne!(a.instance_id(), b.instance_id());
}

#[test]
fn engine_is_send() {
    fn assert_send<T: Send>() {}
    assert_send::<EngineCore>();
}

// --- Pinch ---

#[test]
fn pinch_reports_start_scale_and_end() {
    let mut engine = portrait(1.0, 20.0);
    let (_, actions) = pinch(&mut engine, Point::new(200.0, 400.0), 100.0, 200.0, 0.0);

    let changes: Vec<&Action> = actions.iter().filter(|a| matches!(a, Action::PinchGestureChanged { .. })).collect();
    assert_eq!(changes.first(), Some(&&Action::PinchGestureChanged { running: true, scale: 1.0 }));
    assert_eq!(changes.last(), Some(&&Action::PinchGestureChanged { running: false, scale: 2.0 }));

    let scales = reported_scales(&actions);
    assert!(scales.len() > 1);
    assert!(approx_eq(*scales.last().unwrap(), 2.0));
    assert!(actions.contains(&Action::RenderNeeded));
    assert!(approx_eq(engine.state().zoom_scale.value(), 2.0));
    assert_eq!(engine.phase(GestureKind::Pinch), Phase::Ended);
}

#[test]
fn pinch_to_max_then_pan_off_screen_clamps() {
    let mut engine = portrait(1.0, 3.0);
    let (t, _) = pinch(&mut engine, Point::new(200.0, 400.0), 100.0, 300.0, 0.0);
    assert!(approx_eq(engine.state().zoom_scale.value(), 3.0));
    let (t, _) = settle(&mut engine, t);

    // Drawn 1200x600 inside 400x800: x may travel 400, y not at all.
    let start = Point::new(200.0, 400.0);
    let end = Point::new(1200.0, 400.0);
    let (t, _) = drag(&mut engine, start, end, t + 100.0, 20, 16.0);
    let live = engine.transform().translate.x;
    assert!(live > 400.0 && live < 1000.0, "rubber band: {live}");

    engine.on_pointer_up(PointerId(1), end, t + 200.0);
    settle(&mut engine, t + 200.0);
    assert!(approx_eq(engine.state().pan_offset.value().x, 400.0));
    assert_eq!(engine.state().pan_offset.value().y, 0.0);
    assert!(approx_eq(engine.transform().zoom, 3.0));
}

#[test]
fn pinch_past_max_bounces_back_into_range() {
    let mut engine = portrait(1.0, 3.0);
    let (t, actions) = pinch(&mut engine, Point::new(200.0, 400.0), 100.0, 500.0, 0.0);
    assert!(actions.contains(&Action::PinchGestureChanged { running: false, scale: 3.0 }));
    assert!(engine.transform().zoom > 3.0);
    let (_, actions) = settle(&mut engine, t);
    assert_eq!(engine.transform().zoom, 3.0);
    assert_eq!(reported_scales(&actions).last(), Some(&3.0));
}

#[test]
fn pinch_below_min_bounces_back_to_fit() {
    let mut engine = portrait(1.0, 3.0);
    let (t, _) = pinch(&mut engine, Point::new(200.0, 400.0), 200.0, 60.0, 0.0);
    let (_, _) = settle(&mut engine, t);
    assert_eq!(engine.transform().zoom, 1.0);
    assert_eq!(engine.transform().translate, Vector::ZERO);
}

#[test]
fn random_pinches_end_inside_zoom_range_and_limits() {
    let mut engine = portrait(1.0, 3.0);
    let mut rng = StdRng::seed_from_u64(11);
    let mut t = 0.0;
    for _ in 0..30 {
        let center = Point::new(rng.random_range(150.0..250.0), rng.random_range(350.0..450.0));
        let from = rng.random_range(60.0..200.0);
        let to = rng.random_range(20.0..600.0);
        let (end, _) = pinch(&mut engine, center, from, to, t);
        let (end, _) = settle(&mut engine, end);
        t = end + 1_000.0;

        let zoom = engine.state().zoom_scale.value();
        assert!((1.0..=3.0).contains(&zoom), "zoom {zoom}");
        let shown = engine.transform();
        assert!(shown.zoom >= 1.0 - EPSILON && shown.zoom <= 3.0 + EPSILON);
        let limit = engine.viewport().travel_limit(zoom);
        assert!(shown.translate.x.abs() <= limit.x + EPSILON, "{:?} vs {limit:?}", shown.translate);
        assert!(shown.translate.y.abs() <= limit.y + EPSILON, "{:?} vs {limit:?}", shown.translate);
    }
}

// --- Pan ---

#[test]
fn pan_at_fit_scale_cannot_move_content() {
    let mut engine = portrait(1.0, 20.0);
    let (t, _) = drag(&mut engine, Point::new(200.0, 400.0), Point::new(200.0, 600.0), 0.0, 10, 16.0);
    engine.on_pointer_up(PointerId(1), Point::new(200.0, 600.0), t + 200.0);
    settle(&mut engine, t + 200.0);
    assert_eq!(engine.transform().translate, Vector::ZERO);
}

#[test]
fn random_pans_stay_within_limits() {
    let mut engine = portrait(1.0, 3.0);
    let mut t = zoomed_in(&mut engine) + 1_000.0;
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..50 {
        let from = Point::new(rng.random_range(0.0..400.0), rng.random_range(0.0..800.0));
        let dx = rng.random_range(20.0..600.0) * if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let dy = rng.random_range(-300.0..300.0);
        let to = from + Vector::new(dx, dy);
        let steps = rng.random_range(2..12);
        let step_ms = rng.random_range(4.0..30.0);

        let (end, _) = drag(&mut engine, from, to, t, steps, step_ms);
        let release = if rng.random_bool(0.5) { end + 150.0 } else { end + 1.0 };
        engine.on_pointer_up(PointerId(1), to, release);
        let (end, _) = settle(&mut engine, release);
        t = end + 1_000.0;

        let offset = engine.state().pan_offset.value();
        assert!(offset.x.abs() <= 400.0 + EPSILON, "offset {offset:?}");
        assert!(offset.y.abs() <= EPSILON, "offset {offset:?}");
        assert!(approx_eq(engine.state().zoom_scale.value(), 3.0));
    }
}

#[test]
fn fast_release_flings_inside_limits() {
    let mut engine = portrait(1.0, 3.0);
    let t = zoomed_in(&mut engine) + 1_000.0;
    let to = Point::new(400.0, 400.0);
    let (end, _) = drag(&mut engine, Point::new(200.0, 400.0), to, t, 5, 8.0);
    engine.on_pointer_up(PointerId(1), to, end + 1.0);
    assert!(engine.state().pan_offset.x.is_animating());

    settle(&mut engine, end + 1.0);
    let x = engine.state().pan_offset.value().x;
    assert!(x > 200.0 && x <= 400.0 + EPSILON, "x {x}");
}

#[test]
fn touch_catches_fling() {
    let mut engine = portrait(1.0, 3.0);
    let t = zoomed_in(&mut engine) + 1_000.0;
    let to = Point::new(300.0, 400.0);
    let (end, _) = drag(&mut engine, Point::new(200.0, 400.0), to, t, 5, 8.0);
    engine.on_pointer_up(PointerId(1), to, end + 1.0);
    engine.tick(end + 1.0);
    engine.tick(end + 17.0);

    let caught = engine.state().pan_offset.value();
    engine.on_pointer_down(PointerId(1), Point::new(100.0, 100.0), end + 20.0);
    assert!(!engine.state().pan_offset.is_animating());
    engine.tick(end + 100.0);
    assert_eq!(engine.state().pan_offset.value(), caught);
}

#[test]
fn drag_during_reset_still_ends_centered() {
    let mut engine = portrait(1.0, 3.0);
    let t = zoomed_in(&mut engine) + 1_000.0;
    let (end, _) = drag(&mut engine, Point::new(200.0, 400.0), Point::new(300.0, 400.0), t, 10, 50.0);
    engine.on_pointer_up(PointerId(1), Point::new(300.0, 400.0), end + 200.0);
    let (t, _) = settle(&mut engine, end + 200.0);
    assert!(approx_eq(engine.state().pan_offset.value().x, 100.0));

    engine.reset_transform(true);
    engine.tick(t + 1_000.0);
    engine.tick(t + 1_016.0);
    assert!(engine.state().zoom_scale.value() > 1.0);

    let to = Point::new(160.0, 100.0);
    let (end, _) = drag(&mut engine, Point::new(100.0, 100.0), to, t + 1_020.0, 6, 50.0);
    engine.on_pointer_up(PointerId(1), to, end + 200.0);
    settle(&mut engine, end + 200.0);

    assert!(approx_eq(engine.state().zoom_scale.value(), 1.0));
    assert_eq!(engine.state().pan_offset.value(), Vector::ZERO);
}

#[test]
fn cancel_keeps_offset_and_stops() {
    let mut engine = portrait(1.0, 3.0);
    let t = zoomed_in(&mut engine) + 1_000.0;
    let (end, _) = drag(&mut engine, Point::new(200.0, 400.0), Point::new(300.0, 400.0), t, 10, 16.0);
    engine.on_pointer_cancel(PointerId(1), end + 1.0);

    assert_eq!(engine.phase(GestureKind::Pan), Phase::Cancelled);
    assert_eq!(engine.pointer_count(), 0);
    assert!(!engine.is_animating());
    assert!(approx_eq(engine.state().pan_offset.value().x, 100.0));
    assert_eq!(engine.state().pan_translate.value(), Vector::ZERO);
}

// --- Taps ---

#[test]
fn single_tap_fires_after_double_tap_window() {
    let mut engine = portrait(1.0, 20.0);
    let point = Point::new(50.0, 60.0);
    assert!(taps(&tap(&mut engine, point, 0.0)).is_empty());
    assert!(taps(&engine.tick(200.0)).is_empty());
    assert_eq!(taps(&engine.tick(341.0)), vec![point]);
    assert!(taps(&engine.tick(1_000.0)).is_empty());
    assert_eq!(engine.phase(GestureKind::SingleTap), Phase::Recognized);
}

#[test]
fn pending_tap_keeps_host_ticking() {
    let mut engine = portrait(1.0, 20.0);
    let point = Point::new(50.0, 60.0);
    let mut actions = tap(&mut engine, point, 0.0);
    assert!(!engine.is_animating());
    assert_eq!(engine.next_deadline_ms(), Some(340.0));

    // A host that only ticks on request.
    let mut now = 40.0;
    while engine.needs_tick() && now < 5_000.0 {
        now += FRAME_MS;
        actions.extend(engine.tick(now));
    }
    assert_eq!(taps(&actions), vec![point]);
    assert!(!engine.needs_tick());
    assert_eq!(engine.next_deadline_ms(), None);
}

#[test]
fn late_second_press_releases_first_tap() {
    let mut engine = portrait(1.0, 20.0);
    let point = Point::new(50.0, 60.0);
    tap(&mut engine, point, 0.0);
    let actions = engine.on_pointer_down(PointerId(1), point, 500.0);
    assert_eq!(taps(&actions), vec![point]);
}

#[test]
fn drag_is_not_a_tap() {
    let mut engine = portrait(1.0, 20.0);
    let (t, mut actions) = drag(&mut engine, Point::new(50.0, 60.0), Point::new(50.0, 200.0), 0.0, 4, 16.0);
    actions.extend(engine.on_pointer_up(PointerId(1), Point::new(50.0, 200.0), t + 10.0));
    actions.extend(engine.tick(t + 1_000.0));
    assert!(taps(&actions).is_empty());
}

#[test]
fn double_tap_zooms_in_then_back_out() {
    let mut engine = portrait(1.0, 20.0);
    let mut actions = double_tap(&mut engine, Point::new(300.0, 400.0), 0.0);
    assert_eq!(engine.phase(GestureKind::DoubleTap), Phase::Recognized);
    let (t, settled) = settle(&mut engine, 200.0);
    actions.extend(settled);
    assert_eq!(engine.state().zoom_scale.value(), 3.0);
    assert_eq!(engine.state().pan_offset.value(), Vector::new(-300.0, 0.0));
    assert_eq!(reported_scales(&actions).last(), Some(&3.0));

    actions.extend(double_tap(&mut engine, Point::new(300.0, 400.0), t + 1_000.0));
    let (_, settled) = settle(&mut engine, t + 1_200.0);
    actions.extend(settled);
    assert_eq!(engine.state().zoom_scale.value(), 1.0);
    assert_eq!(engine.transform().translate, Vector::ZERO);
    assert!(engine.state().is_identity());
    assert_eq!(reported_scales(&actions).last(), Some(&1.0));
    assert!(taps(&actions).is_empty());
}

// --- Reset ---

#[test]
fn going_inactive_animates_back_to_identity() {
    let mut engine = portrait(1.0, 20.0);
    let (t, _) = pinch(&mut engine, Point::new(200.0, 400.0), 100.0, 250.0, 0.0);
    let (t, _) = settle(&mut engine, t);
    assert!(approx_eq(engine.transform().zoom, 2.5));

    let actions = engine.set_active(false);
    assert!(!engine.is_active());
    assert_eq!(engine.reset_state(), ResetState::Resetting(ResetMode::Animated));
    assert!(reported_scales(&actions).is_empty());

    let (_, actions) = settle(&mut engine, t + 16.0);
    assert_eq!(engine.reset_state(), ResetState::Idle);
    assert_eq!(engine.transform().zoom, 1.0);
    assert_eq!(engine.transform().translate, Vector::ZERO);
    assert_eq!(reported_scales(&actions).last(), Some(&1.0));
}

#[test]
fn starting_inactive_does_not_reset() {
    let config = CanvasConfig::new(Size::new(400.0, 800.0)).with_active(false);
    let mut engine = EngineCore::new(&config, GestureTuning::default(), None);
    assert!(engine.set_active(false).is_empty());
    assert_eq!(engine.reset_state(), ResetState::Idle);
}

#[test]
fn immediate_reset_is_idempotent() {
    let mut engine = portrait(1.0, 20.0);
    zoomed_in(&mut engine);

    let actions = engine.reset_transform(false);
    assert!(engine.state().is_identity());
    assert!(actions.contains(&Action::ScaleChanged { scale: 1.0 }));
    assert!(actions.contains(&Action::RenderNeeded));

    let shown = engine.transform();
    assert!(engine.reset_transform(false).is_empty());
    assert_eq!(engine.transform(), shown);
}

#[test]
fn reset_interrupts_running_pinch() {
    let mut engine = portrait(1.0, 20.0);
    engine.on_pointer_down(PointerId(1), Point::new(150.0, 400.0), 0.0);
    engine.on_pointer_down(PointerId(2), Point::new(250.0, 400.0), 5.0);
    engine.on_pointer_move(PointerId(2), Point::new(300.0, 400.0), 20.0);
    assert!(engine.transform().zoom > 1.0);

    let actions = engine.reset_transform(false);
    assert!(actions.contains(&Action::PinchGestureChanged { running: false, scale: 1.0 }));
    assert_eq!(engine.phase(GestureKind::Pinch), Phase::Cancelled);

    engine.on_pointer_move(PointerId(2), Point::new(350.0, 400.0), 40.0);
    assert!(engine.state().is_identity());
}

// --- Pager ---

#[test]
fn horizontal_drag_at_rest_yields_to_pager() {
    let link = PagerLink::new();
    let config = CanvasConfig::new(Size::new(400.0, 800.0)).with_content_size(200.0, 100.0);
    let mut engine = EngineCore::new(&config, GestureTuning::default(), Some(link.clone()));
    assert!(link.should_pager_scroll.get());

    let (t, _) = drag(&mut engine, Point::new(100.0, 400.0), Point::new(300.0, 400.0), 0.0, 10, 16.0);
    assert_eq!(engine.phase(GestureKind::Pan), Phase::Failed);
    assert_eq!(engine.transform().translate, Vector::ZERO);
    engine.on_pointer_up(PointerId(1), Point::new(300.0, 400.0), t + 10.0);

    double_tap(&mut engine, Point::new(200.0, 400.0), t + 1_000.0);
    engine.tick(t + 1_200.0);
    engine.tick(t + 1_216.0);
    assert!(!link.should_pager_scroll.get());
    let (t, _) = settle(&mut engine, t + 1_232.0);

    drag(&mut engine, Point::new(100.0, 400.0), Point::new(300.0, 400.0), t + 1_000.0, 10, 16.0);
    assert_eq!(engine.phase(GestureKind::Pan), Phase::Active);
    assert!(engine.transform().translate.x > 100.0);
}

#[test]
fn pinch_drift_in_pager_follows_fingers() {
    let link = PagerLink::new();
    let config = CanvasConfig::new(Size::new(400.0, 800.0)).with_content_size(200.0, 100.0).with_zoom_range(1.0, 3.0);
    let mut engine = EngineCore::new(&config, GestureTuning::default(), Some(link.clone()));
    let start = Point::new(200.0, 400.0);
    let under = engine.transform().canvas_to_content(start);

    engine.on_pointer_down(PointerId(1), Point::new(150.0, 400.0), 0.0);
    engine.on_pointer_down(PointerId(2), Point::new(250.0, 400.0), 5.0);
    let steps = 12.0;
    let mut t = 5.0;
    let mut i = 1.0;
    while i <= steps {
        let center = start + Vector::new(120.0 * i / steps, 0.0);
        let half = (100.0 + 100.0 * i / steps) / 2.0;
        t += 8.0;
        engine.on_pointer_move(PointerId(1), Point::new(center.x - half, center.y), t);
        engine.on_pointer_move(PointerId(2), Point::new(center.x + half, center.y), t + 1.0);
        i += 1.0;
    }

    assert!(link.should_pager_scroll.get());
    assert_eq!(engine.phase(GestureKind::Pan), Phase::Active);
    let now = engine.transform().canvas_to_content(Point::new(320.0, 400.0));
    assert!((now.x - under.x).abs() < 1e-6, "{now:?} vs {under:?}");
    assert!((now.y - under.y).abs() < 1e-6, "{now:?} vs {under:?}");
}

#[test]
fn swiping_pager_suppresses_horizontal_pan() {
    let link = PagerLink::new();
    let config = CanvasConfig::new(Size::new(400.0, 800.0)).with_content_size(200.0, 100.0);
    let mut engine = EngineCore::new(&config, GestureTuning::default(), Some(link.clone()));
    let t = zoomed_in(&mut engine) + 1_000.0;

    link.is_swiping_in_pager.set(true);
    drag(&mut engine, Point::new(200.0, 400.0), Point::new(300.0, 500.0), t, 10, 16.0);
    assert_eq!(engine.phase(GestureKind::Pan), Phase::Active);
    assert_eq!(engine.state().pan_translate.value().x, 0.0);
    assert!(engine.state().pan_translate.value().y > 0.0);
}

// --- Host inputs ---

#[test]
fn content_resize_clamps_offset() {
    let mut engine = portrait(1.0, 20.0);
    double_tap(&mut engine, Point::new(300.0, 400.0), 0.0);
    settle(&mut engine, 200.0);
    assert_eq!(engine.state().pan_offset.value(), Vector::new(-300.0, 0.0));

    // Fit drops to 1: drawn 600 wide at zoom 3, so x may travel 100.
    let actions = engine.set_content_size(Size::new(200.0, 800.0));
    assert_eq!(engine.fit_scale().min_scale, 1.0);
    assert!(approx_eq(engine.state().pan_offset.value().x, -100.0));
    assert!(actions.contains(&Action::RenderNeeded));
}

#[test]
fn invalid_canvas_size_is_ignored() {
    let mut engine = portrait(1.0, 20.0);
    assert!(engine.set_canvas_size(Size::new(-1.0, 10.0)).is_empty());
    assert_eq!(engine.fit_scale().min_scale, 2.0);

    let actions = engine.set_canvas_size(Size::new(800.0, 800.0));
    assert_eq!(engine.fit_scale().min_scale, 4.0);
    assert!(actions.contains(&Action::RenderNeeded));
}

#[test]
fn non_finite_pointer_is_ignored() {
    let mut engine = portrait(1.0, 20.0);
    assert!(engine.on_pointer_down(PointerId(1), Point::new(f64::NAN, 3.0), 0.0).is_empty());
    assert_eq!(engine.pointer_count(), 0);
}

#[test]
fn handle_pointer_dispatches() {
    let mut engine = portrait(1.0, 20.0);
    engine.handle_pointer(PointerEvent::Down { id: PointerId(4), point: Point::new(10.0, 10.0) }, 0.0);
    assert_eq!(engine.pointer_count(), 1);
    engine.handle_pointer(PointerEvent::Cancel { id: PointerId(4) }, 10.0);
    assert_eq!(engine.pointer_count(), 0);
}

#[test]
fn teardown_stops_everything() {
    let mut engine = portrait(1.0, 20.0);
    double_tap(&mut engine, Point::new(300.0, 400.0), 0.0);
    engine.tick(200.0);
    engine.tick(216.0);
    assert!(engine.is_animating());

    engine.teardown();
    assert!(engine.is_torn_down());
    assert!(!engine.is_animating());
    let shown = engine.transform();
    assert!(engine.tick(232.0).is_empty());
    assert!(engine.on_pointer_down(PointerId(1), Point::new(1.0, 1.0), 240.0).is_empty());
    assert!(engine.reset_transform(true).is_empty());
    assert_eq!(engine.transform(), shown);
    engine.teardown();
}

#[test]
fn actions_serialize_with_type_tag() {
    let json = serde_json::to_value(Action::ScaleChanged { scale: 2.0 }).unwrap();
    assert_eq!(json, serde_json::json!({ "type": "scale_changed", "scale": 2.0 }));
    let json = serde_json::to_value(Action::RenderNeeded).unwrap();
    assert_eq!(json, serde_json::json!({ "type": "render_needed" }));
}
