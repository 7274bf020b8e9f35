#![allow(clippy::float_cmp)]

use glam::DVec2;

use super::*;
use crate::clock::ManualClock;
use crate::render::MatrixStack;

const EPSILON: f64 = 1e-9;

// =============================================================
// Helpers
// =============================================================

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

/// 800x600 window over 1600x1200 content, zoom 1..4, one frame already run.
fn make_view() -> (ScrollView, ManualClock) {
    let clock = ManualClock::new(0.0);
    let mut view = ScrollView::with_clock(clock.clone());
    view.set_window_rect(Rect::new(0.0, 0.0, 800.0, 600.0));
    view.set_content_rect(Rect::new(0.0, 0.0, 1600.0, 1200.0));
    view.set_zoom_min_max(1.0, 4.0);
    view.update();
    (view, clock)
}

fn run_frames(view: &mut ScrollView, n: usize) {
    for _ in 0..n {
        view.update();
    }
}

// =============================================================
// Setup
// =============================================================

#[test]
fn setup_defaults_content_to_window() {
    let mut view = ScrollView::with_clock(ManualClock::new(0.0));
    view.set_window_rect(Rect::new(10.0, 20.0, 300.0, 200.0));
    view.setup();
    assert_eq!(view.content_rect(), Rect::new(10.0, 20.0, 300.0, 200.0));
}

#[test]
fn initial_frame_is_identity_at_origin() {
    let (view, _) = make_view();
    assert_eq!(view.scroll_rect(), Rect::new(0.0, 0.0, 1600.0, 1200.0));
    assert_eq!(view.matrix(), DAffine2::IDENTITY);
    assert_eq!(view.zoom(), 1.0);
}

#[test]
fn non_finite_window_is_ignored() {
    let (mut view, _) = make_view();
    view.set_window_rect(Rect::new(f64::NAN, 0.0, 10.0, 10.0));
    assert_eq!(view.window_rect(), Rect::new(0.0, 0.0, 800.0, 600.0));
}

// =============================================================
// Dragging
// =============================================================

#[test]
fn one_frame_drag_eases_half_the_delta() {
    let (mut view, _) = make_view();
    assert!(view.pointer_down(400.0, 300.0, 0));
    assert!(view.pointer_moved(300.0, 300.0, 0));
    view.update();
    assert_eq!(view.scroll_target().x, -100.0);
    assert_eq!(view.scroll_position().x, -50.0);
}

#[test]
fn down_outside_window_is_not_consumed() {
    let (mut view, _) = make_view();
    assert!(!view.pointer_down(900.0, 300.0, 0));
    assert!(!view.is_dragging());
}

#[test]
fn disabled_interaction_consumes_nothing() {
    let (mut view, _) = make_view();
    view.set_user_interaction(false);
    assert!(!view.pointer_down(400.0, 300.0, 0));
    assert!(!view.double_tap(400.0, 300.0, 0));
    view.set_user_interaction(true);
    assert!(view.pointer_down(400.0, 300.0, 0));
}

#[test]
fn disabling_interaction_drops_live_drag() {
    let (mut view, _) = make_view();
    view.pointer_down(400.0, 300.0, 0);
    view.set_user_interaction(false);
    assert!(!view.is_dragging());
    assert!(view.touch_points().is_empty());
}

#[test]
fn overscroll_is_allowed_while_dragging() {
    let (mut view, _) = make_view();
    view.pointer_down(400.0, 300.0, 0);
    view.pointer_moved(500.0, 350.0, 0);
    view.update();
    assert_eq!(view.scroll_target(), pt(100.0, 50.0));
}

#[test]
fn release_past_edge_settles_exactly_on_boundary() {
    let (mut view, _) = make_view();
    view.pointer_down(400.0, 300.0, 0);
    view.pointer_moved(500.0, 350.0, 0);
    view.update();
    view.pointer_up(500.0, 350.0, 0);
    run_frames(&mut view, 300);
    assert_eq!(view.scroll_target(), pt(0.0, 0.0));
    assert_eq!(view.scroll_position(), pt(0.0, 0.0));
}

#[test]
fn partial_bounce_back_converges_exactly() {
    let (mut view, _) = make_view();
    view.set_bounce_back(0.2);
    view.set_scroll_position(-1000.0, 80.0, false);
    run_frames(&mut view, 500);
    assert_eq!(view.scroll_target(), pt(-800.0, 0.0));
    assert_eq!(view.scroll_position(), pt(-800.0, 0.0));
}

// =============================================================
// Momentum
// =============================================================

fn fling_left(view: &mut ScrollView) -> f64 {
    view.set_scroll_position(-400.0, -300.0, false);
    view.update();
    view.pointer_down(400.0, 300.0, 0);
    view.pointer_moved(380.0, 300.0, 0);
    view.update();
    view.pointer_up(380.0, 300.0, 0);
    let released_at = view.scroll_target().x;
    view.update();
    released_at
}

#[test]
fn per_axis_momentum_keeps_coasting_left() {
    let (mut view, _) = make_view();
    let released_at = fling_left(&mut view);
    assert_eq!(released_at, -420.0);
    assert!(approx_eq(view.scroll_target().x, -438.0));
}

#[test]
fn coupled_momentum_ignores_leftward_fling() {
    let (mut view, _) = make_view();
    view.set_momentum_policy(MomentumPolicy::Coupled);
    let released_at = fling_left(&mut view);
    assert_eq!(view.scroll_target().x, released_at);
}

// =============================================================
// Pinch
// =============================================================

fn start_pinch(view: &mut ScrollView) {
    assert!(view.pointer_down(300.0, 300.0, 1));
    assert!(view.pointer_down(500.0, 300.0, 2));
}

#[test]
fn pinch_keeps_content_under_midpoint() {
    let (mut view, _) = make_view();
    let anchor = view.screen_point_to_content_point(pt(400.0, 300.0));
    start_pinch(&mut view);

    view.pointer_moved(200.0, 300.0, 1);
    view.pointer_moved(600.0, 300.0, 2);
    view.update();
    assert!(approx_eq(view.zoom(), 1.6));
    assert!(point_approx_eq(view.content_point_to_screen_point(anchor), pt(400.0, 300.0)));

    view.pointer_moved(100.0, 300.0, 1);
    view.pointer_moved(700.0, 300.0, 2);
    view.update();
    assert!(approx_eq(view.zoom(), 2.2));
    assert!(point_approx_eq(view.content_point_to_screen_point(anchor), pt(400.0, 300.0)));
}

#[test]
fn moving_pinch_midpoint_pans_content() {
    let (mut view, _) = make_view();
    let anchor = view.screen_point_to_content_point(pt(400.0, 300.0));
    start_pinch(&mut view);
    view.pointer_moved(350.0, 250.0, 1);
    view.pointer_moved(550.0, 250.0, 2);
    view.update();
    assert_eq!(view.zoom(), 1.0);
    assert!(point_approx_eq(view.content_point_to_screen_point(anchor), pt(450.0, 250.0)));
}

#[test]
fn second_contact_cancels_drag() {
    let (mut view, _) = make_view();
    view.pointer_down(300.0, 300.0, 1);
    assert!(view.is_dragging());
    view.pointer_down(500.0, 300.0, 2);
    assert!(!view.is_dragging());
    assert!(view.is_zooming());
}

#[test]
fn third_contact_is_not_consumed() {
    let (mut view, _) = make_view();
    start_pinch(&mut view);
    assert!(!view.pointer_down(100.0, 100.0, 3));
    assert_eq!(view.touch_points().len(), 2);
}

#[test]
fn lifting_one_finger_ends_pinch_and_accepts_fresh_drag() {
    let (mut view, _) = make_view();
    start_pinch(&mut view);
    view.update();
    assert!(view.pointer_up(300.0, 300.0, 1));
    assert!(view.touch_points().is_empty());
    assert!(!view.is_zooming());
    assert!(!view.pointer_moved(520.0, 300.0, 2));

    view.update();
    assert!(view.pointer_down(450.0, 300.0, 3));
    assert!(view.is_dragging());
    assert_eq!(view.touch_points().len(), 1);
}

#[test]
fn pinch_is_hard_clamped_by_default() {
    let (mut view, _) = make_view();
    view.set_zoom(3.0);
    view.update();
    start_pinch(&mut view);
    view.pointer_moved(-500.0, 300.0, 1);
    view.pointer_moved(1300.0, 300.0, 2);
    view.update();
    assert_eq!(view.zoom(), 4.0);
}

#[test]
fn pinch_rubber_bands_past_max_when_unclamped() {
    let (mut view, _) = make_view();
    view.set_clamp_zoom_during_gesture(false);
    view.set_zoom(3.0);
    view.update();
    start_pinch(&mut view);
    view.pointer_moved(-500.0, 300.0, 1);
    view.pointer_moved(1300.0, 300.0, 2);
    view.update();
    assert!(approx_eq(view.zoom(), 6.0));

    view.pointer_up(1300.0, 300.0, 2);
    view.update();
    assert_eq!(view.zoom(), 4.0);
}

#[test]
fn pinch_disabled_turns_two_fingers_into_pan() {
    let (mut view, _) = make_view();
    view.set_pinch_zoom_enabled(false);
    start_pinch(&mut view);
    view.pointer_moved(100.0, 300.0, 1);
    view.pointer_moved(700.0, 300.0, 2);
    view.update();
    assert_eq!(view.zoom(), 1.0);
}

#[test]
fn anchor_markers_coincide_while_zooming() {
    let (mut view, _) = make_view();
    assert_eq!(view.anchor_markers(), None);
    start_pinch(&mut view);
    view.pointer_moved(200.0, 300.0, 1);
    view.update();
    let Some((screen, mapped)) = view.anchor_markers() else {
        panic!("anchor markers should exist mid-pinch");
    };
    assert!(point_approx_eq(screen, mapped));
}

#[test]
fn secondary_mouse_button_drives_pinch() {
    let (mut view, _) = make_view();
    assert!(view.mouse_pressed(400.0, 300.0, Button::Secondary));
    assert_eq!(view.touch_points().len(), 2);
    assert!(view.mouse_dragged(700.0, 300.0, Button::Secondary));
    view.update();
    assert!(view.zoom() > 1.0);
    assert!(view.mouse_released(700.0, 300.0, Button::Secondary));
    assert!(view.touch_points().is_empty());
}

#[test]
fn primary_mouse_button_drags() {
    let (mut view, _) = make_view();
    assert!(view.mouse_pressed(400.0, 300.0, Button::Primary));
    assert!(view.mouse_dragged(350.0, 300.0, Button::Primary));
    view.update();
    assert_eq!(view.scroll_target().x, -50.0);
    assert!(!view.mouse_pressed(400.0, 300.0, Button::Middle));
}

// =============================================================
// Animated zoom
// =============================================================

#[test]
fn zoom_to_animates_over_time_and_holds_anchor() {
    let (mut view, clock) = make_view();
    let anchor = view.screen_point_to_content_point(pt(100.0, 100.0));
    view.zoom_to(pt(100.0, 100.0), 2.0, 1.0);
    assert!(view.is_zoom_animating());

    view.update();
    assert_eq!(view.zoom(), 1.0);
    assert!(view.is_zooming());

    clock.set(0.5);
    view.update();
    assert!(approx_eq(view.zoom(), 1.5));
    assert!(point_approx_eq(view.content_point_to_screen_point(anchor), pt(100.0, 100.0)));

    clock.set(1.0);
    view.update();
    assert_eq!(view.zoom(), 2.0);
    assert!(!view.is_zooming());
    assert!(!view.is_zoom_animating());
    assert!(point_approx_eq(view.content_point_to_screen_point(anchor), pt(100.0, 100.0)));
}

#[test]
fn zero_duration_zoom_resolves_in_one_frame() {
    let (mut view, _) = make_view();
    view.zoom_to(pt(400.0, 300.0), 3.0, 0.0);
    view.update();
    assert_eq!(view.zoom(), 3.0);
    assert!(!view.is_zoom_animating());
}

#[test]
fn zoom_to_max_and_min() {
    let (mut view, _) = make_view();
    view.zoom_to_max(pt(400.0, 300.0), 0.0);
    view.update();
    assert!(view.is_zoomed_max());
    view.zoom_to_min(pt(400.0, 300.0), 0.0);
    view.update();
    assert!(view.is_zoomed_min());
}

#[test]
fn new_drag_cancels_animation() {
    let (mut view, clock) = make_view();
    view.zoom_to(pt(400.0, 300.0), 3.0, 1.0);
    view.update();
    clock.set(0.5);
    view.update();
    let mid_zoom = view.zoom();

    assert!(view.pointer_down(400.0, 300.0, 0));
    assert!(!view.is_zoom_animating());
    assert!(!view.is_zooming());
    clock.set(2.0);
    view.update();
    assert_eq!(view.zoom(), mid_zoom);
}

#[test]
fn drag_after_pinch_starts_from_anchored_position() {
    let (mut view, _) = make_view();
    start_pinch(&mut view);
    view.pointer_moved(100.0, 300.0, 1);
    view.pointer_moved(700.0, 300.0, 2);
    view.update();
    let anchored = view.scroll_target();
    assert_eq!(anchored, view.scroll_position());
    view.pointer_up(700.0, 300.0, 2);

    view.pointer_down(400.0, 300.0, 5);
    view.pointer_moved(390.0, 300.0, 5);
    view.update();
    assert!(approx_eq(view.scroll_target().x, anchored.x - 10.0));
}

// =============================================================
// Double-tap
// =============================================================

#[test]
fn host_double_tap_steps_zoom_and_holds_anchor() {
    let (mut view, clock) = make_view();
    let anchor = view.screen_point_to_content_point(pt(100.0, 100.0));
    assert!(view.double_tap(100.0, 100.0, 0));
    view.update();
    clock.set(0.15);
    view.update();
    assert!(view.zoom() > 1.0 && view.zoom() < 2.0);
    clock.set(0.5);
    view.update();
    assert_eq!(view.zoom(), 2.0);
    assert!(point_approx_eq(view.content_point_to_screen_point(anchor), pt(100.0, 100.0)));
}

#[test]
fn detected_double_tap_starts_zoom() {
    let (mut view, clock) = make_view();
    view.pointer_down(100.0, 100.0, 0);
    view.pointer_up(100.0, 100.0, 0);
    clock.set(0.1);
    view.pointer_down(104.0, 98.0, 0);
    assert!(view.is_zoom_animating());
    view.pointer_up(104.0, 98.0, 0);
    view.update();
    clock.set(1.0);
    view.update();
    assert_eq!(view.zoom(), 2.0);
}

#[test]
fn double_tap_at_top_of_range_returns_to_min() {
    let (mut view, _) = make_view();
    view.set_double_tap_zoom(DoubleTapZoom { increment: 3.0, duration_secs: 0.0, ..DoubleTapZoom::default() });
    view.double_tap(400.0, 300.0, 0);
    view.update();
    assert_eq!(view.zoom(), 4.0);
    view.double_tap(400.0, 300.0, 0);
    view.update();
    assert_eq!(view.zoom(), 1.0);
}

// =============================================================
// Scroll placement and queries
// =============================================================

#[test]
fn set_scroll_position_without_ease_jumps() {
    let (mut view, _) = make_view();
    view.pointer_down(400.0, 300.0, 0);
    view.set_scroll_position(-200.0, -100.0, false);
    assert!(!view.is_dragging());
    view.update();
    assert_eq!(view.scroll_position(), pt(-200.0, -100.0));
}

#[test]
fn set_scroll_position_with_ease_glides() {
    let (mut view, _) = make_view();
    view.set_scroll_position(-200.0, 0.0, true);
    view.update();
    assert_eq!(view.scroll_position(), pt(-100.0, 0.0));
}

#[test]
fn normalized_scroll_position() {
    let (mut view, _) = make_view();
    view.set_scroll_position(-400.0, -300.0, false);
    view.update();
    assert_eq!(view.scroll_position_normalized(), pt(0.5, 0.5));

    view.set_scroll_position_normalized(1.0, 0.25, false);
    view.update();
    assert_eq!(view.scroll_position(), pt(-800.0, -150.0));
}

#[test]
fn normalized_scroll_for_content_smaller_than_window_is_zero() {
    let (mut view, _) = make_view();
    view.set_content_rect(Rect::new(0.0, 0.0, 400.0, 300.0));
    view.update();
    assert_eq!(view.scroll_position_normalized(), pt(0.0, 0.0));
}

#[test]
fn fit_content_to_window_covers_window() {
    let (mut view, _) = make_view();
    view.set_zoom_multiplier(2.0);
    view.set_content_rect(Rect::new(0.0, 0.0, 400.0, 200.0));
    view.fit_content_to_window();
    assert_eq!(view.zoom_min(), 3.0);
    assert_eq!(view.zoom_max(), 6.0);
    view.update();
    assert_eq!(view.scroll_rect().width, 1200.0);
    assert_eq!(view.scroll_rect().height, 600.0);
}

#[test]
fn zoom_always_within_bounds_after_set() {
    let (mut view, _) = make_view();
    for v in [0.0, 0.99, 1.0, 2.5, 4.0, 4.01, -3.0] {
        view.set_zoom(v);
        assert!(view.zoom() >= view.zoom_min() && view.zoom() <= view.zoom_max());
    }
}

#[test]
fn zoom_normalized_tracks_scale() {
    let (mut view, _) = make_view();
    view.set_zoom(2.5);
    assert!(approx_eq(view.zoom_normalized(), 0.5));
    assert!(view.is_zoomed());
}

#[test]
fn matrix_maps_content_through_scroll_rect() {
    let (mut view, _) = make_view();
    view.set_zoom(2.0);
    view.set_scroll_position(-100.0, -50.0, false);
    view.update();
    let p = view.matrix().transform_point2(DVec2::new(10.0, 10.0));
    assert_eq!(p, DVec2::new(-80.0, -30.0));
    assert!(point_approx_eq(view.content_point_to_screen_point(pt(10.0, 10.0)), pt(-80.0, -30.0)));
}

#[test]
fn begin_transform_is_scoped() {
    let (mut view, _) = make_view();
    view.set_scroll_position(-100.0, 0.0, false);
    view.update();
    let mut stack = MatrixStack::new();
    {
        let guard = view.begin_transform(&mut stack);
        assert_eq!(guard.current(), view.matrix());
        view.end_transform(guard);
    }
    assert_eq!(stack.depth(), 0);
    assert_eq!(stack.current(), DAffine2::IDENTITY);
}

#[test]
fn reset_returns_to_origin_at_min_zoom() {
    let (mut view, _) = make_view();
    view.set_zoom(3.0);
    view.set_scroll_position(-300.0, -300.0, false);
    view.update();
    view.reset();
    assert_eq!(view.zoom(), 1.0);
    assert_eq!(view.scroll_position(), pt(0.0, 0.0));
    assert_eq!(view.matrix(), DAffine2::IDENTITY);
}

// =============================================================
// Degenerate geometry
// =============================================================

#[test]
fn empty_content_never_produces_nan() {
    let (mut view, clock) = make_view();
    view.set_content_rect(Rect::default());
    view.fit_content_to_window();
    view.update();
    view.pointer_down(100.0, 100.0, 0);
    view.pointer_moved(50.0, 80.0, 0);
    view.update();
    view.pointer_up(50.0, 80.0, 0);
    view.zoom_to(pt(10.0, 10.0), 2.0, 0.5);
    view.update();
    clock.set(1.0);
    run_frames(&mut view, 10);

    let m = view.matrix();
    assert!(m.translation.is_finite());
    assert!(m.matrix2.is_finite());
    assert!(view.scroll_position().is_finite());
    assert!(view.zoom().is_finite());
}

#[test]
fn empty_window_never_produces_nan() {
    let clock = ManualClock::new(0.0);
    let mut view = ScrollView::with_clock(clock);
    view.set_content_rect(Rect::new(0.0, 0.0, 100.0, 100.0));
    view.fit_content_to_window();
    view.update();
    view.zoom_to(pt(0.0, 0.0), 1.0, 0.0);
    view.update();
    assert!(view.scroll_position().is_finite());
    assert!(view.zoom().is_finite());
    assert!(view.scroll_position_normalized().is_finite());
}

#[test]
fn animation_started_mid_pinch_finishes_after_lift() {
    let (mut view, clock) = make_view();
    let anchor = view.screen_point_to_content_point(pt(400.0, 300.0));
    start_pinch(&mut view);
    view.update();

    view.zoom_to(pt(400.0, 300.0), 3.0, 1.0);
    view.update();
    clock.set(0.5);
    view.update();
    assert!(approx_eq(view.zoom(), 2.0));

    view.pointer_moved(650.0, 320.0, 2);
    assert!(view.pointer_up(650.0, 320.0, 2));
    clock.set(1.0);
    view.update();

    assert_eq!(view.zoom(), 3.0);
    assert!(!view.is_zoom_animating());
    assert!(!view.is_zooming());
    assert!(point_approx_eq(view.content_point_to_screen_point(anchor), pt(400.0, 300.0)));
}

#[test]
fn pinch_in_collapsed_window_keeps_scale() {
    let (mut view, _) = make_view();
    view.set_zoom(2.0);
    view.update();
    start_pinch(&mut view);
    view.update();
    assert_eq!(view.zoom(), 2.0);

    view.set_window_rect(Rect::default());
    view.update();
    assert_eq!(view.zoom(), 2.0);
    assert!(view.scroll_position().is_finite());
}

// =============================================================
// Per-frame change flags
// =============================================================

#[test]
fn drag_changed_reports_since_last_update() {
    let (mut view, _) = make_view();
    assert!(!view.drag_changed());
    view.pointer_down(400.0, 300.0, 0);
    assert!(view.drag_changed());
    assert!(!view.zoom_changed());
    view.update();
    assert!(!view.drag_changed());
    view.pointer_up(400.0, 300.0, 0);
    assert!(view.drag_changed());
}

#[test]
fn zoom_changed_reports_pinch_start_and_end() {
    let (mut view, _) = make_view();
    start_pinch(&mut view);
    assert!(view.zoom_changed());
    view.update();
    assert!(!view.zoom_changed());
    view.pointer_up(500.0, 300.0, 2);
    assert!(view.zoom_changed());
}

#[test]
fn scroll_velocity_tracks_drag_then_decays() {
    let (mut view, _) = make_view();
    view.pointer_down(400.0, 300.0, 0);
    view.pointer_moved(380.0, 300.0, 0);
    view.update();
    assert_eq!(view.scroll_velocity(), pt(-20.0, 0.0));

    view.pointer_up(380.0, 300.0, 0);
    view.update();
    assert!(approx_eq(view.scroll_velocity().x, -18.0));
}
