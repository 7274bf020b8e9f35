//! The scroll view: one owner for all viewport state and the per-frame update.
//!
//! Hosts feed pointer events in as they arrive and call [`ScrollView::update`]
//! once per rendered frame. Event handlers only record intent (drag/pinch
//! primitives, animation requests); `update` resolves that intent into a scale,
//! a scroll rect and the render matrix. Queries and
//! [`ScrollView::begin_transform`] read the result without mutating anything.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use glam::DAffine2;

use crate::clock::{Clock, SystemClock};
use crate::config::ScrollViewConfig;
use crate::geometry::{
    Point, Rect, clamp_unit, content_point_at_screen_point, matrix_for_rect, rect_with_content_point_at_screen_point,
    safe_ratio, screen_point_at_content_point, scroll_bounds,
};
use crate::input::{Button, ContactId, Gesture, TouchPoint, TouchTracker};
use crate::render::{RenderTarget, TransformGuard};
use crate::scroll::{MomentumPolicy, ScrollPhysics};
use crate::zoom::{DoubleTapZoom, ZoomEngine};

/// Pan/zoom viewport controller.
pub struct ScrollView {
    window: Rect,
    content: Rect,
    scroll_rect: Rect,
    matrix: DAffine2,
    config: ScrollViewConfig,
    touches: TouchTracker,
    scroll: ScrollPhysics,
    zoom: ZoomEngine,
    clock: Box<dyn Clock>,
}

impl Default for ScrollView {
    fn default() -> Self {
        Self::with_clock(SystemClock::default())
    }
}

impl ScrollView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A view that samples `clock` for animation and double-tap timing.
    #[must_use]
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            window: Rect::default(),
            content: Rect::default(),
            scroll_rect: Rect::default(),
            matrix: DAffine2::IDENTITY,
            config: ScrollViewConfig::default(),
            touches: TouchTracker::new(),
            scroll: ScrollPhysics::new(),
            zoom: ZoomEngine::new(),
            clock: Box::new(clock),
        }
    }

    // --- Setup ---

    /// Default an unset content rect to the window rect.
    pub fn setup(&mut self) {
        if self.content.is_empty() {
            self.content = self.window;
        }
        self.resize_scroll_rect();
    }

    /// Return to the top-left at minimum zoom with no gesture or animation.
    pub fn reset(&mut self) {
        self.touches.clear();
        self.scroll.reset();
        self.zoom.reset();
        self.matrix = DAffine2::IDENTITY;
        self.scroll_rect = Rect::default();
        self.resize_scroll_rect();
        tracing::debug!("scroll view reset");
    }

    pub fn set_window_rect(&mut self, rect: Rect) {
        if let Some(rect) = finite_rect(rect, "window") {
            self.window = rect;
        }
    }

    pub fn set_content_rect(&mut self, rect: Rect) {
        if let Some(rect) = finite_rect(rect, "content") {
            self.content = rect;
            self.resize_scroll_rect();
        }
    }

    // --- Configuration ---

    #[must_use]
    pub fn config(&self) -> &ScrollViewConfig {
        &self.config
    }

    /// Replace every tunable. Takes effect from the next update.
    pub fn apply_config(&mut self, config: ScrollViewConfig) {
        let config = config.sanitized();
        let interaction = config.user_interaction_enabled;
        self.config = ScrollViewConfig { user_interaction_enabled: self.config.user_interaction_enabled, ..config };
        self.set_user_interaction(interaction);
    }

    pub fn set_scroll_easing(&mut self, value: f64) {
        self.apply_config(ScrollViewConfig { scroll_easing: value, ..self.config });
    }

    pub fn set_bounce_back(&mut self, value: f64) {
        self.apply_config(ScrollViewConfig { bounce_back: value, ..self.config });
    }

    pub fn set_drag_decay(&mut self, value: f64) {
        self.apply_config(ScrollViewConfig { drag_decay: value, ..self.config });
    }

    pub fn set_momentum_policy(&mut self, policy: MomentumPolicy) {
        self.config.momentum_policy = policy;
    }

    pub fn set_clamp_zoom_during_gesture(&mut self, clamp: bool) {
        self.config.clamp_zoom_during_gesture = clamp;
    }

    pub fn set_pinch_zoom_enabled(&mut self, enabled: bool) {
        self.config.pinch_zoom_enabled = enabled;
    }

    pub fn set_double_tap_detection(&mut self, enabled: bool, interval_secs: f64, distance_px: f64) {
        self.apply_config(ScrollViewConfig {
            detect_double_tap: enabled,
            double_tap_interval_secs: interval_secs,
            double_tap_distance_px: distance_px,
            ..self.config
        });
    }

    pub fn set_double_tap_zoom(&mut self, step: DoubleTapZoom) {
        self.apply_config(ScrollViewConfig { double_tap_zoom: step, ..self.config });
    }

    /// Gate every event-intake method. Disabling drops any live gesture.
    pub fn set_user_interaction(&mut self, enabled: bool) {
        if self.config.user_interaction_enabled == enabled {
            return;
        }
        self.config.user_interaction_enabled = enabled;
        if !enabled {
            self.touches.clear();
            self.scroll.drag_cancel();
            if !self.zoom.is_animating() {
                self.zoom.cancel();
            }
        }
        tracing::debug!(enabled, "user interaction toggled");
    }

    // --- Zoom bounds and targets ---

    pub fn set_zoom_min_max(&mut self, min: f64, max: f64) {
        self.zoom.set_min_max(min, max);
    }

    pub fn set_zoom_multiplier(&mut self, multiplier: f64) {
        self.zoom.set_multiplier(multiplier);
    }

    /// Set the minimum zoom so the content covers the whole window.
    pub fn fit_content_to_window(&mut self) {
        self.zoom.fit_content(&self.window, &self.content);
    }

    pub fn set_zoom(&mut self, value: f64) {
        self.zoom.set_scale(value);
    }

    /// Animate the zoom to `zoom` about screen point `pos`. Starts on the next update.
    pub fn zoom_to(&mut self, pos: Point, zoom: f64, duration_secs: f64) {
        let now = self.clock.now_secs();
        self.zoom.zoom_to(pos, zoom, duration_secs, now);
    }

    pub fn zoom_to_min(&mut self, pos: Point, duration_secs: f64) {
        self.zoom_to(pos, self.zoom.scale_min(), duration_secs);
    }

    pub fn zoom_to_max(&mut self, pos: Point, duration_secs: f64) {
        self.zoom_to(pos, self.zoom.scale_max(), duration_secs);
    }

    // --- Scroll placement ---

    /// Cancel any gesture or animation and move the scroll target to `(x, y)`.
    ///
    /// Without `ease` the rendered position jumps there as well.
    pub fn set_scroll_position(&mut self, x: f64, y: f64, ease: bool) {
        let p = Point::new(x, y);
        if !p.is_finite() {
            tracing::warn!(x, y, "ignoring non-finite scroll position");
            return;
        }
        self.scroll.drag_cancel();
        self.zoom.cancel();
        self.scroll.set_position(p, ease);
    }

    /// Position in `[0, 1]` per axis across the scrollable range; 0 is the top-left edge.
    pub fn set_scroll_position_normalized(&mut self, nx: f64, ny: f64, ease: bool) {
        let (min, max) = scroll_bounds(&self.scaled_content(), &self.window);
        let x = max.x - clamp_unit(nx) * (max.x - min.x);
        let y = max.y - clamp_unit(ny) * (max.y - min.y);
        self.set_scroll_position(x, y, ease);
    }

    // --- Event intake ---

    /// Contact down. Returns whether the event was consumed.
    pub fn pointer_down(&mut self, x: f64, y: f64, id: ContactId) -> bool {
        if !self.config.user_interaction_enabled {
            return false;
        }
        let p = Point::new(x, y);
        if !self.window.contains(p) {
            return false;
        }
        let now = self.clock.now_secs();
        let gestures = self.touches.down(id, p, now, self.config.double_tap_rule());
        if gestures.is_empty() {
            return false;
        }
        for gesture in gestures {
            self.apply_gesture(gesture);
        }
        true
    }

    pub fn pointer_moved(&mut self, x: f64, y: f64, id: ContactId) -> bool {
        if !self.config.user_interaction_enabled {
            return false;
        }
        match self.touches.moved(id, Point::new(x, y)) {
            Some(gesture) => {
                self.apply_gesture(gesture);
                true
            }
            None => false,
        }
    }

    pub fn pointer_up(&mut self, x: f64, y: f64, id: ContactId) -> bool {
        if !self.config.user_interaction_enabled {
            return false;
        }
        match self.touches.up(id, Point::new(x, y)) {
            Some(gesture) => {
                self.apply_gesture(gesture);
                true
            }
            None => false,
        }
    }

    pub fn pointer_cancelled(&mut self, x: f64, y: f64, id: ContactId) -> bool {
        if !self.config.user_interaction_enabled {
            return false;
        }
        match self.touches.cancel(id, Point::new(x, y)) {
            Some(gesture) => {
                self.apply_gesture(gesture);
                true
            }
            None => false,
        }
    }

    /// Host-detected double-tap: start the double-tap zoom about `(x, y)`.
    pub fn double_tap(&mut self, x: f64, y: f64, id: ContactId) -> bool {
        if !self.config.user_interaction_enabled {
            return false;
        }
        let p = Point::new(x, y);
        if !self.window.contains(p) {
            return false;
        }
        tracing::debug!(x, y, id, "double-tap received");
        self.apply_gesture(Gesture::DoubleTap(p));
        true
    }

    /// Mouse press. Secondary registers two contacts at the same point to drive a pinch.
    pub fn mouse_pressed(&mut self, x: f64, y: f64, button: Button) -> bool {
        match button {
            Button::Primary => self.pointer_down(x, y, Button::Primary.contact_id()),
            Button::Secondary => {
                let first = self.pointer_down(x, y, Button::Primary.contact_id());
                let second = self.pointer_down(x, y, Button::Secondary.contact_id());
                first || second
            }
            Button::Middle => false,
        }
    }

    pub fn mouse_dragged(&mut self, x: f64, y: f64, button: Button) -> bool {
        self.pointer_moved(x, y, button.contact_id())
    }

    pub fn mouse_released(&mut self, x: f64, y: f64, button: Button) -> bool {
        self.pointer_up(x, y, button.contact_id())
    }

    fn apply_gesture(&mut self, gesture: Gesture) {
        match gesture {
            Gesture::DragDown(p) => {
                self.zoom.cancel();
                self.scroll.drag_down(p);
            }
            Gesture::DragMove(p) => self.scroll.drag_moved(p),
            Gesture::DragUp(p) => self.scroll.drag_up(p),
            Gesture::PinchDown { midpoint, distance } => {
                self.scroll.drag_cancel();
                self.zoom.cancel();
                self.zoom.pinch_down(midpoint, distance, &self.scroll_rect, &self.content);
            }
            Gesture::PinchMove { midpoint, distance } => self.zoom.pinch_moved(midpoint, distance),
            Gesture::PinchUp { midpoint, distance } => self.zoom.pinch_up(midpoint, distance),
            Gesture::DoubleTap(p) => {
                let step = self.config.double_tap_zoom;
                let target = self.zoom.double_tap_target(&step);
                self.zoom_to(p, target, step.duration_secs);
            }
        }
    }

    // --- Frame ---

    /// Advance one frame: resolve gestures, physics and animation into the scroll rect and matrix.
    pub fn update(&mut self) {
        let now = self.clock.now_secs();

        if let Some(anchor) = self.zoom.take_pending_start() {
            self.scroll.drag_cancel();
            self.zoom.pinch_down(anchor, 0.0, &self.scroll_rect, &self.content);
        }

        self.zoom.step(self.window.diagonal(), now, self.config.pinch_zoom_enabled);
        self.zoom.constrain(self.config.clamp_zoom_during_gesture);
        self.resize_scroll_rect();

        let zooming = self.zoom.is_zooming();
        let dragging = self.scroll.is_dragging();

        if !zooming {
            if dragging {
                self.scroll.step_drag();
            } else {
                self.scroll.step_momentum(self.config.drag_decay, self.config.momentum_policy);
            }
        }

        if !dragging && !zooming {
            let size = (self.scroll_rect.width, self.scroll_rect.height);
            self.scroll.contain(size, &self.window, self.config.bounce_back);
        }

        self.scroll.ease(self.config.scroll_easing);
        self.scroll_rect = self.scroll_rect.with_position(self.scroll.eased());

        if let Some((screen, content_point)) = self.zoom.anchor() {
            self.scroll_rect =
                rect_with_content_point_at_screen_point(&self.scroll_rect, &self.content, content_point, screen);
            self.scroll.sync_to(self.scroll_rect.position());
        }
        self.matrix = matrix_for_rect(&self.scroll_rect, &self.content);

        tracing::trace!(
            x = self.scroll_rect.x,
            y = self.scroll_rect.y,
            scale = self.zoom.scale(),
            "frame updated"
        );

        self.scroll.clear_changed();
        self.zoom.finish_frame();
    }

    /// Push the current matrix onto `target` until the returned guard drops.
    pub fn begin_transform<'a, T: RenderTarget + ?Sized>(&self, target: &'a mut T) -> TransformGuard<'a, T> {
        TransformGuard::new(target, &self.matrix)
    }

    /// Pop the transform pushed by [`Self::begin_transform`].
    pub fn end_transform<T: RenderTarget + ?Sized>(&self, guard: TransformGuard<'_, T>) {
        drop(guard);
    }

    // --- Queries ---

    #[must_use]
    pub fn window_rect(&self) -> Rect {
        self.window
    }

    #[must_use]
    pub fn content_rect(&self) -> Rect {
        self.content
    }

    #[must_use]
    pub fn scroll_rect(&self) -> Rect {
        self.scroll_rect
    }

    #[must_use]
    pub fn matrix(&self) -> DAffine2 {
        self.matrix
    }

    /// Rendered scroll position.
    #[must_use]
    pub fn scroll_position(&self) -> Point {
        self.scroll.eased()
    }

    /// Raw scroll target the rendered position is easing toward.
    #[must_use]
    pub fn scroll_target(&self) -> Point {
        self.scroll.position()
    }

    /// Rendered position as `[0, 1]` per axis across the scrollable range.
    #[must_use]
    pub fn scroll_position_normalized(&self) -> Point {
        let (min, max) = scroll_bounds(&self.scroll_rect, &self.window);
        let pos = self.scroll.eased();
        Point::new(
            clamp_unit(safe_ratio(max.x - pos.x, max.x - min.x, 0.0)),
            clamp_unit(safe_ratio(max.y - pos.y, max.y - min.y, 0.0)),
        )
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom.scale()
    }

    #[must_use]
    pub fn zoom_min(&self) -> f64 {
        self.zoom.scale_min()
    }

    #[must_use]
    pub fn zoom_max(&self) -> f64 {
        self.zoom.scale_max()
    }

    #[must_use]
    pub fn zoom_multiplier(&self) -> f64 {
        self.zoom.scale_multiplier()
    }

    #[must_use]
    pub fn zoom_normalized(&self) -> f64 {
        self.zoom.normalized()
    }

    #[must_use]
    pub fn is_zoomed(&self) -> bool {
        self.zoom.is_zoomed()
    }

    #[must_use]
    pub fn is_zoomed_min(&self) -> bool {
        self.zoom.is_zoomed_min()
    }

    #[must_use]
    pub fn is_zoomed_max(&self) -> bool {
        self.zoom.is_zoomed_max()
    }

    #[must_use]
    pub fn is_zooming(&self) -> bool {
        self.zoom.is_zooming()
    }

    #[must_use]
    pub fn is_zoom_animating(&self) -> bool {
        self.zoom.is_animating()
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.scroll.is_dragging()
    }

    /// Last frame's drag velocity while dragging, or the decaying release velocity after.
    #[must_use]
    pub fn scroll_velocity(&self) -> Point {
        self.scroll.velocity()
    }

    /// A drag started or ended since the last update.
    #[must_use]
    pub fn drag_changed(&self) -> bool {
        self.scroll.dragging_changed()
    }

    /// A zoom started or ended since the last update, or an animation finished during it.
    #[must_use]
    pub fn zoom_changed(&self) -> bool {
        self.zoom.zooming_changed()
    }

    #[must_use]
    pub fn user_interaction_enabled(&self) -> bool {
        self.config.user_interaction_enabled
    }

    #[must_use]
    pub fn touch_points(&self) -> &[TouchPoint] {
        self.touches.points()
    }

    #[must_use]
    pub fn screen_point_to_content_point(&self, p: Point) -> Point {
        content_point_at_screen_point(&self.scroll_rect, &self.content, p)
    }

    #[must_use]
    pub fn content_point_to_screen_point(&self, p: Point) -> Point {
        screen_point_at_content_point(&self.scroll_rect, &self.content, p)
    }

    /// While zooming: the anchor's screen point and where its content point currently lands.
    ///
    /// The two coincide after every update; hosts can draw them to visualize the anchor.
    #[must_use]
    pub fn anchor_markers(&self) -> Option<(Point, Point)> {
        let (screen, content_point) = self.zoom.anchor()?;
        Some((screen, self.content_point_to_screen_point(content_point)))
    }

    fn scaled_content(&self) -> Rect {
        let scale = self.zoom.scale();
        Rect { width: self.content.width * scale, height: self.content.height * scale, ..self.scroll_rect }
    }

    fn resize_scroll_rect(&mut self) {
        self.scroll_rect = self.scaled_content();
    }
}

fn finite_rect(rect: Rect, which: &str) -> Option<Rect> {
    if rect.position().is_finite() && rect.width.is_finite() && rect.height.is_finite() {
        Some(rect)
    } else {
        tracing::warn!(which, ?rect, "ignoring non-finite rect");
        None
    }
}
