//! Zoom engine: scale bounds, pinch mapping, and animated zoom-to.
//!
//! Gesture zoom and programmatic zoom share one anchoring model. A pinch
//! records the content point under its midpoint at pinch-down; an animation is
//! started as a synthetic pinch-down at its anchor point. Each frame the view
//! controller translates the new scroll rect so that recorded content point is
//! back under the current pinch midpoint.

#[cfg(test)]
#[path = "zoom_test.rs"]
mod zoom_test;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_DOUBLE_TAP_ZOOM_INCREMENT, DEFAULT_DOUBLE_TAP_ZOOM_SECS, EASING_STOP};
use crate::geometry::{Point, Rect, clamp_unit, content_point_at_screen_point, map_clamped, safe_ratio};

/// An in-flight programmatic zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomAnimation {
    /// Screen point that stays fixed while the scale changes.
    pub anchor: Point,
    /// Scale to end on, already clamped to the bounds at request time.
    pub target: f64,
    pub start_secs: f64,
    pub duration_secs: f64,
}

impl ZoomAnimation {
    /// Fraction of the animation elapsed at `now_secs`, in `[0, 1]`.
    #[must_use]
    pub fn progress(&self, now_secs: f64) -> f64 {
        if self.duration_secs <= 0.0 {
            return 1.0;
        }
        clamp_unit((now_secs - self.start_secs) / self.duration_secs)
    }
}

/// Double-tap zoom stepping.
///
/// Each double-tap steps the scale up by `increment` until the top of the range,
/// where the next double-tap returns to the bottom. Unset range ends fall back
/// to the live scale bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoubleTapZoom {
    pub increment: f64,
    pub range_min: Option<f64>,
    pub range_max: Option<f64>,
    pub duration_secs: f64,
}

impl Default for DoubleTapZoom {
    fn default() -> Self {
        Self {
            increment: DEFAULT_DOUBLE_TAP_ZOOM_INCREMENT,
            range_min: None,
            range_max: None,
            duration_secs: DEFAULT_DOUBLE_TAP_ZOOM_SECS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ZoomEngine {
    scale: f64,
    scale_down: f64,
    scale_min: f64,
    scale_max: f64,
    scale_multiplier: f64,

    move_screen: Point,
    down_content: Point,
    down_distance: f64,
    move_distance: f64,

    zooming: bool,
    zooming_changed: bool,

    animation: Option<ZoomAnimation>,
    /// The animation's synthetic pinch-down has happened.
    animating: bool,
    animation_finished: bool,
}

impl Default for ZoomEngine {
    fn default() -> Self {
        Self {
            scale: 1.0,
            scale_down: 1.0,
            scale_min: 1.0,
            scale_max: 1.0,
            scale_multiplier: 1.0,
            move_screen: Point::default(),
            down_content: Point::default(),
            down_distance: 0.0,
            move_distance: 0.0,
            zooming: false,
            zooming_changed: false,
            animation: None,
            animating: false,
            animation_finished: false,
        }
    }
}

impl ZoomEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Queries ---

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[must_use]
    pub fn scale_min(&self) -> f64 {
        self.scale_min
    }

    #[must_use]
    pub fn scale_max(&self) -> f64 {
        self.scale_max
    }

    #[must_use]
    pub fn scale_multiplier(&self) -> f64 {
        self.scale_multiplier
    }

    /// A pinch or an animation is driving the scale.
    #[must_use]
    pub fn is_zooming(&self) -> bool {
        self.zooming
    }

    #[must_use]
    pub fn zooming_changed(&self) -> bool {
        self.zooming_changed
    }

    /// An animation has been requested or is running.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    #[must_use]
    pub fn animation(&self) -> Option<&ZoomAnimation> {
        self.animation.as_ref()
    }

    /// Screen anchor and the content point pinned to it, while zooming.
    #[must_use]
    pub fn anchor(&self) -> Option<(Point, Point)> {
        self.zooming.then_some((self.move_screen, self.down_content))
    }

    /// Scale normalized to `[0, 1]` across the bounds.
    #[must_use]
    pub fn normalized(&self) -> f64 {
        clamp_unit(safe_ratio(self.scale - self.scale_min, self.scale_max - self.scale_min, 0.0))
    }

    #[must_use]
    pub fn is_zoomed(&self) -> bool {
        self.scale > self.scale_min
    }

    #[must_use]
    pub fn is_zoomed_min(&self) -> bool {
        (self.scale - self.scale_min).abs() <= f64::EPSILON
    }

    #[must_use]
    pub fn is_zoomed_max(&self) -> bool {
        (self.scale - self.scale_max).abs() <= f64::EPSILON
    }

    // --- Bounds ---

    pub fn set_min_max(&mut self, min: f64, max: f64) {
        if !min.is_finite() || !max.is_finite() {
            tracing::warn!(min, max, "ignoring non-finite zoom bounds");
            return;
        }
        self.scale_min = min;
        self.scale_max = max;
        self.normalize_bounds();
        self.scale_multiplier = safe_ratio(self.scale_max, self.scale_min, 1.0);
        self.clamp_scale();
    }

    pub fn set_multiplier(&mut self, multiplier: f64) {
        if !multiplier.is_finite() {
            tracing::warn!(multiplier, "ignoring non-finite zoom multiplier");
            return;
        }
        self.scale_multiplier = multiplier;
        self.scale_max = self.scale_min * multiplier;
        if self.normalize_bounds() {
            self.scale_multiplier = safe_ratio(self.scale_max, self.scale_min, 1.0);
        }
        self.clamp_scale();
    }

    /// Set the minimum scale so the content fills the window on both axes.
    pub fn fit_content(&mut self, window: &Rect, content: &Rect) {
        let sx = safe_ratio(window.width, content.width, 1.0);
        let sy = safe_ratio(window.height, content.height, 1.0);
        self.scale_min = sx.max(sy);
        self.scale_max = self.scale_min * self.scale_multiplier;
        self.normalize_bounds();
        self.clamp_scale();
        tracing::debug!(min = self.scale_min, max = self.scale_max, "zoom fitted to window");
    }

    pub fn set_scale(&mut self, value: f64) {
        if value.is_finite() {
            self.scale = value;
        }
        self.clamp_scale();
    }

    /// Clamp the live scale to the bounds.
    pub fn clamp_scale(&mut self) {
        self.scale = self.scale.max(self.scale_min).min(self.scale_max);
    }

    /// Swap inverted bounds. Returns whether a swap happened.
    fn normalize_bounds(&mut self) -> bool {
        if self.scale_max < self.scale_min {
            tracing::warn!(min = self.scale_min, max = self.scale_max, "zoom bounds inverted; swapping");
            std::mem::swap(&mut self.scale_min, &mut self.scale_max);
            return true;
        }
        false
    }

    // --- Pinch primitives ---

    /// Start zooming about `screen`, recording the content point beneath it in `scroll_rect`.
    pub fn pinch_down(&mut self, screen: Point, distance: f64, scroll_rect: &Rect, content: &Rect) {
        self.move_screen = screen;
        self.down_content = content_point_at_screen_point(scroll_rect, content, screen);
        self.down_distance = distance;
        self.move_distance = distance;
        self.scale_down = self.scale;
        self.zooming = true;
        self.zooming_changed = true;
        tracing::debug!(x = screen.x, y = screen.y, distance, scale = self.scale, "zoom started");
    }

    /// Follow the fingers. A running animation owns the anchor, so touch input is ignored.
    pub fn pinch_moved(&mut self, screen: Point, distance: f64) {
        if self.animating {
            return;
        }
        self.move_screen = screen;
        self.move_distance = distance;
    }

    /// End a touch pinch. A running animation keeps zooming until it finishes.
    pub fn pinch_up(&mut self, screen: Point, distance: f64) {
        if self.animating {
            tracing::debug!("pinch released during zoom animation; animation continues");
            return;
        }
        self.move_screen = screen;
        self.move_distance = distance;
        self.zooming = false;
        self.zooming_changed = true;
        tracing::debug!(scale = self.scale, "zoom released");
    }

    /// Stop zooming and drop any animation, requested or running.
    pub fn cancel(&mut self) {
        if self.animation.take().is_some() {
            tracing::debug!("zoom animation cancelled");
        }
        self.animating = false;
        self.animation_finished = false;
        if self.zooming {
            self.zooming = false;
            self.zooming_changed = true;
        }
    }

    // --- Animation ---

    /// Request an animated zoom to `target` about `anchor`. It starts on the next frame.
    pub fn zoom_to(&mut self, anchor: Point, target: f64, duration_secs: f64, now_secs: f64) {
        let target = if target.is_finite() { target } else { self.scale };
        let target = target.max(self.scale_min).min(self.scale_max);
        let duration_secs = duration_secs.max(0.0);
        self.animation = Some(ZoomAnimation { anchor, target, start_secs: now_secs, duration_secs });
        self.animating = false;
        self.animation_finished = false;
        tracing::debug!(x = anchor.x, y = anchor.y, target, duration_secs, "zoom animation requested");
    }

    /// Mark a requested animation as started and return the anchor to pinch-down at.
    pub fn take_pending_start(&mut self) -> Option<Point> {
        if self.animating {
            return None;
        }
        let anchor = self.animation.as_ref()?.anchor;
        self.animating = true;
        Some(anchor)
    }

    /// Scale a double-tap should zoom to from the current scale.
    #[must_use]
    pub fn double_tap_target(&self, step: &DoubleTapZoom) -> f64 {
        let lo = step.range_min.unwrap_or(self.scale_min);
        let hi = step.range_max.unwrap_or(self.scale_max);
        let (lo, hi) = if hi < lo { (hi, lo) } else { (lo, hi) };
        if self.scale >= hi - EASING_STOP {
            lo
        } else {
            (self.scale + step.increment).max(lo).min(hi)
        }
    }

    // --- Per-frame steps ---

    /// Compute this frame's scale from the pinch or the running animation.
    ///
    /// `unit_distance` is the finger travel that spans the whole scale range, normally
    /// the window diagonal. A zero or non-finite unit distance leaves the pinch scale unchanged.
    pub fn step(&mut self, unit_distance: f64, now_secs: f64, pinch_enabled: bool) {
        if !self.zooming {
            return;
        }

        let zoom = match (self.animating, self.animation) {
            (true, Some(anim)) => {
                let progress = anim.progress(now_secs);
                if progress >= 1.0 {
                    self.animation_finished = true;
                }
                (anim.target - self.scale_down) * progress
            }
            _ if pinch_enabled && unit_distance.is_finite() && unit_distance > f64::EPSILON => {
                let range = self.scale_max - self.scale_min;
                map_clamped(
                    self.move_distance - self.down_distance,
                    -unit_distance,
                    unit_distance,
                    -range,
                    range,
                )
            }
            _ => 0.0,
        };

        self.scale = (self.scale_down + zoom).max(0.0);
        tracing::trace!(scale = self.scale, "zoom step");
    }

    /// Clamp after the frame's zoom step, optionally letting a live pinch pass the bounds.
    pub fn constrain(&mut self, clamp_during_gesture: bool) {
        let gesture_live = self.zooming && !self.animating;
        if gesture_live && !clamp_during_gesture {
            return;
        }
        self.clamp_scale();
    }

    /// Clear per-frame flags and retire a finished animation.
    pub fn finish_frame(&mut self) {
        self.zooming_changed = false;
        if self.animation_finished {
            self.animation_finished = false;
            tracing::debug!(scale = self.scale, "zoom animation finished");
            self.animation = None;
            self.animating = false;
            self.zooming = false;
            self.zooming_changed = true;
        }
    }

    pub fn reset(&mut self) {
        let (min, max, multiplier) = (self.scale_min, self.scale_max, self.scale_multiplier);
        *self = Self {
            scale: min,
            scale_down: min,
            scale_min: min,
            scale_max: max,
            scale_multiplier: multiplier,
            ..Self::default()
        };
    }
}
