//! Geometry: points, rectangles, and the pure rect math behind pan/zoom.
//!
//! Nothing in this module holds state. Every function takes its rectangles
//! explicitly and returns a new value, so the view controller stays the only
//! owner of live geometry.
//!
//! Content-space points are measured from the content origin: a content point
//! `p` lands on screen at `rect.origin + p * (rect.size / content.size)`. The
//! render matrix built by [`matrix_for_rect`] applies exactly that mapping.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use std::ops::{Add, Mul, Sub};

use glam::{DAffine2, DVec2};
use serde::{Deserialize, Serialize};

/// A point in either screen or content space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Point halfway between `self` and `other`.
    #[must_use]
    pub fn midpoint(self, other: Point) -> Point {
        (other - self) * 0.5 + self
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl From<Point> for DVec2 {
    fn from(p: Point) -> Self {
        DVec2::new(p.x, p.y)
    }
}

impl From<DVec2> for Point {
    fn from(v: DVec2) -> Self {
        Point::new(v.x, v.y)
    }
}

/// An axis-aligned rectangle: top-left position plus size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Length of the diagonal.
    #[must_use]
    pub fn diagonal(&self) -> f64 {
        self.width.hypot(self.height)
    }

    /// A rect with no area on either axis.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }

    /// Whether `p` lies inside, inclusive of the top/left edges and exclusive of the bottom/right.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.y >= self.y && p.x < self.right() && p.y < self.bottom()
    }

    #[must_use]
    pub fn with_position(self, p: Point) -> Self {
        Self { x: p.x, y: p.y, ..self }
    }

    #[must_use]
    pub fn translated(self, delta: Point) -> Self {
        Self { x: self.x + delta.x, y: self.y + delta.y, ..self }
    }
}

// =============================================================
// Scalar helpers
// =============================================================

/// `num / den`, or `fallback` when the denominator is zero or the result is not finite.
#[must_use]
pub fn safe_ratio(num: f64, den: f64, fallback: f64) -> f64 {
    if !den.is_finite() || den.abs() < f64::EPSILON {
        return fallback;
    }
    let ratio = num / den;
    if ratio.is_finite() { ratio } else { fallback }
}

#[must_use]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Clamp `t` to `[0, 1]`; NaN becomes 0.
#[must_use]
pub fn clamp_unit(t: f64) -> f64 {
    t.max(0.0).min(1.0)
}

/// Map `value` from `[in_min, in_max]` to `[out_min, out_max]`, clamping to the output range.
///
/// A collapsed input range maps everything to `out_min`.
#[must_use]
pub fn map_clamped(value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    let t = safe_ratio(value - in_min, in_max - in_min, 0.0);
    lerp(out_min, out_max, clamp_unit(t))
}

// =============================================================
// Rect math
// =============================================================

/// Per-axis scale from content space into `rect`. A degenerate axis scales by 1.
#[must_use]
pub fn rect_scale(rect: &Rect, content: &Rect) -> Point {
    Point::new(axis_scale(rect.width, content.width), axis_scale(rect.height, content.height))
}

fn axis_scale(rect_len: f64, content_len: f64) -> f64 {
    let s = safe_ratio(rect_len, content_len, 1.0);
    if s.abs() < f64::EPSILON { 1.0 } else { s }
}

/// Range of valid scroll positions for a rect of `rect`'s size inside `window`.
///
/// Returns `(min, max)`. The max is always the window's top-left; the min is pulled
/// left/up by however much the rect overhangs the window on that axis.
#[must_use]
pub fn scroll_bounds(rect: &Rect, window: &Rect) -> (Point, Point) {
    let min = Point::new(
        window.x - (rect.width - window.width).max(0.0),
        window.y - (rect.height - window.height).max(0.0),
    );
    (min, window.position())
}

/// Delta that pulls `rect` back inside `window`, scaled by `easing`.
///
/// Each axis is handled independently and only an out-of-bounds axis moves. A rect
/// smaller than the window is held flush with the window's top/left edge.
#[must_use]
pub fn rect_contained_in_window(rect: &Rect, window: &Rect, easing: f64) -> Point {
    let (min, max) = scroll_bounds(rect, window);
    Point::new(
        axis_containment(rect.x, min.x, max.x) * easing,
        axis_containment(rect.y, min.y, max.y) * easing,
    )
}

fn axis_containment(pos: f64, min: f64, max: f64) -> f64 {
    if pos < min {
        min - pos
    } else if pos > max {
        max - pos
    } else {
        0.0
    }
}

/// Scale `rect` by `zoom_delta` about `screen_point`, keeping whatever sits under that point fixed.
#[must_use]
pub fn rect_zoomed_at_screen_point(rect: &Rect, screen_point: Point, zoom_delta: f64) -> Rect {
    Rect {
        x: screen_point.x - (screen_point.x - rect.x) * zoom_delta,
        y: screen_point.y - (screen_point.y - rect.y) * zoom_delta,
        width: rect.width * zoom_delta,
        height: rect.height * zoom_delta,
    }
}

/// Translate `rect` so `content_point` lands exactly on `screen_point`. Size is unchanged.
#[must_use]
pub fn rect_with_content_point_at_screen_point(
    rect: &Rect,
    content: &Rect,
    content_point: Point,
    screen_point: Point,
) -> Rect {
    let scale = rect_scale(rect, content);
    Rect {
        x: screen_point.x - content_point.x * scale.x,
        y: screen_point.y - content_point.y * scale.y,
        ..*rect
    }
}

/// Component-wise interpolation of position and size. `progress` is clamped to `[0, 1]`.
#[must_use]
pub fn rect_lerp(from: &Rect, to: &Rect, progress: f64) -> Rect {
    let t = clamp_unit(progress);
    Rect {
        x: lerp(from.x, to.x, t),
        y: lerp(from.y, to.y, t),
        width: lerp(from.width, to.width, t),
        height: lerp(from.height, to.height, t),
    }
}

/// Render transform for `rect`: translate by its position, then scale content into its size.
#[must_use]
pub fn matrix_for_rect(rect: &Rect, content: &Rect) -> DAffine2 {
    let scale = rect_scale(rect, content);
    DAffine2::from_translation(rect.position().into()) * DAffine2::from_scale(scale.into())
}

/// Map a screen point into content space through `rect`.
#[must_use]
pub fn content_point_at_screen_point(rect: &Rect, content: &Rect, screen_point: Point) -> Point {
    let scale = rect_scale(rect, content);
    Point::new((screen_point.x - rect.x) / scale.x, (screen_point.y - rect.y) / scale.y)
}

/// Map a content point onto the screen through `rect`.
#[must_use]
pub fn screen_point_at_content_point(rect: &Rect, content: &Rect, content_point: Point) -> Point {
    let scale = rect_scale(rect, content);
    Point::new(rect.x + content_point.x * scale.x, rect.y + content_point.y * scale.y)
}

/// Bounding rect of `rect` after mapping its corners through `matrix`.
#[must_use]
pub fn transform_rect(rect: &Rect, matrix: &DAffine2) -> Rect {
    let corners = [
        Point::new(rect.x, rect.y),
        Point::new(rect.right(), rect.y),
        Point::new(rect.x, rect.bottom()),
        Point::new(rect.right(), rect.bottom()),
    ]
    .map(|p| matrix.transform_point2(p.into()));

    let mut min = corners[0];
    let mut max = corners[0];
    for c in &corners[1..] {
        min = min.min(*c);
        max = max.max(*c);
    }
    Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
}
