//! Scroll physics: drag tracking, release momentum, bounce-back, and easing.
//!
//! Two positions are kept. `position` is the raw target that gestures and
//! programmatic calls write to. `eased` chases it by a fixed fraction per frame
//! and is what the render matrix is built from. Both approaches snap to their
//! target once within [`EASING_STOP`] so they settle exactly.

#[cfg(test)]
#[path = "scroll_test.rs"]
mod scroll_test;

use serde::{Deserialize, Serialize};

use crate::consts::EASING_STOP;
use crate::geometry::{Point, Rect, rect_contained_in_window, scroll_bounds};

/// How release velocity is applied to the position after a drag ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MomentumPolicy {
    /// Each axis coasts on its own remaining velocity.
    #[default]
    PerAxis,
    /// Velocity is applied only while both axes are still moving in the positive direction.
    Coupled,
}

#[derive(Debug, Clone, Default)]
pub struct ScrollPhysics {
    position: Point,
    eased: Point,
    drag_move: Point,
    drag_move_prev: Point,
    velocity: Point,
    dragging: bool,
    dragging_changed: bool,
}

impl ScrollPhysics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw target position.
    #[must_use]
    pub fn position(&self) -> Point {
        self.position
    }

    /// Rendered position.
    #[must_use]
    pub fn eased(&self) -> Point {
        self.eased
    }

    #[must_use]
    pub fn velocity(&self) -> Point {
        self.velocity
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Whether the drag started or stopped since the last frame.
    #[must_use]
    pub fn dragging_changed(&self) -> bool {
        self.dragging_changed
    }

    // --- Drag primitives ---

    pub fn drag_down(&mut self, p: Point) {
        self.drag_move = p;
        self.drag_move_prev = p;
        self.velocity = Point::default();
        self.dragging = true;
        self.dragging_changed = true;
        tracing::debug!(x = p.x, y = p.y, "drag started");
    }

    pub fn drag_moved(&mut self, p: Point) {
        self.drag_move = p;
    }

    pub fn drag_up(&mut self, p: Point) {
        self.drag_move = p;
        self.dragging = false;
        self.dragging_changed = true;
        tracing::debug!(vx = self.velocity.x, vy = self.velocity.y, "drag released");
    }

    /// Stop dragging and drop any momentum.
    pub fn drag_cancel(&mut self) {
        self.velocity = Point::default();
        if self.dragging {
            tracing::debug!("drag cancelled");
            self.dragging = false;
            self.dragging_changed = true;
        }
    }

    // --- Direct placement ---

    /// Set the raw target. Without `ease`, the rendered position jumps there too.
    pub fn set_position(&mut self, p: Point, ease: bool) {
        self.position = p;
        if !ease {
            self.eased = p;
        }
    }

    // --- Per-frame steps ---

    /// Follow the finger 1:1 and record the frame's velocity.
    pub fn step_drag(&mut self) {
        self.velocity = self.drag_move - self.drag_move_prev;
        self.drag_move_prev = self.drag_move;
        self.position = self.position + self.velocity;
    }

    /// Decay release velocity and coast on what's left.
    pub fn step_momentum(&mut self, decay: f64, policy: MomentumPolicy) {
        self.velocity = self.velocity * decay;
        if self.velocity.x.abs() < EASING_STOP {
            self.velocity.x = 0.0;
        }
        if self.velocity.y.abs() < EASING_STOP {
            self.velocity.y = 0.0;
        }

        match policy {
            MomentumPolicy::PerAxis => {
                self.position = self.position + self.velocity;
            }
            MomentumPolicy::Coupled => {
                if self.velocity.x > 0.0 && self.velocity.y > 0.0 {
                    self.position = self.position + self.velocity;
                }
            }
        }
    }

    /// Pull the raw position back inside `window` for a scroll rect of `size`.
    pub fn contain(&mut self, size: (f64, f64), window: &Rect, bounce_back: f64) {
        let rect = Rect::new(self.position.x, self.position.y, size.0, size.1);
        let delta = rect_contained_in_window(&rect, window, bounce_back);
        self.position = self.position + delta;

        let (min, max) = scroll_bounds(&rect, window);
        self.position.x = snap_into(self.position.x, min.x, max.x);
        self.position.y = snap_into(self.position.y, min.y, max.y);
    }

    /// Move the rendered position a fraction `easing` of the way to the raw target.
    pub fn ease(&mut self, easing: f64) {
        self.eased = self.eased + (self.position - self.eased) * easing;
        if (self.position.x - self.eased.x).abs() < EASING_STOP {
            self.eased.x = self.position.x;
        }
        if (self.position.y - self.eased.y).abs() < EASING_STOP {
            self.eased.y = self.position.y;
        }
    }

    /// Overwrite both positions, e.g. after a zoom anchor correction.
    pub fn sync_to(&mut self, p: Point) {
        self.position = p;
        self.eased = p;
    }

    pub fn clear_changed(&mut self) {
        self.dragging_changed = false;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Snap `pos` onto the nearest bound when it is out of range by less than the stop distance.
fn snap_into(pos: f64, min: f64, max: f64) -> f64 {
    let target = pos.max(min).min(max);
    if (target - pos).abs() < EASING_STOP { target } else { pos }
}
