//! Input model: pointer buttons, tracked contacts, and the touch tracker.
//!
//! [`TouchTracker`] turns raw contact events (at most two live at once) into
//! [`Gesture`] primitives. One contact is a drag; two contacts are a pinch
//! described by their midpoint and separation. Lifting either contact of a
//! pinch ends the whole gesture: both tracked points are dropped together and
//! the remaining finger does not fall back to dragging.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::consts::MAX_TOUCH_POINTS;
use crate::geometry::Point;

/// Host-assigned identifier for a contact. Mouse input uses [`Button::contact_id`].
pub type ContactId = i64;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button. Pressing it starts a synthetic two-contact pinch.
    Secondary,
}

impl Button {
    /// Synthetic contact id the button's pointer is tracked under.
    #[must_use]
    pub fn contact_id(self) -> ContactId {
        match self {
            Self::Primary => 0,
            Self::Middle => 1,
            Self::Secondary => 2,
        }
    }
}

/// One live contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub id: ContactId,
    pub position: Point,
    /// Clock time of the contact-down, in seconds.
    pub down_secs: f64,
}

/// Gesture primitive produced by the tracker for the view controller to apply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    DragDown(Point),
    DragMove(Point),
    DragUp(Point),
    PinchDown { midpoint: Point, distance: f64 },
    PinchMove { midpoint: Point, distance: f64 },
    PinchUp { midpoint: Point, distance: f64 },
    /// A first contact landed close in time and space to the previous one.
    DoubleTap(Point),
}

/// Thresholds for classifying a contact-down as the second half of a double-tap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoubleTapRule {
    pub enabled: bool,
    pub interval_secs: f64,
    pub distance_px: f64,
}

/// Ordered set of at most two live contacts, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct TouchTracker {
    points: Vec<TouchPoint>,
    /// Previous single-contact down, kept for double-tap classification.
    last_tap: Option<TouchPoint>,
}

impl TouchTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently tracked contacts in registration order.
    #[must_use]
    pub fn points(&self) -> &[TouchPoint] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Register a contact. A third contact, or an id already tracked, is ignored.
    pub fn down(&mut self, id: ContactId, position: Point, now_secs: f64, rule: DoubleTapRule) -> Vec<Gesture> {
        if self.points.len() >= MAX_TOUCH_POINTS || self.index_of(id).is_some() {
            return Vec::new();
        }

        let point = TouchPoint { id, position, down_secs: now_secs };
        self.points.push(point);

        if self.points.len() == 1 {
            let mut gestures = vec![Gesture::DragDown(position)];
            if rule.enabled && self.is_double_tap(&point, rule) {
                tracing::debug!(x = position.x, y = position.y, "double-tap detected");
                gestures.push(Gesture::DoubleTap(position));
                self.last_tap = None;
            } else {
                self.last_tap = Some(point);
            }
            return gestures;
        }

        // A second finger turns the gesture into a pinch; it can't be a tap.
        self.last_tap = None;
        let (midpoint, distance) = self.pinch_geometry();
        vec![Gesture::PinchDown { midpoint, distance }]
    }

    /// Update a contact's position. Unknown ids are a no-op.
    pub fn moved(&mut self, id: ContactId, position: Point) -> Option<Gesture> {
        let index = self.index_of(id)?;
        self.points[index].position = position;

        if self.points.len() == 1 {
            return Some(Gesture::DragMove(position));
        }
        let (midpoint, distance) = self.pinch_geometry();
        Some(Gesture::PinchMove { midpoint, distance })
    }

    /// Lift a contact, ending the gesture and dropping every tracked contact.
    pub fn up(&mut self, id: ContactId, position: Point) -> Option<Gesture> {
        let index = self.index_of(id)?;
        self.points[index].position = position;

        let gesture = if self.points.len() == 1 {
            Gesture::DragUp(self.points[0].position)
        } else {
            let (midpoint, distance) = self.pinch_geometry();
            Gesture::PinchUp { midpoint, distance }
        };
        self.points.clear();
        Some(gesture)
    }

    /// A cancelled contact ends the gesture the same way a lift does.
    pub fn cancel(&mut self, id: ContactId, position: Point) -> Option<Gesture> {
        self.up(id, position)
    }

    /// Drop every contact without emitting a gesture.
    pub fn clear(&mut self) {
        self.points.clear();
        self.last_tap = None;
    }

    fn index_of(&self, id: ContactId) -> Option<usize> {
        self.points.iter().position(|p| p.id == id)
    }

    fn pinch_geometry(&self) -> (Point, f64) {
        match self.points.as_slice() {
            [a, b, ..] => (a.position.midpoint(b.position), a.position.distance(b.position)),
            [a] => (a.position, 0.0),
            [] => (Point::default(), 0.0),
        }
    }

    fn is_double_tap(&self, point: &TouchPoint, rule: DoubleTapRule) -> bool {
        // Touch hosts hand out a fresh id per contact, so the previous down matches regardless of id.
        let Some(prev) = self.last_tap else {
            return false;
        };
        let elapsed = point.down_secs - prev.down_secs;
        (0.0..=rule.interval_secs).contains(&elapsed) && prev.position.distance(point.position) <= rule.distance_px
    }
}
