//! Shared numeric constants for the scroll view.

// ── Easing ──────────────────────────────────────────────────────

/// Distance below which an eased or bounced value snaps to its target.
pub const EASING_STOP: f64 = 0.001;

/// Default fraction of the remaining distance the rendered position covers per frame.
pub const DEFAULT_SCROLL_EASING: f64 = 0.5;

/// Default bounce-back factor (1.0 snaps back inside the window immediately).
pub const DEFAULT_BOUNCE_BACK: f64 = 1.0;

/// Default per-frame multiplier applied to release velocity.
pub const DEFAULT_DRAG_DECAY: f64 = 0.9;

// ── Gestures ────────────────────────────────────────────────────

/// Maximum number of simultaneously tracked contacts.
pub const MAX_TOUCH_POINTS: usize = 2;

/// Default max time between two downs for them to count as a double-tap.
pub const DEFAULT_DOUBLE_TAP_INTERVAL_SECS: f64 = 0.3;

/// Default max screen distance between two downs for them to count as a double-tap.
pub const DEFAULT_DOUBLE_TAP_DISTANCE_PX: f64 = 40.0;

/// Default scale step applied by a double-tap.
pub const DEFAULT_DOUBLE_TAP_ZOOM_INCREMENT: f64 = 1.0;

/// Default duration of the double-tap zoom animation.
pub const DEFAULT_DOUBLE_TAP_ZOOM_SECS: f64 = 0.3;
