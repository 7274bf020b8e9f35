//! Time sources sampled by animations and double-tap detection.
//!
//! The engine never runs timers. It asks its [`Clock`] for the current time
//! whenever an event or frame needs one.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Elapsed-seconds source.
pub trait Clock {
    /// Seconds since an arbitrary fixed origin. Must never go backwards.
    fn now_secs(&self) -> f64;
}

/// Monotonic wall clock measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Clock for SystemClock {
    fn now_secs(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Clock advanced by hand. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    #[must_use]
    pub fn new(start_secs: f64) -> Self {
        Self { now: Rc::new(Cell::new(start_secs)) }
    }

    pub fn set(&self, secs: f64) {
        self.now.set(secs);
    }

    pub fn advance(&self, secs: f64) {
        self.now.set(self.now.get() + secs.max(0.0));
    }
}

impl Clock for ManualClock {
    fn now_secs(&self) -> f64 {
        self.now.get()
    }
}
