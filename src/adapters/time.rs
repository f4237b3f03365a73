//! Monotonic clock adapter.

use std::thread;
use std::time::Duration;

use crate::app::ports::ClockPort;

/// [`ClockPort`] that blocks the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

impl MonotonicClock {
    pub fn new() -> Self {
        Self
    }
}

impl ClockPort for MonotonicClock {
    fn sleep(&mut self, duration: Duration) {
        if !duration.is_zero() {
            thread::sleep(duration);
        }
    }
}
