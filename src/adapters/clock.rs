//! System clock adapter.
//!
//! One implementation serves both targets: ESP-IDF exposes std threads,
//! and `std::thread::sleep` suspends the calling FreeRTOS task exactly
//! like a native delay.  Tests use a recording clock instead, so no delay
//! in the firmware ever runs on the host test suite.

use core::time::Duration;

use crate::ports::ClockPort;

/// Blocking sleep via the scheduler.
pub struct SystemClock;

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl ClockPort for SystemClock {
    fn sleep(&mut self, period: Duration) {
        std::thread::sleep(period);
    }
}
