// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable time handling
//!
//! Time is measured in whole milliseconds since the clock's origin, the
//! same unit timers are scheduled in.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// A clock that provides the current tick
pub trait Clock: Send + Sync {
    /// Milliseconds elapsed since the clock's origin
    fn ticks(&self) -> u64;
}

/// Real monotonic clock, origin at construction
#[derive(Clone, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn ticks(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Fake clock for testing with controllable time
///
/// Clones share the same underlying tick, so a test can keep one handle and
/// give another to the engine.
#[derive(Clone, Debug)]
pub struct FakeClock {
    current: Arc<Mutex<u64>>,
}

impl FakeClock {
    /// Start at tick 0
    pub fn new() -> Self {
        Self::at(0)
    }

    pub fn at(ticks: u64) -> Self {
        Self {
            current: Arc::new(Mutex::new(ticks)),
        }
    }

    /// Advance the clock by the given duration
    pub fn advance(&self, duration: Duration) {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self.advance_ms(millis);
    }

    pub fn advance_ms(&self, millis: u64) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current = current.saturating_add(millis);
    }

    /// Set the clock to a specific tick
    pub fn set(&self, ticks: u64) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current = ticks;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn ticks(&self) -> u64 {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
