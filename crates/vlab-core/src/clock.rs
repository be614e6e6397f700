#![forbid(unsafe_code)]

//! Time sources.
//!
//! Every time-driven state change in the lab reads time through a [`Clock`]:
//! monotonic time drives timers and subscriptions, local wall time drives
//! the calendar countdown. [`SystemClock`] reads the real clocks;
//! [`DeterministicClock`] only moves when the host advances it, which makes
//! replays and tests exact.

use core::time::Duration;

use chrono::{Local, NaiveDateTime};
use web_time::Instant;

/// A source of monotonic and wall-clock time.
pub trait Clock {
    /// Monotonic time since the clock was created.
    fn now_mono(&self) -> Duration;

    /// Current local wall-clock time (no time zone attached).
    fn now_local(&self) -> NaiveDateTime;
}

/// Real-time clock.
#[derive(Debug, Clone)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_mono(&self) -> Duration {
        self.start.elapsed()
    }

    fn now_local(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Host-controlled clock.
///
/// Wall time is `origin + mono`, so advancing the clock moves both readings
/// together.
#[derive(Debug, Clone)]
pub struct DeterministicClock {
    origin: NaiveDateTime,
    mono: Duration,
}

impl DeterministicClock {
    /// Create a clock whose wall time starts at `origin`.
    #[must_use]
    pub const fn starting_at(origin: NaiveDateTime) -> Self {
        Self {
            origin,
            mono: Duration::ZERO,
        }
    }

    /// Advance both readings by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.mono = self.mono.saturating_add(dt);
    }

    /// Set monotonic time (must not go backwards; earlier values are ignored).
    pub fn set(&mut self, mono: Duration) {
        if mono > self.mono {
            self.mono = mono;
        }
    }
}

impl Clock for DeterministicClock {
    fn now_mono(&self) -> Duration {
        self.mono
    }

    fn now_local(&self) -> NaiveDateTime {
        match chrono::TimeDelta::from_std(self.mono) {
            Ok(delta) => self.origin.checked_add_signed(delta).unwrap_or(self.origin),
            Err(_) => self.origin,
        }
    }
}
