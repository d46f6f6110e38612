//! Tick source.
//!
//! [`TickCounter`] is the single driver of every interval check in the
//! control core (`tick % interval == 0`).  [`Cadence`] schedules ticks on
//! absolute deadlines: the next tick is due at *previous deadline + period*,
//! never at *now + period*, so time spent inside a tick (camera captures,
//! log writes) does not accumulate into drift.

use core::time::Duration;
use std::time::Instant;

/// Monotonic, never-decreasing tick counter.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickCounter(u64);

impl TickCounter {
    pub const fn new() -> Self {
        Self(0)
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    /// Advance by exactly one tick.
    pub fn advance(&mut self) {
        self.0 += 1;
    }

    /// `true` on every `interval`-th tick, starting with tick 0.
    pub fn is_multiple_of(&self, interval: u64) -> bool {
        interval != 0 && self.0 % interval == 0
    }
}

/// Absolute-deadline tick schedule.
///
/// Generic over the instant type so the runner can drive it from
/// `tokio::time::Instant` while tests use plain `std::time::Instant`.
#[derive(Debug, Clone)]
pub struct Cadence<I = Instant> {
    next: I,
    period: Duration,
    overruns: u64,
}

impl<I> Cadence<I>
where
    I: Copy + Ord + core::ops::Add<Duration, Output = I>,
{
    /// First tick is due at `start`.
    pub fn new(start: I, period: Duration) -> Self {
        Self {
            next: start,
            period,
            overruns: 0,
        }
    }

    /// Deadline of the tick about to run.
    pub fn deadline(&self) -> I {
        self.next
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Close the current tick, finished at `now`, and return the next
    /// deadline.  A deadline already in the past is still returned so the
    /// loop catches up; it is counted as an overrun.
    pub fn complete(&mut self, now: I) -> I {
        self.next = self.next + self.period;
        if now > self.next {
            self.overruns += 1;
        }
        self.next
    }

    /// Ticks that finished after their successor was already due.
    pub fn overruns(&self) -> u64 {
        self.overruns
    }
}
