//! Wall-clock adapters implementing [`WallClock`].
//!
//! - [`SystemClock`]: local time from the OS (production).
//! - [`FixedClock`]: a settable time for simulation runs and tests.

use std::cell::Cell;

use chrono::{Local, NaiveDateTime, TimeDelta};

use crate::app::ports::WallClock;

/// Local time of the host.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl WallClock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Manually stepped clock.
#[derive(Debug)]
pub struct FixedClock {
    now: Cell<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn advance(&self, by: TimeDelta) {
        self.now.set(self.now.get() + by);
    }
}

impl WallClock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.now.get()
    }
}
