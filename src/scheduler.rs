//! Day/night light scheduler.
//!
//! The grow light follows a [`DayNightWindow`]: it is day from `day_start`
//! (inclusive) up to `night_start` (exclusive).  Once per completed hour
//! the window drifts:
//!
//! ```text
//!   currently day   → night_start = now + day_hours
//!   currently night → day_start   = now + night_hours
//! ```
//!
//! Boundaries wrap at midnight.  The comparison itself does not wrap, so a
//! window whose `night_start` has slid past midnight reads as night until
//! the next adjustment moves it again.

use chrono::{NaiveTime, TimeDelta};
use log::info;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Light schedule boundaries plus the lengths used by the drift rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayNightWindow {
    pub day_start: NaiveTime,
    pub night_start: NaiveTime,
    pub day_hours: f64,
    pub night_hours: f64,
}

/// Which boundary the drift rule moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowAdjustment {
    /// It was day; `night_start` moved.
    NightStartMoved { from: NaiveTime, to: NaiveTime },
    /// It was night; `day_start` moved.
    DayStartMoved { from: NaiveTime, to: NaiveTime },
}

impl DayNightWindow {
    pub fn new(day_start: NaiveTime, night_start: NaiveTime, day_hours: f64, night_hours: f64) -> Self {
        Self {
            day_start,
            night_start,
            day_hours,
            night_hours,
        }
    }

    /// `day_start <= now < night_start`.
    pub fn is_day(&self, now: NaiveTime) -> bool {
        now >= self.day_start && now < self.night_start
    }

    /// Apply the hourly drift rule at time-of-day `now`.
    pub fn adjust(&mut self, now: NaiveTime) -> WindowAdjustment {
        if self.is_day(now) {
            let from = self.night_start;
            self.night_start = add_hours(now, self.day_hours);
            info!(
                "Scheduler: day, night start {} -> {}",
                from.format("%H:%M:%S"),
                self.night_start.format("%H:%M:%S")
            );
            WindowAdjustment::NightStartMoved {
                from,
                to: self.night_start,
            }
        } else {
            let from = self.day_start;
            self.day_start = add_hours(now, self.night_hours);
            info!(
                "Scheduler: night, day start {} -> {}",
                from.format("%H:%M:%S"),
                self.day_start.format("%H:%M:%S")
            );
            WindowAdjustment::DayStartMoved {
                from,
                to: self.day_start,
            }
        }
    }
}

/// Time-of-day arithmetic that wraps around midnight.
fn add_hours(t: NaiveTime, hours: f64) -> NaiveTime {
    let millis = (hours * MILLIS_PER_HOUR).round() as i64;
    let (wrapped, _) = t.overflowing_add_signed(TimeDelta::milliseconds(millis));
    wrapped
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
