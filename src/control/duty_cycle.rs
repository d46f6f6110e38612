//! Extraction fan duty cycle.
//!
//! The fan has to replace the chamber's air volume `air_changes_per_hour`
//! times every hour.  From the fan's flow rate we get how long one full
//! exchange takes (the on-time) and from the change rate how often it has
//! to happen (the period):
//!
//! ```text
//! volume      = length · width · height              [m³]
//! flow        = flow_rate_m3_per_hour / 3600         [m³/s]
//! on_secs     = volume / flow                        [s]
//! period_secs = 3600 / air_changes_per_hour          [s]
//! ```
//!
//! The fan runs for one contiguous span of `on_secs` at the start of every
//! period, phase measured in real seconds so a non-integral period does
//! not collapse the on-span into a single instant.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const SECS_PER_HOUR: f64 = 3600.0;

/// Static physical description of the chamber and its extraction fan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChamberParameters {
    pub flow_rate_m3_per_hour: f64,
    pub length_m: f64,
    pub width_m: f64,
    pub height_m: f64,
    pub air_changes_per_hour: f64,
}

impl ChamberParameters {
    pub fn volume_m3(&self) -> f64 {
        self.length_m * self.width_m * self.height_m
    }
}

impl Default for ChamberParameters {
    fn default() -> Self {
        Self {
            flow_rate_m3_per_hour: 680.0,
            length_m: 1.8,
            width_m: 1.4,
            height_m: 2.0,
            air_changes_per_hour: 8.0,
        }
    }
}

/// Fan timing derived once at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DutyCycle {
    on_secs: f64,
    period_secs: f64,
}

impl DutyCycle {
    /// Derive the duty cycle, rejecting parameters that cannot be honoured.
    pub fn from_chamber(params: &ChamberParameters) -> Result<Self> {
        let fields = [
            ("flow_rate_m3_per_hour", params.flow_rate_m3_per_hour),
            ("length_m", params.length_m),
            ("width_m", params.width_m),
            ("height_m", params.height_m),
            ("air_changes_per_hour", params.air_changes_per_hour),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::Configuration(format!(
                    "chamber.{name} must be a positive number, got {value}"
                )));
            }
        }

        let flow_m3_per_sec = params.flow_rate_m3_per_hour / SECS_PER_HOUR;
        let on_secs = params.volume_m3() / flow_m3_per_sec;
        let period_secs = SECS_PER_HOUR / params.air_changes_per_hour;

        if on_secs > period_secs {
            return Err(Error::Configuration(format!(
                "fan on-time {on_secs:.2}s exceeds its period {period_secs:.2}s \
                 (flow rate too low for {} air changes per hour)",
                params.air_changes_per_hour
            )));
        }

        Ok(Self {
            on_secs,
            period_secs,
        })
    }

    pub fn on_secs(&self) -> f64 {
        self.on_secs
    }

    pub fn period_secs(&self) -> f64 {
        self.period_secs
    }

    /// Fraction of each period the fan is running.
    pub fn ratio(&self) -> f64 {
        self.on_secs / self.period_secs
    }

    /// Fan state at `elapsed_secs` since the loop started.
    pub fn is_fan_on(&self, elapsed_secs: f64) -> bool {
        elapsed_secs.rem_euclid(self.period_secs) < self.on_secs
    }

    /// Fan state for a tick, given the tick length in seconds.
    pub fn is_fan_on_at_tick(&self, tick: u64, tick_secs: f64) -> bool {
        self.is_fan_on(tick as f64 * tick_secs)
    }
}
