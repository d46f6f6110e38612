//! Hysteresis (dead-band) on/off controller.
//!
//! Used for temperature → heater and humidity → humidifier.  The actuator
//! switches on below `low`, off above `high`, and holds its current state
//! anywhere in between so it doesn't chatter around the setpoint.

use serde::{Deserialize, Serialize};

/// Inclusive band for one controlled quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub low: f64,
    pub high: f64,
}

impl Bounds {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// `low == high` leaves no dead-band: the controller becomes a plain
    /// threshold.  Legal, but worth a warning at startup.
    pub fn is_degenerate(&self) -> bool {
        self.low == self.high
    }
}

/// Decide the new actuator state from a measurement.
///
/// Values exactly on `low` or `high` are inside the band.
pub fn decide(measurement: f64, bounds: Bounds, current: bool) -> bool {
    if measurement < bounds.low {
        true
    } else if measurement > bounds.high {
        false
    } else {
        current
    }
}
