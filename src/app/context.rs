//! Data shared between the control core and its ports.
//!
//! [`Measurement`] comes in from the sensor, [`ActuatorState`] goes out to
//! the relays, and [`LogRecord`] goes out to the append-only data log.

use chrono::NaiveDateTime;

use crate::error::SensorError;

// ---------------------------------------------------------------------------
// Measurement (produced by the sensor port, immutable once read)
// ---------------------------------------------------------------------------

/// One temperature/humidity reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Chamber air temperature (°C).
    pub temperature_c: f64,
    /// Relative humidity (%RH).
    pub humidity_pct: f64,
    pub timestamp: NaiveDateTime,
}

impl Measurement {
    /// Reject NaN or infinite readings; the hysteresis comparisons would
    /// silently treat them as "inside the band".
    pub fn finite(self) -> Result<Self, SensorError> {
        if self.temperature_c.is_finite() && self.humidity_pct.is_finite() {
            Ok(self)
        } else {
            Err(SensorError::NotFinite)
        }
    }
}

// ---------------------------------------------------------------------------
// Actuator state (owned by the control core; pushed to the relays each tick)
// ---------------------------------------------------------------------------

/// Desired on/off state of every relay channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActuatorState {
    pub heater: bool,
    pub humidifier: bool,
    pub light: bool,
    pub fan: bool,
}

impl ActuatorState {
    /// All actuators off, the safe default.
    pub fn all_off() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// Log record (one CSV row per poll tick)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogRecord {
    pub timestamp: NaiveDateTime,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub heater: bool,
    pub humidifier: bool,
    pub light: bool,
    pub fan: bool,
}

impl LogRecord {
    pub fn new(measurement: &Measurement, state: &ActuatorState) -> Self {
        Self {
            timestamp: measurement.timestamp,
            temperature_c: measurement.temperature_c,
            humidity_pct: measurement.humidity_pct,
            heater: state.heater,
            humidifier: state.humidifier,
            light: state.light,
            fan: state.fan,
        }
    }
}
