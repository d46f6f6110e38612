//! Runtime diagnostics.
//!
//! Plain counters updated by the control core and the runner, reported
//! in the `Stopped` event at shutdown.

use crate::error::ErrorKind;

/// Counters accumulated since startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeStats {
    pub ticks: u64,
    pub polls: u64,
    pub sensor_failures: u64,
    pub actuator_failures: u64,
    pub records_written: u64,
    pub record_failures: u64,
    pub pictures_taken: u64,
    pub picture_failures: u64,
    pub window_adjustments: u64,
    /// Ticks that finished after the next deadline had already passed.
    pub overruns: u64,
}

impl RuntimeStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a handled, recoverable failure.
    pub fn record_failure(&mut self, kind: ErrorKind) {
        match kind {
            ErrorKind::SensorUnavailable => self.sensor_failures += 1,
            ErrorKind::ActuatorWrite => self.actuator_failures += 1,
            ErrorKind::LogWrite => self.record_failures += 1,
            ErrorKind::Capture => self.picture_failures += 1,
            // Fatal kinds never reach the loop.
            ErrorKind::Configuration | ErrorKind::ResourceAcquisition => {}
        }
    }

    pub fn total_failures(&self) -> u64 {
        self.sensor_failures + self.actuator_failures + self.record_failures + self.picture_failures
    }
}
