//! Simulated chamber air.
//!
//! A first-order model: between reads the air relaxes towards ambient,
//! and rises while the heater (or humidifier) relay is energised.  The
//! relays are observed through the [`SimLevel`] handles of their pins,
//! so the simulated loop closes on itself exactly like the real one.

use chrono::Local;

use crate::app::context::Measurement;
use crate::app::ports::SensorSource;
use crate::drivers::gpio::SimLevel;
use crate::error::SensorError;

/// Fraction of the gap to ambient closed per read.
const LEAK: f64 = 0.02;
/// °C gained per read with the heater on.
const HEATER_GAIN: f64 = 0.6;
/// %RH gained per read with the humidifier on.
const HUMIDIFIER_GAIN: f64 = 1.5;

pub struct SimulatedChamber {
    temperature_c: f64,
    humidity_pct: f64,
    ambient_c: f64,
    ambient_rh: f64,
    heater: SimLevel,
    humidifier: SimLevel,
}

impl SimulatedChamber {
    /// Start at ambient conditions.
    pub fn new(ambient_c: f64, ambient_rh: f64, heater: SimLevel, humidifier: SimLevel) -> Self {
        Self {
            temperature_c: ambient_c,
            humidity_pct: ambient_rh,
            ambient_c,
            ambient_rh,
            heater,
            humidifier,
        }
    }

    fn step(&mut self) {
        self.temperature_c += (self.ambient_c - self.temperature_c) * LEAK;
        self.humidity_pct += (self.ambient_rh - self.humidity_pct) * LEAK;
        if self.heater.get() {
            self.temperature_c += HEATER_GAIN;
        }
        if self.humidifier.get() {
            self.humidity_pct = (self.humidity_pct + HUMIDIFIER_GAIN).min(100.0);
        }
    }
}

impl SensorSource for SimulatedChamber {
    fn read(&mut self) -> Result<Measurement, SensorError> {
        self.step();
        Ok(Measurement {
            temperature_c: self.temperature_c,
            humidity_pct: self.humidity_pct,
            timestamp: Local::now().naive_local(),
        })
    }
}
