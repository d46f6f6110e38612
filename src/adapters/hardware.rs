//! Hardware adapter: the four relay channels behind [`ActuatorSink`].
//!
//! Generic over the pin type, so the same board drives sysfs GPIO in
//! production and [`SimPin`](crate::drivers::gpio::SimPin)s in simulation.

use embedded_hal::digital::OutputPin;
use log::debug;

use crate::app::context::ActuatorState;
use crate::app::ports::ActuatorSink;
use crate::drivers::relay::RelayDriver;
use crate::error::ActuatorError;

/// Pins for each channel, in relay order.
pub struct RelayPinSet<P> {
    pub heater: P,
    pub humidifier: P,
    pub light: P,
    pub fan: P,
}

pub struct RelayBoard<P> {
    heater: RelayDriver<P>,
    humidifier: RelayDriver<P>,
    light: RelayDriver<P>,
    fan: RelayDriver<P>,
}

impl<P: OutputPin> RelayBoard<P> {
    pub fn new(pins: RelayPinSet<P>, active_low: bool) -> Self {
        Self {
            heater: RelayDriver::new(pins.heater, "heater", active_low),
            humidifier: RelayDriver::new(pins.humidifier, "humidifier", active_low),
            light: RelayDriver::new(pins.light, "light", active_low),
            fan: RelayDriver::new(pins.fan, "fan", active_low),
        }
    }

    /// State last written successfully to each relay.
    pub fn readout(&self) -> ActuatorState {
        ActuatorState {
            heater: self.heater.is_on(),
            humidifier: self.humidifier.is_on(),
            light: self.light.is_on(),
            fan: self.fan.is_on(),
        }
    }

    pub fn heater(&self) -> &RelayDriver<P> {
        &self.heater
    }

    pub fn humidifier(&self) -> &RelayDriver<P> {
        &self.humidifier
    }

    pub fn light(&self) -> &RelayDriver<P> {
        &self.light
    }

    pub fn fan(&self) -> &RelayDriver<P> {
        &self.fan
    }
}

impl<P: OutputPin> ActuatorSink for RelayBoard<P> {
    /// Every channel is written even if an earlier one fails; the first
    /// failure is returned.
    fn apply(&mut self, state: &ActuatorState) -> Result<(), ActuatorError> {
        let results = [
            self.heater.set(state.heater),
            self.humidifier.set(state.humidifier),
            self.light.set(state.light),
            self.fan.set(state.fan),
        ];
        debug!("relays: {:?}", self.readout());
        results.into_iter().collect()
    }
}
