//! Relay channel driver.
//!
//! One mechanical/solid-state relay behind a digital output.  Generic over
//! any [`embedded_hal::digital::OutputPin`], so the same driver runs on
//! sysfs GPIO in production and on in-memory pins in simulation and tests.
//!
//! ## Polarity
//!
//! Many opto-isolated relay boards energise the coil on a LOW input.
//! `active_low` flips the electrical level; callers always speak in
//! "on"/"off".

use embedded_hal::digital::OutputPin;
use log::debug;

use crate::error::ActuatorError;

pub struct RelayDriver<P> {
    pin: P,
    channel: &'static str,
    active_low: bool,
    /// Last state successfully written; `None` until the first write.
    state: Option<bool>,
}

impl<P: OutputPin> RelayDriver<P> {
    pub fn new(pin: P, channel: &'static str, active_low: bool) -> Self {
        Self {
            pin,
            channel,
            active_low,
            state: None,
        }
    }

    /// Drive the relay.  Always writes the pin, even if unchanged.
    pub fn set(&mut self, on: bool) -> Result<(), ActuatorError> {
        let high = on != self.active_low;
        let res = if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        res.map_err(|e| ActuatorError {
            channel: self.channel,
            cause: format!("{e:?}"),
        })?;

        if self.state != Some(on) {
            debug!("Relay {}: {}", self.channel, if on { "on" } else { "off" });
        }
        self.state = Some(on);
        Ok(())
    }

    pub fn is_on(&self) -> bool {
        self.state.unwrap_or(false)
    }

    pub fn channel(&self) -> &'static str {
        self.channel
    }

    pub fn pin(&self) -> &P {
        &self.pin
    }
}
