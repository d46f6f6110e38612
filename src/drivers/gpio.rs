//! GPIO output pins.
//!
//! - [`SysfsPin`]: a Linux sysfs GPIO line (`/sys/class/gpio/gpioN`).
//!   Claiming exports the line and sets it as an output; dropping the pin
//!   unexports it again if this process exported it.
//! - [`SimPin`]: an in-memory line for simulation and tests.  Its level
//!   is shared through a [`SimLevel`] handle so a simulated sensor (or a
//!   test) can observe it.
//!
//! Both implement [`embedded_hal::digital::OutputPin`].

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use embedded_hal::digital::{self, ErrorType, OutputPin};
use log::{info, warn};

use crate::error::Error;

/// udev may need a moment to fix permissions on a freshly exported line.
const EXPORT_SETTLE_ATTEMPTS: u32 = 20;
const EXPORT_SETTLE_DELAY: Duration = Duration::from_millis(10);

// ── Errors ────────────────────────────────────────────────────

/// A failed GPIO write.
#[derive(Debug)]
pub struct GpioError {
    pub pin: u32,
    pub source: std::io::Error,
}

impl digital::Error for GpioError {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

// ── sysfs ─────────────────────────────────────────────────────

pub struct SysfsPin {
    number: u32,
    root: PathBuf,
    value_path: PathBuf,
    exported_by_us: bool,
}

impl SysfsPin {
    /// Export `number` under `root` and configure it as an output at the
    /// given initial level.
    ///
    /// Any failure here means the relay cannot be driven safely and is
    /// reported as [`Error::ResourceAcquisition`].
    pub fn claim(root: &Path, number: u32, initial_high: bool) -> Result<Self, Error> {
        let line_dir = root.join(format!("gpio{number}"));

        let exported_by_us = if line_dir.exists() {
            warn!("GPIO {number} already exported, taking it over");
            false
        } else {
            std::fs::write(root.join("export"), number.to_string()).map_err(|e| {
                Error::ResourceAcquisition(format!("cannot export GPIO {number}: {e}"))
            })?;
            true
        };

        // "low"/"high" set the direction and the value in one write, so the
        // line never glitches to the wrong level.
        let direction = line_dir.join("direction");
        let initial = if initial_high { "high" } else { "low" };
        let mut last_err = None;
        for _ in 0..EXPORT_SETTLE_ATTEMPTS {
            match std::fs::write(&direction, initial) {
                Ok(()) => {
                    last_err = None;
                    break;
                }
                Err(e) => {
                    last_err = Some(e);
                    std::thread::sleep(EXPORT_SETTLE_DELAY);
                }
            }
        }
        if let Some(e) = last_err {
            if exported_by_us {
                let _ = std::fs::write(root.join("unexport"), number.to_string());
            }
            return Err(Error::ResourceAcquisition(format!(
                "cannot set GPIO {number} as output: {e}"
            )));
        }

        info!("GPIO {number} claimed as output");
        Ok(Self {
            number,
            root: root.to_path_buf(),
            value_path: line_dir.join("value"),
            exported_by_us,
        })
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    fn write_value(&mut self, high: bool) -> Result<(), GpioError> {
        std::fs::write(&self.value_path, if high { "1" } else { "0" }).map_err(|source| GpioError {
            pin: self.number,
            source,
        })
    }
}

impl ErrorType for SysfsPin {
    type Error = GpioError;
}

impl OutputPin for SysfsPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write_value(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write_value(true)
    }
}

impl Drop for SysfsPin {
    fn drop(&mut self) {
        if !self.exported_by_us {
            return;
        }
        match std::fs::write(self.root.join("unexport"), self.number.to_string()) {
            Ok(()) => info!("GPIO {} released", self.number),
            Err(e) => warn!("GPIO {} unexport failed: {}", self.number, e),
        }
    }
}

// ── Simulation ────────────────────────────────────────────────

/// Shared, observable level of a [`SimPin`].
#[derive(Debug, Clone, Default)]
pub struct SimLevel(Arc<AtomicBool>);

impl SimLevel {
    pub fn get(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// In-memory output pin.  Never fails.
#[derive(Debug, Default)]
pub struct SimPin {
    level: SimLevel,
}

impl SimPin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle observing this pin's level.
    pub fn level(&self) -> SimLevel {
        self.level.clone()
    }
}

impl ErrorType for SimPin {
    type Error = core::convert::Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.level.0.store(false, Ordering::Relaxed);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.level.0.store(true, Ordering::Relaxed);
        Ok(())
    }
}
