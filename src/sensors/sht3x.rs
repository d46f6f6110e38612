//! SHT3x temperature/humidity sensor via the Linux hwmon class.
//!
//! The kernel `sht3x` driver exposes the sensor as
//! `/sys/class/hwmon/hwmonN/` with:
//!
//! | File              | Unit              |
//! |-------------------|-------------------|
//! | `name`            | `sht3x`           |
//! | `temp1_input`     | milli-degrees °C  |
//! | `humidity1_input` | milli-percent RH  |
//!
//! `hwmonN` numbering is not stable across boots, so the device is located
//! by its `name` attribute at startup.

use std::path::{Path, PathBuf};

use chrono::Local;
use log::{debug, info};

use crate::app::context::Measurement;
use crate::app::ports::SensorSource;
use crate::error::{Error, SensorError};

pub struct HwmonSht3x {
    temp_input: PathBuf,
    humidity_input: PathBuf,
}

impl HwmonSht3x {
    /// Find the hwmon device called `name` under `root`.
    pub fn open(root: &Path, name: &str) -> Result<Self, Error> {
        let entries = std::fs::read_dir(root).map_err(|e| {
            Error::ResourceAcquisition(format!("cannot list {}: {e}", root.display()))
        })?;

        let mut candidates: Vec<PathBuf> = entries.filter_map(|e| e.ok().map(|e| e.path())).collect();
        candidates.sort();

        for dir in candidates {
            let Ok(found) = std::fs::read_to_string(dir.join("name")) else {
                continue;
            };
            if found.trim() == name {
                info!("{name} sensor found at {}", dir.display());
                return Ok(Self::at(&dir));
            }
        }

        Err(Error::ResourceAcquisition(format!(
            "no hwmon device named {name:?} under {}",
            root.display()
        )))
    }

    /// Use a known hwmon device directory.
    pub fn at(dir: &Path) -> Self {
        Self {
            temp_input: dir.join("temp1_input"),
            humidity_input: dir.join("humidity1_input"),
        }
    }
}

impl SensorSource for HwmonSht3x {
    fn read(&mut self) -> Result<Measurement, SensorError> {
        let temperature_c = read_milli(&self.temp_input)?;
        let humidity_pct = read_milli(&self.humidity_input)?;
        debug!("sht3x: {temperature_c:.2}°C {humidity_pct:.2}%RH");
        Ok(Measurement {
            temperature_c,
            humidity_pct,
            timestamp: Local::now().naive_local(),
        })
    }
}

/// Read a hwmon attribute in milli-units and scale it to units.
fn read_milli(path: &Path) -> Result<f64, SensorError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| SensorError::Bus(format!("{}: {e}", path.display())))?;
    let milli: i64 = raw
        .trim()
        .parse()
        .map_err(|_| SensorError::Malformed(raw.trim().to_string()))?;
    Ok(milli as f64 / 1000.0)
}
