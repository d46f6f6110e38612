//! System configuration parameters
//!
//! All tunable parameters for the chamber controller.  Loaded once at
//! startup from a JSON file and validated into an immutable
//! [`ControlConfig`]; nothing changes them afterwards.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveTime;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::control::duty_cycle::{ChamberParameters, DutyCycle};
use crate::control::hysteresis::Bounds;
use crate::error::{Error, Result};
use crate::pins;
use crate::scheduler::DayNightWindow;

const MILLIS_PER_HOUR: u64 = 3_600_000;

/// Core system configuration, as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Hysteresis bands ---
    /// Heater band (°C)
    pub temperature_bounds: Bounds,
    /// Humidifier band (%RH)
    pub humidity_bounds: Bounds,

    // --- Extraction fan ---
    pub chamber: ChamberParameters,

    // --- Timing ---
    /// Control loop tick length (milliseconds)
    pub tick_period_ms: u64,
    /// Sensor poll + CSV log interval (seconds)
    pub sensor_poll_interval_secs: u64,
    /// Camera capture interval (seconds); `null` disables the camera
    pub picture_interval_secs: Option<u64>,

    // --- Light schedule ---
    pub day_start: NaiveTime,
    pub night_start: NaiveTime,
    pub day_hours: f64,
    pub night_hours: f64,
    /// Apply the hourly window drift rule
    pub drift_adjustment: bool,

    // --- Files ---
    pub log_path: PathBuf,
    pub pictures_dir: PathBuf,

    pub hardware: HardwareConfig,
}

/// Which set of adapters the binary wires up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// In-memory relays, modelled sensor, no camera process.
    Simulated,
    /// sysfs GPIO relays, hwmon SHT3x sensor, still-camera command.
    Linux,
}

/// BCM pin numbers of the four relay channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayPins {
    pub heater: u32,
    pub humidifier: u32,
    pub light: u32,
    pub fan: u32,
}

impl Default for RelayPins {
    fn default() -> Self {
        Self {
            heater: pins::HEATER_RELAY_GPIO,
            humidifier: pins::HUMIDIFIER_RELAY_GPIO,
            light: pins::LIGHT_RELAY_GPIO,
            fan: pins::FAN_RELAY_GPIO,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HardwareConfig {
    pub backend: Backend,
    pub relay_pins: RelayPins,
    /// Relay boards are commonly active-low.
    pub relays_active_low: bool,
    pub gpio_root: PathBuf,
    pub hwmon_root: PathBuf,
    /// `name` attribute of the hwmon device exposing the SHT3x.
    pub sensor_hwmon_name: String,
    /// Program + leading arguments; the output path is appended.
    pub camera_command: Vec<String>,
    /// A capture still running after this long is killed.
    pub camera_timeout_secs: u64,
}

impl Default for HardwareConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Simulated,
            relay_pins: RelayPins::default(),
            relays_active_low: false,
            gpio_root: PathBuf::from(pins::SYSFS_GPIO_ROOT),
            hwmon_root: PathBuf::from(pins::SYSFS_HWMON_ROOT),
            sensor_hwmon_name: pins::SHT3X_HWMON_NAME.to_string(),
            camera_command: vec![
                "rpicam-still".to_string(),
                "--nopreview".to_string(),
                "--width".to_string(),
                "1980".to_string(),
                "--height".to_string(),
                "1080".to_string(),
                "-o".to_string(),
            ],
            camera_timeout_secs: 10,
        }
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            temperature_bounds: Bounds::new(22.0, 25.0),
            humidity_bounds: Bounds::new(70.0, 75.0),

            chamber: ChamberParameters::default(),

            tick_period_ms: 1000,
            sensor_poll_interval_secs: 5,
            picture_interval_secs: Some(10),

            day_start: NaiveTime::from_hms_opt(6, 0, 0).unwrap_or(NaiveTime::MIN),
            night_start: NaiveTime::from_hms_opt(22, 0, 0).unwrap_or(NaiveTime::MIN),
            day_hours: 16.0,
            night_hours: 8.0,
            drift_adjustment: true,

            log_path: PathBuf::from("/media/sdcard/Data/data.csv"),
            pictures_dir: PathBuf::from("/media/sdcard/Pictures/"),

            hardware: HardwareConfig::default(),
        }
    }
}

/// Validated, immutable view of [`SystemConfig`] consumed by the control core.
#[derive(Debug, Clone)]
pub struct ControlConfig {
    pub temperature_bounds: Bounds,
    pub humidity_bounds: Bounds,
    pub duty_cycle: DutyCycle,
    pub tick_period: Duration,
    /// Sensor poll / log interval, in ticks
    pub poll_every: u64,
    /// Picture interval, in ticks
    pub picture_every: Option<u64>,
    pub ticks_per_hour: u64,
    pub window: DayNightWindow,
    pub drift_adjustment: bool,
    pub pictures_dir: PathBuf,
}

impl ControlConfig {
    pub fn tick_secs(&self) -> f64 {
        self.tick_period.as_secs_f64()
    }
}

impl SystemConfig {
    /// Load configuration from `path`.
    ///
    /// A missing file yields [`SystemConfig::default()`]; a file that
    /// exists but can't be read or parsed is a [`Error::Configuration`].
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(
                "Config file {} not found, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        let config = Self::from_json(&text)
            .map_err(|e| Error::Configuration(format!("{}: {e}", path.display())))?;
        info!("Config loaded from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> core::result::Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Check every field and derive the control parameters.
    pub fn validate(&self) -> Result<ControlConfig> {
        validate_bounds("temperature_bounds", self.temperature_bounds)?;
        validate_bounds("humidity_bounds", self.humidity_bounds)?;

        let duty_cycle = DutyCycle::from_chamber(&self.chamber)?;

        if self.tick_period_ms == 0 {
            return Err(Error::Configuration("tick_period_ms must be > 0".into()));
        }
        let poll_every = self.interval_ticks("sensor_poll_interval_secs", self.sensor_poll_interval_secs)?;
        let picture_every = self
            .picture_interval_secs
            .map(|secs| self.interval_ticks("picture_interval_secs", secs))
            .transpose()?;
        if MILLIS_PER_HOUR % self.tick_period_ms != 0 {
            return Err(Error::Configuration(format!(
                "tick_period_ms {} does not divide one hour",
                self.tick_period_ms
            )));
        }
        let ticks_per_hour = MILLIS_PER_HOUR / self.tick_period_ms;

        for (name, hours) in [("day_hours", self.day_hours), ("night_hours", self.night_hours)] {
            if !hours.is_finite() || !(0.0..=24.0).contains(&hours) {
                return Err(Error::Configuration(format!(
                    "{name} must be within 0..=24, got {hours}"
                )));
            }
        }

        if picture_every.is_some() && self.hardware.backend == Backend::Linux {
            if self.hardware.camera_command.is_empty() {
                return Err(Error::Configuration("camera_command is empty".into()));
            }
            if self.hardware.camera_timeout_secs == 0 {
                return Err(Error::Configuration("camera_timeout_secs must be > 0".into()));
            }
        }

        Ok(ControlConfig {
            temperature_bounds: self.temperature_bounds,
            humidity_bounds: self.humidity_bounds,
            duty_cycle,
            tick_period: Duration::from_millis(self.tick_period_ms),
            poll_every,
            picture_every,
            ticks_per_hour,
            window: DayNightWindow::new(
                self.day_start,
                self.night_start,
                self.day_hours,
                self.night_hours,
            ),
            drift_adjustment: self.drift_adjustment,
            pictures_dir: self.pictures_dir.clone(),
        })
    }

    fn interval_ticks(&self, name: &str, secs: u64) -> Result<u64> {
        let millis = secs.saturating_mul(1000);
        if millis == 0 {
            return Err(Error::Configuration(format!("{name} must be > 0")));
        }
        if millis % self.tick_period_ms != 0 {
            return Err(Error::Configuration(format!(
                "{name} ({secs}s) is not a whole number of {}ms ticks",
                self.tick_period_ms
            )));
        }
        Ok(millis / self.tick_period_ms)
    }
}

fn validate_bounds(name: &str, b: Bounds) -> Result<()> {
    if !b.low.is_finite() || !b.high.is_finite() {
        return Err(Error::Configuration(format!("{name} must be finite")));
    }
    if b.low > b.high {
        return Err(Error::Configuration(format!(
            "{name}: low {} is above high {}",
            b.low, b.high
        )));
    }
    if b.is_degenerate() {
        warn!(
            "{name}: low == high ({}), controller has no dead-band and may chatter",
            b.low
        );
    }
    Ok(())
}
