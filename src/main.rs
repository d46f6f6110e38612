//! chamberctl: growth-chamber controller entry point.
//!
//! Hexagonal architecture with a single-owner control core.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  RelayBoard      HwmonSht3x /        CommandCamera /           │
//! │  (ActuatorSink)  SimulatedChamber    SimulatedCamera           │
//! │                  (SensorSource)      (ImageCapture)            │
//! │  CsvAppendLog    SystemClock         LogEventSink              │
//! │  (AppendLog)     (WallClock)         (EventSink)               │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │             ControlCore (pure logic)                   │    │
//! │  │  Hysteresis · Fan duty cycle · Day/night window        │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  runner: absolute-deadline tick loop · SIGINT/SIGTERM stop     │
//! └────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};

use chamberctl::adapters::camera::{CommandCamera, SimulatedCamera};
use chamberctl::adapters::csv_log::CsvAppendLog;
use chamberctl::adapters::hardware::{RelayBoard, RelayPinSet};
use chamberctl::adapters::log_sink::LogEventSink;
use chamberctl::adapters::time::SystemClock;
use chamberctl::app::ports::{ImageCapture, Ports};
use chamberctl::app::service::ControlCore;
use chamberctl::config::{Backend, ControlConfig, HardwareConfig, SystemConfig};
use chamberctl::diagnostics::RuntimeStats;
use chamberctl::drivers::gpio::{SimPin, SysfsPin};
use chamberctl::runner;
use chamberctl::sensors::sht3x::HwmonSht3x;
use chamberctl::sensors::simulated::SimulatedChamber;
use chamberctl::shutdown::ShutdownSignal;

const CONFIG_ENV: &str = "CHAMBERCTL_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "chamberctl.json";

/// Starting conditions of the simulated chamber.
const SIM_AMBIENT_C: f64 = 19.0;
const SIM_AMBIENT_RH: f64 = 55.0;

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    info!("chamberctl v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration ──────────────────────────────────────
    let path = config_path();
    let system = SystemConfig::load(&path).context("loading configuration")?;
    let control = system.validate().context("invalid configuration")?;
    banner(&system, &control);

    // ── 3. Run ────────────────────────────────────────────────
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;
    let stats = runtime.block_on(run_backend(&system, control))?;

    info!(
        "chamberctl stopped after {} ticks ({} handled failures)",
        stats.ticks,
        stats.total_failures()
    );
    Ok(())
}

/// First CLI argument, then `$CHAMBERCTL_CONFIG`, then `chamberctl.json`.
fn config_path() -> PathBuf {
    std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

fn banner(system: &SystemConfig, control: &ControlConfig) {
    info!("Chamber volume: {:.2} m³", system.chamber.volume_m3());
    info!("Fan on-time:    {:.2} s", control.duty_cycle.on_secs());
    info!("Fan period:     {:.2} s", control.duty_cycle.period_secs());
    info!(
        "Backend: {:?} | poll every {} ticks | pictures {} | log {}",
        system.hardware.backend,
        control.poll_every,
        control
            .picture_every
            .map_or_else(|| "off".to_string(), |n| format!("every {n} ticks")),
        system.log_path.display()
    );
}

/// Acquire the configured backend's hardware and run the loop on it.
async fn run_backend(system: &SystemConfig, control: ControlConfig) -> Result<RuntimeStats> {
    // Before any relay is claimed or driven.
    let stop = ShutdownSignal::install();

    let hw = &system.hardware;
    let camera_enabled = control.picture_every.is_some();
    let mut core = ControlCore::new(control);
    let mut log = CsvAppendLog::new(&system.log_path);
    let clock = SystemClock::new();
    let mut sink = LogEventSink::new();

    let stats = match hw.backend {
        Backend::Linux => {
            let mut relays = RelayBoard::new(claim_relays(hw)?, hw.relays_active_low);
            let mut sensor = HwmonSht3x::open(&hw.hwmon_root, &hw.sensor_hwmon_name)
                .context("acquiring temperature/humidity sensor")?;
            let mut camera: Box<dyn ImageCapture> = if camera_enabled {
                let timeout = Duration::from_secs(hw.camera_timeout_secs);
                Box::new(
                    CommandCamera::new(&hw.camera_command, timeout)
                        .context("camera_command is empty")?,
                )
            } else {
                Box::new(SimulatedCamera::new())
            };
            let mut ports = Ports {
                sensor: &mut sensor,
                actuators: &mut relays,
                camera: camera.as_mut(),
                log: &mut log,
            };
            runner::run(&mut core, &mut ports, &clock, &mut sink, stop.recv()).await?
        }
        Backend::Simulated => {
            if hw.relays_active_low {
                warn!("relays_active_low has no effect on the simulated backend");
            }
            let pins = RelayPinSet {
                heater: SimPin::new(),
                humidifier: SimPin::new(),
                light: SimPin::new(),
                fan: SimPin::new(),
            };
            let mut sensor = SimulatedChamber::new(
                SIM_AMBIENT_C,
                SIM_AMBIENT_RH,
                pins.heater.level(),
                pins.humidifier.level(),
            );
            let mut relays = RelayBoard::new(pins, false);
            let mut camera = SimulatedCamera::new();
            let mut ports = Ports {
                sensor: &mut sensor,
                actuators: &mut relays,
                camera: &mut camera,
                log: &mut log,
            };
            runner::run(&mut core, &mut ports, &clock, &mut sink, stop.recv()).await?
        }
    };
    Ok(stats)
}

/// Claim the four relay lines.  Each starts at its "off" level.
fn claim_relays(hw: &HardwareConfig) -> Result<RelayPinSet<SysfsPin>> {
    let off_level = hw.relays_active_low;
    let claim = |name: &str, number: u32| {
        SysfsPin::claim(&hw.gpio_root, number, off_level)
            .with_context(|| format!("acquiring {name} relay on GPIO {number}"))
    };
    Ok(RelayPinSet {
        heater: claim("heater", hw.relay_pins.heater)?,
        humidifier: claim("humidifier", hw.relay_pins.humidifier)?,
        light: claim("light", hw.relay_pins.light)?,
        fan: claim("fan", hw.relay_pins.fan)?,
    })
}
