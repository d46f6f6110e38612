//! Control core: the hexagonal centre.
//!
//! [`ControlCore`] owns the actuator state, the day/night window and the
//! tick counter.  Nothing else mutates them, so no locking is needed.
//! All I/O flows through the [`Ports`] bundle handed to [`ControlCore::tick`],
//! which makes the whole core testable with mock adapters.
//!
//! ```text
//!  SensorSource ──▶ ┌────────────────────────────┐ ──▶ ActuatorSink
//!                   │        ControlCore         │ ──▶ AppendLog
//!     WallClock ──▶ │ Hysteresis · Fan · Light   │ ──▶ ImageCapture
//!                   └────────────────────────────┘ ──▶ EventSink
//! ```
//!
//! Per tick, in order:
//!
//! 1. poll tick → read sensor, run hysteresis for heater + humidifier
//! 2. light from the day/night window
//! 3. fan from the duty cycle
//! 4. push the full state to the relays
//! 5. poll tick → append a log record for the fresh measurement
//! 6. picture tick → capture an image
//! 7. completed hour → drift the day/night window
//! 8. advance the tick counter
//!
//! Every failing step is reported as a `Fault` event and counted; none of
//! them stops the tick or the loop.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use log::{debug, info, warn};

use crate::clock::TickCounter;
use crate::config::ControlConfig;
use crate::control::hysteresis;
use crate::diagnostics::RuntimeStats;
use crate::error::{Error, Result};
use crate::scheduler::{DayNightWindow, WindowAdjustment};

use super::context::{ActuatorState, LogRecord, Measurement};
use super::events::AppEvent;
use super::ports::{ActuatorSink, EventSink, Ports};

/// Attempts made to drive every output off during shutdown.
const SHUTDOWN_ATTEMPTS: u32 = 3;

// ───────────────────────────────────────────────────────────────
// Tick report
// ───────────────────────────────────────────────────────────────

/// What one tick decided and did.
#[derive(Debug, Clone)]
pub struct TickReport {
    pub tick: u64,
    /// Actuator state pushed to the relays this tick.
    pub state: ActuatorState,
    /// Fresh measurement, only on a successful poll tick.
    pub measurement: Option<Measurement>,
    /// A log record was appended.
    pub logged: bool,
    /// Picture written this tick.
    pub picture: Option<PathBuf>,
    pub window_adjustment: Option<WindowAdjustment>,
    /// Recoverable errors handled during the tick.
    pub errors: Vec<Error>,
}

// ───────────────────────────────────────────────────────────────
// ControlCore
// ───────────────────────────────────────────────────────────────

pub struct ControlCore {
    config: ControlConfig,
    state: ActuatorState,
    window: DayNightWindow,
    ticks: TickCounter,
    last_measurement: Option<Measurement>,
    stats: RuntimeStats,
}

impl ControlCore {
    pub fn new(config: ControlConfig) -> Self {
        let window = config.window;
        Self {
            config,
            state: ActuatorState::all_off(),
            window,
            ticks: TickCounter::new(),
            last_measurement: None,
            stats: RuntimeStats::new(),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive every relay off before the first tick and announce the
    /// derived fan timing.
    pub fn start(&mut self, actuators: &mut dyn ActuatorSink, sink: &mut impl EventSink) {
        let dc = self.config.duty_cycle;
        info!(
            "Fan: on for {:.2}s every {:.2}s ({:.1}% duty)",
            dc.on_secs(),
            dc.period_secs(),
            dc.ratio() * 100.0
        );

        self.state = ActuatorState::all_off();
        if let Err(e) = actuators.all_off() {
            self.fault(0, e.into(), sink);
        }

        sink.emit(&AppEvent::Started {
            state: self.state,
            window: self.window,
            fan_on_secs: dc.on_secs(),
            fan_period_secs: dc.period_secs(),
        });
    }

    /// Bounded shutdown sequence: drive every output off, retrying a few
    /// times, then report the run's statistics.
    pub fn shutdown(&mut self, actuators: &mut dyn ActuatorSink, sink: &mut impl EventSink) -> Result<()> {
        self.state = ActuatorState::all_off();

        let mut last_err = None;
        for attempt in 1..=SHUTDOWN_ATTEMPTS {
            match actuators.all_off() {
                Ok(()) => {
                    last_err = None;
                    break;
                }
                Err(e) => {
                    warn!("Shutdown: all-off attempt {attempt}/{SHUTDOWN_ATTEMPTS} failed: {e}");
                    self.stats.actuator_failures += 1;
                    last_err = Some(e);
                }
            }
        }

        sink.emit(&AppEvent::Stopped(self.stats));
        match last_err {
            None => {
                info!("Shutdown: all outputs off after {} ticks", self.stats.ticks);
                Ok(())
            }
            Some(e) => Err(e.into()),
        }
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle at wall-clock time `now`.
    pub fn tick(&mut self, now: NaiveDateTime, ports: &mut Ports<'_>, sink: &mut impl EventSink) -> TickReport {
        let tick = self.ticks.get();
        let prev = self.state;
        let time_of_day = now.time();
        let mut report = TickReport {
            tick,
            state: self.state,
            measurement: None,
            logged: false,
            picture: None,
            window_adjustment: None,
            errors: Vec::new(),
        };

        // 1. Sensor poll + hysteresis
        let poll_tick = self.ticks.is_multiple_of(self.config.poll_every);
        if poll_tick {
            self.stats.polls += 1;
            match ports.sensor.read().and_then(Measurement::finite) {
                Ok(m) => {
                    self.apply_measurement(&m);
                    self.last_measurement = Some(m);
                    report.measurement = Some(m);
                }
                // Heater and humidifier keep their previous state.
                Err(e) => report.errors.push(self.fault(tick, e.into(), sink)),
            }
        }

        // 2. Light
        self.state.light = self.window.is_day(time_of_day);

        // 3. Fan
        self.state.fan = self
            .config
            .duty_cycle
            .is_fan_on_at_tick(tick, self.config.tick_secs());

        // 4. Relays
        debug!(
            "tick {} | heater={} humidifier={} light={} fan={}",
            tick,
            on_off(self.state.heater),
            on_off(self.state.humidifier),
            on_off(self.state.light),
            on_off(self.state.fan),
        );
        if let Err(e) = ports.actuators.apply(&self.state) {
            report.errors.push(self.fault(tick, e.into(), sink));
        }
        if self.state != prev {
            sink.emit(&AppEvent::ActuatorsChanged {
                from: prev,
                to: self.state,
            });
        }
        report.state = self.state;

        // 5. Data log (needs this tick's measurement)
        if let Some(m) = report.measurement {
            let record = LogRecord::new(&m, &self.state);
            match ports.log.append(&record) {
                Ok(()) => {
                    self.stats.records_written += 1;
                    report.logged = true;
                    sink.emit(&AppEvent::Telemetry(record));
                }
                Err(e) => report.errors.push(self.fault(tick, e.into(), sink)),
            }
        }

        // 6. Camera
        if let Some(every) = self.config.picture_every {
            if self.ticks.is_multiple_of(every) {
                match ports.camera.capture(&self.config.pictures_dir, now) {
                    Ok(path) => {
                        self.stats.pictures_taken += 1;
                        sink.emit(&AppEvent::PictureCaptured(path.clone()));
                        report.picture = Some(path);
                    }
                    Err(e) => report.errors.push(self.fault(tick, e.into(), sink)),
                }
            }
        }

        // 7. Hourly window drift (completed hours only, never tick 0)
        if self.config.drift_adjustment && tick > 0 && self.ticks.is_multiple_of(self.config.ticks_per_hour) {
            let adj = self.window.adjust(time_of_day);
            self.stats.window_adjustments += 1;
            sink.emit(&AppEvent::WindowAdjusted(adj));
            report.window_adjustment = Some(adj);
        }

        // 8. Advance
        self.ticks.advance();
        self.stats.ticks += 1;
        report
    }

    /// Count a tick that finished after its successor was already due.
    pub fn record_overrun(&mut self) {
        self.stats.overruns += 1;
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> ActuatorState {
        self.state
    }

    pub fn window(&self) -> DayNightWindow {
        self.window
    }

    /// Ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.ticks.get()
    }

    pub fn last_measurement(&self) -> Option<Measurement> {
        self.last_measurement
    }

    pub fn stats(&self) -> RuntimeStats {
        self.stats
    }

    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    // ── Internal ──────────────────────────────────────────────

    fn apply_measurement(&mut self, m: &Measurement) {
        self.state.heater =
            hysteresis::decide(m.temperature_c, self.config.temperature_bounds, self.state.heater);
        self.state.humidifier =
            hysteresis::decide(m.humidity_pct, self.config.humidity_bounds, self.state.humidifier);
    }

    /// Count a recoverable error and report it.  The event sink is the
    /// only place it gets logged.
    fn fault(&mut self, tick: u64, error: Error, sink: &mut impl EventSink) -> Error {
        self.stats.record_failure(error.kind());
        sink.emit(&AppEvent::Fault {
            tick,
            error: error.clone(),
        });
        error
    }
}

fn on_off(v: bool) -> &'static str {
    if v { "on" } else { "off" }
}
