//! Mock adapters for integration tests.
//!
//! Every port records what the control core asked of it, and every port
//! can be told to fail, so tests can assert on the full call history
//! without touching GPIO, hwmon or a camera.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use chamberctl::app::context::{ActuatorState, LogRecord, Measurement};
use chamberctl::app::events::AppEvent;
use chamberctl::app::ports::{ActuatorSink, AppendLog, EventSink, ImageCapture, Ports, SensorSource};
use chamberctl::app::service::{ControlCore, TickReport};
use chamberctl::error::{ActuatorError, CaptureError, ErrorKind, LogWriteError, SensorError};
use chrono::{NaiveDate, NaiveDateTime};

/// `2024-06-01 hh:mm:ss`
pub fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

// ── MockSensor ────────────────────────────────────────────────

/// Plays back a script of readings; once exhausted, repeats `steady`.
pub struct MockSensor {
    script: VecDeque<Result<(f64, f64), SensorError>>,
    steady: (f64, f64),
    pub reads: usize,
}

#[allow(dead_code)]
impl MockSensor {
    pub fn steady(temperature_c: f64, humidity_pct: f64) -> Self {
        Self {
            script: VecDeque::new(),
            steady: (temperature_c, humidity_pct),
            reads: 0,
        }
    }

    pub fn then(mut self, temperature_c: f64, humidity_pct: f64) -> Self {
        self.script.push_back(Ok((temperature_c, humidity_pct)));
        self
    }

    pub fn then_fail(mut self) -> Self {
        self.script
            .push_back(Err(SensorError::Bus("i2c timeout".into())));
        self
    }
}

impl SensorSource for MockSensor {
    fn read(&mut self) -> Result<Measurement, SensorError> {
        self.reads += 1;
        let (temperature_c, humidity_pct) = self.script.pop_front().unwrap_or(Ok(self.steady))?;
        Ok(Measurement {
            temperature_c,
            humidity_pct,
            timestamp: at(12, 0, 0),
        })
    }
}

// ── MockRelays ────────────────────────────────────────────────

#[derive(Default)]
pub struct MockRelays {
    pub applied: Vec<ActuatorState>,
    /// Fail this many upcoming writes.
    pub fail_next: u32,
}

#[allow(dead_code)]
impl MockRelays {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<ActuatorState> {
        self.applied.last().copied()
    }
}

impl ActuatorSink for MockRelays {
    fn apply(&mut self, state: &ActuatorState) -> Result<(), ActuatorError> {
        if self.fail_next > 0 {
            self.fail_next -= 1;
            return Err(ActuatorError {
                channel: "heater",
                cause: "relay board unplugged".into(),
            });
        }
        self.applied.push(*state);
        Ok(())
    }
}

// ── MockCamera ────────────────────────────────────────────────

#[derive(Default)]
pub struct MockCamera {
    pub captured: Vec<PathBuf>,
    pub fail: bool,
}

impl ImageCapture for MockCamera {
    fn capture(&mut self, directory: &Path, at: NaiveDateTime) -> Result<PathBuf, CaptureError> {
        if self.fail {
            return Err(CaptureError::Failed {
                status: Some(1),
                stderr: "no cameras available".into(),
            });
        }
        let path = directory.join(format!("{}.jpg", at.format("%Y-%m-%d_%H-%M-%S")));
        self.captured.push(path.clone());
        Ok(path)
    }
}

// ── MockLog ───────────────────────────────────────────────────

#[derive(Default)]
pub struct MockLog {
    pub records: Vec<LogRecord>,
    pub fail: bool,
}

impl AppendLog for MockLog {
    fn append(&mut self, record: &LogRecord) -> Result<(), LogWriteError> {
        if self.fail {
            return Err(LogWriteError {
                path: "/media/sdcard/Data/data.csv".into(),
                cause: "read-only file system".into(),
            });
        }
        self.records.push(*record);
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn faults(&self) -> Vec<ErrorKind> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Fault { error, .. } => Some(error.kind()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Rig ───────────────────────────────────────────────────────

/// All mocks for one core.
pub struct Rig {
    pub sensor: MockSensor,
    pub relays: MockRelays,
    pub camera: MockCamera,
    pub log: MockLog,
    pub sink: RecordingSink,
}

#[allow(dead_code)]
impl Rig {
    pub fn new(sensor: MockSensor) -> Self {
        Self {
            sensor,
            relays: MockRelays::new(),
            camera: MockCamera::default(),
            log: MockLog::default(),
            sink: RecordingSink::default(),
        }
    }

    pub fn start(&mut self, core: &mut ControlCore) {
        core.start(&mut self.relays, &mut self.sink);
    }

    pub fn tick(&mut self, core: &mut ControlCore, now: NaiveDateTime) -> TickReport {
        let mut ports = Ports {
            sensor: &mut self.sensor,
            actuators: &mut self.relays,
            camera: &mut self.camera,
            log: &mut self.log,
        };
        core.tick(now, &mut ports, &mut self.sink)
    }

    /// Run `n` ticks, all at wall-clock time `now`.
    pub fn run(&mut self, core: &mut ControlCore, n: u64, now: NaiveDateTime) -> Vec<TickReport> {
        (0..n).map(|_| self.tick(core, now)).collect()
    }
}
