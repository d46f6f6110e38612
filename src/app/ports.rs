//! Port traits: the hexagonal boundary between the control core and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlCore (domain)
//! ```
//!
//! Driven adapters (sensor, relays, camera, data log, clock, event sink)
//! implement these traits.  The [`ControlCore`](super::service::ControlCore)
//! only sees them through [`Ports`], so it never touches hardware directly.
//!
//! Every call is bounded and synchronous by contract: an adapter that can
//! block (a camera process, a slow SD card) must time out on its own.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use super::context::{ActuatorState, LogRecord, Measurement};
use super::events::AppEvent;
use crate::error::{ActuatorError, CaptureError, LogWriteError, SensorError};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Temperature/humidity source.
pub trait SensorSource {
    /// Take one reading.  Transient bus errors are reported, never retried here.
    fn read(&mut self) -> Result<Measurement, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Relay outputs.
pub trait ActuatorSink {
    /// Drive every channel to `state`.  Called every tick, so writing an
    /// unchanged state must be harmless.
    fn apply(&mut self, state: &ActuatorState) -> Result<(), ActuatorError>;

    /// Kill all actuators for a safe shutdown.
    fn all_off(&mut self) -> Result<(), ActuatorError> {
        self.apply(&ActuatorState::all_off())
    }
}

// ───────────────────────────────────────────────────────────────
// Image capture port
// ───────────────────────────────────────────────────────────────

/// Still camera.
pub trait ImageCapture {
    /// Capture one frame into `directory`, named after `at`
    /// (`{directory}/{%Y-%m-%d_%H-%M-%S}.jpg`).  Returns the written path.
    fn capture(&mut self, directory: &Path, at: NaiveDateTime) -> Result<PathBuf, CaptureError>;
}

// ───────────────────────────────────────────────────────────────
// Append log port
// ───────────────────────────────────────────────────────────────

/// Append-only data log.  Records are never rewritten.
pub trait AppendLog {
    fn append(&mut self, record: &LogRecord) -> Result<(), LogWriteError>;
}

// ───────────────────────────────────────────────────────────────
// Wall clock port
// ───────────────────────────────────────────────────────────────

/// Local wall-clock time, used for the light schedule and timestamps.
pub trait WallClock {
    fn now(&self) -> NaiveDateTime;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The core emits structured [`AppEvent`]s through this port.  Adapters
/// decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Port bundle
// ───────────────────────────────────────────────────────────────

/// The I/O collaborators one tick needs, borrowed for the tick's duration.
pub struct Ports<'a> {
    pub sensor: &'a mut dyn SensorSource,
    pub actuators: &'a mut dyn ActuatorSink,
    pub camera: &'a mut dyn ImageCapture,
    pub log: &'a mut dyn AppendLog,
}
