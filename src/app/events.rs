//! Outbound application events.
//!
//! The [`ControlCore`](super::service::ControlCore) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log to the console, forward to a
//! dashboard, etc.

use std::path::PathBuf;

use super::context::{ActuatorState, LogRecord};
use crate::diagnostics::RuntimeStats;
use crate::error::Error;
use crate::scheduler::{DayNightWindow, WindowAdjustment};

/// Structured events emitted by the control core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The core has started.
    Started {
        state: ActuatorState,
        window: DayNightWindow,
        fan_on_secs: f64,
        fan_period_secs: f64,
    },

    /// A fresh measurement was taken and logged (one per poll tick).
    Telemetry(LogRecord),

    /// At least one relay changed state this tick.
    ActuatorsChanged { from: ActuatorState, to: ActuatorState },

    /// The hourly drift rule moved a window boundary.
    WindowAdjusted(WindowAdjustment),

    /// A picture was written.
    PictureCaptured(PathBuf),

    /// A recoverable error was handled inside a tick.
    Fault { tick: u64, error: Error },

    /// The loop stopped and all outputs were driven off.
    Stopped(RuntimeStats),
}
