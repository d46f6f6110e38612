//! Unified error types for the chamber controller.
//!
//! A single [`Error`] enum that every port error converts into, keeping the
//! control loop's error handling uniform.  Two classes exist:
//!
//! - **Fatal** ([`ErrorKind::Configuration`], [`ErrorKind::ResourceAcquisition`]):
//!   raised at startup only, they stop the process before the loop begins.
//! - **Recoverable** (everything else): caught inside the tick step that
//!   produced them, logged, and never allowed to escape the tick.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the controller funnels into this type.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration is invalid (e.g. fan on-time longer than its period).
    Configuration(String),
    /// The temperature/humidity sensor could not be read this tick.
    SensorUnavailable(SensorError),
    /// Pushing the actuator state to the relays failed.
    ActuatorWrite(ActuatorError),
    /// The camera failed to capture an image.
    Capture(CaptureError),
    /// A row could not be appended to the data log.
    LogWrite(LogWriteError),
    /// A hardware resource (GPIO, sensor bus, camera) could not be claimed.
    ResourceAcquisition(String),
}

/// Discriminant of [`Error`], used for structured reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    SensorUnavailable,
    ActuatorWrite,
    Capture,
    LogWrite,
    ResourceAcquisition,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::SensorUnavailable(_) => ErrorKind::SensorUnavailable,
            Self::ActuatorWrite(_) => ErrorKind::ActuatorWrite,
            Self::Capture(_) => ErrorKind::Capture,
            Self::LogWrite(_) => ErrorKind::LogWrite,
            Self::ResourceAcquisition(_) => ErrorKind::ResourceAcquisition,
        }
    }

    /// Fatal errors prevent startup; all others are handled per tick.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Configuration | ErrorKind::ResourceAcquisition
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Configuration => "ConfigurationError",
            Self::SensorUnavailable => "SensorUnavailable",
            Self::ActuatorWrite => "ActuatorWriteError",
            Self::Capture => "CaptureError",
            Self::LogWrite => "LogWriteError",
            Self::ResourceAcquisition => "ResourceAcquisitionError",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "{}: {msg}", self.kind()),
            Self::SensorUnavailable(e) => write!(f, "{}: {e}", self.kind()),
            Self::ActuatorWrite(e) => write!(f, "{}: {e}", self.kind()),
            Self::Capture(e) => write!(f, "{}: {e}", self.kind()),
            Self::LogWrite(e) => write!(f, "{}: {e}", self.kind()),
            Self::ResourceAcquisition(msg) => write!(f, "{}: {msg}", self.kind()),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SensorError {
    /// The bus or device node returned an I/O error.
    Bus(String),
    /// The device answered with something that is not a reading.
    Malformed(String),
    /// Reading is not a finite number.
    NotFinite,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(cause) => write!(f, "bus error: {cause}"),
            Self::Malformed(raw) => write!(f, "malformed reading {raw:?}"),
            Self::NotFinite => write!(f, "reading is not finite"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::SensorUnavailable(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActuatorError {
    /// Relay channel that failed ("heater", "fan", ...).
    pub channel: &'static str,
    pub cause: String,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} relay write failed: {}", self.channel, self.cause)
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::ActuatorWrite(e)
    }
}

// ---------------------------------------------------------------------------
// Capture errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The capture command could not be started.
    Spawn(String),
    /// The capture command ran but exited unsuccessfully.
    Failed { status: Option<i32>, stderr: String },
    /// The destination directory could not be prepared.
    Destination(String),
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn(cause) => write!(f, "could not start camera: {cause}"),
            Self::Failed { status, stderr } => match status {
                Some(code) => write!(f, "camera exited with {code}: {stderr}"),
                None => write!(f, "camera terminated by signal: {stderr}"),
            },
            Self::Destination(cause) => write!(f, "destination unavailable: {cause}"),
        }
    }
}

impl From<CaptureError> for Error {
    fn from(e: CaptureError) -> Self {
        Self::Capture(e)
    }
}

// ---------------------------------------------------------------------------
// Log write errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogWriteError {
    pub path: String,
    pub cause: String,
}

impl fmt::Display for LogWriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.cause)
    }
}

impl From<LogWriteError> for Error {
    fn from(e: LogWriteError) -> Self {
        Self::LogWrite(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
