//! Still-camera adapters implementing [`ImageCapture`].
//!
//! Images are named `{directory}/{%Y-%m-%d_%H-%M-%S}.jpg` after the tick's
//! wall-clock time.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use chrono::NaiveDateTime;
use log::{debug, info, warn};

use crate::app::ports::ImageCapture;
use crate::error::CaptureError;

const FILENAME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";
const POLL_INTERVAL: Duration = Duration::from_millis(50);
/// Trailing stderr kept in a failure report.
const STDERR_TAIL: usize = 512;

/// Path of the image captured at `at`.
pub fn image_path(directory: &Path, at: NaiveDateTime) -> PathBuf {
    directory.join(format!("{}.jpg", at.format(FILENAME_FORMAT)))
}

// ── External command ──────────────────────────────────────────

/// Runs `program args... <path>` once per capture (`rpicam-still` by default).
pub struct CommandCamera {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandCamera {
    /// `command` is the program followed by its leading arguments.
    /// Returns `None` for an empty command.
    pub fn new(command: &[String], timeout: Duration) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
            timeout,
        })
    }
}

impl ImageCapture for CommandCamera {
    fn capture(&mut self, directory: &Path, at: NaiveDateTime) -> Result<PathBuf, CaptureError> {
        std::fs::create_dir_all(directory)
            .map_err(|e| CaptureError::Destination(format!("{}: {e}", directory.display())))?;
        let path = image_path(directory, at);

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(&path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| CaptureError::Spawn(format!("{}: {e}", self.program)))?;

        // Drain stderr concurrently so a chatty camera never blocks on a full pipe.
        let stderr = child.stderr.take().map(|mut pipe| {
            std::thread::spawn(move || {
                let mut buf = String::new();
                let _ = pipe.read_to_string(&mut buf);
                buf
            })
        });
        let collect_stderr = |handle: Option<std::thread::JoinHandle<String>>| {
            let text = handle.and_then(|h| h.join().ok()).unwrap_or_default();
            tail(text.trim(), STDERR_TAIL).to_string()
        };

        let started = Instant::now();
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if started.elapsed() >= self.timeout => {
                    warn!("{} still running after {:?}, killing it", self.program, self.timeout);
                    let _ = child.kill();
                    let _ = child.wait();
                    let stderr = collect_stderr(stderr);
                    return Err(CaptureError::Failed {
                        status: None,
                        stderr: format!("timed out after {:?}; {stderr}", self.timeout),
                    });
                }
                Ok(None) => std::thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    let _ = child.kill();
                    return Err(CaptureError::Spawn(format!("{}: {e}", self.program)));
                }
            }
        };

        let stderr = collect_stderr(stderr);
        if !status.success() {
            return Err(CaptureError::Failed {
                status: status.code(),
                stderr,
            });
        }
        debug!("{} took {:?}", self.program, started.elapsed());
        info!("Picture saved: {}", path.display());
        Ok(path)
    }
}

fn tail(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut start = s.len() - max;
    while !s.is_char_boundary(start) {
        start += 1;
    }
    &s[start..]
}

// ── Simulation ────────────────────────────────────────────────

/// Reports the path a capture would have written, without touching disk.
#[derive(Debug, Default)]
pub struct SimulatedCamera {
    captures: u64,
}

impl SimulatedCamera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn captures(&self) -> u64 {
        self.captures
    }
}

impl ImageCapture for SimulatedCamera {
    fn capture(&mut self, directory: &Path, at: NaiveDateTime) -> Result<PathBuf, CaptureError> {
        self.captures += 1;
        let path = image_path(directory, at);
        debug!("sim camera: {}", path.display());
        Ok(path)
    }
}
