//! CSV data log implementing [`AppendLog`].
//!
//! One row per poll tick:
//!
//! ```text
//! datetime,temperature,humidity,led_state,fan_state
//! 2024-03-09 07:05:03,23.46,71.25,1,0
//! ```
//!
//! The file is opened in append mode for every row, so an SD card pulled
//! and reinserted between rows is picked up again.  The header goes in
//! whenever the file is missing or empty.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::info;

use crate::app::context::LogRecord;
use crate::app::ports::AppendLog;
use crate::error::LogWriteError;

pub const HEADER: &str = "datetime,temperature,humidity,led_state,fan_state";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct CsvAppendLog {
    path: PathBuf,
}

impl CsvAppendLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn error(&self, cause: impl ToString) -> LogWriteError {
        LogWriteError {
            path: self.path.display().to_string(),
            cause: cause.to_string(),
        }
    }
}

/// Render one CSV row (no trailing newline).
pub fn format_row(record: &LogRecord) -> String {
    format!(
        "{},{:.2},{:.2},{},{}",
        record.timestamp.format(DATETIME_FORMAT),
        record.temperature_c,
        record.humidity_pct,
        u8::from(record.light),
        u8::from(record.fan),
    )
}

impl AppendLog for CsvAppendLog {
    fn append(&mut self, record: &LogRecord) -> Result<(), LogWriteError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| self.error(e))?;
                info!("Created log directory {}", parent.display());
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.error(e))?;
        let empty = file.metadata().map_err(|e| self.error(e))?.len() == 0;

        let mut out = String::new();
        if empty {
            out.push_str(HEADER);
            out.push('\n');
        }
        out.push_str(&format_row(record));
        out.push('\n');

        file.write_all(out.as_bytes()).map_err(|e| self.error(e))
    }
}
