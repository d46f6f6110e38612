//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements     | Connects to                      |
//! |------------|----------------|----------------------------------|
//! | `camera`   | ImageCapture   | `rpicam-still` / simulation      |
//! | `csv_log`  | AppendLog      | CSV file on the SD card          |
//! | `hardware` | ActuatorSink   | Relay board (sysfs GPIO / sim)   |
//! | `log_sink` | EventSink      | `log` facade                     |
//! | `time`     | WallClock      | Host local time / fixed clock    |
//!
//! Sensor sources live in [`crate::sensors`].

pub mod camera;
pub mod csv_log;
pub mod hardware;
pub mod log_sink;
pub mod time;
