//! chamberctl library.
//!
//! The control core and its adapters, exposed for the binary and for
//! integration testing.  Nothing here touches hardware except the
//! `drivers`, `sensors` and `adapters` modules, and those only when a
//! Linux backend is constructed.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod clock;
pub mod config;
pub mod control;
pub mod diagnostics;
pub mod drivers;
pub mod error;
pub mod pins;
pub mod runner;
pub mod scheduler;
pub mod sensors;
pub mod shutdown;

pub use error::{Error, Result};
