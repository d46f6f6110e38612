//! Application core: pure domain logic, zero I/O.
//!
//! The control core combines the hysteresis controllers, the fan duty
//! cycle and the light schedule into one per-tick decision.  All
//! interaction with hardware happens through **port traits** defined in
//! [`ports`], keeping this layer fully testable without real peripherals.

pub mod context;
pub mod events;
pub mod ports;
pub mod service;
