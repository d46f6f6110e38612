//! Temperature/humidity sources implementing
//! [`SensorSource`](crate::app::ports::SensorSource).
//!
//! - [`sht3x`]: SHT3x behind the Linux hwmon class (production).
//! - [`simulated`]: modelled chamber air driven by the simulated relays.

pub mod sht3x;
pub mod simulated;
