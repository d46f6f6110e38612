//! Output drivers: GPIO lines and the relays behind them.

pub mod gpio;
pub mod relay;
