//! Pure control laws: hysteresis for the heater/humidifier and the fan
//! duty cycle.  No I/O, no clocks.

pub mod duty_cycle;
pub mod hysteresis;
