//! GPIO / peripheral assignments for the chamber relay HAT.
//!
//! Single source of truth for the defaults: [`RelayPins`](crate::config::RelayPins)
//! starts from these and a config file may override them.
//!
//! Numbers are BCM GPIO numbers on the Raspberry Pi header.

// ---------------------------------------------------------------------------
// Relay channels (4-channel relay board)
// ---------------------------------------------------------------------------

/// Relay 1: chamber heater.
pub const HEATER_RELAY_GPIO: u32 = 20;
/// Relay 2: ultrasonic humidifier.
pub const HUMIDIFIER_RELAY_GPIO: u32 = 21;
/// Relay 3: LED grow light.
pub const LIGHT_RELAY_GPIO: u32 = 22;
/// Relay 4: extraction fan.
pub const FAN_RELAY_GPIO: u32 = 23;

// ---------------------------------------------------------------------------
// Kernel interfaces
// ---------------------------------------------------------------------------

/// Legacy sysfs GPIO class directory.
pub const SYSFS_GPIO_ROOT: &str = "/sys/class/gpio";

/// hwmon class directory.  The SHT3x on I²C-1 (SDA = GPIO 2, SCL = GPIO 3)
/// is bound by `dtoverlay=i2c-sensor,sht3x` and appears here.
pub const SYSFS_HWMON_ROOT: &str = "/sys/class/hwmon";

/// `name` attribute the sht3x kernel driver reports.
pub const SHT3X_HWMON_NAME: &str = "sht3x";
