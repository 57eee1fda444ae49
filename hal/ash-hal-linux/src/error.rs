//! Linux HAL errors

use ash_hal::Signal;
use thiserror::Error;

/// Errors raised while opening or driving host peripherals
#[derive(Debug, Error)]
pub enum HalError {
    /// Neither the gpio character device nor sysfs GPIO is usable
    #[error("no usable GPIO backend (tried gpio character device and sysfs)")]
    NoGpioBackend,

    /// The gpio chip could not be opened
    #[error("GPIO chip {path}: {reason}")]
    Chip { path: String, reason: String },

    /// A single line could not be requested or driven
    #[error("GPIO line {line} ({signal:?}): {reason}")]
    Line {
        signal: Signal,
        line: u32,
        reason: String,
    },

    /// Lines were driven after release
    #[error("GPIO lines already released")]
    Released,

    /// spidev open/configure/transfer failure
    #[error("SPI device {path}: {reason}")]
    Spi { path: String, reason: String },

    /// i2c-dev open failure
    #[error("I2C bus {path}: {reason}")]
    I2c { path: String, reason: String },
}
