//! Linux HAL for Ash
//!
//! Implements the [`ash_hal`] traits on a Raspberry Pi class host:
//!
//! - GPIO signal lines through the gpio character device (`/dev/gpiochipN`)
//!   or, on older kernels, the legacy sysfs interface (`/sys/class/gpio`)
//! - SPI through spidev
//! - I2C through i2c-dev (servo board)
//!
//! Which GPIO interface is used is negotiated once by [`gpio::probe`].

#![deny(unsafe_code)]

pub mod error;
pub mod gpio;
pub mod i2c;
pub mod spi;

pub use error::HalError;
pub use gpio::{probe, GpioBackendKind, LinuxLines, PinLines, ProbePaths};
pub use i2c::open_i2c;
pub use spi::SpidevBus;

/// Blocking delay provider (`embedded_hal::delay::DelayNs`)
pub use linux_embedded_hal::Delay;
