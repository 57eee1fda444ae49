//! Ash Hardware Abstraction Layer
//!
//! This crate defines hardware abstraction traits that are implemented by
//! host-specific HALs. The panel driver and the robot logic only ever see
//! these traits, never the GPIO or SPI backend that sits behind them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (ash-robot, ash-face)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  ash-hal (this crate - traits)          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  ash-hal-linux                          │
//! │   gpio-cdev lines │ sysfs lines │ spidev│
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::SignalLines`] - The three named panel control signals
//! - [`spi::SpiBus`] - Write-only SPI transfers
//! - [`backend::Backend`] - Hardware vs. simulated capability

#![no_std]
#![deny(unsafe_code)]

pub mod backend;
pub mod gpio;
pub mod spi;

// Re-export key traits at crate root for convenience
pub use backend::Backend;
pub use gpio::{Level, LinePins, Signal, SignalLines};
pub use spi::{Mode, SpiBus, SpiConfig};
