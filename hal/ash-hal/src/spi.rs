//! SPI bus abstractions
//!
//! The panel is write-only: the controller's MISO line is not wired on the
//! common Raspberry Pi hats, so only outgoing transfers are modelled.

/// SPI bus master
pub trait SpiBus {
    /// Error type for SPI operations
    type Error;

    /// Write data without reading
    ///
    /// A single call is one bus transfer; callers are responsible for keeping
    /// `data` under the kernel's transfer ceiling.
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;
}

/// SPI configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiConfig {
    /// Bus number (`/dev/spidev<bus>.<device>`)
    pub bus: u8,
    /// Chip-select / device number
    pub device: u8,
    /// Clock frequency in Hz
    pub frequency: u32,
    /// Clock polarity/phase
    pub mode: Mode,
}

impl SpiConfig {
    /// Device node path for this bus/device pair
    pub fn device_path(&self) -> DevicePath {
        DevicePath {
            bus: self.bus,
            device: self.device,
        }
    }
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            bus: 0,
            device: 0,
            frequency: 32_000_000, // 32 MHz
            mode: Mode::Mode0,
        }
    }
}

/// Displayable spidev node path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DevicePath {
    bus: u8,
    device: u8,
}

impl core::fmt::Display for DevicePath {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "/dev/spidev{}.{}", self.bus, self.device)
    }
}

/// SPI mode (combined polarity and phase)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Mode 0: CPOL=0, CPHA=0
    Mode0,
    /// Mode 1: CPOL=0, CPHA=1
    Mode1,
    /// Mode 2: CPOL=1, CPHA=0
    Mode2,
    /// Mode 3: CPOL=1, CPHA=1
    Mode3,
}
