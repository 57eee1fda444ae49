//! spidev-backed SPI bus

use ash_hal::{Mode, SpiBus, SpiConfig};
use embedded_hal::spi::SpiDevice;
use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
use linux_embedded_hal::SpidevDevice;
use tracing::info;

use crate::error::HalError;

/// An opened spidev node
pub struct SpidevBus {
    device: SpidevDevice,
    path: String,
}

impl SpidevBus {
    /// Open and configure `/dev/spidev<bus>.<device>`
    pub fn open(config: &SpiConfig) -> Result<Self, HalError> {
        let path = config.device_path().to_string();
        let spi_err = |reason: String| HalError::Spi {
            path: path.clone(),
            reason,
        };

        let mut device = SpidevDevice::open(&path).map_err(|e| spi_err(e.to_string()))?;

        let options = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(config.frequency)
            .mode(mode_flags(config.mode))
            .build();
        device
            .configure(&options)
            .map_err(|e| spi_err(e.to_string()))?;

        info!(
            path = %path,
            speed_mhz = config.frequency / 1_000_000,
            "SPI device opened"
        );

        Ok(Self { device, path })
    }
}

impl SpiBus for SpidevBus {
    type Error = HalError;

    fn write(&mut self, data: &[u8]) -> Result<(), HalError> {
        SpiDevice::write(&mut self.device, data).map_err(|e| HalError::Spi {
            path: self.path.clone(),
            reason: format!("{:?}", e),
        })
    }
}

fn mode_flags(mode: Mode) -> SpiModeFlags {
    match mode {
        Mode::Mode0 => SpiModeFlags::SPI_MODE_0,
        Mode::Mode1 => SpiModeFlags::SPI_MODE_1,
        Mode::Mode2 => SpiModeFlags::SPI_MODE_2,
        Mode::Mode3 => SpiModeFlags::SPI_MODE_3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_device() {
        let config = SpiConfig {
            bus: 250,
            device: 9,
            ..SpiConfig::default()
        };
        match SpidevBus::open(&config) {
            Err(HalError::Spi { path, .. }) => assert_eq!(path, "/dev/spidev250.9"),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("spidev250.9 should not exist"),
        }
    }
}
