//! Opening the ILI9486 on a Linux host

use ash_core::config::DisplayConfig;
use ash_drivers::display::ili9486::MAX_TRANSFER;
use ash_drivers::display::{DisplayError, Ili9486, PanelConfig};
use ash_hal::{LinePins, Mode, SignalLines, SpiBus, SpiConfig};
use ash_hal_linux::{probe, Delay, LinuxLines, ProbePaths, SpidevBus};
use embedded_hal::delay::DelayNs;
use std::fmt::Debug;
use tracing::{info, warn};

/// Panel on spidev with negotiated GPIO lines
pub type LinuxPanel = Ili9486<SpidevBus, LinuxLines, Delay>;

/// Negotiate GPIO, open spidev, and run the power-on sequence
///
/// Any failure is an [`DisplayError::Initialization`].
pub fn open_panel(display: &DisplayConfig) -> Result<LinuxPanel, DisplayError> {
    let spi = &display.spi;
    let pins = LinePins::new(spi.dc_pin, spi.rst_pin, spi.bl_pin);
    let paths = ProbePaths {
        chip: spi.gpio_chip.clone(),
        ..ProbePaths::default()
    };

    let mut lines =
        probe(&paths, pins).map_err(|e| DisplayError::Initialization(e.to_string()))?;
    info!(backend = lines.kind().as_str(), "GPIO lines acquired");

    let spi_config = SpiConfig {
        bus: spi.bus,
        device: spi.device,
        frequency: spi.speed_hz,
        mode: Mode::Mode0,
    };
    let bus = match SpidevBus::open(&spi_config) {
        Ok(bus) => bus,
        Err(e) => {
            if let Err(release) = lines.release() {
                warn!("GPIO release after SPI failure: {}", release);
            }
            return Err(DisplayError::Initialization(e.to_string()));
        }
    };

    let config = PanelConfig {
        width: display.resolution.width,
        height: display.resolution.height,
        rotation: spi.rotation,
        max_transfer: MAX_TRANSFER,
    };
    let mut panel = Ili9486::new(bus, lines, Delay, config);
    bring_up(&mut panel)?;
    Ok(panel)
}

/// Power the panel on, closing it again if the sequence fails
fn bring_up<SPI, L, D>(panel: &mut Ili9486<SPI, L, D>) -> Result<(), DisplayError>
where
    SPI: SpiBus,
    SPI::Error: Debug,
    L: SignalLines,
    L::Error: Debug,
    D: DelayNs,
{
    if let Err(e) = panel.initialize() {
        if let Err(close) = panel.close() {
            warn!("Panel release after failed bring-up: {}", close);
        }
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ash_drivers::display::PanelState;
    use ash_hal::{Level, Signal};
    use std::cell::Cell;
    use std::rc::Rc;

    struct DeadBus;

    impl SpiBus for DeadBus {
        type Error = &'static str;

        fn write(&mut self, _data: &[u8]) -> Result<(), &'static str> {
            Err("no ack")
        }
    }

    struct StuckLines {
        released: Rc<Cell<bool>>,
    }

    impl SignalLines for StuckLines {
        type Error = &'static str;

        fn set(&mut self, _signal: Signal, _level: Level) -> Result<(), &'static str> {
            Ok(())
        }

        fn release(&mut self) -> Result<(), &'static str> {
            self.released.set(true);
            Err("line busy")
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    #[test]
    fn test_failed_bring_up_closes_panel() {
        let released = Rc::new(Cell::new(false));
        let lines = StuckLines {
            released: Rc::clone(&released),
        };
        let mut panel = Ili9486::new(DeadBus, lines, NoDelay, PanelConfig::default());

        let result = bring_up(&mut panel);
        assert!(matches!(result, Err(DisplayError::Initialization(_))));
        assert_eq!(panel.state(), PanelState::Closed);
        assert!(released.get());
    }
}
