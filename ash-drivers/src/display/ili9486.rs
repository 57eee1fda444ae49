//! ILI9486 TFT controller driver (4-wire SPI)
//!
//! The controller is driven with one data/command line: low selects the
//! command register, high streams parameters or pixel data. Pixels are
//! sent as big-endian RGB565 (pixel format 0x55).
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized → Resetting → SleepExit → PixelFormatSet
//!               → AddressModeSet → On → Closed
//! ```
//!
//! Frames can only be written in `On`. `Closed` is terminal: backlight off,
//! lines released, SPI handle dropped.

use core::fmt::Debug;

use ash_hal::{SignalLines, SpiBus};
use embedded_hal::delay::DelayNs;
use image::{DynamicImage, Rgb};
use tracing::{debug, info, warn};

use super::frame::{Frame, Window};
use super::rgb565::ByteOrder;
use super::DisplayError;

/// ILI9486 commands
pub mod cmd {
    /// Software reset
    pub const SWRESET: u8 = 0x01;
    /// Sleep out
    pub const SLPOUT: u8 = 0x11;
    /// Display on
    pub const DISPON: u8 = 0x29;
    /// Column address set
    pub const CASET: u8 = 0x2A;
    /// Row address set
    pub const RASET: u8 = 0x2B;
    /// Memory write
    pub const RAMWR: u8 = 0x2C;
    /// Memory access control
    pub const MADCTL: u8 = 0x36;
    /// Interface pixel format
    pub const PIXFMT: u8 = 0x3A;
}

/// 16 bits per pixel on both interfaces
pub const PIXEL_FORMAT_RGB565: u8 = 0x55;

/// Largest single SPI transfer
pub const MAX_TRANSFER: usize = 4096;

/// MADCTL value for a rotation; unknown rotations fall back to landscape
pub fn madctl_for(rotation: u8) -> u8 {
    match rotation {
        0 => 0x08,
        1 => 0x28,
        2 => 0xC8,
        3 => 0xE8,
        _ => 0x28,
    }
}

/// Driver lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Uninitialized,
    Resetting,
    SleepExit,
    PixelFormatSet,
    AddressModeSet,
    On,
    Closed,
}

/// Panel geometry and transfer limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelConfig {
    pub width: u16,
    pub height: u16,
    /// 0..=3, see [`madctl_for`]
    pub rotation: u8,
    /// Transfer ceiling in bytes
    pub max_transfer: usize,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            width: 480,
            height: 320,
            rotation: 1,
            max_transfer: MAX_TRANSFER,
        }
    }
}

/// ILI9486 driver
pub struct Ili9486<SPI, L, D> {
    spi: Option<SPI>,
    lines: L,
    delay: D,
    config: PanelConfig,
    state: PanelState,
}

fn reason<E: Debug>(e: E) -> String {
    format!("{:?}", e)
}

impl<SPI, L, D> Ili9486<SPI, L, D>
where
    SPI: SpiBus,
    SPI::Error: Debug,
    L: SignalLines,
    L::Error: Debug,
    D: DelayNs,
{
    /// Wrap an opened bus and lines; call [`initialize`](Self::initialize) next
    pub fn new(spi: SPI, lines: L, delay: D, config: PanelConfig) -> Self {
        Self {
            spi: Some(spi),
            lines,
            delay,
            config,
            state: PanelState::Uninitialized,
        }
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Reset the controller and bring it to `On`
    pub fn initialize(&mut self) -> Result<(), DisplayError> {
        if self.state == PanelState::Closed {
            return Err(DisplayError::NotReady(self.state));
        }
        self.power_on().map_err(|e| match e {
            DisplayError::Write(msg) => DisplayError::Initialization(msg),
            other => other,
        })?;
        info!(
            width = self.config.width,
            height = self.config.height,
            rotation = self.config.rotation,
            "ILI9486 initialized"
        );
        Ok(())
    }

    fn power_on(&mut self) -> Result<(), DisplayError> {
        self.state = PanelState::Resetting;
        self.reset_pin(true)?;
        self.delay.delay_ms(10);
        self.reset_pin(false)?;
        self.delay.delay_ms(10);
        self.reset_pin(true)?;
        self.delay.delay_ms(120);

        self.command(cmd::SWRESET, &[])?;
        self.delay.delay_ms(120);

        self.state = PanelState::SleepExit;
        self.command(cmd::SLPOUT, &[])?;
        self.delay.delay_ms(120);

        self.command(cmd::PIXFMT, &[PIXEL_FORMAT_RGB565])?;
        self.state = PanelState::PixelFormatSet;

        self.command(cmd::MADCTL, &[madctl_for(self.config.rotation)])?;
        self.state = PanelState::AddressModeSet;

        self.command(cmd::DISPON, &[])?;
        self.delay.delay_ms(20);

        self.lines
            .set_backlight(true)
            .map_err(|e| DisplayError::Write(reason(e)))?;
        self.state = PanelState::On;
        Ok(())
    }

    /// Select the address window and open a memory write
    pub fn set_window(&mut self, window: Window) -> Result<(), DisplayError> {
        self.ensure_on()?;
        self.command(cmd::CASET, &window.column_bytes())?;
        self.command(cmd::RASET, &window.row_bytes())?;
        self.command(cmd::RAMWR, &[])
    }

    /// Stream pixel bytes into the open window in bounded bursts
    pub fn write_pixels(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        self.ensure_on()?;
        self.data_mode()?;
        let ceiling = self.config.max_transfer.max(1);
        let spi = self.bus()?;
        for chunk in data.chunks(ceiling) {
            spi.write(chunk).map_err(|e| DisplayError::Write(reason(e)))?;
        }
        Ok(())
    }

    /// Show an image, resizing it to the panel if needed
    ///
    /// Returns whether the image had to be resampled.
    pub fn display_image(&mut self, image: &DynamicImage) -> Result<bool, DisplayError> {
        self.ensure_on()?;
        let (frame, resized) = Frame::fit(image, self.config.width, self.config.height);
        if resized {
            debug!(
                from_width = image.width(),
                from_height = image.height(),
                "Resized image to panel"
            );
        }
        self.display_frame(&frame)?;
        Ok(resized)
    }

    /// Write a panel-sized frame
    pub fn display_frame(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        self.ensure_on()?;
        let (width, height) = (self.config.width, self.config.height);
        if (frame.width(), frame.height()) != (width, height) {
            return Err(DisplayError::InvalidWindow {
                x0: 0,
                y0: 0,
                x1: frame.width().saturating_sub(1),
                y1: frame.height().saturating_sub(1),
                width,
                height,
            });
        }
        self.set_window(Window::full(width, height)?)?;
        self.write_pixels(&frame.to_rgb565(ByteOrder::BigEndian))
    }

    /// Fill the panel with one color
    pub fn clear(&mut self, color: Rgb<u8>) -> Result<(), DisplayError> {
        let frame = Frame::solid(self.config.width, self.config.height, color);
        self.display_frame(&frame)
    }

    /// Backlight off, release lines and bus. Later calls do nothing.
    pub fn close(&mut self) -> Result<(), DisplayError> {
        if self.state == PanelState::Closed {
            return Ok(());
        }
        self.state = PanelState::Closed;

        let backlight = self.lines.set_backlight(false).map_err(reason);
        let release = self.lines.release().map_err(reason);
        self.spi = None;

        if let Err(e) = &backlight {
            warn!("Backlight off failed: {}", e);
        }
        debug!("ILI9486 closed");
        backlight.and(release).map_err(DisplayError::Write)
    }

    fn ensure_on(&self) -> Result<(), DisplayError> {
        match self.state {
            PanelState::On => Ok(()),
            other => Err(DisplayError::NotReady(other)),
        }
    }

    fn bus(&mut self) -> Result<&mut SPI, DisplayError> {
        self.spi
            .as_mut()
            .ok_or(DisplayError::NotReady(PanelState::Closed))
    }

    fn reset_pin(&mut self, high: bool) -> Result<(), DisplayError> {
        self.lines
            .set_reset(high)
            .map_err(|e| DisplayError::Write(reason(e)))
    }

    fn data_mode(&mut self) -> Result<(), DisplayError> {
        self.lines
            .set_data_command(true)
            .map_err(|e| DisplayError::Write(reason(e)))
    }

    /// Command byte, then its parameters (if any)
    fn command(&mut self, command: u8, params: &[u8]) -> Result<(), DisplayError> {
        self.lines
            .set_data_command(false)
            .map_err(|e| DisplayError::Write(reason(e)))?;
        self.bus()?
            .write(&[command])
            .map_err(|e| DisplayError::Write(reason(e)))?;
        if params.is_empty() {
            return Ok(());
        }
        self.data_mode()?;
        self.bus()?
            .write(params)
            .map_err(|e| DisplayError::Write(reason(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ash_hal::{Level, Signal};
    use proptest::prelude::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Ev {
        Line(Signal, bool),
        Spi(Vec<u8>),
        Delay(u32),
        Released,
    }

    type Log = Rc<RefCell<Vec<Ev>>>;

    struct FakeSpi {
        log: Log,
        fail: Rc<Cell<bool>>,
    }

    impl SpiBus for FakeSpi {
        type Error = &'static str;

        fn write(&mut self, data: &[u8]) -> Result<(), &'static str> {
            if self.fail.get() {
                return Err("bus fault");
            }
            self.log.borrow_mut().push(Ev::Spi(data.to_vec()));
            Ok(())
        }
    }

    struct FakeLines {
        log: Log,
    }

    impl SignalLines for FakeLines {
        type Error = ();

        fn set(&mut self, signal: Signal, level: Level) -> Result<(), ()> {
            self.log
                .borrow_mut()
                .push(Ev::Line(signal, level == Level::High));
            Ok(())
        }

        fn release(&mut self) -> Result<(), ()> {
            self.log.borrow_mut().push(Ev::Released);
            Ok(())
        }
    }

    struct FakeDelay {
        log: Log,
    }

    impl DelayNs for FakeDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.log.borrow_mut().push(Ev::Delay(ns / 1_000_000));
        }

        fn delay_ms(&mut self, ms: u32) {
            self.log.borrow_mut().push(Ev::Delay(ms));
        }
    }

    type Panel = Ili9486<FakeSpi, FakeLines, FakeDelay>;

    fn panel(config: PanelConfig) -> (Panel, Log, Rc<Cell<bool>>) {
        let log: Log = Rc::default();
        let fail = Rc::new(Cell::new(false));
        let panel = Ili9486::new(
            FakeSpi {
                log: Rc::clone(&log),
                fail: Rc::clone(&fail),
            },
            FakeLines {
                log: Rc::clone(&log),
            },
            FakeDelay {
                log: Rc::clone(&log),
            },
            config,
        );
        (panel, log, fail)
    }

    fn small() -> PanelConfig {
        PanelConfig {
            width: 4,
            height: 2,
            rotation: 1,
            max_transfer: 6,
        }
    }

    fn spi_writes(log: &Log) -> Vec<Vec<u8>> {
        log.borrow()
            .iter()
            .filter_map(|e| match e {
                Ev::Spi(bytes) => Some(bytes.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_madctl_table() {
        assert_eq!(madctl_for(0), 0x08);
        assert_eq!(madctl_for(1), 0x28);
        assert_eq!(madctl_for(2), 0xC8);
        assert_eq!(madctl_for(3), 0xE8);
        assert_eq!(madctl_for(4), 0x28);
        assert_eq!(madctl_for(255), 0x28);
    }

    #[test]
    fn test_initialize_sequence() {
        let (mut panel, log, _) = panel(PanelConfig {
            rotation: 3,
            ..PanelConfig::default()
        });
        panel.initialize().unwrap();
        assert_eq!(panel.state(), PanelState::On);

        let expected = vec![
            Ev::Line(Signal::Reset, true),
            Ev::Delay(10),
            Ev::Line(Signal::Reset, false),
            Ev::Delay(10),
            Ev::Line(Signal::Reset, true),
            Ev::Delay(120),
            Ev::Line(Signal::DataCommand, false),
            Ev::Spi(vec![cmd::SWRESET]),
            Ev::Delay(120),
            Ev::Line(Signal::DataCommand, false),
            Ev::Spi(vec![cmd::SLPOUT]),
            Ev::Delay(120),
            Ev::Line(Signal::DataCommand, false),
            Ev::Spi(vec![cmd::PIXFMT]),
            Ev::Line(Signal::DataCommand, true),
            Ev::Spi(vec![0x55]),
            Ev::Line(Signal::DataCommand, false),
            Ev::Spi(vec![cmd::MADCTL]),
            Ev::Line(Signal::DataCommand, true),
            Ev::Spi(vec![0xE8]),
            Ev::Line(Signal::DataCommand, false),
            Ev::Spi(vec![cmd::DISPON]),
            Ev::Delay(20),
            Ev::Line(Signal::Backlight, true),
        ];
        assert_eq!(*log.borrow(), expected);
    }

    #[test]
    fn test_initialize_failure() {
        let (mut panel, _, fail) = panel(PanelConfig::default());
        fail.set(true);
        assert!(matches!(
            panel.initialize(),
            Err(DisplayError::Initialization(_))
        ));
        assert_ne!(panel.state(), PanelState::On);
    }

    #[test]
    fn test_display_requires_on() {
        let (mut panel, _, _) = panel(small());
        assert_eq!(
            panel.clear(Rgb([0, 0, 0])),
            Err(DisplayError::NotReady(PanelState::Uninitialized))
        );
    }

    #[test]
    fn test_frame_window_and_chunks() {
        let (mut panel, log, _) = panel(small());
        panel.initialize().unwrap();
        log.borrow_mut().clear();

        panel.clear(Rgb([255, 0, 0])).unwrap();
        let writes = spi_writes(&log);
        assert_eq!(writes[0], vec![cmd::CASET]);
        assert_eq!(writes[1], vec![0, 0, 0, 3]);
        assert_eq!(writes[2], vec![cmd::RASET]);
        assert_eq!(writes[3], vec![0, 0, 0, 1]);
        assert_eq!(writes[4], vec![cmd::RAMWR]);

        // 8 pixels = 16 bytes in bursts of at most 6
        let bursts = &writes[5..];
        assert_eq!(bursts.iter().map(Vec::len).collect::<Vec<_>>(), vec![6, 6, 4]);
        assert!(bursts.concat().chunks(2).all(|w| w == [0xF8, 0x00]));
    }

    #[test]
    fn test_mismatched_image_is_resized() {
        let (mut panel, _, _) = panel(small());
        panel.initialize().unwrap();

        let big = DynamicImage::ImageRgb8(image::RgbImage::new(8, 8));
        assert_eq!(panel.display_image(&big), Ok(true));

        let exact = DynamicImage::ImageRgb8(image::RgbImage::new(4, 2));
        assert_eq!(panel.display_image(&exact), Ok(false));
    }

    #[test]
    fn test_wrong_size_frame_rejected() {
        let (mut panel, _, _) = panel(small());
        panel.initialize().unwrap();
        let frame = Frame::solid(5, 2, Rgb([0, 0, 0]));
        assert!(matches!(
            panel.display_frame(&frame),
            Err(DisplayError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn test_write_failure_then_recovery() {
        let (mut panel, _, fail) = panel(small());
        panel.initialize().unwrap();

        fail.set(true);
        assert!(matches!(
            panel.clear(Rgb([0, 0, 0])),
            Err(DisplayError::Write(_))
        ));
        assert_eq!(panel.state(), PanelState::On);

        fail.set(false);
        assert!(panel.clear(Rgb([0, 0, 0])).is_ok());
    }

    #[test]
    fn test_close_is_idempotent() {
        let (mut panel, log, _) = panel(small());
        panel.initialize().unwrap();
        log.borrow_mut().clear();

        panel.close().unwrap();
        assert_eq!(
            *log.borrow(),
            vec![Ev::Line(Signal::Backlight, false), Ev::Released]
        );

        panel.close().unwrap();
        assert_eq!(log.borrow().len(), 2);
        assert_eq!(panel.state(), PanelState::Closed);
        assert_eq!(
            panel.clear(Rgb([0, 0, 0])),
            Err(DisplayError::NotReady(PanelState::Closed))
        );
        assert_eq!(
            panel.initialize(),
            Err(DisplayError::NotReady(PanelState::Closed))
        );
    }

    proptest! {
        #[test]
        fn prop_chunking(len in 0usize..2000, ceiling in 1usize..300) {
            let (mut panel, log, _) = panel(PanelConfig { max_transfer: ceiling, ..small() });
            panel.initialize().unwrap();
            log.borrow_mut().clear();

            let data: Vec<u8> = (0..len).map(|i| i as u8).collect();
            panel.write_pixels(&data).unwrap();

            let bursts = spi_writes(&log);
            prop_assert_eq!(bursts.len(), len.div_ceil(ceiling));
            prop_assert!(bursts.iter().all(|b| b.len() <= ceiling && !b.is_empty()));
            prop_assert_eq!(bursts.concat(), data);
        }
    }
}
