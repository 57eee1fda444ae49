//! Face output backends

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use ash_drivers::display::{ByteOrder, Frame, Ili9486};
use ash_hal::{SignalLines, SpiBus};
use embedded_hal::delay::DelayNs;
use image::Rgb;
use tracing::{info, warn};

use crate::FaceError;

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Somewhere a frame can be shown
pub trait FaceBackend {
    /// Short name for logs
    fn kind(&self) -> &'static str;

    /// Show a panel-sized frame
    fn show(&mut self, frame: &Frame) -> Result<(), FaceError>;

    /// Show black
    fn blank(&mut self) -> Result<(), FaceError>;

    /// Release the device. Later calls do nothing.
    fn release(&mut self);
}

/// ILI9486 panel over SPI
pub struct PanelScreen<SPI, L, D> {
    panel: Ili9486<SPI, L, D>,
}

impl<SPI, L, D> PanelScreen<SPI, L, D> {
    /// Wrap an initialized panel
    pub fn new(panel: Ili9486<SPI, L, D>) -> Self {
        Self { panel }
    }
}

impl<SPI, L, D> FaceBackend for PanelScreen<SPI, L, D>
where
    SPI: SpiBus,
    SPI::Error: core::fmt::Debug,
    L: SignalLines,
    L::Error: core::fmt::Debug,
    D: DelayNs,
{
    fn kind(&self) -> &'static str {
        "spi-panel"
    }

    fn show(&mut self, frame: &Frame) -> Result<(), FaceError> {
        Ok(self.panel.display_frame(frame)?)
    }

    fn blank(&mut self) -> Result<(), FaceError> {
        Ok(self.panel.clear(BLACK)?)
    }

    fn release(&mut self) {
        if let Err(e) = self.panel.close() {
            warn!("Panel close failed: {}", e);
        }
    }
}

/// Linux framebuffer device written as 16-bit RGB565
pub struct FramebufferScreen {
    path: PathBuf,
    width: u16,
    height: u16,
}

impl FramebufferScreen {
    pub fn new(path: &Path, width: u16, height: u16) -> Self {
        info!(path = %path.display(), "Using framebuffer");
        Self {
            path: path.to_path_buf(),
            width,
            height,
        }
    }

    fn write(&self, frame: &Frame) -> Result<(), FaceError> {
        let bytes = frame.to_rgb565(ByteOrder::LittleEndian);
        let fb_err = |source: std::io::Error| FaceError::Framebuffer {
            path: self.path.display().to_string(),
            source,
        };
        let mut fb = OpenOptions::new()
            .write(true)
            .open(&self.path)
            .map_err(fb_err)?;
        fb.write_all(&bytes).map_err(fb_err)
    }
}

impl FaceBackend for FramebufferScreen {
    fn kind(&self) -> &'static str {
        "framebuffer"
    }

    fn show(&mut self, frame: &Frame) -> Result<(), FaceError> {
        self.write(frame)
    }

    fn blank(&mut self) -> Result<(), FaceError> {
        self.write(&Frame::solid(self.width, self.height, BLACK))
    }

    fn release(&mut self) {}
}

/// No display attached; frames are only counted and logged
#[derive(Debug, Default)]
pub struct SimulatedScreen {
    shown: usize,
}

impl SimulatedScreen {
    pub fn new() -> Self {
        info!("No display found, face output is simulated");
        Self::default()
    }

    /// Frames shown so far
    pub fn shown(&self) -> usize {
        self.shown
    }
}

impl FaceBackend for SimulatedScreen {
    fn kind(&self) -> &'static str {
        "simulated"
    }

    fn show(&mut self, frame: &Frame) -> Result<(), FaceError> {
        self.shown += 1;
        info!(width = frame.width(), height = frame.height(), "[display] frame");
        Ok(())
    }

    fn blank(&mut self) -> Result<(), FaceError> {
        info!("[display] cleared");
        Ok(())
    }

    fn release(&mut self) {}
}
