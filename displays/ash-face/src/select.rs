//! Face backend selection

use std::path::{Path, PathBuf};

use ash_core::config::DisplayConfig;
use tracing::{error, info};

use crate::backend::{FaceBackend, FramebufferScreen, PanelScreen, SimulatedScreen};
use crate::panel::open_panel;

/// Present on Raspberry Pi kernels
pub const DEVICE_TREE_MODEL: &str = "/proc/device-tree/model";

/// Which output to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendChoice {
    Framebuffer,
    SpiPanel,
    Simulated,
}

/// Paths inspected by [`choose`]
#[derive(Debug, Clone)]
pub struct SelectPaths {
    pub framebuffer: PathBuf,
    pub device_tree_model: PathBuf,
}

impl SelectPaths {
    pub fn from_config(display: &DisplayConfig) -> Self {
        Self {
            framebuffer: display.framebuffer_path.clone(),
            device_tree_model: PathBuf::from(DEVICE_TREE_MODEL),
        }
    }
}

/// Pick an output from what exists on this host
pub fn choose(paths: &SelectPaths) -> BackendChoice {
    if paths.framebuffer.exists() {
        BackendChoice::Framebuffer
    } else if paths.device_tree_model.exists() {
        BackendChoice::SpiPanel
    } else {
        BackendChoice::Simulated
    }
}

/// Open the chosen backend
///
/// A panel that fails to initialize is reported and replaced by the
/// simulated screen so the robot keeps running headless.
pub fn open_backend(display: &DisplayConfig, choice: BackendChoice) -> Box<dyn FaceBackend> {
    let (width, height) = (display.resolution.width, display.resolution.height);
    match choice {
        BackendChoice::Framebuffer => Box::new(FramebufferScreen::new(
            Path::new(&display.framebuffer_path),
            width,
            height,
        )),
        BackendChoice::SpiPanel => match open_panel(display) {
            Ok(panel) => {
                let spi = &display.spi;
                info!(
                    bus = spi.bus,
                    device = spi.device,
                    speed_mhz = spi.speed_hz / 1_000_000,
                    rotation = spi.rotation,
                    "Using ILI9486 over SPI"
                );
                Box::new(PanelScreen::new(panel))
            }
            Err(e) => {
                error!("SPI panel unavailable: {}", e);
                Box::new(SimulatedScreen::new())
            }
        },
        BackendChoice::Simulated => Box::new(SimulatedScreen::new()),
    }
}
