//! Face display for Ash
//!
//! This crate provides:
//! - [`FaceCache`]: expression PNGs decoded and fitted to the panel once
//! - [`FaceBackend`] trait with three outputs: the ILI9486 over SPI, a
//!   Linux framebuffer device, and a simulated screen that only logs
//! - [`Face`]: the robot's `FaceDisplay` built from a cache and a backend
//!
//! # Backend selection
//!
//! Chosen once at startup by [`select::choose`]:
//!
//! 1. framebuffer device exists → framebuffer
//! 2. running on a Raspberry Pi (`/proc/device-tree/model`) → SPI panel
//! 3. otherwise → simulated

#![deny(unsafe_code)]

pub mod backend;
pub mod cache;
pub mod face;
pub mod panel;
pub mod select;

pub use backend::{FaceBackend, FramebufferScreen, PanelScreen, SimulatedScreen};
pub use cache::FaceCache;
pub use face::Face;
pub use select::{choose, open_backend, BackendChoice, SelectPaths};

use thiserror::Error;

/// Face output errors
#[derive(Debug, Error)]
pub enum FaceError {
    #[error("panel: {0}")]
    Panel(#[from] ash_drivers::display::DisplayError),
    #[error("framebuffer {path}: {source}")]
    Framebuffer {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
