//! LCD panel support
//!
//! - [`rgb565`]: RGB888 to 16-bit pixel packing
//! - [`frame`]: full-panel RGB frames and address windows
//! - [`ili9486`]: the controller driver

pub mod frame;
pub mod ili9486;
pub mod rgb565;

pub use frame::{Frame, Window};
pub use ili9486::{madctl_for, Ili9486, PanelConfig, PanelState};
pub use rgb565::ByteOrder;

use thiserror::Error;

/// Panel errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisplayError {
    /// Bring-up failed; the panel is unusable
    #[error("display initialization failed: {0}")]
    Initialization(String),
    /// A transfer failed mid-frame; the next full frame recovers
    #[error("display write failed: {0}")]
    Write(String),
    /// Operation needs the panel to be on
    #[error("display not ready (state {0:?})")]
    NotReady(PanelState),
    /// Window outside the panel or inverted
    #[error("invalid window ({x0},{y0})-({x1},{y1}) for {width}x{height} panel")]
    InvalidWindow {
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        width: u16,
        height: u16,
    },
}
