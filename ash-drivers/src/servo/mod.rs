//! Servo arm support
//!
//! - [`pca9685`]: 16-channel PWM board over I2C
//! - [`arm`]: two-arm gesture controller with smooth interpolation

pub mod arm;
pub mod pca9685;

pub use arm::{Arm, ArmController};
pub use pca9685::Pca9685;

use ash_core::GestureError;
use thiserror::Error;

/// Servo board errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServoError {
    #[error("I2C transfer failed: {0}")]
    Bus(String),
    #[error("PWM channel {0} out of range")]
    Channel(u8),
}

impl From<ServoError> for GestureError {
    fn from(e: ServoError) -> Self {
        match e {
            ServoError::Bus(reason) => GestureError::Bus(reason),
            ServoError::Channel(channel) => GestureError::Channel(channel),
        }
    }
}
