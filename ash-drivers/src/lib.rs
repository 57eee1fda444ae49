//! Hardware driver implementations
//!
//! This crate provides concrete drivers for the robot's peripherals:
//!
//! - ILI9486 SPI panel (RGB565 codec, frames, windowed writes)
//! - PCA9685 PWM board and the two-arm servo controller
//!
//! Drivers are generic over the `ash-hal` bus traits and `embedded-hal`
//! so they can be exercised with recording fakes.

#![deny(unsafe_code)]

pub mod display;
pub mod servo;
