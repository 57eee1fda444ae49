//! Hardware configuration types
//!
//! Panel wiring and servo board settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Panel resolution in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resolution {
    pub width: u16,
    pub height: u16,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 480,
            height: 320,
        }
    }
}

/// SPI panel wiring
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelSpiConfig {
    /// SPI bus number
    pub bus: u8,
    /// Chip select on that bus
    pub device: u8,
    /// Clock in Hz
    pub speed_hz: u32,
    /// Panel rotation, 0..=3
    pub rotation: u8,
    /// Data/command line (BCM numbering)
    pub dc_pin: u32,
    /// Reset line
    pub rst_pin: u32,
    /// Backlight line
    pub bl_pin: u32,
    /// gpio character device used for the lines
    pub gpio_chip: PathBuf,
}

impl Default for PanelSpiConfig {
    fn default() -> Self {
        Self {
            bus: 0,
            device: 0,
            speed_hz: 32_000_000,
            rotation: 1,
            dc_pin: 24,
            rst_pin: 25,
            bl_pin: 18,
            gpio_chip: PathBuf::from("/dev/gpiochip0"),
        }
    }
}

/// Face display configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub resolution: Resolution,
    /// Linux framebuffer device, preferred when present
    pub framebuffer_path: PathBuf,
    /// Directory holding `<expression>.png` assets
    pub faces_directory: PathBuf,
    pub spi: PanelSpiConfig,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            resolution: Resolution::default(),
            framebuffer_path: PathBuf::from("/dev/fb1"),
            faces_directory: PathBuf::from("faces"),
            spi: PanelSpiConfig::default(),
        }
    }
}

/// PWM channels of the two arms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmChannels {
    pub left_arm: u8,
    pub right_arm: u8,
}

impl Default for ArmChannels {
    fn default() -> Self {
        Self {
            left_arm: 0,
            right_arm: 1,
        }
    }
}

/// Servo pulse widths in microseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseRange {
    pub min: u16,
    pub max: u16,
    pub center: u16,
}

impl Default for PulseRange {
    fn default() -> Self {
        Self {
            min: 500,
            max: 2500,
            center: 1500,
        }
    }
}

/// Named arm angles in degrees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnglePresets {
    pub neutral: u8,
    pub arms_up: u8,
    pub arms_down: u8,
    pub wave_start: u8,
    pub wave_end: u8,
    pub point_up: u8,
}

impl Default for AnglePresets {
    fn default() -> Self {
        Self {
            neutral: 90,
            arms_up: 45,
            arms_down: 135,
            wave_start: 45,
            wave_end: 135,
            point_up: 45,
        }
    }
}

/// Servo board configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServoConfig {
    /// I2C bus number
    pub i2c_bus: u8,
    /// PCA9685 address
    pub i2c_address: u8,
    /// PWM frequency in Hz
    pub pwm_frequency: u16,
    pub channels: ArmChannels,
    pub pulse_range: PulseRange,
    pub angles: AnglePresets,
    /// Seconds per smooth move
    pub transition_speed: f32,
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            i2c_bus: 1,
            i2c_address: 0x40,
            pwm_frequency: 50,
            channels: ArmChannels::default(),
            pulse_range: PulseRange::default(),
            angles: AnglePresets::default(),
            transition_speed: 0.5,
        }
    }
}
