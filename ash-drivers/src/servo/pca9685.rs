//! PCA9685 16-channel, 12-bit PWM controller
//!
//! Each channel has ON/OFF tick registers (4 bytes, little-endian pairs)
//! starting at `LED0_ON_L + 4 * channel`. The output period is set by the
//! prescaler from the 25 MHz internal oscillator.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use tracing::debug;

use super::ServoError;

/// PCA9685 registers
pub mod reg {
    /// Mode register 1
    pub const MODE1: u8 = 0x00;
    /// First channel ON low byte
    pub const LED0_ON_L: u8 = 0x06;
    /// Prescaler for PWM output frequency
    pub const PRESCALE: u8 = 0xFE;
}

/// MODE1 bits
pub mod mode1 {
    pub const RESTART: u8 = 0x80;
    pub const AUTO_INCREMENT: u8 = 0x20;
    pub const SLEEP: u8 = 0x10;
}

/// Default I2C address
pub const DEFAULT_ADDRESS: u8 = 0x40;

/// Number of PWM channels
pub const CHANNELS: u8 = 16;

const OSCILLATOR_HZ: u32 = 25_000_000;
const TICKS: u32 = 4096;

/// Prescaler value for an output frequency
pub fn prescale_for(frequency_hz: u16) -> u8 {
    let freq = u32::from(frequency_hz.max(1));
    // round(osc / (4096 * f)) - 1
    let divisor = TICKS * freq;
    let value = (OSCILLATOR_HZ + divisor / 2) / divisor;
    value.saturating_sub(1).clamp(3, 255) as u8
}

/// OFF tick count for a pulse width at a given frequency
pub fn pulse_to_ticks(pulse_us: u16, frequency_hz: u16) -> u16 {
    let ticks = u64::from(pulse_us) * u64::from(TICKS) * u64::from(frequency_hz) / 1_000_000;
    ticks.min(u64::from(TICKS - 1)) as u16
}

/// PCA9685 driver
pub struct Pca9685<I2C> {
    i2c: I2C,
    address: u8,
    frequency: u16,
}

impl<I2C: I2c> Pca9685<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            frequency: 50,
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Program the output frequency and wake the oscillator
    pub fn init(&mut self, frequency_hz: u16, delay: &mut impl DelayNs) -> Result<(), ServoError> {
        let prescale = prescale_for(frequency_hz);
        // Prescaler is only writable while asleep
        self.write(&[reg::MODE1, mode1::SLEEP])?;
        self.write(&[reg::PRESCALE, prescale])?;
        self.write(&[reg::MODE1, mode1::AUTO_INCREMENT])?;
        delay.delay_us(500);
        self.write(&[reg::MODE1, mode1::AUTO_INCREMENT | mode1::RESTART])?;
        self.frequency = frequency_hz;
        debug!(
            address = self.address,
            frequency_hz,
            prescale,
            "PCA9685 initialized"
        );
        Ok(())
    }

    /// Drive a channel with a pulse width in microseconds
    pub fn set_pulse(&mut self, channel: u8, pulse_us: u16) -> Result<(), ServoError> {
        let ticks = pulse_to_ticks(pulse_us, self.frequency);
        let [off_l, off_h] = ticks.to_le_bytes();
        let register = Self::channel_register(channel)?;
        self.write(&[register, 0, 0, off_l, off_h])
    }

    /// Put the oscillator to sleep; all outputs stop
    pub fn sleep(&mut self) -> Result<(), ServoError> {
        self.write(&[reg::MODE1, mode1::SLEEP])
    }

    fn channel_register(channel: u8) -> Result<u8, ServoError> {
        if channel >= CHANNELS {
            return Err(ServoError::Channel(channel));
        }
        Ok(reg::LED0_ON_L + 4 * channel)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), ServoError> {
        self.i2c
            .write(self.address, bytes)
            .map_err(|e| ServoError::Bus(format!("{:?}", e)))
    }
}
