//! GPIO line backends and backend negotiation
//!
//! Two kernel interfaces can drive the panel's control lines:
//!
//! - the gpio character device (line requests on `/dev/gpiochipN`)
//! - the legacy numbered sysfs interface (`/sys/class/gpio/gpioN`)
//!
//! Both are wrapped in [`PinLines`], which maps the three logical
//! [`Signal`]s onto `embedded_hal` output pins. [`probe`] picks the first
//! interface that works and returns it as a [`LinuxLines`].

use std::path::{Path, PathBuf};

use ash_hal::{Level, LinePins, Signal, SignalLines};
use embedded_hal::digital::OutputPin;
use linux_embedded_hal::gpio_cdev::{Chip, LineRequestFlags};
use linux_embedded_hal::sysfs_gpio::Direction;
use linux_embedded_hal::{CdevPin, SysfsPin};
use tracing::{debug, info, warn};

use crate::error::HalError;

/// Default gpio character device on a Raspberry Pi
pub const DEFAULT_CHIP: &str = "/dev/gpiochip0";

/// sysfs export control file
pub const SYSFS_EXPORT: &str = "/sys/class/gpio/export";

/// An output pin whose kernel request can be given back
pub trait LinePin: OutputPin {
    /// Give the line back to the kernel
    fn release(self) -> Result<(), String>;
}

impl LinePin for CdevPin {
    fn release(self) -> Result<(), String> {
        // Dropping the handle closes the line request fd
        drop(self);
        Ok(())
    }
}

impl LinePin for SysfsPin {
    fn release(self) -> Result<(), String> {
        self.0
            .unexport()
            .map_err(|e| format!("unexport failed: {}", e))
    }
}

struct Lines<P> {
    data_command: P,
    reset: P,
    backlight: P,
}

impl<P> Lines<P> {
    fn get_mut(&mut self, signal: Signal) -> &mut P {
        match signal {
            Signal::DataCommand => &mut self.data_command,
            Signal::Reset => &mut self.reset,
            Signal::Backlight => &mut self.backlight,
        }
    }
}

/// Three named output lines backed by one kind of pin
pub struct PinLines<P> {
    pins: LinePins,
    lines: Option<Lines<P>>,
}

impl<P: LinePin> PinLines<P> {
    /// Wrap already-requested pins
    pub fn new(pins: LinePins, data_command: P, reset: P, backlight: P) -> Self {
        Self {
            pins,
            lines: Some(Lines {
                data_command,
                reset,
                backlight,
            }),
        }
    }

    /// Check if the lines have been released
    pub fn is_released(&self) -> bool {
        self.lines.is_none()
    }
}

impl<P: LinePin> SignalLines for PinLines<P> {
    type Error = HalError;

    fn set(&mut self, signal: Signal, level: Level) -> Result<(), HalError> {
        let line = self.pins.line(signal);
        let pin = self.lines.as_mut().ok_or(HalError::Released)?.get_mut(signal);

        let result = match level {
            Level::High => pin.set_high(),
            Level::Low => pin.set_low(),
        };
        result.map_err(|e| HalError::Line {
            signal,
            line,
            reason: format!("{:?}", e),
        })
    }

    fn release(&mut self) -> Result<(), HalError> {
        let Some(lines) = self.lines.take() else {
            return Ok(());
        };

        let pins = self.pins;
        let release = |signal: Signal, pin: P| {
            pin.release().map_err(|reason| HalError::Line {
                signal,
                line: pins.line(signal),
                reason,
            })
        };

        // Release all three even if one fails; report the first failure
        let results = [
            release(Signal::DataCommand, lines.data_command),
            release(Signal::Reset, lines.reset),
            release(Signal::Backlight, lines.backlight),
        ];
        debug!(pins = ?self.pins, "GPIO lines released");
        results.into_iter().collect()
    }
}

fn give_back<P: LinePin>(signal: Signal, pin: P) {
    if let Err(reason) = pin.release() {
        warn!(signal = signal.label(), "Could not give back line: {}", reason);
    }
}

/// Request data/command, reset and backlight in that order
///
/// If a later request fails, the lines already held are released before
/// the error is returned.
fn request_lines<P: LinePin>(
    pins: LinePins,
    mut request: impl FnMut(Signal) -> Result<P, HalError>,
) -> Result<PinLines<P>, HalError> {
    let data_command = request(Signal::DataCommand)?;
    let reset = match request(Signal::Reset) {
        Ok(pin) => pin,
        Err(e) => {
            give_back(Signal::DataCommand, data_command);
            return Err(e);
        }
    };
    let backlight = match request(Signal::Backlight) {
        Ok(pin) => pin,
        Err(e) => {
            give_back(Signal::DataCommand, data_command);
            give_back(Signal::Reset, reset);
            return Err(e);
        }
    };

    Ok(PinLines::new(pins, data_command, reset, backlight))
}

/// Request the three lines from a gpio character device
pub fn open_cdev(chip_path: &Path, pins: LinePins) -> Result<PinLines<CdevPin>, HalError> {
    let mut chip = Chip::new(chip_path).map_err(|e| HalError::Chip {
        path: chip_path.display().to_string(),
        reason: e.to_string(),
    })?;

    let request = |signal: Signal| -> Result<CdevPin, HalError> {
        let line = pins.line(signal);
        let line_err = |reason: String| HalError::Line {
            signal,
            line,
            reason,
        };
        let handle = chip
            .get_line(line)
            .and_then(|l| l.request(LineRequestFlags::OUTPUT, 0, signal.label()))
            .map_err(|e| line_err(e.to_string()))?;
        CdevPin::new(handle).map_err(|e| line_err(e.to_string()))
    };

    request_lines(pins, request)
}

/// Export the three lines through sysfs as outputs driven low
pub fn open_sysfs(pins: LinePins) -> Result<PinLines<SysfsPin>, HalError> {
    let export = |signal: Signal| -> Result<SysfsPin, HalError> {
        let line = pins.line(signal);
        let pin = SysfsPin::new(u64::from(line));
        pin.0
            .export()
            .and_then(|_| pin.0.set_direction(Direction::Low))
            .map_err(|e| HalError::Line {
                signal,
                line,
                reason: e.to_string(),
            })?;
        Ok(pin)
    };

    request_lines(pins, export)
}

/// Which kernel interface backs the lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioBackendKind {
    CharacterDevice,
    Sysfs,
}

impl GpioBackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GpioBackendKind::CharacterDevice => "gpio-cdev",
            GpioBackendKind::Sysfs => "sysfs",
        }
    }
}

/// Negotiated GPIO backend
pub enum LinuxLines {
    Cdev(PinLines<CdevPin>),
    Sysfs(PinLines<SysfsPin>),
}

impl LinuxLines {
    /// Backend in use
    pub fn kind(&self) -> GpioBackendKind {
        match self {
            LinuxLines::Cdev(_) => GpioBackendKind::CharacterDevice,
            LinuxLines::Sysfs(_) => GpioBackendKind::Sysfs,
        }
    }
}

impl SignalLines for LinuxLines {
    type Error = HalError;

    fn set(&mut self, signal: Signal, level: Level) -> Result<(), HalError> {
        match self {
            LinuxLines::Cdev(lines) => lines.set(signal, level),
            LinuxLines::Sysfs(lines) => lines.set(signal, level),
        }
    }

    fn release(&mut self) -> Result<(), HalError> {
        match self {
            LinuxLines::Cdev(lines) => lines.release(),
            LinuxLines::Sysfs(lines) => lines.release(),
        }
    }
}

/// Filesystem locations inspected by [`probe`]
#[derive(Debug, Clone)]
pub struct ProbePaths {
    pub chip: PathBuf,
    pub sysfs_export: PathBuf,
}

impl Default for ProbePaths {
    fn default() -> Self {
        Self {
            chip: PathBuf::from(DEFAULT_CHIP),
            sysfs_export: PathBuf::from(SYSFS_EXPORT),
        }
    }
}

/// Negotiate a GPIO backend
///
/// Prefers the character device; falls back to sysfs; fails with
/// [`HalError::NoGpioBackend`] when neither can provide all three lines.
pub fn probe(paths: &ProbePaths, pins: LinePins) -> Result<LinuxLines, HalError> {
    if paths.chip.exists() {
        match open_cdev(&paths.chip, pins) {
            Ok(lines) => {
                info!(chip = %paths.chip.display(), ?pins, "GPIO backend: character device");
                return Ok(LinuxLines::Cdev(lines));
            }
            Err(e) => warn!("gpio character device unusable: {}", e),
        }
    } else {
        debug!(chip = %paths.chip.display(), "No gpio character device");
    }

    if paths.sysfs_export.exists() {
        match open_sysfs(pins) {
            Ok(lines) => {
                info!(?pins, "GPIO backend: sysfs");
                return Ok(LinuxLines::Sysfs(lines));
            }
            Err(e) => warn!("sysfs GPIO unusable: {}", e),
        }
    } else {
        debug!(export = %paths.sysfs_export.display(), "No sysfs GPIO");
    }

    Err(HalError::NoGpioBackend)
}
