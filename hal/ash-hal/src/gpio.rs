//! GPIO signal abstractions
//!
//! The panel needs exactly three output lines. Backends bind each logical
//! [`Signal`] to a numbered line and expose them through [`SignalLines`], so
//! the driver never knows which kernel interface is toggling the pins.

/// Logical panel control signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Data/command select (low = command, high = data)
    DataCommand,
    /// Active-low controller reset
    Reset,
    /// Backlight enable
    Backlight,
}

impl Signal {
    /// All signals in request order
    pub const ALL: [Signal; 3] = [Signal::DataCommand, Signal::Reset, Signal::Backlight];

    /// Consumer label used when requesting the line from the kernel
    pub fn label(&self) -> &'static str {
        match self {
            Signal::DataCommand => "ash-dc",
            Signal::Reset => "ash-rst",
            Signal::Backlight => "ash-bl",
        }
    }
}

/// Output level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Line numbers (BCM numbering on a Raspberry Pi) for the three signals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinePins {
    pub data_command: u32,
    pub reset: u32,
    pub backlight: u32,
}

impl LinePins {
    /// Create a new pin assignment
    pub const fn new(data_command: u32, reset: u32, backlight: u32) -> Self {
        Self {
            data_command,
            reset,
            backlight,
        }
    }

    /// Line number bound to a signal
    pub fn line(&self, signal: Signal) -> u32 {
        match signal {
            Signal::DataCommand => self.data_command,
            Signal::Reset => self.reset,
            Signal::Backlight => self.backlight,
        }
    }
}

impl Default for LinePins {
    /// Wiring of the common 3.5" ILI9486 Raspberry Pi hats
    fn default() -> Self {
        Self::new(24, 25, 18)
    }
}

/// The three named panel control lines
///
/// Implementations own the underlying line requests exclusively until
/// [`SignalLines::release`] is called.
pub trait SignalLines {
    /// Error type for line operations
    type Error;

    /// Drive a signal to a level
    fn set(&mut self, signal: Signal, level: Level) -> Result<(), Self::Error>;

    /// Release every line request
    ///
    /// After release the lines must not be driven again.
    fn release(&mut self) -> Result<(), Self::Error>;

    /// Select command (`false`) or data (`true`) mode
    fn set_data_command(&mut self, data: bool) -> Result<(), Self::Error> {
        self.set(Signal::DataCommand, Level::from(data))
    }

    /// Drive the reset line (`false` holds the controller in reset)
    fn set_reset(&mut self, high: bool) -> Result<(), Self::Error> {
        self.set(Signal::Reset, Level::from(high))
    }

    /// Switch the backlight
    fn set_backlight(&mut self, on: bool) -> Result<(), Self::Error> {
        self.set(Signal::Backlight, Level::from(on))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_lookup() {
        let pins = LinePins::new(25, 27, 18);
        assert_eq!(pins.line(Signal::DataCommand), 25);
        assert_eq!(pins.line(Signal::Reset), 27);
        assert_eq!(pins.line(Signal::Backlight), 18);
    }

    #[test]
    fn test_level_from_bool() {
        assert_eq!(Level::from(true), Level::High);
        assert_eq!(Level::from(false), Level::Low);
    }

    #[test]
    fn test_labels_unique() {
        let labels = Signal::ALL.map(|s| s.label());
        assert_ne!(labels[0], labels[1]);
        assert_ne!(labels[1], labels[2]);
        assert_ne!(labels[0], labels[2]);
    }
}
