//! Mode definition
//!
//! Face and arm behavior is a function of the current mode.

use core::fmt;

use super::events::Event;
use crate::expression::Expression;

/// Robot modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Waiting for the user to say or type something
    #[default]
    Listening,
    /// Waiting on the language model
    Thinking,
    /// Speaking the reply
    Speaking,
    /// Short celebration after a completed turn
    Happy,
    /// A turn failed; apologizing before listening again
    Error,
    /// Tearing down; no further turns
    Shutdown,
}

impl Mode {
    /// Expression shown while in this mode
    pub fn expression(&self) -> Expression {
        match self {
            Mode::Listening => Expression::Listening,
            Mode::Thinking => Expression::Thinking,
            Mode::Speaking => Expression::Speaking,
            Mode::Happy => Expression::Happy,
            Mode::Error => Expression::Error,
            Mode::Shutdown => Expression::Neutral,
        }
    }

    /// Check if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Mode::Shutdown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Listening => "LISTENING",
            Mode::Thinking => "THINKING",
            Mode::Speaking => "SPEAKING",
            Mode::Happy => "HAPPY",
            Mode::Error => "ERROR",
            Mode::Shutdown => "SHUTDOWN",
        }
    }

    /// Process an event and return the next mode
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use Mode::*;

        match (self, event) {
            // Shutdown is absorbing
            (Shutdown, _) => Shutdown,
            (_, ExitRequested) => Shutdown,

            // Happy path
            (Listening, InputReceived) => Thinking,
            (Thinking, ResponseReceived) => Speaking,
            (Speaking, PlaybackComplete) => Happy,
            (Happy, CooldownElapsed) => Listening,

            // Failure anywhere inside a turn
            (Listening | Thinking | Speaking | Happy, TurnFailed) => Error,
            (Error, Recovered) => Listening,

            // Default: stay in current mode
            _ => self,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
