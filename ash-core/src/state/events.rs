//! Events that trigger mode transitions

/// Events that can trigger mode transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A non-empty utterance that is not a command was captured
    InputReceived,
    /// The language model produced a reply
    ResponseReceived,
    /// Speech output finished (or was skipped)
    PlaybackComplete,
    /// Post-turn cooldown elapsed
    CooldownElapsed,
    /// Something inside the turn failed
    TurnFailed,
    /// Error presentation finished
    Recovered,
    /// Quit command, interrupt, or end of console input
    ExitRequested,
}
