//! Audio and console input traits

use crate::error::{RecognitionError, SynthesisError};

/// Microphone and speaker
pub trait VoiceIo {
    /// Check if spoken input is possible
    fn microphone_available(&self) -> bool;

    /// Record one utterance and transcribe it
    fn listen(&mut self) -> Result<String, RecognitionError>;

    /// Speak text, blocking until playback finishes
    fn speak(&mut self, text: &str) -> Result<(), SynthesisError>;

    /// Release audio devices. Safe to call more than once.
    fn close(&mut self);
}

/// Typed input
pub trait ConsoleInput {
    /// Prompt and read one line
    ///
    /// Returns `None` at end of input.
    fn read_line(&mut self, prompt: &str) -> Option<String>;
}
