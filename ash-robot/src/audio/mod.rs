//! Microphone and speaker
//!
//! Capture goes through cpal; speech shells out to `espeak-ng`.

pub mod recognizer;
pub mod synthesizer;

use ash_core::config::AudioConfig;
use ash_core::traits::VoiceIo;
use ash_core::{RecognitionError, SynthesisError};
use tracing::{info, warn};

pub use recognizer::Recognizer;
pub use synthesizer::Synthesizer;

/// Spoken input and output
pub struct Audio {
    recognizer: Option<Recognizer>,
    synthesizer: Synthesizer,
    closed: bool,
}

impl Audio {
    /// Look for a microphone and set up both directions
    pub fn new(config: &AudioConfig, speech_key: Option<String>) -> Self {
        let recognizer = if recognizer::microphone_present() {
            match Recognizer::new(&config.language, config.phrase_time_limit, speech_key) {
                Ok(r) => {
                    info!(
                        sample_rate = recognizer::SAMPLE_RATE,
                        phrase_limit = config.phrase_time_limit,
                        "Microphone ready"
                    );
                    Some(r)
                }
                Err(e) => {
                    warn!("Speech recognizer unavailable: {}", e);
                    None
                }
            }
        } else {
            warn!("No capture device found, text input only");
            None
        };

        Self {
            recognizer,
            synthesizer: Synthesizer::new(&config.language, config.tts_slow),
            closed: false,
        }
    }
}

impl VoiceIo for Audio {
    fn microphone_available(&self) -> bool {
        self.recognizer.is_some()
    }

    fn listen(&mut self) -> Result<String, RecognitionError> {
        self.recognizer
            .as_ref()
            .ok_or(RecognitionError::NoMicrophone)?
            .listen()
    }

    fn speak(&mut self, text: &str) -> Result<(), SynthesisError> {
        info!(%text, "Speaking");
        self.synthesizer.speak(text)
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            info!("Audio closed");
        }
    }
}
