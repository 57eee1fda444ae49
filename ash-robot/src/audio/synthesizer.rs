//! Text-to-speech through `espeak-ng`
//!
//! espeak-ng plays to the default ALSA device and exits when playback ends,
//! so waiting on the process is waiting on the audio.

use std::process::Command;

use ash_core::SynthesisError;

/// Words per minute
pub const NORMAL_RATE: u32 = 160;
pub const SLOW_RATE: u32 = 110;

/// Longest text handed to the engine
const MAX_CHARS: usize = 10_000;

/// espeak-ng voice for a BCP 47 tag, e.g. `en-US` → `en-us`
pub fn voice_for(language: &str) -> String {
    let voice = language.trim().replace('_', "-").to_lowercase();
    if voice.is_empty() {
        "en".to_string()
    } else {
        voice
    }
}

/// Drop control characters the engine would read out or choke on
pub fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| if c == '\n' || c == '\r' || c == '\t' { ' ' } else { c })
        .filter(|c| !c.is_control())
        .take(MAX_CHARS)
        .collect::<String>()
        .trim()
        .to_string()
}

pub struct Synthesizer {
    voice: String,
    rate: u32,
}

impl Synthesizer {
    pub fn new(language: &str, slow: bool) -> Self {
        Self {
            voice: voice_for(language),
            rate: if slow { SLOW_RATE } else { NORMAL_RATE },
        }
    }

    /// Command-line arguments for one utterance
    pub fn args(&self, text: &str) -> Vec<String> {
        vec![
            "-v".to_string(),
            self.voice.clone(),
            "-s".to_string(),
            self.rate.to_string(),
            "--".to_string(),
            text.to_string(),
        ]
    }

    /// Speak and block until playback finishes
    pub fn speak(&self, text: &str) -> Result<(), SynthesisError> {
        let text = sanitize(text);
        if text.is_empty() {
            return Err(SynthesisError::Engine("nothing to say".to_string()));
        }

        let output = Command::new("espeak-ng")
            .args(self.args(&text))
            .output()
            .map_err(|e| SynthesisError::Engine(e.to_string()))?;
        if output.status.success() {
            Ok(())
        } else {
            Err(SynthesisError::Playback(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_from_language_tag() {
        assert_eq!(voice_for("en-US"), "en-us");
        assert_eq!(voice_for("pt_BR"), "pt-br");
        assert_eq!(voice_for(" "), "en");
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("  Hello,\nworld!\u{7}  "), "Hello, world!");
        assert_eq!(sanitize("\u{0}\u{1b}"), "");
    }

    #[test]
    fn test_slow_mode_lowers_rate() {
        let normal = Synthesizer::new("en-US", false);
        let slow = Synthesizer::new("en-US", true);
        assert_eq!(normal.args("hi")[3], NORMAL_RATE.to_string());
        assert_eq!(slow.args("hi")[3], SLOW_RATE.to_string());
        assert_eq!(slow.args("-v oops").last().map(String::as_str), Some("-v oops"));
    }

    #[test]
    fn test_empty_text_is_an_error() {
        let synth = Synthesizer::new("en-US", false);
        assert!(matches!(synth.speak(" \n "), Err(SynthesisError::Engine(_))));
    }
}
