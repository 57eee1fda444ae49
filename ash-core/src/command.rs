//! Control commands recognized in user input
//!
//! Commands are matched against the whole trimmed, lowercased input and
//! are handled by the orchestrator instead of being sent to the model.

/// Classified user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Nothing usable was captured
    Empty,
    /// End the session
    Quit,
    /// Run through every gesture
    GestureDemo,
    /// Switch to typed input
    UseText,
    /// Switch to microphone input
    UseVoice,
    /// Forget the conversation so far
    Reset,
    /// Ordinary conversation
    Utterance,
}

const QUIT: &[&str] = &["quit", "exit", "bye", "goodbye", "stop"];
const DEMO: &[&str] = &[
    "gestures",
    "demo",
    "show gestures",
    "test gestures",
    "demo gestures",
];
const RESET: &[&str] = &["reset", "forget", "new conversation", "start over"];

impl Command {
    /// Classify raw input
    pub fn parse(input: &str) -> Self {
        let text = input.trim().to_lowercase();
        match text.as_str() {
            "" => Command::Empty,
            "text" => Command::UseText,
            "voice" => Command::UseVoice,
            t if QUIT.contains(&t) => Command::Quit,
            t if DEMO.contains(&t) => Command::GestureDemo,
            t if RESET.contains(&t) => Command::Reset,
            _ => Command::Utterance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_words() {
        for word in ["quit", "exit", "bye", "goodbye", "stop", "  Bye  "] {
            assert_eq!(Command::parse(word), Command::Quit, "{word}");
        }
    }

    #[test]
    fn test_demo_words() {
        assert_eq!(Command::parse("Show gestures"), Command::GestureDemo);
        assert_eq!(Command::parse("demo"), Command::GestureDemo);
    }

    #[test]
    fn test_mode_switches() {
        assert_eq!(Command::parse("TEXT"), Command::UseText);
        assert_eq!(Command::parse("voice"), Command::UseVoice);
    }

    #[test]
    fn test_reset_words() {
        assert_eq!(Command::parse("Start over"), Command::Reset);
        assert_eq!(Command::parse("forget"), Command::Reset);
        assert_eq!(Command::parse("forget about it"), Command::Utterance);
    }

    #[test]
    fn test_empty_and_utterance() {
        assert_eq!(Command::parse("   "), Command::Empty);
        assert_eq!(Command::parse("goodbye my friend"), Command::Utterance);
        assert_eq!(Command::parse("stop the music please"), Command::Utterance);
    }
}
