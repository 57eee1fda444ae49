//! Arm gestures and gesture-intent classification
//!
//! The classifier inspects the user's utterance, not the model's reply,
//! and picks at most one gesture to accompany the spoken answer.

use core::fmt;

/// Default number of wave cycles
pub const DEFAULT_WAVES: u8 = 3;

/// Arm gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gesture {
    /// Both arms at the neutral angle
    Neutral,
    /// Both arms raised
    ArmsUp,
    /// Both arms lowered
    ArmsDown,
    /// Left arm swings between two angles, right stays neutral
    Wave { repetitions: u8 },
    /// Right arm raised, left lowered
    Point,
}

impl Gesture {
    /// Wave with the default cycle count
    pub const fn wave() -> Self {
        Gesture::Wave {
            repetitions: DEFAULT_WAVES,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gesture::Neutral => "neutral",
            Gesture::ArmsUp => "arms_up",
            Gesture::ArmsDown => "arms_down",
            Gesture::Wave { .. } => "wave",
            Gesture::Point => "point",
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the user's utterance is doing, as far as the arms care
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Greeting,
    Celebration,
    Question,
}

impl Intent {
    /// Gesture performed while speaking the reply
    pub fn gesture(&self) -> Gesture {
        match self {
            Intent::Greeting => Gesture::wave(),
            Intent::Celebration => Gesture::ArmsUp,
            Intent::Question => Gesture::Point,
        }
    }

    /// Check if the speaking gesture replaces the post-turn celebration
    pub fn persists(&self) -> bool {
        matches!(self, Intent::Greeting | Intent::Celebration)
    }
}

const GREETING_WORDS: &[&str] = &["hello", "hi", "hey", "greet", "greetings", "wave"];
const GREETING_PHRASES: &[&str] = &["say hello", "say hi"];

const CELEBRATION_WORDS: &[&str] = &[
    "yay",
    "awesome",
    "great",
    "celebrate",
    "congratulations",
    "congrats",
    "hooray",
    "excellent",
    "amazing",
    "fantastic",
];

const QUESTION_WORDS: &[&str] = &["what", "why", "how", "when", "where", "who", "explain"];
const QUESTION_PHRASES: &[&str] = &["tell me"];

/// Classify an utterance
///
/// Checks greeting, then celebration, then question; the first match wins.
/// Greeting and celebration keywords match whole words, case-insensitively.
/// A question is an utterance that starts with a question word or phrase
/// (as a plain prefix, so "whats" and "howdy" count) or contains a `?`.
pub fn classify(text: &str) -> Option<Intent> {
    let lowered = text.trim().to_lowercase();
    if lowered.is_empty() {
        return None;
    }
    let words: Vec<&str> = lowered
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|w| !w.is_empty())
        .collect();
    let has_word = |list: &[&str]| words.iter().any(|w| list.contains(w));

    if has_word(GREETING_WORDS) || GREETING_PHRASES.iter().any(|p| lowered.contains(p)) {
        return Some(Intent::Greeting);
    }

    if has_word(CELEBRATION_WORDS) {
        return Some(Intent::Celebration);
    }

    let opens_with_question = QUESTION_WORDS
        .iter()
        .chain(QUESTION_PHRASES)
        .any(|w| lowered.starts_with(w));
    if opens_with_question || lowered.contains('?') {
        return Some(Intent::Question);
    }

    None
}
