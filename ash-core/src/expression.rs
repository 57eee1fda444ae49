//! Face expressions
//!
//! Each expression maps to one PNG asset named after its tag.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Facial expression shown on the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expression {
    Happy,
    Sad,
    #[default]
    Neutral,
    Listening,
    Speaking,
    Thinking,
    Error,
}

impl Expression {
    /// Every expression, in asset loading order
    pub const ALL: [Expression; 7] = [
        Expression::Happy,
        Expression::Sad,
        Expression::Neutral,
        Expression::Listening,
        Expression::Speaking,
        Expression::Thinking,
        Expression::Error,
    ];

    /// Asset tag
    pub fn as_str(&self) -> &'static str {
        match self {
            Expression::Happy => "happy",
            Expression::Sad => "sad",
            Expression::Neutral => "neutral",
            Expression::Listening => "listening",
            Expression::Speaking => "speaking",
            Expression::Thinking => "thinking",
            Expression::Error => "error",
        }
    }

    /// Asset file name (`<tag>.png`)
    pub fn file_name(&self) -> String {
        format!("{}.png", self.as_str())
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tag that names no expression
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown expression '{0}'")]
pub struct UnknownExpression(pub String);

impl FromStr for Expression {
    type Err = UnknownExpression;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Expression::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| UnknownExpression(s.to_string()))
    }
}
