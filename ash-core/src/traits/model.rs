//! Language model trait

use crate::error::ModelError;

/// Conversational text model
pub trait LanguageModel {
    /// Send one user prompt and get the reply
    fn ask(&mut self, prompt: &str) -> Result<String, ModelError>;

    /// Forget prior turns
    fn reset_conversation(&mut self);
}
