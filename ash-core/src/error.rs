//! Error types for collaborator failures
//!
//! Each collaborator has its own error. Only [`TurnError`] reaches the
//! orchestrator's error path; recognition and synthesis failures are
//! absorbed inside the turn.

use thiserror::Error;

/// Speech recognition failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecognitionError {
    #[error("no microphone available")]
    NoMicrophone,
    #[error("audio capture failed: {0}")]
    Capture(String),
    #[error("no speech detected")]
    NothingHeard,
    #[error("recognition service failed: {0}")]
    Service(String),
}

/// Speech synthesis or playback failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    #[error("speech engine failed: {0}")]
    Engine(String),
    #[error("playback failed: {0}")]
    Playback(String),
}

/// Language model call failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("model client not configured: {0}")]
    NotConfigured(String),
    #[error("model request failed: {0}")]
    Request(String),
    #[error("model returned HTTP {status}")]
    Status { status: u16 },
    #[error("malformed model response: {0}")]
    Response(String),
}

/// Servo or arm bus failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GestureError {
    #[error("servo bus error: {0}")]
    Bus(String),
    #[error("servo channel {0} out of range")]
    Channel(u8),
}

/// Anything that aborts a conversational turn
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TurnError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Gesture(#[from] GestureError),
}
