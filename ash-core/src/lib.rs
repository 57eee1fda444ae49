//! Board-agnostic core logic for the Ash companion robot
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Robot mode state machine and events
//! - Input command recognition and gesture-intent classification
//! - Face expressions
//! - Configuration type definitions
//! - Collaborator traits (face, arms, voice, console, language model)
//! - The conversational turn orchestrator

#![deny(unsafe_code)]

pub mod command;
pub mod config;
pub mod error;
pub mod expression;
pub mod gesture;
pub mod robot;
pub mod state;
pub mod traits;

pub use command::Command;
pub use error::{GestureError, ModelError, RecognitionError, SynthesisError, TurnError};
pub use expression::Expression;
pub use gesture::{classify, Gesture, Intent};
pub use robot::{Collaborators, Robot, RobotSettings, Turn, TurnOutcome};
pub use state::{Event, Mode};
