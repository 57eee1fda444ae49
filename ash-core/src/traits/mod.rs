//! Collaborator trait definitions
//!
//! These traits abstract the robot's peripherals so the orchestrator can
//! be driven by hardware backends, simulated backends, or test fakes.

pub mod arms;
pub mod face;
pub mod model;
pub mod pacer;
pub mod voice;

pub use arms::ArmGestures;
pub use face::FaceDisplay;
pub use model::LanguageModel;
pub use pacer::{Pacer, ThreadPacer};
pub use voice::{ConsoleInput, VoiceIo};
