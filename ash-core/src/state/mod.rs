//! Robot mode state machine
//!
//! A conversational turn walks LISTENING → THINKING → SPEAKING → HAPPY and
//! back to LISTENING. Failures detour through ERROR; an exit request from
//! any live mode ends in SHUTDOWN.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::Mode;
