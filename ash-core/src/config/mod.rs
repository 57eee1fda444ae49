//! Configuration types
//!
//! Board-agnostic configuration structures deserialized from TOML. Every
//! struct carries `#[serde(default)]`, so a partial document fills the
//! gaps from the defaults below.

pub mod hardware;
pub mod types;

pub use hardware::*;
pub use types::*;
