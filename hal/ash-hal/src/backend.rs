//! Hardware capability
//!
//! Every hardware-facing component resolves its backend once, at
//! construction. Downstream logic branches on this value instead of probing
//! for devices again.

/// Whether a component drives real hardware or only logs what it would do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Real device present and opened
    Hardware,
    /// No device; actions are logged only
    #[default]
    Simulated,
}

impl Backend {
    /// Resolve from an optional opened capability
    pub fn of<T>(capability: &Option<T>) -> Self {
        if capability.is_some() {
            Backend::Hardware
        } else {
            Backend::Simulated
        }
    }

    /// Check if this is the hardware backend
    pub fn is_hardware(&self) -> bool {
        matches!(self, Backend::Hardware)
    }

    /// Short name for logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Hardware => "hardware",
            Backend::Simulated => "simulated",
        }
    }
}
