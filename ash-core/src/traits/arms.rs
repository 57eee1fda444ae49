//! Arm gesture trait

use crate::error::GestureError;
use crate::gesture::Gesture;

/// Two servo arms
pub trait ArmGestures {
    /// Perform a gesture, blocking until the arms settle
    fn perform(&mut self, gesture: Gesture) -> Result<(), GestureError>;

    /// Return both arms to neutral
    fn reset(&mut self) -> Result<(), GestureError> {
        self.perform(Gesture::Neutral)
    }

    /// Release the servo bus. Safe to call more than once.
    fn close(&mut self);
}
