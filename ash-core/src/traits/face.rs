//! Face display trait

use crate::expression::Expression;

/// Something that can show a face
pub trait FaceDisplay {
    /// Show an expression
    ///
    /// Returns `false` when the expression could not be shown (missing
    /// asset or panel error). Failures never abort a turn.
    fn set_expression(&mut self, expression: Expression) -> bool;

    /// Expression currently shown, if any
    fn current_expression(&self) -> Option<Expression>;

    /// Blank the screen
    fn clear(&mut self);

    /// Release the underlying device. Safe to call more than once.
    fn close(&mut self);
}
