//! Form error types

use thiserror::Error;

/// Errors surfaced to callers of the [`Form`](crate::Form) controller.
///
/// Validation failures are deliberately not here: they are data
/// (`meta.errors` on the field), shown to the user and clearing on the
/// next update, while these errors are programming mistakes the caller
/// must handle.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    /// The referenced field was never declared on this form. Proceeding
    /// would corrupt state, so the operation is refused outright.
    #[error("input name {0} doesnt exist on provided fields")]
    UnknownField(String),
}
