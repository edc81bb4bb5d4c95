//! Common result and error types for the Kiln compiler.

/// The standard result type for fallible internal operations.
///
/// `Err` indicates an unrecoverable internal error (a bug in Kiln), not a
/// user-facing problem. User errors — bad recipe text, data that doesn't
/// match its schema — are reported through the diagnostics `Log` and the
/// operation still returns `Ok`.
pub type KilnResult<T> = Result<T, InternalError>;

/// An internal compiler error indicating a bug in Kiln, not a user input problem.
#[derive(Debug, thiserror::Error)]
#[error("internal compiler error: {message}")]
pub struct InternalError {
    /// Description of the internal error.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}
