//! Estimation errors.
//!
//! Every failure is detected synchronously at the call boundary, before any state is mutated.
//! Nothing is retried internally; callers decide whether to retry with corrected inputs.

use thiserror::Error;

/// Errors raised by manifold and estimation operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Operand dimensions disagree.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// A point or process precondition is violated.
    #[error("domain error: {0}")]
    DomainError(String),

    /// An assignment would corrupt a symmetric matrix.
    #[error("symmetry violation: {0}")]
    SymmetryViolation(&'static str),

    /// Matrix inversion failed.
    #[error("singular matrix: {0}")]
    SingularMatrix(&'static str),
}

impl Error {
    pub(crate) fn dimensions(expected: usize, got: usize) -> Self {
        Error::DimensionMismatch { expected, got }
    }

    pub(crate) fn domain(message: impl Into<String>) -> Self {
        Error::DomainError(message.into())
    }
}

/// Result type for manifold and estimation operations.
pub type Result<T> = core::result::Result<T, Error>;
