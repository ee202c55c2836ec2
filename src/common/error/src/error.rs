//! Core error types for Quarry.

use thiserror::Error;

/// Result type alias using `QuarryError`.
pub type QuarryResult<T> = std::result::Result<T, QuarryError>;

/// Core error type for Quarry operations.
///
/// Classification guidance:
/// - [`QuarryError::TypeError`]: the type lattice has no compatible type for a
///   set of operands. Reported to the user as a compilation error.
/// - [`QuarryError::CastError`]: a literal could not be evaluated into a target
///   type at plan time. Rewrite rules treat this as "fold not applicable".
/// - [`QuarryError::InternalError`]: a broken invariant, for example a rule's
///   `transform` seeing a shape its `check` should have excluded.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuarryError {
    /// No compatible type exists for the given operand types.
    #[error("TypeError: {0}")]
    TypeError(String),

    /// Plan-time literal evaluation failed or is unsupported.
    #[error("CastError: {0}")]
    CastError(String),

    /// Schema-related error (unresolvable reference, bad arity, etc.).
    #[error("SchemaError: {0}")]
    SchemaError(String),

    /// Column not produced by any input of the operator that uses it.
    #[error("ColumnNotFound: {0}")]
    ColumnNotFound(String),

    /// Invalid parameter provided.
    #[error("InvalidParameter: {0}")]
    InvalidParameter(String),

    /// Internal error (bug in Quarry).
    #[error("InternalError: {0}")]
    InternalError(String),

    /// IO error.
    #[error("IoError: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("SerdeJsonError: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}

impl QuarryError {
    /// Create a new `TypeError`.
    pub fn type_error<S: Into<String>>(msg: S) -> Self {
        Self::TypeError(msg.into())
    }

    /// Create a new `CastError`.
    pub fn cast_error<S: Into<String>>(msg: S) -> Self {
        Self::CastError(msg.into())
    }

    /// Create a new `SchemaError`.
    pub fn schema_error<S: Into<String>>(msg: S) -> Self {
        Self::SchemaError(msg.into())
    }

    /// Create a new `ColumnNotFound` error.
    pub fn column_not_found<S: Into<String>>(msg: S) -> Self {
        Self::ColumnNotFound(msg.into())
    }

    /// Create a new `InvalidParameter` error.
    pub fn invalid_parameter<S: Into<String>>(msg: S) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Create a new `InternalError`.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::InternalError(msg.into())
    }
}

/// Ensure a condition holds, returning an `InternalError` if not.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $msg:expr) => {
        if !$cond {
            return Err($crate::QuarryError::InternalError($msg.to_string()));
        }
    };
    ($cond:expr, $variant:ident: $($msg:tt)*) => {
        if !$cond {
            return Err($crate::QuarryError::$variant(format!($($msg)*)));
        }
    };
}

/// Return early with an `InternalError`.
#[macro_export]
macro_rules! internal_err {
    ($($arg:tt)*) => {
        return Err($crate::QuarryError::InternalError(format!($($arg)*)))
    };
}
