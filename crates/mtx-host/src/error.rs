//! Failure reporting.
//!
//! Extensions never abort the process. They return a [`HostError`] and the
//! host unwinds the current script evaluation by propagating it.

use std::fmt;

use thiserror::Error;

/// Classification attached to every host error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// A value had the wrong type for the operation.
    Type,
    /// An index fell outside the valid range.
    IndexOutOfRange,
    /// A native function received the wrong number of arguments.
    ArgumentCount,
    /// A function, global or member name did not resolve.
    UnknownName,
    /// An invariant of the host itself was violated.
    Internal,
    /// A code defined by an extension.
    Extension(u16),
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type => write!(f, "type error"),
            Self::IndexOutOfRange => write!(f, "index out of range"),
            Self::ArgumentCount => write!(f, "argument count"),
            Self::UnknownName => write!(f, "unknown name"),
            Self::Internal => write!(f, "internal error"),
            Self::Extension(code) => write!(f, "extension error {code}"),
        }
    }
}

/// An error that aborts the current script evaluation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct HostError {
    /// The classification.
    pub code: ErrorCode,
    /// Human-readable description.
    pub message: String,
}

impl HostError {
    /// Creates an error with the given classification.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Creates a [`ErrorCode::Type`] error.
    #[must_use]
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Type, message)
    }

    /// Creates an [`ErrorCode::Internal`] error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }

    /// Creates an [`ErrorCode::UnknownName`] error.
    #[must_use]
    pub fn unknown_name(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UnknownName, message)
    }
}

/// Result type for host operations.
pub type HostResult<T> = Result<T, HostError>;
