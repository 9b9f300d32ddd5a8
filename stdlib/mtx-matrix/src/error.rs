//! Matrix errors and their host classification.

use std::fmt;

use mtx_host::{ErrorCode, HostError};
use thiserror::Error;

/// Extension error code for dimension mismatches.
pub const MATRIX_DIM_MISMATCH: u16 = 1;

/// Extension error code for dimensions whose product overflows.
pub const MATRIX_TOO_LARGE: u16 = 2;

/// A matrix axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The row axis.
    Row,
    /// The column axis.
    Col,
}

impl Axis {
    /// Capitalized name, for the start of a message.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Row => "Row",
            Self::Col => "Col",
        }
    }

    /// Plural noun used in dimension messages.
    #[must_use]
    pub const fn noun(self) -> &'static str {
        match self {
            Self::Row => "row(s)",
            Self::Col => "column(s)",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Row => write!(f, "row"),
            Self::Col => write!(f, "col"),
        }
    }
}

/// Errors raised by matrix operations.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MatrixError {
    /// A 1-based index fell outside `[1, bound]`.
    #[error("{} out of bounds: got {index}, expected {axis} in [1, {bound}].", .axis.title())]
    IndexOutOfRange {
        /// The axis that failed.
        axis: Axis,
        /// The offending index.
        index: usize,
        /// The largest valid index.
        bound: usize,
    },

    /// An operand's shape does not satisfy the operation.
    #[error(
        "Expected matrix with {expected} {}, but got one with {actual} {} instead.",
        .axis.noun(),
        .axis.noun()
    )]
    DimensionMismatch {
        /// The axis compared.
        axis: Axis,
        /// The required count.
        expected: usize,
        /// The count found.
        actual: usize,
    },

    /// A flat sequence does not fill the requested shape.
    #[error("a {rows} x {cols} matrix needs {expected} values, got {actual}")]
    ElementCount {
        /// Requested rows.
        rows: usize,
        /// Requested columns.
        cols: usize,
        /// Number of values required.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },

    /// `rows * cols` does not fit in memory addressing.
    #[error("a {rows} x {cols} matrix is too large")]
    TooLarge {
        /// Requested rows.
        rows: usize,
        /// Requested columns.
        cols: usize,
    },

    /// An operand that must be a matrix is something else.
    #[error("Expected matrix, got another object instead.")]
    TypeMismatch,

    /// The host evaluator or another host service failed.
    #[error(transparent)]
    Host(#[from] HostError),
}

impl MatrixError {
    /// The host classification of this error.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::IndexOutOfRange { .. } => ErrorCode::IndexOutOfRange,
            Self::DimensionMismatch { .. } | Self::ElementCount { .. } => {
                ErrorCode::Extension(MATRIX_DIM_MISMATCH)
            }
            Self::TooLarge { .. } => ErrorCode::Extension(MATRIX_TOO_LARGE),
            Self::TypeMismatch => ErrorCode::Type,
            Self::Host(err) => err.code,
        }
    }
}

impl From<MatrixError> for HostError {
    fn from(err: MatrixError) -> Self {
        match err {
            MatrixError::Host(err) => err,
            other => HostError::new(other.code(), other.to_string()),
        }
    }
}

/// Result type for matrix operations.
pub type MatrixResult<T> = Result<T, MatrixError>;
