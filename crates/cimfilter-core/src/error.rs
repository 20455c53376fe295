use crate::{program::Operator, value::ValueKind};
use std::fmt;
use thiserror::Error as ThisError;

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    /// Ill-typed comparison inside a compiled filter.
    TypeMismatch,
    /// Broken compiled program (stack shape, operand cursor, operator order).
    InvariantViolation,
    /// Configured limits refused the work.
    Unsupported,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::TypeMismatch => "type_mismatch",
            Self::InvariantViolation => "invariant_violation",
            Self::Unsupported => "unsupported",
        };
        write!(f, "{label}")
    }
}

///
/// ValueError
///
/// Recoverable accessor failures on `Value`.
/// The evaluator uses these to drive fallback logic, so they are never fatal
/// on their own.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ValueError {
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("index {index} out of bounds for array of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("array literal must contain at least one element")]
    EmptyArray,

    #[error("array literal element {index} is {found}, expected {expected}")]
    HeterogeneousArray {
        index: usize,
        expected: ValueKind,
        found: ValueKind,
    },
}

impl ValueError {
    pub(crate) fn type_mismatch(expected: impl fmt::Display, found: impl fmt::Display) -> Self {
        Self::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

///
/// EvalError
///
/// Fatal evaluation failure. A data condition (missing property, short array)
/// never produces one of these; they always indicate an ill-typed or broken
/// compiled filter.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum EvalError {
    #[error("type mismatch in {op}: {message}")]
    TypeMismatch { op: Operator, message: String },

    #[error("malformed program: {message}")]
    MalformedProgram { message: String },

    #[error("invalid LIKE pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("program has {found} operations, limit is {limit}")]
    LimitExceeded { limit: usize, found: usize },
}

impl EvalError {
    pub(crate) fn type_mismatch(op: Operator, message: impl Into<String>) -> Self {
        Self::TypeMismatch {
            op,
            message: message.into(),
        }
    }

    /// Build a malformed-program error.
    ///
    /// Debug builds stop here so compiler bugs surface at the call site.
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        let message = message.into();
        debug_assert!(false, "malformed program: {message}");

        Self::MalformedProgram { message }
    }

    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::TypeMismatch { .. } | Self::InvalidPattern { .. } => ErrorClass::TypeMismatch,
            Self::MalformedProgram { .. } => ErrorClass::InvariantViolation,
            Self::LimitExceeded { .. } => ErrorClass::Unsupported,
        }
    }
}
