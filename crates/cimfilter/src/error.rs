use cimfilter_core::{
    config::ConfigError,
    error::{ErrorClass, EvalError},
    schema::PathError,
    types::{DateTimeParseError, ObjectPathParseError},
};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }
}

impl From<EvalError> for Error {
    fn from(err: EvalError) -> Self {
        let kind = match (&err, err.class()) {
            (EvalError::InvalidPattern { .. }, _) => FilterErrorKind::InvalidPattern,
            (_, ErrorClass::TypeMismatch) => FilterErrorKind::TypeMismatch,
            (_, ErrorClass::InvariantViolation) => FilterErrorKind::Malformed,
            (_, ErrorClass::Unsupported) => FilterErrorKind::Unsupported,
        };

        Self::new(ErrorKind::Filter(kind), ErrorOrigin::Evaluator, err.to_string())
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorKind::Config, ErrorOrigin::Config, err.to_string())
    }
}

impl From<PathError> for Error {
    fn from(err: PathError) -> Self {
        Self::new(ErrorKind::Path, ErrorOrigin::Schema, err.to_string())
    }
}

impl From<DateTimeParseError> for Error {
    fn from(err: DateTimeParseError) -> Self {
        Self::new(ErrorKind::Parse, ErrorOrigin::DateTime, err.to_string())
    }
}

impl From<ObjectPathParseError> for Error {
    fn from(err: ObjectPathParseError) -> Self {
        Self::new(ErrorKind::Parse, ErrorOrigin::ObjectPath, err.to_string())
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    Filter(FilterErrorKind),

    /// Evaluator configuration rejected.
    Config,

    /// Object path could not be built against the schema.
    Path,

    /// Textual datetime or object path is malformed.
    Parse,
}

///
/// FilterErrorKind
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum FilterErrorKind {
    /// Ill-typed comparison inside the filter.
    TypeMismatch,

    /// LIKE pattern failed to compile.
    InvalidPattern,

    /// Compiled program is broken; the caller cannot remediate this.
    Malformed,

    /// Configured limits refused the filter.
    Unsupported,
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Config,
    DateTime,
    Evaluator,
    ObjectPath,
    Schema,
}
