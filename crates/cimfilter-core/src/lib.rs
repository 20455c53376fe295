//! Core runtime for cimfilter: typed values, compiled filter programs, and the
//! stack evaluator that decides whether one object matches one filter.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod config;
pub mod error;
pub mod eval;
pub mod program;
pub mod schema;
pub mod source;
pub mod types;
pub mod value;

#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, evaluators, or config are re-exported here.
///

pub mod prelude {
    pub use crate::{
        program::{Operator, Program},
        source::{Instance, PropertySource},
        types::{CimDateTime, ObjectPath},
        value::{PropertyRef, Value, ValueKind},
    };
}
