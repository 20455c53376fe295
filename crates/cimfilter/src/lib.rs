//! ## Crate layout
//! - `core`: runtime values, compiled programs, the evaluator, property
//!   sources, and schema path helpers.
//! - `error`: public error type with a stable kind + origin taxonomy.
//! - `filter`: compiled filter statements as stored with a subscription.
//!
//! The `prelude` module carries the types needed to build and evaluate a
//! filter.

pub use cimfilter_core as core;

pub mod error;
pub mod filter;


//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use core::eval::matches;
pub use error::Error;
pub use filter::Filter;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        Error, Filter,
        core::{
            config::EvalConfig,
            eval::{Evaluator, matches},
            prelude::*,
            schema::{SchemaContext, StaticSchema},
        },
    };
}
