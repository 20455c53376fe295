use crate::Error;
use cimfilter_core::{
    config::EvalConfig, eval::Evaluator, program::Program, source::PropertySource,
};
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// Filter
///
/// A compiled filter statement: the query text it came from, the compiled
/// program, and the evaluator settings it runs with. Persisted alongside a
/// subscription and evaluated against each candidate object.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Filter {
    query: String,
    program: Program,
    #[serde(default)]
    config: EvalConfig,
}

impl Filter {
    #[must_use]
    pub fn new(query: impl Into<String>, program: Program) -> Self {
        Self {
            query: query.into(),
            program,
            config: EvalConfig::default(),
        }
    }

    /// Replace the evaluator settings after validating them.
    pub fn with_config(mut self, config: EvalConfig) -> Result<Self, Error> {
        config.validate()?;
        self.config = config;

        Ok(self)
    }

    /// Does `source` match this filter?
    pub fn evaluate(&self, source: &dyn PropertySource) -> Result<bool, Error> {
        Evaluator::with_config(&self.program, &self.config)
            .evaluate(source)
            .map_err(Error::from)
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub const fn program(&self) -> &Program {
        &self.program
    }

    #[must_use]
    pub const fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Distinct properties the filter reads; a provider may fetch only these.
    #[must_use]
    pub fn property_list(&self) -> &[String] {
        self.program.property_names()
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.query)
    }
}
