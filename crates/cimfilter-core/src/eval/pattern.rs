use crate::{config::EvalConfig, error::EvalError};
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;

///
/// PatternCache
///
/// LIKE patterns compiled during one evaluation, keyed by pattern text.
/// A pattern must match the whole left-hand string.
///

pub(super) struct PatternCache {
    size_limit: usize,
    case_insensitive: bool,
    compiled: HashMap<String, Regex>,
}

impl PatternCache {
    pub(super) fn new(config: &EvalConfig) -> Self {
        Self {
            size_limit: config.pattern_size_limit,
            case_insensitive: config.case_insensitive_like,
            compiled: HashMap::new(),
        }
    }

    pub(super) fn is_match(&mut self, pattern: &str, text: &str) -> Result<bool, EvalError> {
        if let Some(regex) = self.compiled.get(pattern) {
            return Ok(regex.is_match(text));
        }

        let regex = RegexBuilder::new(&format!("^(?:{pattern})$"))
            .size_limit(self.size_limit)
            .case_insensitive(self.case_insensitive)
            .build()
            .map_err(|err| EvalError::InvalidPattern {
                pattern: pattern.to_string(),
                message: err.to_string(),
            })?;
        let matched = regex.is_match(text);
        self.compiled.insert(pattern.to_string(), regex);

        Ok(matched)
    }
}

///
/// TESTS
///
