use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// CONSTANTS
///

/// Default compiled LIKE pattern size limit (1 MiB).
pub const DEFAULT_PATTERN_SIZE_LIMIT: usize = 1024 * 1024;

///
/// ConfigError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ConfigError {
    #[error("failed to parse evaluator config: {0}")]
    Parse(String),

    #[error("invalid evaluator config: {0}")]
    Invalid(String),
}

///
/// EvalConfig
///
/// Evaluator tuning. Every field has a default, so an empty TOML document
/// yields `EvalConfig::default()`. Deserializing validates.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(try_from = "RawEvalConfig")]
pub struct EvalConfig {
    /// Compiled LIKE pattern size limit in bytes.
    pub pattern_size_limit: usize,

    /// Match LIKE patterns ignoring case.
    pub case_insensitive_like: bool,

    /// Refuse programs with more operations than this.
    pub max_operations: Option<usize>,
}

impl EvalConfig {
    /// Parse a config from TOML text and validate it.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let raw: RawEvalConfig =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;

        Self::try_from(raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pattern_size_limit == 0 {
            return Err(ConfigError::Invalid(
                "pattern_size_limit cannot be 0".to_string(),
            ));
        }
        if self.max_operations == Some(0) {
            return Err(ConfigError::Invalid(
                "max_operations cannot be 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            pattern_size_limit: DEFAULT_PATTERN_SIZE_LIMIT,
            case_insensitive_like: false,
            max_operations: None,
        }
    }
}

///
/// RawEvalConfig
/// Unvalidated wire form of `EvalConfig`.
///

#[derive(Deserialize)]
#[serde(default)]
struct RawEvalConfig {
    pattern_size_limit: usize,
    case_insensitive_like: bool,
    max_operations: Option<usize>,
}

impl Default for RawEvalConfig {
    fn default() -> Self {
        let EvalConfig {
            pattern_size_limit,
            case_insensitive_like,
            max_operations,
        } = EvalConfig::default();

        Self {
            pattern_size_limit,
            case_insensitive_like,
            max_operations,
        }
    }
}

impl TryFrom<RawEvalConfig> for EvalConfig {
    type Error = ConfigError;

    fn try_from(raw: RawEvalConfig) -> Result<Self, Self::Error> {
        let config = Self {
            pattern_size_limit: raw.pattern_size_limit,
            case_insensitive_like: raw.case_insensitive_like,
            max_operations: raw.max_operations,
        };
        config.validate()?;

        Ok(config)
    }
}

///
/// TESTS
///
