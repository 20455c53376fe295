use serde::{Deserialize, Serialize};
use std::fmt;

///
/// Operator
///
/// One postfix token of a compiled filter.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Operator {
    And,
    Or,
    Not,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Like,
    NotLike,
    Any,
    NotAny,
    Every,
    NotEvery,
    IsNull,
}

impl Operator {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::Eq => "EQ",
            Self::Ne => "NE",
            Self::Lt => "LT",
            Self::Le => "LE",
            Self::Gt => "GT",
            Self::Ge => "GE",
            Self::Like => "LIKE",
            Self::NotLike => "NOT_LIKE",
            Self::Any => "ANY",
            Self::NotAny => "NOT_ANY",
            Self::Every => "EVERY",
            Self::NotEvery => "NOT_EVERY",
            Self::IsNull => "IS_NULL",
        }
    }

    /// Binary operand comparators; also the legal followers of a quantifier.
    #[must_use]
    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Eq
                | Self::Ne
                | Self::Lt
                | Self::Le
                | Self::Gt
                | Self::Ge
                | Self::Like
                | Self::NotLike
        )
    }

    #[must_use]
    pub const fn is_ordering(self) -> bool {
        matches!(self, Self::Lt | Self::Le | Self::Gt | Self::Ge)
    }

    #[must_use]
    pub const fn is_pattern(self) -> bool {
        matches!(self, Self::Like | Self::NotLike)
    }

    #[must_use]
    pub const fn is_quantifier(self) -> bool {
        matches!(
            self,
            Self::Any | Self::NotAny | Self::Every | Self::NotEvery
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
