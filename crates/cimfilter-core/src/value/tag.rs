use serde::{Deserialize, Serialize};
use std::fmt;

///
/// ValueKind
///
/// Scalar kind tag carried by every `Value`.
/// Array-ness is orthogonal: an array value reports its element kind.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum ValueKind {
    Null,
    Integer,
    Double,
    Boolean,
    String,
    DateTime,
    Reference,
    PropertyName,
}

impl ValueKind {
    /// Stable human-readable kind label for diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Integer => "Integer",
            Self::Double => "Double",
            Self::Boolean => "Boolean",
            Self::String => "String",
            Self::DateTime => "DateTime",
            Self::Reference => "Reference",
            Self::PropertyName => "PropertyName",
        }
    }

    /// Kinds that may appear as array elements.
    #[must_use]
    pub const fn is_array_element(self) -> bool {
        !matches!(self, Self::Null | Self::PropertyName)
    }

    /// Kinds with a natural total order usable by LT/LE/GT/GE.
    #[must_use]
    pub const fn is_ordered(self) -> bool {
        matches!(
            self,
            Self::Integer | Self::Double | Self::String | Self::DateTime
        )
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
