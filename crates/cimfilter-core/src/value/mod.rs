mod coercion;
mod compare;
mod tag;

#[cfg(test)]
mod tests;

use crate::{
    error::ValueError,
    types::{CimDateTime, ObjectPath},
};
use serde::{Deserialize, Serialize};
use std::fmt;

// re-exports
pub use coercion::{COERCION_TABLE, CoercionRule};
pub use tag::ValueKind;

///
/// Value
///
/// Every literal, property value and resolved operand in a filter program.
///
/// Null          → property absent or lookup failed; never an array.
/// PropertyName  → unresolved property reference; only lives inside a Program.
/// Array         → homogeneous sequence of one scalar kind.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum Value {
    Null,
    Integer(i64),
    Double(f64),
    Boolean(bool),
    String(String),
    DateTime(CimDateTime),
    Reference(ObjectPath),
    PropertyName(PropertyRef),
    Array(ValueArray),
}

///
/// ValueArray
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum ValueArray {
    Integer(Vec<i64>),
    Double(Vec<f64>),
    Boolean(Vec<bool>),
    String(Vec<String>),
    DateTime(Vec<CimDateTime>),
    Reference(Vec<ObjectPath>),
}

impl ValueArray {
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Integer(_) => ValueKind::Integer,
            Self::Double(_) => ValueKind::Double,
            Self::Boolean(_) => ValueKind::Boolean,
            Self::String(_) => ValueKind::String,
            Self::DateTime(_) => ValueKind::DateTime,
            Self::Reference(_) => ValueKind::Reference,
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        match self {
            Self::Integer(v) => v.len(),
            Self::Double(v) => v.len(),
            Self::Boolean(v) => v.len(),
            Self::String(v) => v.len(),
            Self::DateTime(v) => v.len(),
            Self::Reference(v) => v.len(),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Scalar copy of the element at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Value> {
        match self {
            Self::Integer(v) => v.get(index).copied().map(Value::Integer),
            Self::Double(v) => v.get(index).copied().map(Value::Double),
            Self::Boolean(v) => v.get(index).copied().map(Value::Boolean),
            Self::String(v) => v.get(index).cloned().map(Value::String),
            Self::DateTime(v) => v.get(index).copied().map(Value::DateTime),
            Self::Reference(v) => v.get(index).cloned().map(Value::Reference),
        }
    }
}

///
/// PropertyRef
///
/// Unresolved reference to a property of the object under test.
/// `chain` holds the dotted sub-property links (`a.b.c` → name `a`,
/// chain `[b, c]`), each itself a `PropertyName` value.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct PropertyRef {
    pub name: String,
    pub index: Option<usize>,
    pub chain: Vec<Value>,
}

impl PropertyRef {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index: None,
            chain: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

impl fmt::Display for PropertyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(index) = self.index {
            write!(f, "[{index}]")?;
        }
        for link in &self.chain {
            match link {
                Value::PropertyName(link) => write!(f, ".{link}")?,
                other => write!(f, ".<{other}>")?,
            }
        }

        Ok(())
    }
}

// Generates the typed scalar, array and indexed accessors for one kind.
macro_rules! value_accessors {
    ( $( $variant:ident => $as_fn:ident, $as_array_fn:ident, $at_fn:ident : $elem:ty => $out:ty, |$v:ident| $conv:expr );* $(;)? ) => {
        impl Value {
            $(
                pub fn $as_fn(&self) -> Result<$out, ValueError> {
                    match self {
                        Self::$variant($v) => Ok($conv),
                        other => Err(ValueError::type_mismatch(ValueKind::$variant, other.type_name())),
                    }
                }

                pub fn $as_array_fn(&self) -> Result<&[$elem], ValueError> {
                    match self {
                        Self::Array(ValueArray::$variant(items)) => Ok(items.as_slice()),
                        other => Err(ValueError::type_mismatch(
                            format!("{}[]", ValueKind::$variant),
                            other.type_name(),
                        )),
                    }
                }

                /// Indexed element access; an index past the end is reported
                /// distinctly from a kind mismatch.
                pub fn $at_fn(&self, index: usize) -> Result<$out, ValueError> {
                    let items = self.$as_array_fn()?;
                    items
                        .get(index)
                        .map(|$v| $conv)
                        .ok_or(ValueError::IndexOutOfBounds { index, len: items.len() })
                }
            )*
        }
    };
}

value_accessors! {
    Integer => as_integer, as_array_integer, integer_at: i64 => i64, |v| *v;
    Double => as_double, as_array_double, double_at: f64 => f64, |v| *v;
    Boolean => as_boolean, as_array_boolean, boolean_at: bool => bool, |v| *v;
    String => as_string, as_array_string, string_at: String => &str, |v| v.as_str();
    DateTime => as_datetime, as_array_datetime, datetime_at: CimDateTime => CimDateTime, |v| *v;
    Reference => as_reference, as_array_reference, reference_at: ObjectPath => &ObjectPath, |v| v;
}

impl Value {
    #[must_use]
    pub fn property(name: impl Into<String>) -> Self {
        Self::PropertyName(PropertyRef::new(name))
    }

    #[must_use]
    pub fn indexed_property(name: impl Into<String>, index: usize) -> Self {
        Self::PropertyName(PropertyRef::new(name).with_index(index))
    }

    /// Build a homogeneous array from scalar values.
    ///
    /// Empty input and mixed kinds are rejected rather than coerced.
    pub fn from_scalars(values: &[Self]) -> Result<Self, ValueError> {
        let first = values.first().ok_or(ValueError::EmptyArray)?;
        let expected = first.kind();
        if first.is_array() || !expected.is_array_element() {
            return Err(ValueError::type_mismatch("scalar array element", first.type_name()));
        }

        for (index, value) in values.iter().enumerate().skip(1) {
            if value.is_array() || value.kind() != expected {
                return Err(ValueError::HeterogeneousArray {
                    index,
                    expected,
                    found: value.kind(),
                });
            }
        }

        let array = match expected {
            ValueKind::Integer => ValueArray::Integer(collect(values, Self::as_integer)?),
            ValueKind::Double => ValueArray::Double(collect(values, Self::as_double)?),
            ValueKind::Boolean => ValueArray::Boolean(collect(values, Self::as_boolean)?),
            ValueKind::String => {
                ValueArray::String(collect(values, |v| v.as_string().map(str::to_string))?)
            }
            ValueKind::DateTime => ValueArray::DateTime(collect(values, Self::as_datetime)?),
            ValueKind::Reference => {
                ValueArray::Reference(collect(values, |v| v.as_reference().cloned())?)
            }
            ValueKind::Null | ValueKind::PropertyName => {
                return Err(ValueError::type_mismatch("scalar array element", expected));
            }
        };

        Ok(Self::Array(array))
    }

    /// Append a dotted sub-property link to a property reference.
    ///
    /// Only valid on `PropertyName` values.
    pub fn chain(&mut self, link: Self) {
        match self {
            Self::PropertyName(property) => property.chain.push(link),
            other => panic!("chain() called on {} value", other.type_name()),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Integer(_) => ValueKind::Integer,
            Self::Double(_) => ValueKind::Double,
            Self::Boolean(_) => ValueKind::Boolean,
            Self::String(_) => ValueKind::String,
            Self::DateTime(_) => ValueKind::DateTime,
            Self::Reference(_) => ValueKind::Reference,
            Self::PropertyName(_) => ValueKind::PropertyName,
            Self::Array(array) => array.kind(),
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Element count for arrays; scalars have no size.
    #[must_use]
    pub const fn size(&self) -> Option<usize> {
        match self {
            Self::Array(array) => Some(array.len()),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_property(&self) -> Option<&PropertyRef> {
        match self {
            Self::PropertyName(property) => Some(property),
            _ => None,
        }
    }

    /// Scalar copy of an array element.
    pub fn element(&self, index: usize) -> Result<Self, ValueError> {
        match self {
            Self::Array(array) => array.get(index).ok_or(ValueError::IndexOutOfBounds {
                index,
                len: array.len(),
            }),
            other => Err(ValueError::type_mismatch("array", other.type_name())),
        }
    }

    /// Kind label including array-ness, e.g. `Integer[]`.
    #[must_use]
    pub fn type_name(&self) -> String {
        if self.is_array() {
            format!("{}[]", self.kind())
        } else {
            self.kind().to_string()
        }
    }
}

fn collect<T>(
    values: &[Value],
    f: impl Fn(&Value) -> Result<T, ValueError>,
) -> Result<Vec<T>, ValueError> {
    values.iter().map(f).collect()
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list<T>(
            f: &mut fmt::Formatter<'_>,
            items: &[T],
            item: impl Fn(&mut fmt::Formatter<'_>, &T) -> fmt::Result,
        ) -> fmt::Result {
            f.write_str("{")?;
            for (i, value) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                item(f, value)?;
            }
            f.write_str("}")
        }

        write!(f, "{}: ", self.type_name())?;
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v:?}"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v:?}"),
            Self::DateTime(v) => write!(f, "{v}"),
            Self::Reference(v) => write!(f, "{v}"),
            Self::PropertyName(v) => write!(f, "{v}"),
            Self::Array(ValueArray::Integer(items)) => list(f, items, |f, v| write!(f, "{v}")),
            Self::Array(ValueArray::Double(items)) => list(f, items, |f, v| write!(f, "{v:?}")),
            Self::Array(ValueArray::Boolean(items)) => list(f, items, |f, v| write!(f, "{v}")),
            Self::Array(ValueArray::String(items)) => list(f, items, |f, v| write!(f, "{v:?}")),
            Self::Array(ValueArray::DateTime(items)) => list(f, items, |f, v| write!(f, "{v}")),
            Self::Array(ValueArray::Reference(items)) => list(f, items, |f, v| write!(f, "{v}")),
        }
    }
}

///
/// Conversions
///

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<CimDateTime> for Value {
    fn from(v: CimDateTime) -> Self {
        Self::DateTime(v)
    }
}

impl From<ObjectPath> for Value {
    fn from(v: ObjectPath) -> Self {
        Self::Reference(v)
    }
}

impl From<PropertyRef> for Value {
    fn from(v: PropertyRef) -> Self {
        Self::PropertyName(v)
    }
}

impl From<ValueArray> for Value {
    fn from(v: ValueArray) -> Self {
        Self::Array(v)
    }
}

impl From<Vec<i64>> for Value {
    fn from(v: Vec<i64>) -> Self {
        Self::Array(ValueArray::Integer(v))
    }
}

impl From<Vec<f64>> for Value {
    fn from(v: Vec<f64>) -> Self {
        Self::Array(ValueArray::Double(v))
    }
}

impl From<Vec<bool>> for Value {
    fn from(v: Vec<bool>) -> Self {
        Self::Array(ValueArray::Boolean(v))
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Self::Array(ValueArray::String(v))
    }
}

impl From<Vec<&str>> for Value {
    fn from(v: Vec<&str>) -> Self {
        Self::Array(ValueArray::String(
            v.into_iter().map(str::to_string).collect(),
        ))
    }
}

impl From<Vec<CimDateTime>> for Value {
    fn from(v: Vec<CimDateTime>) -> Self {
        Self::Array(ValueArray::DateTime(v))
    }
}

impl From<Vec<ObjectPath>> for Value {
    fn from(v: Vec<ObjectPath>) -> Self {
        Self::Array(ValueArray::Reference(v))
    }
}
