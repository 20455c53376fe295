use crate::{
    error::ValueError,
    types::{CimDateTime, ObjectPath},
    value::{Value, ValueArray, ValueKind},
};

///
/// CoercionRule
///
/// One permitted right-hand-side conversion.
/// Absence of a rule means the conversion is not permitted.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CoercionRule {
    pub from: ValueKind,
    pub to: ValueKind,
}

// Textual forms parse on demand; nothing converts back to String here.
pub const COERCION_TABLE: &[CoercionRule] = &[
    CoercionRule {
        from: ValueKind::String,
        to: ValueKind::DateTime,
    },
    CoercionRule {
        from: ValueKind::String,
        to: ValueKind::Reference,
    },
];

impl Value {
    /// True when `COERCION_TABLE` permits converting this value's kind to `target`.
    #[must_use]
    pub fn can_coerce_to(&self, target: ValueKind) -> bool {
        let from = self.kind();

        COERCION_TABLE
            .iter()
            .any(|rule| rule.from == from && rule.to == target)
    }

    /// Convert this value to `target` kind, keeping array-ness.
    ///
    /// A missing rule and an unparseable string both report `TypeMismatch`.
    pub fn coerce_to(&self, target: ValueKind) -> Result<Self, ValueError> {
        if self.kind() == target {
            return Ok(self.clone());
        }
        if !self.can_coerce_to(target) {
            return Err(ValueError::type_mismatch(target, self.type_name()));
        }

        match (self, target) {
            (Self::String(text), ValueKind::DateTime) => parse_datetime(text).map(Self::DateTime),
            (Self::String(text), ValueKind::Reference) => parse_reference(text).map(Self::Reference),
            (Self::Array(ValueArray::String(items)), ValueKind::DateTime) => items
                .iter()
                .map(|text| parse_datetime(text))
                .collect::<Result<Vec<_>, _>>()
                .map(Self::from),
            (Self::Array(ValueArray::String(items)), ValueKind::Reference) => items
                .iter()
                .map(|text| parse_reference(text))
                .collect::<Result<Vec<_>, _>>()
                .map(Self::from),
            _ => Err(ValueError::type_mismatch(target, self.type_name())),
        }
    }
}

fn parse_datetime(text: &str) -> Result<CimDateTime, ValueError> {
    CimDateTime::parse(text)
        .map_err(|err| ValueError::type_mismatch(ValueKind::DateTime, format!("'{text}' ({err})")))
}

fn parse_reference(text: &str) -> Result<ObjectPath, ValueError> {
    ObjectPath::parse(text)
        .map_err(|err| ValueError::type_mismatch(ValueKind::Reference, format!("'{text}' ({err})")))
}
