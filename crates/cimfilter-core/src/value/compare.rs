use crate::value::Value;
use std::cmp::Ordering;

///
/// Value comparison primitives
///
/// Equality is structural (`PartialEq`): arrays compare length first, then
/// element-wise. Ordering is only defined between scalars of one ordered
/// kind; every other pairing reports `None`.
///

impl Value {
    /// Natural ordering between two scalars of the same ordered kind.
    #[must_use]
    pub fn ordered_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(b)),
            (Self::Double(a), Self::Double(b)) => a.partial_cmp(b),
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::DateTime(a), Self::DateTime(b)) => a.try_cmp(b),
            _ => None,
        }
    }

    /// False when a scalar datetime pairing mixes a timestamp with an interval.
    #[must_use]
    pub const fn datetime_forms_agree(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::DateTime(a), Self::DateTime(b)) => a.is_interval() == b.is_interval(),
            _ => true,
        }
    }
}
