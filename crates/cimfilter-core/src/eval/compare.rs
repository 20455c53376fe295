use crate::{
    error::EvalError,
    eval::pattern::PatternCache,
    program::Operator,
    value::{Value, ValueKind},
};
use std::{borrow::Cow, cmp::Ordering};

///
/// Binary comparison
///
/// Order of checks:
/// 1. a Null lhs short-circuits (only NE holds)
/// 2. rhs is reconciled to the lhs kind (String → DateTime/Reference only)
/// 3. array-ness must agree
/// 4. the operator must be defined for the lhs kind
///
/// Steps 2-4 fail with a fatal `TypeMismatch`.
///

pub(super) fn compare(
    op: Operator,
    lhs: &Value,
    rhs: &Value,
    patterns: &mut PatternCache,
) -> Result<bool, EvalError> {
    if lhs.is_null() {
        return Ok(op == Operator::Ne);
    }

    let rhs = reconcile(op, lhs, rhs)?;
    if lhs.is_array() != rhs.is_array() {
        return Err(EvalError::type_mismatch(
            op,
            format!("cannot compare {} with {}", lhs.type_name(), rhs.type_name()),
        ));
    }
    check_operator(op, lhs.kind(), lhs.is_array())?;
    if !lhs.datetime_forms_agree(&rhs) {
        return Err(EvalError::type_mismatch(
            op,
            "timestamp and interval are not comparable",
        ));
    }

    match op {
        Operator::Eq => Ok(*lhs == *rhs),
        Operator::Ne => Ok(*lhs != *rhs),
        Operator::Lt => Ok(lhs.ordered_cmp(&rhs).is_some_and(Ordering::is_lt)),
        Operator::Le => Ok(lhs.ordered_cmp(&rhs).is_some_and(Ordering::is_le)),
        Operator::Gt => Ok(lhs.ordered_cmp(&rhs).is_some_and(Ordering::is_gt)),
        Operator::Ge => Ok(lhs.ordered_cmp(&rhs).is_some_and(Ordering::is_ge)),
        Operator::Like | Operator::NotLike => {
            let (Value::String(text), Value::String(pattern)) = (lhs, rhs.as_ref()) else {
                return Err(EvalError::type_mismatch(op, "LIKE needs string operands"));
            };
            let matched = patterns.is_match(pattern, text)?;

            Ok(matched == (op == Operator::Like))
        }
        other => Err(EvalError::malformed(format!(
            "{other} is not a comparison operator"
        ))),
    }
}

/// Bring `rhs` to the lhs kind. Exactly one coercion is attempted, on the
/// rhs only, and only from String.
pub(super) fn reconcile<'r>(
    op: Operator,
    lhs: &Value,
    rhs: &'r Value,
) -> Result<Cow<'r, Value>, EvalError> {
    reconcile_kind(op, lhs.kind(), &lhs.type_name(), rhs)
}

/// Reconcile against a bare kind (the element kind of a quantified array).
pub(super) fn reconcile_kind<'r>(
    op: Operator,
    target: ValueKind,
    target_name: &str,
    rhs: &'r Value,
) -> Result<Cow<'r, Value>, EvalError> {
    if rhs.kind() == target {
        return Ok(Cow::Borrowed(rhs));
    }

    if !rhs.can_coerce_to(target) {
        return Err(EvalError::type_mismatch(
            op,
            format!("cannot compare {target_name} with {}", rhs.type_name()),
        ));
    }

    rhs.coerce_to(target)
        .map(Cow::Owned)
        .map_err(|err| EvalError::type_mismatch(op, err.to_string()))
}

/// Reject operators that are undefined for the lhs kind.
pub(super) fn check_operator(op: Operator, kind: ValueKind, is_array: bool) -> Result<(), EvalError> {
    let name = || {
        if is_array {
            format!("{kind}[]")
        } else {
            kind.to_string()
        }
    };

    if op.is_ordering() && (is_array || !kind.is_ordered()) {
        return Err(EvalError::type_mismatch(
            op,
            format!("ordering is undefined for {}", name()),
        ));
    }
    if op.is_pattern() && (is_array || kind != ValueKind::String) {
        return Err(EvalError::type_mismatch(
            op,
            format!("pattern matching is undefined for {}", name()),
        ));
    }

    Ok(())
}
