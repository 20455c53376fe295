use crate::{
    error::{EvalError, ValueError},
    eval::{compare, pattern::PatternCache},
    program::Operator,
    value::Value,
};

///
/// Array quantification
///
/// ANY holds when the comparator holds for some element, EVERY when it holds
/// for all of them; the NOT forms negate their base. Over an empty array ANY
/// is false and EVERY is true. A Null lhs fails all four forms.
///
/// The rhs is reconciled once against the element kind and the comparator
/// checked against it before iterating, so an empty array still reports an
/// ill-typed filter.
///

pub(super) fn quantify(
    quantifier: Operator,
    comparator: Operator,
    lhs: &Value,
    rhs: &Value,
    patterns: &mut PatternCache,
) -> Result<bool, EvalError> {
    if lhs.is_null() {
        return Ok(false);
    }
    if !lhs.is_array() {
        return Err(EvalError::type_mismatch(
            quantifier,
            format!("quantifier needs an array, found {}", lhs.type_name()),
        ));
    }
    if rhs.is_array() {
        return Err(EvalError::type_mismatch(
            quantifier,
            format!("quantified comparison needs a scalar, found {}", rhs.type_name()),
        ));
    }

    let element_kind = lhs.kind();
    let rhs = compare::reconcile_kind(comparator, element_kind, element_kind.label(), rhs)?;
    compare::check_operator(comparator, element_kind, false)?;

    let is_any = matches!(quantifier, Operator::Any | Operator::NotAny);
    let mut holds = !is_any;
    let mut index = 0;
    loop {
        let element = match lhs.element(index) {
            Ok(element) => element,
            Err(ValueError::IndexOutOfBounds { .. }) => break,
            Err(err) => return Err(EvalError::type_mismatch(quantifier, err.to_string())),
        };
        let hit = compare::compare(comparator, &element, &rhs, patterns)?;
        if is_any && hit {
            holds = true;
            break;
        }
        if !is_any && !hit {
            holds = false;
            break;
        }
        index += 1;
    }

    Ok(match quantifier {
        Operator::NotAny | Operator::NotEvery => !holds,
        _ => holds,
    })
}
