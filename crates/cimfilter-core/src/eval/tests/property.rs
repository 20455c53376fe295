use crate::{
    error::EvalError,
    eval::matches,
    program::Operator,
    test_support::{comparison, prop, quantified},
    types::CimDateTime,
    value::Value,
};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn arb_comparison_op() -> impl Strategy<Value = Operator> {
    prop_oneof![
        Just(Operator::Eq),
        Just(Operator::Ne),
        Just(Operator::Lt),
        Just(Operator::Le),
        Just(Operator::Gt),
        Just(Operator::Ge),
        Just(Operator::Like),
        Just(Operator::NotLike),
    ]
}

fn arb_ordered_op() -> impl Strategy<Value = Operator> {
    prop_oneof![
        Just(Operator::Eq),
        Just(Operator::Ne),
        Just(Operator::Lt),
        Just(Operator::Le),
        Just(Operator::Gt),
        Just(Operator::Ge),
    ]
}

fn arb_literal() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<i64>().prop_map(Value::Integer),
        any::<bool>().prop_map(Value::Boolean),
        "[a-z]{0,6}".prop_map(Value::String),
        prop::collection::vec(any::<i64>(), 0..4).prop_map(Value::from),
    ]
}

fn arb_timestamp_text() -> impl Strategy<Value = String> {
    (
        1970u32..2100,
        1u32..=12,
        1u32..=28,
        0u32..24,
        0u32..60,
        0u32..60,
        0u32..1_000_000,
        -720i32..=720,
    )
        .prop_map(|(y, mo, d, h, mi, s, us, offset)| {
            let sign = if offset < 0 { '-' } else { '+' };
            format!(
                "{y:04}{mo:02}{d:02}{h:02}{mi:02}{s:02}.{us:06}{sign}{:03}",
                offset.unsigned_abs()
            )
        })
}

fn source(name: &str, value: Value) -> BTreeMap<String, Value> {
    let mut source = BTreeMap::new();
    source.insert(name.to_string(), value);
    source
}

fn apply(op: Operator, a: i64, b: i64) -> bool {
    match op {
        Operator::Eq => a == b,
        Operator::Ne => a != b,
        Operator::Lt => a < b,
        Operator::Le => a <= b,
        Operator::Gt => a > b,
        Operator::Ge => a >= b,
        _ => unreachable!("ordered comparator"),
    }
}

proptest! {
    #[test]
    fn missing_lhs_only_satisfies_ne(op in arb_comparison_op(), rhs in arb_literal()) {
        let program = comparison(prop("absent"), op, rhs);
        let result = matches(&program, &BTreeMap::<String, Value>::new());

        prop_assert_eq!(result, Ok(op == Operator::Ne));
    }

    #[test]
    fn array_equality_is_length_then_elementwise(
        a in prop::collection::vec(-3i64..3, 0..4),
        b in prop::collection::vec(-3i64..3, 0..4),
    ) {
        let expected = a.len() == b.len() && a.iter().zip(&b).all(|(x, y)| x == y);
        let obj = source("arr", Value::from(a));

        let eq = matches(&comparison(prop("arr"), Operator::Eq, b.clone()), &obj);
        let ne = matches(&comparison(prop("arr"), Operator::Ne, b), &obj);

        prop_assert_eq!(eq, Ok(expected));
        prop_assert_eq!(ne, Ok(!expected));
    }

    #[test]
    fn quantifiers_match_any_and_all(
        items in prop::collection::vec(-5i64..5, 0..6),
        rhs in -5i64..5,
        comparator in arb_ordered_op(),
    ) {
        let any = items.iter().any(|x| apply(comparator, *x, rhs));
        let every = items.iter().all(|x| apply(comparator, *x, rhs));
        let obj = source("items", Value::from(items));

        for (quantifier, expected) in [
            (Operator::Any, any),
            (Operator::Every, every),
            (Operator::NotAny, !any),
            (Operator::NotEvery, !every),
        ] {
            let program = quantified(prop("items"), quantifier, comparator, rhs);
            prop_assert_eq!(matches(&program, &obj), Ok(expected));
        }
    }

    #[test]
    fn string_rhs_behaves_like_datetime_rhs(
        lhs in arb_timestamp_text(),
        rhs in arb_timestamp_text(),
        op in arb_ordered_op(),
    ) {
        let lhs_dt = CimDateTime::parse(&lhs).expect("generated datetime");
        let rhs_dt = CimDateTime::parse(&rhs).expect("generated datetime");
        let obj = source("when", Value::DateTime(lhs_dt));

        let coerced = matches(&comparison(prop("when"), op, rhs.clone()), &obj);
        let direct = matches(&comparison(prop("when"), op, rhs_dt), &obj);
        prop_assert_eq!(coerced, direct);

        // no reverse coercion
        let text_obj = source("when", Value::String(lhs));
        let reverse = matches(&comparison(prop("when"), op, rhs_dt), &text_obj);
        let is_mismatch = matches!(reverse, Err(EvalError::TypeMismatch { .. }));
        prop_assert!(is_mismatch);
    }

    #[test]
    fn evaluation_is_idempotent(value in arb_literal(), op in arb_ordered_op(), rhs in any::<i64>()) {
        let obj = source("p", value);
        let program = comparison(prop("p"), op, rhs);

        prop_assert_eq!(matches(&program, &obj), matches(&program, &obj));
    }
}
