use crate::{
    error::ValueError,
    types::{CimDateTime, ObjectPath},
    value::{PropertyRef, Value, ValueArray, ValueKind},
};
use std::cmp::Ordering;

// ---- helpers -----------------------------------------------------------

fn v_dt(s: &str) -> Value {
    Value::DateTime(CimDateTime::parse(s).expect("valid datetime"))
}

fn v_ref(s: &str) -> Value {
    Value::Reference(ObjectPath::parse(s).expect("valid object path"))
}

// ---- accessors ---------------------------------------------------------

#[test]
fn scalar_accessors_match_kind() {
    assert_eq!(Value::Integer(7).as_integer(), Ok(7));
    assert_eq!(Value::Double(1.5).as_double(), Ok(1.5));
    assert_eq!(Value::Boolean(true).as_boolean(), Ok(true));
    assert_eq!(Value::from("abc").as_string(), Ok("abc"));
}

#[test]
fn scalar_accessor_on_wrong_kind_is_recoverable_mismatch() {
    let err = Value::Integer(7).as_string().unwrap_err();

    assert_eq!(
        err,
        ValueError::TypeMismatch {
            expected: "String".into(),
            found: "Integer".into(),
        }
    );
}

#[test]
fn scalar_accessor_rejects_array_form() {
    let err = Value::from(vec![1_i64, 2]).as_integer().unwrap_err();

    assert!(matches!(err, ValueError::TypeMismatch { found, .. } if found == "Integer[]"));
}

#[test]
fn array_accessor_rejects_scalar_form() {
    assert!(matches!(
        Value::Integer(1).as_array_integer(),
        Err(ValueError::TypeMismatch { .. })
    ));
    assert_eq!(
        Value::from(vec![1_i64, 2]).as_array_integer(),
        Ok([1_i64, 2].as_slice())
    );
}

#[test]
fn indexed_access_distinguishes_out_of_bounds() {
    let value = Value::from(vec!["a", "b"]);

    assert_eq!(value.string_at(1), Ok("b"));
    assert_eq!(
        value.string_at(2),
        Err(ValueError::IndexOutOfBounds { index: 2, len: 2 })
    );
    assert!(matches!(
        value.integer_at(0),
        Err(ValueError::TypeMismatch { .. })
    ));
}

#[test]
fn element_keeps_element_kind() {
    let value = Value::from(vec![1.25_f64, 2.5]);

    assert_eq!(value.element(1), Ok(Value::Double(2.5)));
    assert_eq!(
        value.element(5),
        Err(ValueError::IndexOutOfBounds { index: 5, len: 2 })
    );
    assert!(Value::Double(1.0).element(0).is_err());
}

#[test]
fn size_is_reported_for_arrays_only() {
    assert_eq!(Value::from(vec![true, false, true]).size(), Some(3));
    assert_eq!(Value::Boolean(true).size(), None);
    assert_eq!(Value::Null.size(), None);
}

#[test]
fn kind_of_array_is_element_kind() {
    let value = Value::from(vec![1_i64]);

    assert_eq!(value.kind(), ValueKind::Integer);
    assert!(value.is_array());
    assert_eq!(value.type_name(), "Integer[]");
}

// ---- array construction -----------------------------------------------

#[test]
fn from_scalars_builds_homogeneous_array() {
    let array = Value::from_scalars(&[Value::from("x"), Value::from("y")]).unwrap();

    assert_eq!(
        array,
        Value::Array(ValueArray::String(vec!["x".into(), "y".into()]))
    );
}

#[test]
fn from_scalars_rejects_empty_input() {
    assert_eq!(Value::from_scalars(&[]), Err(ValueError::EmptyArray));
}

#[test]
fn from_scalars_rejects_mixed_kinds() {
    let err = Value::from_scalars(&[Value::Integer(1), Value::Integer(2), Value::Double(3.0)])
        .unwrap_err();

    assert_eq!(
        err,
        ValueError::HeterogeneousArray {
            index: 2,
            expected: ValueKind::Integer,
            found: ValueKind::Double,
        }
    );
}

#[test]
fn from_scalars_rejects_null_and_nested_arrays() {
    assert!(matches!(
        Value::from_scalars(&[Value::Null]),
        Err(ValueError::TypeMismatch { .. })
    ));
    assert!(Value::from_scalars(&[Value::from(vec![1_i64])]).is_err());
    assert!(Value::from_scalars(&[Value::Integer(1), Value::from(vec![2_i64])]).is_err());
}

// ---- property references ----------------------------------------------

#[test]
fn chain_appends_to_property() {
    let mut value = Value::indexed_property("a", 2);
    value.chain(Value::property("b"));
    value.chain(Value::property("c"));

    let property = value.as_property().unwrap();
    assert_eq!(property.chain.len(), 2);
    assert_eq!(property.to_string(), "a[2].b.c");
}

#[test]
#[should_panic(expected = "chain() called on Integer value")]
fn chain_on_literal_panics() {
    Value::Integer(1).chain(Value::property("b"));
}

// ---- coercion ---------------------------------------------------------

#[test]
fn string_coerces_to_datetime_and_reference() {
    let text = Value::from("20240102030405.000000+000");
    assert_eq!(
        text.coerce_to(ValueKind::DateTime),
        Ok(v_dt("20240102030405.000000+000"))
    );

    let text = Value::from(r#"Cls.Id="a""#);
    assert_eq!(text.coerce_to(ValueKind::Reference), Ok(v_ref(r#"Cls.Id="a""#)));
}

#[test]
fn coercion_is_one_directional() {
    let dt = v_dt("20240102030405.000000+000");

    assert!(!dt.can_coerce_to(ValueKind::String));
    assert!(dt.coerce_to(ValueKind::String).is_err());
    assert!(Value::Integer(1).coerce_to(ValueKind::Double).is_err());
}

#[test]
fn unparseable_string_coercion_is_type_mismatch() {
    assert!(matches!(
        Value::from("not a date").coerce_to(ValueKind::DateTime),
        Err(ValueError::TypeMismatch { .. })
    ));
}

#[test]
fn string_array_coerces_element_wise() {
    let array = Value::from(vec!["A.k=1", "B.k=2"]);
    let coerced = array.coerce_to(ValueKind::Reference).unwrap();

    assert_eq!(coerced.size(), Some(2));
    assert_eq!(coerced.reference_at(1).unwrap().class_name(), "B");
}

// ---- comparison -------------------------------------------------------

#[test]
fn ordered_cmp_only_for_ordered_kinds() {
    assert_eq!(
        Value::Integer(1).ordered_cmp(&Value::Integer(2)),
        Some(Ordering::Less)
    );
    assert_eq!(
        Value::from("b").ordered_cmp(&Value::from("a")),
        Some(Ordering::Greater)
    );
    assert_eq!(Value::Boolean(true).ordered_cmp(&Value::Boolean(true)), None);
    assert_eq!(Value::Integer(1).ordered_cmp(&Value::Double(1.0)), None);
    assert_eq!(
        Value::from(vec![1_i64]).ordered_cmp(&Value::from(vec![1_i64])),
        None
    );
}

#[test]
fn array_equality_is_length_then_elements() {
    let a = Value::from(vec![1_i64, 2, 3]);

    assert_eq!(a, Value::from(vec![1_i64, 2, 3]));
    assert_ne!(a, Value::from(vec![1_i64, 2]));
    assert_ne!(a, Value::from(vec![1_i64, 2, 4]));
}

#[test]
fn reference_equality_ignores_name_case() {
    assert_eq!(v_ref(r#"ns:Cls.Id="a""#), v_ref(r#"NS:cls.id="a""#));
}

// ---- rendering --------------------------------------------------------

#[test]
fn display_distinguishes_every_kind() {
    let rendered: Vec<String> = [
        Value::Null,
        Value::Integer(1),
        Value::Double(1.0),
        Value::Boolean(true),
        Value::from("1"),
        v_dt("20240102030405.000000+000"),
        v_ref("Cls.k=1"),
        Value::PropertyName(PropertyRef::new("p")),
        Value::from(vec![1_i64]),
    ]
    .iter()
    .map(ToString::to_string)
    .collect();

    assert_eq!(
        rendered,
        [
            "Null: NULL",
            "Integer: 1",
            "Double: 1.0",
            "Boolean: true",
            "String: \"1\"",
            "DateTime: 20240102030405.000000+000",
            "Reference: Cls.k=1",
            "PropertyName: p",
            "Integer[]: {1}",
        ]
    );
}
