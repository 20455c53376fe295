use crate::{
    program::{Operator, Program},
    source::Instance,
    types::{CimDateTime, ObjectPath},
    value::Value,
};

/// Build a program from operands in textual order and operations in postfix order.
pub(crate) fn program(operands: impl IntoIterator<Item = Value>, operations: &[Operator]) -> Program {
    let mut program = Program::new();
    for operand in operands {
        if let Value::PropertyName(property) = &operand {
            program.append_property_name(property.name.clone());
        }
        program.append_operand(operand);
    }
    for op in operations {
        program.append_operation(*op);
    }

    program
}

/// `lhs op rhs`
pub(crate) fn comparison(lhs: impl Into<Value>, op: Operator, rhs: impl Into<Value>) -> Program {
    program([lhs.into(), rhs.into()], &[op])
}

/// `quantifier lhs comparator rhs`, e.g. `ANY scores > 50`.
pub(crate) fn quantified(
    lhs: impl Into<Value>,
    quantifier: Operator,
    comparator: Operator,
    rhs: impl Into<Value>,
) -> Program {
    program([lhs.into(), rhs.into()], &[quantifier, comparator])
}

/// Dotted property reference, e.g. `prop("Child.Id")`; `[n]` suffixes set indexes.
pub(crate) fn prop(path: &str) -> Value {
    let mut links = path.split('.').map(link);
    let mut value = links.next().unwrap_or_else(|| Value::property(path));
    for next in links {
        value.chain(next);
    }

    value
}

fn link(segment: &str) -> Value {
    match segment.split_once('[') {
        Some((name, rest)) => {
            let index = rest.trim_end_matches(']').parse().expect("numeric index");
            Value::indexed_property(name, index)
        }
        None => Value::property(segment),
    }
}

pub(crate) fn datetime(text: &str) -> Value {
    Value::DateTime(CimDateTime::parse(text).expect("valid datetime"))
}

pub(crate) fn reference(text: &str) -> Value {
    Value::Reference(ObjectPath::parse(text).expect("valid object path"))
}

pub(crate) const DATE1: &str = "20240102030405.000000+000";

/// Object under test shared by evaluator tests.
pub(crate) fn fixture() -> Instance {
    Instance::new("Test_Sample")
        .with_property("Int1", 10_i64)
        .with_property("Int2", 20_i64)
        .with_property("Double1", 2.5_f64)
        .with_property("Bool1", true)
        .with_property("Str1", "Alpha")
        .with_property("Date1", datetime(DATE1))
        .with_property("Interval1", datetime("00000001000000.000000:000"))
        .with_property("Ref1", reference(r#"root/cimv2:CIM_Disk.DeviceID="sda""#))
        .with_property("IntArray", vec![4_i64, 5, 7])
        .with_property("StrArray", vec!["apple", "avocado"])
        .with_property("BoolArray", vec![true, false])
        .with_property("EmptyArray", Vec::<i64>::new())
        .with_property(
            "DateArray",
            Value::from_scalars(&[
                datetime("20240101000000.000000+000"),
                datetime("20240301000000.000000+000"),
            ])
            .expect("homogeneous"),
        )
        .with_embedded(
            "Child",
            Instance::new("Test_Child")
                .with_property("Id", 7_i64)
                .with_property("Name", "inner"),
        )
        .with_embedded_array(
            "Items",
            vec![
                Instance::new("Test_Item").with_property("Id", 1_i64),
                Instance::new("Test_Item").with_property("Id", 2_i64),
            ],
        )
}
