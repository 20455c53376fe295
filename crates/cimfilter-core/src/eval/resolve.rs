use crate::{
    source::PropertySource,
    value::{PropertyRef, Value},
};
use std::borrow::Cow;
use tracing::trace;

///
/// Operand resolution
///
/// Literals pass through borrowed. Property references resolve to a fresh
/// owned value; a failed lookup, an index past the end and an index into a
/// non-array all resolve to `Null`. The operand inside the program is never
/// touched.
///

pub(super) fn resolve<'p>(operand: &'p Value, source: &dyn PropertySource) -> Cow<'p, Value> {
    match operand {
        Value::PropertyName(property) => {
            let resolved = resolve_property(property, source).unwrap_or_else(|| {
                trace!(property = %property, "property did not resolve");
                Value::Null
            });

            Cow::Owned(resolved)
        }
        literal => Cow::Borrowed(literal),
    }
}

// Walks `a.b.c` through embedded objects and reads the last link.
fn resolve_property(property: &PropertyRef, source: &dyn PropertySource) -> Option<Value> {
    let Some((last, links)) = property.chain.split_last() else {
        return lookup(source, &property.name, property.index);
    };

    let mut current = source.embedded(&property.name, property.index)?;
    for link in links {
        let link = link.as_property()?;
        current = current.embedded(&link.name, link.index)?;
    }

    let last = last.as_property()?;
    lookup(current, &last.name, last.index)
}

fn lookup(source: &dyn PropertySource, name: &str, index: Option<usize>) -> Option<Value> {
    let value = source.get_value(name)?;

    match index {
        None => Some(value),
        Some(index) => value.element(index).ok(),
    }
}
