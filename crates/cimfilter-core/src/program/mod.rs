mod operator;


use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use operator::Operator;

///
/// Program
///
/// Compiled form of one filter expression.
///
/// `operands` are in textual (infix) order, `operations` in postfix order.
/// Evaluating the operations left to right consumes operands in the order they
/// were appended. A Program is built once by a compiler and then only read;
/// evaluation never writes back into it.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Program {
    operands: Vec<Value>,
    operations: Vec<Operator>,
    property_names: Vec<String>,
}

impl Program {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            operands: Vec::new(),
            operations: Vec::new(),
            property_names: Vec::new(),
        }
    }

    pub fn append_operand(&mut self, operand: impl Into<Value>) {
        self.operands.push(operand.into());
    }

    pub fn append_operation(&mut self, operation: Operator) {
        self.operations.push(operation);
    }

    /// Append a dotted sub-property link to the most recent operand.
    ///
    /// The compiler only calls this right after appending a property operand;
    /// any other last operand is a compiler bug.
    pub fn chain_last_operand(&mut self, link: impl Into<Value>) {
        match self.operands.last_mut() {
            Some(last @ Value::PropertyName(_)) => last.chain(link.into()),
            Some(other) => panic!(
                "chain_last_operand() requires a property operand, found {}",
                other.type_name()
            ),
            None => panic!("chain_last_operand() called on a program without operands"),
        }
    }

    /// Record a top-level property name referenced by the filter.
    ///
    /// Returns `false` when the name (ASCII case-insensitive) is already known.
    pub fn append_property_name(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self
            .property_names
            .iter()
            .any(|known| known.eq_ignore_ascii_case(&name))
        {
            return false;
        }

        self.property_names.push(name);
        true
    }

    #[must_use]
    pub fn operands(&self) -> &[Value] {
        &self.operands
    }

    #[must_use]
    pub fn operations(&self) -> &[Operator] {
        &self.operations
    }

    /// Distinct property names in first-reference order.
    #[must_use]
    pub fn property_names(&self) -> &[String] {
        &self.property_names
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn clear(&mut self) {
        self.operands.clear();
        self.operations.clear();
        self.property_names.clear();
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "operations:")?;
        for (i, op) in self.operations.iter().enumerate() {
            writeln!(f, "  [{i}] {op}")?;
        }

        writeln!(f, "operands:")?;
        for (i, operand) in self.operands.iter().enumerate() {
            writeln!(f, "  [{i}] {operand}")?;
            if let Value::PropertyName(property) = operand {
                for (j, link) in property.chain.iter().enumerate() {
                    writeln!(f, "      chain[{j}] {link}")?;
                }
            }
        }

        Ok(())
    }
}
