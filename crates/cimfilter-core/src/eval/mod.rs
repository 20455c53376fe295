mod compare;
mod pattern;
mod quantifier;
mod resolve;


use crate::{
    config::EvalConfig,
    error::EvalError,
    program::{Operator, Program},
    source::PropertySource,
    value::Value,
};
use pattern::PatternCache;
use std::borrow::Cow;
use tracing::{debug, trace};

///
/// Evaluate a compiled program against one object.
///
/// This is the whole surface consumed by subscription filtering: a boolean
/// decision, or a fatal error for an ill-typed or broken program.
///
pub fn matches(program: &Program, source: &dyn PropertySource) -> Result<bool, EvalError> {
    Evaluator::new(program).evaluate(source)
}

///
/// Evaluator
///
/// Stack machine over a borrowed, read-only `Program`.
/// Holds no per-evaluation state, so one evaluator may be shared across
/// threads and reused for any number of objects.
///

#[derive(Clone, Debug)]
pub struct Evaluator<'a> {
    program: &'a Program,
    config: EvalConfig,
}

impl<'a> Evaluator<'a> {
    #[must_use]
    pub fn new(program: &'a Program) -> Self {
        Self {
            program,
            config: EvalConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(program: &'a Program, config: &EvalConfig) -> Self {
        Self {
            program,
            config: config.clone(),
        }
    }

    #[must_use]
    pub const fn program(&self) -> &'a Program {
        self.program
    }

    #[must_use]
    pub const fn config(&self) -> &EvalConfig {
        &self.config
    }

    #[tracing::instrument(
        skip_all,
        level = "debug",
        fields(operations = self.program.operations().len())
    )]
    pub fn evaluate(&self, source: &dyn PropertySource) -> Result<bool, EvalError> {
        let result = self.run(source);
        if let Err(err) = &result {
            debug!(error = %err, class = %err.class(), "evaluation aborted");
        }

        result
    }

    fn run(&self, source: &dyn PropertySource) -> Result<bool, EvalError> {
        let operations = self.program.operations();
        if let Some(limit) = self.config.max_operations
            && operations.len() > limit
        {
            return Err(EvalError::LimitExceeded {
                limit,
                found: operations.len(),
            });
        }

        let mut machine = Machine {
            operands: self.program.operands(),
            source,
            stack: Vec::with_capacity(operations.len()),
            cursor: 0,
            patterns: PatternCache::new(&self.config),
        };

        let mut ops = operations.iter().copied();
        while let Some(op) = ops.next() {
            let result = match op {
                Operator::And => {
                    let (lhs, rhs) = machine.pop_pair(op)?;
                    lhs && rhs
                }
                Operator::Or => {
                    let (lhs, rhs) = machine.pop_pair(op)?;
                    lhs || rhs
                }
                Operator::Not => !machine.pop(op)?,
                Operator::IsNull => machine.next_operand(op)?.is_null(),
                op if op.is_quantifier() => {
                    let comparator = ops.next().filter(|next| next.is_comparison()).ok_or_else(
                        || EvalError::malformed(format!("{op} must be followed by a comparison")),
                    )?;
                    let lhs = machine.next_operand(op)?;
                    let rhs = machine.next_operand(op)?;

                    quantifier::quantify(op, comparator, &lhs, &rhs, &mut machine.patterns)?
                }
                op => {
                    let lhs = machine.next_operand(op)?;
                    let rhs = machine.next_operand(op)?;

                    compare::compare(op, &lhs, &rhs, &mut machine.patterns)?
                }
            };

            trace!(op = %op, result, depth = machine.stack.len() + 1, "executed");
            machine.stack.push(result);
        }

        machine.finish()
    }
}

///
/// Machine
/// Per-evaluation state; dropped when `run` returns.
///

struct Machine<'p, 's> {
    operands: &'p [Value],
    source: &'s dyn PropertySource,
    stack: Vec<bool>,
    cursor: usize,
    patterns: PatternCache,
}

impl<'p> Machine<'p, '_> {
    fn pop(&mut self, op: Operator) -> Result<bool, EvalError> {
        self.stack
            .pop()
            .ok_or_else(|| EvalError::malformed(format!("stack underflow at {op}")))
    }

    fn pop_pair(&mut self, op: Operator) -> Result<(bool, bool), EvalError> {
        let rhs = self.pop(op)?;
        let lhs = self.pop(op)?;

        Ok((lhs, rhs))
    }

    // Consume the next operand and resolve it against the source.
    fn next_operand(&mut self, op: Operator) -> Result<Cow<'p, Value>, EvalError> {
        let operand = self.operands.get(self.cursor).ok_or_else(|| {
            EvalError::malformed(format!(
                "{op} needs operand {} but the program has {}",
                self.cursor,
                self.operands.len()
            ))
        })?;
        self.cursor += 1;

        let resolved = resolve::resolve(operand, self.source);
        trace!(cursor = self.cursor - 1, operand = %resolved, "resolved operand");

        Ok(resolved)
    }

    fn finish(self) -> Result<bool, EvalError> {
        match self.stack.as_slice() {
            [result] => Ok(*result),
            stack => Err(EvalError::malformed(format!(
                "program left {} results on the stack",
                stack.len()
            ))),
        }
    }
}
