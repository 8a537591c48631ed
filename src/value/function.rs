use std::rc::Rc;

use crate::interpreter::{RuntimeError, Stack};
use crate::parser::ast::Expression;

use super::Value;

/// The evaluation callback handed to every callable. Callables receive their
/// arguments unevaluated so that they can short-circuit or push scope before
/// evaluating them.
pub type Evaluator = fn(&Expression, &Stack) -> Result<Value, RuntimeError>;

pub type RawFn = dyn Fn(&[Expression], &Stack, Evaluator) -> Result<Value, RuntimeError>;

/// A callable runtime value: a builtin or a host-provided extra.
#[derive(Clone)]
pub struct FunctionValue {
    name: String,
    func: Rc<RawFn>,
}

impl FunctionValue {
    pub fn new(name: impl ToString, func: Rc<RawFn>) -> Self {
        Self {
            name: name.to_string(),
            func,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(
        &self,
        args: &[Expression],
        stack: &Stack,
        eval: Evaluator,
    ) -> Result<Value, RuntimeError> {
        (self.func)(args, stack, eval)
    }
}

impl PartialEq for FunctionValue {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.func, &other.func)
    }
}

impl std::fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionValue")
            .field("name", &self.name)
            .finish()
    }
}
