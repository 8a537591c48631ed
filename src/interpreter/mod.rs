//! The evaluator: walks the expression tree against a scope stack, resolves
//! references, applies callables with unevaluated arguments, and threads
//! pipeline stages through the `@` context.

mod builtins;
mod stack;

pub use stack::*;

use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use std::{error::Error as StdError, fmt::Display};

use crate::error::Error;
use crate::lexer::Lexer;
use crate::parser::ast::{Expression, Literal};
use crate::parser::parse;
use crate::value::{FunctionValue, RawFn, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeError(String);

impl RuntimeError {
    pub fn new(message: impl ToString) -> Self {
        Self(message.to_string())
    }
}

impl Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl StdError for RuntimeError {}

pub fn eval(expression: &Expression, stack: &Stack) -> Result<Value, RuntimeError> {
    match expression {
        Expression::Literal(literal) => eval_literal(literal, stack),
        Expression::Reference(name) => stack
            .lookup(name)
            .ok_or_else(|| RuntimeError::new(format!("could not find reference '{name}'"))),
        Expression::Application { callee, args } => {
            let value = eval(callee, stack)?;
            let Value::Function(function) = value else {
                return Err(RuntimeError::new(format!(
                    "cannot call a {} as a function",
                    value.get_type()
                )));
            };
            function.call(args, stack, eval)
        }
        Expression::Pipeline { stages } => eval_pipeline(stages, stack),
    }
}

fn eval_literal(literal: &Literal, stack: &Stack) -> Result<Value, RuntimeError> {
    match literal {
        Literal::Null => Ok(Value::Null),
        Literal::Boolean(value) => Ok(Value::Boolean(*value)),
        Literal::Number(value) => Ok(Value::Number(*value)),
        Literal::String(value) => Ok(Value::String(value.clone())),
        Literal::Array(expressions) => {
            let mut values = vec![];
            for expression in expressions {
                values.push(eval(expression, stack)?);
            }
            Ok(Value::Array(values))
        }
        Literal::Object(entries) => {
            let mut object = BTreeMap::new();
            for (key, expression) in entries {
                object.insert(key.clone(), eval(expression, stack)?);
            }
            Ok(Value::Object(object))
        }
    }
}

/// Each stage after the first receives the prior result pushed as `@` (with
/// object fields unpacked) and appended as its trailing argument.
fn eval_pipeline(stages: &[Expression], stack: &Stack) -> Result<Value, RuntimeError> {
    let Some((first, rest)) = stages.split_first() else {
        return Err(RuntimeError::new("empty pipeline"));
    };

    let mut value = eval(first, stack)?;

    for stage in rest {
        let inner = stack.push_context(&value);
        let context = Expression::reference("@");

        let application = match stage {
            Expression::Application { callee, args } => {
                let mut args = args.clone();
                args.push(context);
                Expression::Application {
                    callee: callee.clone(),
                    args,
                }
            }
            other => Expression::application(other.clone(), vec![context]),
        };

        value = eval(&application, &inner)?;
    }

    Ok(value)
}

/// A host-provided function that extends (and may shadow) the builtins.
#[derive(Clone)]
pub enum Extra {
    /// Eagerly evaluated: receives its argument values in the caller's scope.
    Pure(Rc<dyn Fn(&[Value]) -> Result<Value, RuntimeError>>),
    /// The full callable contract: unevaluated arguments, stack, evaluator.
    Raw(Rc<RawFn>),
}

/// One interpreter instance: an immutable bottom frame of builtins plus any
/// registered extras. Queries against the same instance are independent.
pub struct Interpreter {
    bottom: Frame,
}

impl Interpreter {
    pub fn new() -> Self {
        Self {
            bottom: builtins::frame(),
        }
    }

    pub fn with_extras(extras: HashMap<String, Extra>) -> Self {
        let mut interpreter = Self::new();
        for (name, extra) in extras {
            interpreter.add_extra(name, extra);
        }
        interpreter
    }

    pub fn add_extra(&mut self, name: impl ToString, extra: Extra) {
        let name = name.to_string();
        let function = match extra {
            Extra::Raw(func) => FunctionValue::new(&name, func),
            Extra::Pure(func) => {
                let raw: Rc<RawFn> = Rc::new(move |args, stack, eval| {
                    let mut values = vec![];
                    for arg in args {
                        values.push(eval(arg, stack)?);
                    }
                    func(&values)
                });
                FunctionValue::new(&name, raw)
            }
        };
        self.bottom.insert(name, Value::Function(function));
    }

    /// Parses `source` and evaluates it against `data`.
    pub fn query(&self, source: &str, data: &serde_json::Value) -> Result<Value, Error> {
        let tokens = Lexer::new(source).lex()?;
        let expression = parse(tokens, source)?;

        let root = Value::from_json(data);
        let stack = Stack::new(self.bottom.clone()).push_context(&root);

        Ok(eval(&expression, &stack)?)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(source: &str, data: serde_json::Value) -> Value {
        Interpreter::new()
            .query(source, &data)
            .expect("query should succeed")
    }

    #[test]
    fn test_identity() {
        let data = json!({"a": [1, 2], "b": null});
        assert_eq!(run("@", data.clone()), Value::from_json(&data));
    }

    #[test]
    fn test_literals() {
        assert_eq!(run("42", json!(null)), Value::Number(42.0));
        assert_eq!(run("\"x\"", json!(null)), Value::String("x".into()));
        assert_eq!(run("true", json!(null)), Value::Boolean(true));
        assert_eq!(run("null", json!(null)), Value::Null);
    }

    #[test]
    fn test_root_fields_are_bare_references() {
        assert_eq!(run("a", json!({"a": 1})), Value::Number(1.0));
    }

    #[test]
    fn test_unresolved_reference() {
        let result = Interpreter::new().query("nope", &json!({}));
        assert!(matches!(result, Err(Error::Runtime(_))));
    }

    #[test]
    fn test_calling_a_non_function_fails() {
        let result = Interpreter::new().query("a b", &json!({"a": 1, "b": 2}));
        assert!(matches!(result, Err(Error::Runtime(_))));
    }

    #[test]
    fn test_pipeline_threads_context() {
        assert_eq!(
            run("a | keys", json!({"a": {"y": 1, "x": 2}})),
            Value::from_json(&json!(["x", "y"]))
        );
    }

    #[test]
    fn test_pure_extra() {
        let mut interpreter = Interpreter::new();
        interpreter.add_extra(
            "double",
            Extra::Pure(Rc::new(|values: &[Value]| match values {
                [Value::Number(n)] => Ok(Value::Number(n * 2.0)),
                _ => Err(RuntimeError::new("double expects one number")),
            })),
        );

        assert_eq!(
            interpreter.query("double 21", &json!(null)),
            Ok(Value::Number(42.0))
        );
        assert_eq!(
            interpreter.query("@ | map double", &json!([1, 2])),
            Ok(Value::from_json(&json!([2, 4])))
        );
    }

    #[test]
    fn test_extras_may_shadow_builtins() {
        let mut interpreter = Interpreter::new();
        interpreter.add_extra(
            "count",
            Extra::Pure(Rc::new(|_: &[Value]| Ok(Value::Number(-1.0)))),
        );

        assert_eq!(
            interpreter.query("count [1, 2]", &json!(null)),
            Ok(Value::Number(-1.0))
        );
    }

    #[test]
    fn test_raw_extra_sees_unevaluated_arguments() {
        let mut interpreter = Interpreter::new();
        interpreter.add_extra(
            "argcount",
            Extra::Raw(Rc::new(|args, _stack, _eval| {
                Ok(Value::Number(args.len() as f64))
            })),
        );

        assert_eq!(
            interpreter.query("argcount missing references here", &json!(null)),
            Ok(Value::Number(3.0))
        );
    }
}
