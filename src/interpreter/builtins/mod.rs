//! The builtin catalogue. Every builtin follows the callable contract: it
//! receives its argument expressions unevaluated, the current stack, and the
//! evaluator, and is responsible for arity checks, evaluation order, and any
//! scope pushing.

mod collections;
mod index;
mod objects;
mod operators;
mod strings;

use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use crate::parser::ast::Expression;
use crate::value::{Evaluator, FunctionValue, Value, ValueType};

use super::{Frame, RuntimeError, Stack};

macro_rules! builtin {
    ($map:ident, $name:expr, $func:path) => {
        $map.insert(
            $name.to_string(),
            Value::Function(FunctionValue::new($name, Rc::new($func))),
        );
    };
}

/// Builds the bottom stack frame holding every builtin.
pub fn frame() -> Frame {
    let mut m = HashMap::new();

    builtin!(m, "map", collections::map);
    builtin!(m, "filter", collections::filter);
    builtin!(m, "find", collections::find);
    builtin!(m, "reduce", collections::reduce);
    builtin!(m, "sort", collections::sort);
    builtin!(m, "sortby", collections::sortby);
    builtin!(m, "reverse", collections::reverse);
    builtin!(m, "head", collections::head);
    builtin!(m, "tail", collections::tail);
    builtin!(m, "first", collections::first);
    builtin!(m, "last", collections::last);
    builtin!(m, "count", collections::count);
    builtin!(m, "sum", collections::sum);
    builtin!(m, "flatten", collections::flatten);
    builtin!(m, "withindices", collections::withindices);
    builtin!(m, "groupby", collections::groupby);
    builtin!(m, "sequence", collections::sequence);

    builtin!(m, "keys", objects::keys);
    builtin!(m, "values", objects::values);
    builtin!(m, "entries", objects::entries);
    builtin!(m, "fromentries", objects::fromentries);
    builtin!(m, "mapvalues", objects::mapvalues);
    builtin!(m, "filtervalues", objects::filtervalues);
    builtin!(m, "mapkeys", objects::mapkeys);
    builtin!(m, "filterkeys", objects::filterkeys);

    builtin!(m, "string", strings::string);
    builtin!(m, "float", strings::float);
    builtin!(m, "regex", strings::regex);
    builtin!(m, "match", strings::match_);
    builtin!(m, "replace", strings::replace);
    builtin!(m, "split", strings::split);
    builtin!(m, "join", strings::join);
    builtin!(m, "summarize", strings::summarize);

    builtin!(m, "if", operators::if_);
    builtin!(m, "apply", operators::apply);
    builtin!(m, "log", operators::log);
    builtin!(m, "index", index::index);

    builtin!(m, "+", operators::add);
    builtin!(m, "-", operators::subtract);
    builtin!(m, "*", operators::multiply);
    builtin!(m, "/", operators::divide);
    builtin!(m, "%", operators::modulo);
    builtin!(m, "<", operators::less_than);
    builtin!(m, ">", operators::greater_than);
    builtin!(m, "<=", operators::less_or_equal);
    builtin!(m, ">=", operators::greater_or_equal);
    builtin!(m, "==", operators::equal);
    builtin!(m, "!=", operators::not_equal);
    builtin!(m, "=~", operators::match_operator);
    builtin!(m, "&&", operators::and);
    builtin!(m, "||", operators::or);
    builtin!(m, ".", operators::dot);
    builtin!(m, "-/unary", operators::negate);
    builtin!(m, "!/unary", operators::not);

    Frame::from(m)
}

pub(crate) fn check_arity(
    name: &str,
    args: &[Expression],
    allowed: &[usize],
) -> Result<(), RuntimeError> {
    if allowed.contains(&args.len()) {
        return Ok(());
    }

    let expected = allowed
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(" or ");

    Err(RuntimeError::new(format!(
        "{name} expects {expected} argument(s), got {}",
        args.len()
    )))
}

/// Evaluates a lambda argument for one item: pushes the item as `@` (with
/// object fields unpacked) and evaluates. A result that is itself a function
/// is applied to `@`, so bare references to callables work as lambdas.
pub(crate) fn eval_lambda(
    expression: &Expression,
    stack: &Stack,
    eval: Evaluator,
    item: &Value,
) -> Result<Value, RuntimeError> {
    let inner = stack.push_context(item);
    let result = eval(expression, &inner)?;

    if let Value::Function(function) = result {
        function.call(&[Expression::reference("@")], &inner, eval)
    } else {
        Ok(result)
    }
}

pub(crate) fn expect_array(name: &str, value: Value) -> Result<Vec<Value>, RuntimeError> {
    match value {
        Value::Array(values) => Ok(values),
        other => Err(type_mismatch(name, ValueType::Array, &other)),
    }
}

pub(crate) fn expect_object(
    name: &str,
    value: Value,
) -> Result<BTreeMap<String, Value>, RuntimeError> {
    match value {
        Value::Object(entries) => Ok(entries),
        other => Err(type_mismatch(name, ValueType::Object, &other)),
    }
}

pub(crate) fn expect_string(name: &str, value: Value) -> Result<String, RuntimeError> {
    match value {
        Value::String(text) => Ok(text),
        other => Err(type_mismatch(name, ValueType::String, &other)),
    }
}

pub(crate) fn expect_number(name: &str, value: Value) -> Result<f64, RuntimeError> {
    match value {
        Value::Number(number) => Ok(number),
        other => Err(type_mismatch(name, ValueType::Number, &other)),
    }
}

fn type_mismatch(name: &str, expected: ValueType, got: &Value) -> RuntimeError {
    RuntimeError::new(format!(
        "{name} expects a {expected}, got a {}",
        got.get_type()
    ))
}
