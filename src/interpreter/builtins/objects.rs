//! Builtins over objects. Enumeration order is always ascending by key.

use std::collections::BTreeMap;

use crate::parser::ast::Expression;
use crate::value::{Evaluator, Value};

use super::{check_arity, eval_lambda, expect_array, expect_object, RuntimeError, Stack};

pub fn keys(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    check_arity("keys", args, &[1])?;
    let entries = expect_object("keys", eval(&args[0], stack)?)?;

    Ok(Value::Array(
        entries.into_keys().map(Value::String).collect(),
    ))
}

pub fn values(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    check_arity("values", args, &[1])?;
    let entries = expect_object("values", eval(&args[0], stack)?)?;

    Ok(Value::Array(entries.into_values().collect()))
}

pub fn entries(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    check_arity("entries", args, &[1])?;
    let entries = expect_object("entries", eval(&args[0], stack)?)?;

    Ok(Value::Array(
        entries
            .into_iter()
            .map(|(key, value)| Value::Array(vec![Value::String(key), value]))
            .collect(),
    ))
}

/// Inverse of `entries`. Non-string keys stringify, a missing value slot
/// becomes null, a missing key slot becomes the string "null".
pub fn fromentries(
    args: &[Expression],
    stack: &Stack,
    eval: Evaluator,
) -> Result<Value, RuntimeError> {
    check_arity("fromentries", args, &[1])?;
    let pairs = expect_array("fromentries", eval(&args[0], stack)?)?;

    let mut object = BTreeMap::new();
    for pair in pairs {
        let entry = expect_array("fromentries", pair)?;
        let key = entry.first().cloned().unwrap_or(Value::Null).cast_string()?;
        let value = entry.get(1).cloned().unwrap_or(Value::Null);
        object.insert(key, value);
    }

    Ok(Value::Object(object))
}

pub fn mapvalues(
    args: &[Expression],
    stack: &Stack,
    eval: Evaluator,
) -> Result<Value, RuntimeError> {
    check_arity("mapvalues", args, &[2])?;
    let entries = expect_object("mapvalues", eval(&args[1], stack)?)?;

    let mut mapped = BTreeMap::new();
    for (key, value) in entries {
        mapped.insert(key, eval_lambda(&args[0], stack, eval, &value)?);
    }

    Ok(Value::Object(mapped))
}

pub fn filtervalues(
    args: &[Expression],
    stack: &Stack,
    eval: Evaluator,
) -> Result<Value, RuntimeError> {
    check_arity("filtervalues", args, &[2])?;
    let entries = expect_object("filtervalues", eval(&args[1], stack)?)?;

    let mut kept = BTreeMap::new();
    for (key, value) in entries {
        if eval_lambda(&args[0], stack, eval, &value)?.truthy() {
            kept.insert(key, value);
        }
    }

    Ok(Value::Object(kept))
}

/// The lambda sees each key as `@`; its result is stringified. Colliding
/// result keys resolve to the entry that iterates last.
pub fn mapkeys(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    check_arity("mapkeys", args, &[2])?;
    let entries = expect_object("mapkeys", eval(&args[1], stack)?)?;

    let mut mapped = BTreeMap::new();
    for (key, value) in entries {
        let mapped_key = eval_lambda(&args[0], stack, eval, &Value::String(key))?.cast_string()?;
        mapped.insert(mapped_key, value);
    }

    Ok(Value::Object(mapped))
}

pub fn filterkeys(
    args: &[Expression],
    stack: &Stack,
    eval: Evaluator,
) -> Result<Value, RuntimeError> {
    check_arity("filterkeys", args, &[2])?;
    let entries = expect_object("filterkeys", eval(&args[1], stack)?)?;

    let mut kept = BTreeMap::new();
    for (key, value) in entries {
        if eval_lambda(&args[0], stack, eval, &Value::String(key.clone()))?.truthy() {
            kept.insert(key, value);
        }
    }

    Ok(Value::Object(kept))
}
