//! The internal `index` builtin behind `x[a]` and `x[a:b]`. String indexing
//! and slicing operate on Unicode scalar values, never on code units.

use crate::parser::ast::Expression;
use crate::value::{Evaluator, Value};

use super::{check_arity, RuntimeError, Stack};

pub fn index(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    check_arity("index", args, &[2, 3])?;

    if args.len() == 2 {
        let key = eval(&args[0], stack)?;
        let source = eval(&args[1], stack)?;
        index_key(key, source)
    } else {
        let start = range_endpoint(eval(&args[0], stack)?)?;
        let end = range_endpoint(eval(&args[1], stack)?)?;
        let source = eval(&args[2], stack)?;
        index_range(start, end, source)
    }
}

fn index_key(key: Value, source: Value) -> Result<Value, RuntimeError> {
    match source {
        Value::Object(entries) => match key {
            Value::String(name) => Ok(entries.get(&name).cloned().unwrap_or(Value::Null)),
            other => Err(RuntimeError::new(format!(
                "objects can only be indexed with strings, got a {}",
                other.get_type()
            ))),
        },
        Value::Array(values) => {
            let position = integer_key(&key)?;
            Ok(wrap(position, values.len())
                .and_then(|i| values.get(i).cloned())
                .unwrap_or(Value::Null))
        }
        Value::String(text) => {
            let position = integer_key(&key)?;
            let scalars: Vec<char> = text.chars().collect();
            Ok(wrap(position, scalars.len())
                .and_then(|i| scalars.get(i))
                .map(|c| Value::String(c.to_string()))
                .unwrap_or(Value::Null))
        }
        Value::Null => match key {
            Value::Number(_) | Value::String(_) => Ok(Value::Null),
            other => Err(RuntimeError::new(format!(
                "cannot index null with a {}",
                other.get_type()
            ))),
        },
        other => Err(RuntimeError::new(format!(
            "cannot index a {}",
            other.get_type()
        ))),
    }
}

fn index_range(
    start: Option<i64>,
    end: Option<i64>,
    source: Value,
) -> Result<Value, RuntimeError> {
    match source {
        Value::Array(values) => {
            let (from, to) = slice_bounds(start, end, values.len());
            Ok(Value::Array(values[from..to].to_vec()))
        }
        Value::String(text) => {
            let scalars: Vec<char> = text.chars().collect();
            let (from, to) = slice_bounds(start, end, scalars.len());
            Ok(Value::String(scalars[from..to].iter().collect()))
        }
        other => Err(RuntimeError::new(format!(
            "cannot take an index range of a {}",
            other.get_type()
        ))),
    }
}

fn integer_key(value: &Value) -> Result<i64, RuntimeError> {
    match value {
        Value::Number(number) if number.fract() == 0.0 && number.is_finite() => Ok(*number as i64),
        Value::Number(number) => Err(RuntimeError::new(format!(
            "index requires an integer, got {number}"
        ))),
        other => Err(RuntimeError::new(format!(
            "index requires a number, got a {}",
            other.get_type()
        ))),
    }
}

fn range_endpoint(value: Value) -> Result<Option<i64>, RuntimeError> {
    match value {
        Value::Null => Ok(None),
        other => integer_key(&other).map(Some),
    }
}

/// Negative indices wrap from the end; anything still out of range is None.
fn wrap(position: i64, len: usize) -> Option<usize> {
    let len = len as i64;
    let wrapped = if position < 0 { position + len } else { position };

    (0..len).contains(&wrapped).then_some(wrapped as usize)
}

fn slice_bounds(start: Option<i64>, end: Option<i64>, len: usize) -> (usize, usize) {
    let length = len as i64;
    let clamp = |position: i64| {
        if position < 0 {
            (position + length).max(0) as usize
        } else {
            position.min(length) as usize
        }
    };

    let from = start.map(clamp).unwrap_or(0);
    let to = end.map(clamp).unwrap_or(len);

    if from > to {
        (from, from)
    } else {
        (from, to)
    }
}
