//! Casts, regex construction and matching, string surgery, and the numeric
//! summary.

use std::collections::BTreeMap;

use crate::parser::ast::Expression;
use crate::value::{Evaluator, RegexValue, Value};

use super::{check_arity, expect_array, expect_number, expect_string, RuntimeError, Stack};

pub fn string(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    check_arity("string", args, &[1])?;
    Ok(Value::String(eval(&args[0], stack)?.cast_string()?))
}

pub fn float(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    check_arity("float", args, &[1])?;
    Ok(Value::Number(eval(&args[0], stack)?.cast_float()?))
}

pub fn regex(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    check_arity("regex", args, &[1, 2])?;
    let pattern = expect_string("regex", eval(&args[0], stack)?)?;
    let flags = match args.get(1) {
        Some(arg) => expect_string("regex", eval(arg, stack)?)?,
        None => String::new(),
    };

    Ok(Value::Regex(RegexValue::new(&pattern, &flags)?))
}

/// True iff the regex matches the subject, or the two strings are equal.
pub fn match_(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    check_arity("match", args, &[2])?;
    let matcher = eval(&args[0], stack)?;
    let subject = eval(&args[1], stack)?;

    match_values(matcher, subject)
}

pub(super) fn match_values(matcher: Value, subject: Value) -> Result<Value, RuntimeError> {
    let subject = expect_string("match", subject)?;

    match matcher {
        Value::Regex(regex) => Ok(Value::Boolean(regex.regex().is_match(&subject))),
        Value::String(text) => Ok(Value::Boolean(text == subject)),
        other => Err(RuntimeError::new(format!(
            "match expects a regex or string, got a {}",
            other.get_type()
        ))),
    }
}

/// Replaces the first occurrence, or every occurrence for a `g`-flagged
/// regex.
pub fn replace(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    check_arity("replace", args, &[3])?;
    let matcher = eval(&args[0], stack)?;
    let replacement = expect_string("replace", eval(&args[1], stack)?)?;
    let subject = expect_string("replace", eval(&args[2], stack)?)?;

    let replaced = match matcher {
        Value::String(text) => subject.replacen(text.as_str(), &replacement, 1),
        Value::Regex(regex) if regex.is_global() => regex
            .regex()
            .replace_all(&subject, replacement.as_str())
            .into_owned(),
        Value::Regex(regex) => regex
            .regex()
            .replace(&subject, replacement.as_str())
            .into_owned(),
        other => {
            return Err(RuntimeError::new(format!(
                "replace expects a regex or string, got a {}",
                other.get_type()
            )));
        }
    };

    Ok(Value::String(replaced))
}

pub fn split(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    check_arity("split", args, &[2])?;
    let separator = eval(&args[0], stack)?;
    let subject = expect_string("split", eval(&args[1], stack)?)?;

    let pieces: Vec<Value> = match separator {
        Value::String(text) if text.is_empty() => subject
            .chars()
            .map(|c| Value::String(c.to_string()))
            .collect(),
        Value::String(text) => subject
            .split(text.as_str())
            .map(|piece| Value::String(piece.to_string()))
            .collect(),
        Value::Regex(regex) => regex
            .regex()
            .split(&subject)
            .map(|piece| Value::String(piece.to_string()))
            .collect(),
        other => {
            return Err(RuntimeError::new(format!(
                "split expects a regex or string, got a {}",
                other.get_type()
            )));
        }
    };

    Ok(Value::Array(pieces))
}

pub fn join(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    check_arity("join", args, &[2])?;
    let separator = expect_string("join", eval(&args[0], stack)?)?;
    let values = expect_array("join", eval(&args[1], stack)?)?;

    let mut pieces = vec![];
    for value in values {
        pieces.push(value.cast_string()?);
    }

    Ok(Value::String(pieces.join(&separator)))
}

/// Summary statistics of a non-empty numeric array. The median of an
/// even-length array averages the two midpoints; variance is the population
/// variance.
pub fn summarize(
    args: &[Expression],
    stack: &Stack,
    eval: Evaluator,
) -> Result<Value, RuntimeError> {
    check_arity("summarize", args, &[1])?;
    let values = expect_array("summarize", eval(&args[0], stack)?)?;

    let mut numbers = vec![];
    for value in values {
        numbers.push(expect_number("summarize", value)?);
    }

    if numbers.is_empty() {
        return Err(RuntimeError::new(
            "summarize expects a non-empty array of numbers",
        ));
    }

    let count = numbers.len() as f64;
    let min = numbers.iter().copied().fold(f64::INFINITY, f64::min);
    let max = numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = numbers.iter().sum::<f64>() / count;

    let mut sorted = numbers.clone();
    sorted.sort_by(f64::total_cmp);
    let middle = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 {
        (sorted[middle - 1] + sorted[middle]) / 2.0
    } else {
        sorted[middle]
    };

    let variance = numbers
        .iter()
        .map(|n| (n - mean) * (n - mean))
        .sum::<f64>()
        / count;

    let mut summary = BTreeMap::new();
    summary.insert("min".to_string(), Value::Number(min));
    summary.insert("max".to_string(), Value::Number(max));
    summary.insert("mean".to_string(), Value::Number(mean));
    summary.insert("median".to_string(), Value::Number(median));
    summary.insert("variance".to_string(), Value::Number(variance));
    summary.insert("stddev".to_string(), Value::Number(variance.sqrt()));

    Ok(Value::Object(summary))
}
