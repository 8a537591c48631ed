//! Builtins over arrays: transforms, folds, ordering, grouping, and the
//! subsequence search.

use std::collections::BTreeMap;

use crate::parser::ast::Expression;
use crate::value::{Evaluator, Value, ValueType};

use super::{check_arity, eval_lambda, expect_array, expect_number, RuntimeError, Stack};

pub fn map(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    check_arity("map", args, &[2])?;
    let values = expect_array("map", eval(&args[1], stack)?)?;

    let mut mapped = vec![];
    for value in &values {
        mapped.push(eval_lambda(&args[0], stack, eval, value)?);
    }

    Ok(Value::Array(mapped))
}

pub fn filter(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    check_arity("filter", args, &[2])?;
    let values = expect_array("filter", eval(&args[1], stack)?)?;

    let mut kept = vec![];
    for value in values {
        if eval_lambda(&args[0], stack, eval, &value)?.truthy() {
            kept.push(value);
        }
    }

    Ok(Value::Array(kept))
}

pub fn find(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    check_arity("find", args, &[2])?;
    let values = expect_array("find", eval(&args[1], stack)?)?;

    for value in values {
        if eval_lambda(&args[0], stack, eval, &value)?.truthy() {
            return Ok(value);
        }
    }

    Ok(Value::Null)
}

/// Left fold. The lambda sees `@` as the two-element array
/// `[accumulator, current]`.
pub fn reduce(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    check_arity("reduce", args, &[3])?;
    let mut accumulator = eval(&args[1], stack)?;
    let values = expect_array("reduce", eval(&args[2], stack)?)?;

    for value in values {
        let pair = Value::Array(vec![accumulator, value]);
        accumulator = eval_lambda(&args[0], stack, eval, &pair)?;
    }

    Ok(accumulator)
}

fn ensure_comparable<'a>(
    name: &str,
    mut values: impl Iterator<Item = &'a Value>,
) -> Result<(), RuntimeError> {
    let Some(first) = values.next() else {
        return Ok(());
    };

    let tag = first.get_type();
    if !matches!(
        tag,
        ValueType::Number | ValueType::Boolean | ValueType::String
    ) {
        return Err(RuntimeError::new(format!("{name} cannot order {tag} values")));
    }

    for value in values {
        if value.get_type() != tag {
            return Err(RuntimeError::new(format!(
                "{name} cannot order {tag} values with {} values",
                value.get_type()
            )));
        }
    }

    Ok(())
}

pub fn sort(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    check_arity("sort", args, &[1])?;
    let mut values = expect_array("sort", eval(&args[0], stack)?)?;

    ensure_comparable("sort", values.iter())?;
    values.sort_by(|a, b| a.compare(b).unwrap_or(std::cmp::Ordering::Equal));

    Ok(Value::Array(values))
}

pub fn sortby(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    check_arity("sortby", args, &[2])?;
    let values = expect_array("sortby", eval(&args[1], stack)?)?;

    let mut keyed = vec![];
    for value in values {
        keyed.push((eval_lambda(&args[0], stack, eval, &value)?, value));
    }

    ensure_comparable("sortby", keyed.iter().map(|(key, _)| key))?;
    keyed.sort_by(|(a, _), (b, _)| a.compare(b).unwrap_or(std::cmp::Ordering::Equal));

    Ok(Value::Array(keyed.into_iter().map(|(_, value)| value).collect()))
}

pub fn reverse(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    check_arity("reverse", args, &[1])?;
    let mut values = expect_array("reverse", eval(&args[0], stack)?)?;
    values.reverse();

    Ok(Value::Array(values))
}

fn count_argument(name: &str, args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<usize, RuntimeError> {
    let number = expect_number(name, eval(&args[0], stack)?)?;
    if number.fract() != 0.0 || number < 0.0 {
        return Err(RuntimeError::new(format!(
            "{name} expects a non-negative integer, got {number}"
        )));
    }
    Ok(number as usize)
}

pub fn head(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    check_arity("head", args, &[2])?;
    let n = count_argument("head", args, stack, eval)?;
    let mut values = expect_array("head", eval(&args[1], stack)?)?;

    values.truncate(n);
    Ok(Value::Array(values))
}

/// The last `n` elements.
pub fn tail(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    check_arity("tail", args, &[2])?;
    let n = count_argument("tail", args, stack, eval)?;
    let values = expect_array("tail", eval(&args[1], stack)?)?;

    let skip = values.len().saturating_sub(n);
    Ok(Value::Array(values[skip..].to_vec()))
}

pub fn first(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    check_arity("first", args, &[1])?;
    let values = expect_array("first", eval(&args[0], stack)?)?;

    Ok(values.into_iter().next().unwrap_or(Value::Null))
}

pub fn last(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    check_arity("last", args, &[1])?;
    let values = expect_array("last", eval(&args[0], stack)?)?;

    Ok(values.into_iter().next_back().unwrap_or(Value::Null))
}

pub fn count(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    check_arity("count", args, &[1])?;
    let values = expect_array("count", eval(&args[0], stack)?)?;

    Ok(Value::Number(values.len() as f64))
}

pub fn sum(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    check_arity("sum", args, &[1])?;
    let values = expect_array("sum", eval(&args[0], stack)?)?;

    let mut total = 0.0;
    for value in values {
        total += expect_number("sum", value)?;
    }

    Ok(Value::Number(total))
}

/// Flattens one level; every element must itself be an array.
pub fn flatten(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    check_arity("flatten", args, &[1])?;
    let values = expect_array("flatten", eval(&args[0], stack)?)?;

    let mut flattened = vec![];
    for value in values {
        flattened.extend(expect_array("flatten", value)?);
    }

    Ok(Value::Array(flattened))
}

pub fn withindices(
    args: &[Expression],
    stack: &Stack,
    eval: Evaluator,
) -> Result<Value, RuntimeError> {
    check_arity("withindices", args, &[1])?;
    let values = expect_array("withindices", eval(&args[0], stack)?)?;

    Ok(Value::Array(
        values
            .into_iter()
            .enumerate()
            .map(|(index, value)| Value::Array(vec![Value::Number(index as f64), value]))
            .collect(),
    ))
}

/// Groups elements by the stringified projection, preserving encounter order
/// inside each group. Group iteration is sorted by key like any object.
pub fn groupby(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    check_arity("groupby", args, &[2])?;
    let values = expect_array("groupby", eval(&args[1], stack)?)?;

    let mut groups: BTreeMap<String, Value> = BTreeMap::new();
    for value in values {
        let key = eval_lambda(&args[0], stack, eval, &value)?.cast_string()?;
        match groups.entry(key).or_insert_with(|| Value::Array(vec![])) {
            Value::Array(group) => group.push(value),
            _ => return Err(RuntimeError::new("groupby built a non-array group")),
        }
    }

    Ok(Value::Object(groups))
}

/// All increasing index tuples whose elements satisfy the predicates in
/// order, returned as sub-arrays of the source.
pub fn sequence(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    if args.len() < 3 {
        return Err(RuntimeError::new(format!(
            "sequence expects at least two predicates and an array, got {} argument(s)",
            args.len()
        )));
    }

    let Some((source, predicates)) = args.split_last() else {
        return Err(RuntimeError::new("sequence expects arguments"));
    };
    let values = expect_array("sequence", eval(source, stack)?)?;

    let mut hits: Vec<Vec<usize>> = vec![];
    for predicate in predicates {
        let mut matching = vec![];
        for (index, value) in values.iter().enumerate() {
            if eval_lambda(predicate, stack, eval, value)?.truthy() {
                matching.push(index);
            }
        }
        hits.push(matching);
    }

    let mut tuples = vec![];
    collect_sequences(&hits, 0, &mut vec![], &mut tuples);

    Ok(Value::Array(
        tuples
            .into_iter()
            .map(|indices| {
                Value::Array(indices.into_iter().map(|i| values[i].clone()).collect())
            })
            .collect(),
    ))
}

fn collect_sequences(
    hits: &[Vec<usize>],
    from: usize,
    current: &mut Vec<usize>,
    out: &mut Vec<Vec<usize>>,
) {
    if current.len() == hits.len() {
        out.push(current.clone());
        return;
    }

    for &index in &hits[current.len()] {
        if index >= from {
            current.push(index);
            collect_sequences(hits, index + 1, current, out);
            current.pop();
        }
    }
}
