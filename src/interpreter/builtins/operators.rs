//! Operator builtins: arithmetic, comparisons, logic, dot access (including
//! the `$` escape), plus `if`, `apply`, and `log`.

use std::cmp::Ordering;

use crate::parser::ast::Expression;
use crate::value::{Evaluator, Value};

use super::strings::match_values;
use super::{check_arity, eval_lambda, expect_number, RuntimeError, Stack};

/// `+` adds numbers, concatenates strings, and concatenates arrays.
pub fn add(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    check_arity("+", args, &[2])?;
    let left = eval(&args[0], stack)?;
    let right = eval(&args[1], stack)?;

    match (left, right) {
        (Value::Number(left), Value::Number(right)) => Ok(Value::Number(left + right)),
        (Value::String(left), Value::String(right)) => Ok(Value::String(left + &right)),
        (Value::Array(mut left), Value::Array(right)) => {
            left.extend(right);
            Ok(Value::Array(left))
        }
        (left, right) => Err(RuntimeError::new(format!(
            "cannot add a {} and a {}",
            left.get_type(),
            right.get_type()
        ))),
    }
}

fn numeric_args(
    name: &str,
    args: &[Expression],
    stack: &Stack,
    eval: Evaluator,
) -> Result<(f64, f64), RuntimeError> {
    check_arity(name, args, &[2])?;
    let left = expect_number(name, eval(&args[0], stack)?)?;
    let right = expect_number(name, eval(&args[1], stack)?)?;

    Ok((left, right))
}

pub fn subtract(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    let (left, right) = numeric_args("-", args, stack, eval)?;
    Ok(Value::Number(left - right))
}

pub fn multiply(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    let (left, right) = numeric_args("*", args, stack, eval)?;
    Ok(Value::Number(left * right))
}

pub fn divide(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    let (left, right) = numeric_args("/", args, stack, eval)?;
    Ok(Value::Number(left / right))
}

pub fn modulo(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    let (left, right) = numeric_args("%", args, stack, eval)?;
    Ok(Value::Number(left % right))
}

fn comparison(
    name: &str,
    args: &[Expression],
    stack: &Stack,
    eval: Evaluator,
    accepts: fn(Ordering) -> bool,
) -> Result<Value, RuntimeError> {
    check_arity(name, args, &[2])?;
    let left = eval(&args[0], stack)?;
    let right = eval(&args[1], stack)?;

    Ok(Value::Boolean(accepts(left.compare(&right)?)))
}

pub fn less_than(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    comparison("<", args, stack, eval, Ordering::is_lt)
}

pub fn greater_than(
    args: &[Expression],
    stack: &Stack,
    eval: Evaluator,
) -> Result<Value, RuntimeError> {
    comparison(">", args, stack, eval, Ordering::is_gt)
}

pub fn less_or_equal(
    args: &[Expression],
    stack: &Stack,
    eval: Evaluator,
) -> Result<Value, RuntimeError> {
    comparison("<=", args, stack, eval, Ordering::is_le)
}

pub fn greater_or_equal(
    args: &[Expression],
    stack: &Stack,
    eval: Evaluator,
) -> Result<Value, RuntimeError> {
    comparison(">=", args, stack, eval, Ordering::is_ge)
}

pub fn equal(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    check_arity("==", args, &[2])?;
    Ok(Value::Boolean(eval(&args[0], stack)? == eval(&args[1], stack)?))
}

pub fn not_equal(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    check_arity("!=", args, &[2])?;
    Ok(Value::Boolean(eval(&args[0], stack)? != eval(&args[1], stack)?))
}

/// Infix form of `match` with the subject on the left.
pub fn match_operator(
    args: &[Expression],
    stack: &Stack,
    eval: Evaluator,
) -> Result<Value, RuntimeError> {
    check_arity("=~", args, &[2])?;
    let subject = eval(&args[0], stack)?;
    let matcher = eval(&args[1], stack)?;

    match_values(matcher, subject)
}

/// Short-circuiting; yields the deciding operand, not a coerced boolean.
pub fn and(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    check_arity("&&", args, &[2])?;
    let left = eval(&args[0], stack)?;

    if left.truthy() {
        eval(&args[1], stack)
    } else {
        Ok(left)
    }
}

pub fn or(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    check_arity("||", args, &[2])?;
    let left = eval(&args[0], stack)?;

    if left.truthy() {
        Ok(left)
    } else {
        eval(&args[1], stack)
    }
}

pub fn negate(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    check_arity("-/unary", args, &[1])?;
    let number = expect_number("-/unary", eval(&args[0], stack)?)?;

    Ok(Value::Number(-number))
}

pub fn not(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    check_arity("!/unary", args, &[1])?;
    Ok(Value::Boolean(!eval(&args[0], stack)?.truthy()))
}

/// Dot access. The right side must be a reference; a left side that is `$`
/// (or a chain of `$` accesses) escapes the innermost unpacked frames
/// instead of evaluating to a value. Accessing anything but an object yields
/// null.
pub fn dot(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    check_arity(".", args, &[2])?;
    let Expression::Reference(name) = &args[1] else {
        return Err(RuntimeError::new("dot access requires a reference"));
    };

    let depth = dollar_depth(&args[0]);
    if depth > 0 {
        let escaped = stack.escape(depth);
        return escaped
            .lookup(name)
            .ok_or_else(|| RuntimeError::new(format!("could not find reference '{name}'")));
    }

    match eval(&args[0], stack)? {
        Value::Object(entries) => Ok(entries.get(name).cloned().unwrap_or(Value::Null)),
        _ => Ok(Value::Null),
    }
}

fn dollar_depth(expression: &Expression) -> usize {
    match expression {
        Expression::Reference(name) if name == "$" => 1,
        Expression::Application { callee, args } => {
            let dotted = matches!(callee.as_ref(), Expression::Reference(name) if name == ".");
            let dollar_field =
                matches!(args.last(), Some(Expression::Reference(name)) if name == "$");

            if dotted && dollar_field && args.len() == 2 {
                match dollar_depth(&args[0]) {
                    0 => 0,
                    inner => inner + 1,
                }
            } else {
                0
            }
        }
        _ => 0,
    }
}

/// Lazy conditional: exactly one branch is evaluated.
pub fn if_(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    check_arity("if", args, &[3])?;

    if eval(&args[0], stack)?.truthy() {
        eval(&args[1], stack)
    } else {
        eval(&args[2], stack)
    }
}

/// Evaluates the body under a frame where `@` is the given value.
pub fn apply(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    check_arity("apply", args, &[2])?;
    let value = eval(&args[1], stack)?;

    eval_lambda(&args[0], stack, eval, &value)
}

/// Diagnostic logging; passes the value through unchanged.
pub fn log(args: &[Expression], stack: &Stack, eval: Evaluator) -> Result<Value, RuntimeError> {
    check_arity("log", args, &[1])?;
    let value = eval(&args[0], stack)?;

    let rendered = value
        .cast_string()
        .unwrap_or_else(|_| format!("{value:?}"));
    log::info!("{rendered}");

    Ok(value)
}
