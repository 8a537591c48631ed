//! The runtime value model: a tagged, JSON-like value extended with regexes
//! and callables, together with the equality, ordering, truthiness, and cast
//! rules of the language.

mod function;
mod json;
mod regex;

pub use function::*;
pub use json::*;
pub use self::regex::*;

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::interpreter::RuntimeError;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
    Regex(RegexValue),
    Function(FunctionValue),
}

/// The tag of a [Value], used for type checks and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
    Regex,
    Function,
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ValueType::Null => "null",
            ValueType::Boolean => "boolean",
            ValueType::Number => "number",
            ValueType::String => "string",
            ValueType::Array => "array",
            ValueType::Object => "object",
            ValueType::Regex => "regex",
            ValueType::Function => "function",
        };
        f.write_str(name)
    }
}

impl Value {
    pub fn get_type(&self) -> ValueType {
        match self {
            Value::Null => ValueType::Null,
            Value::Boolean(_) => ValueType::Boolean,
            Value::Number(_) => ValueType::Number,
            Value::String(_) => ValueType::String,
            Value::Array(_) => ValueType::Array,
            Value::Object(_) => ValueType::Object,
            Value::Regex(_) => ValueType::Regex,
            Value::Function(_) => ValueType::Function,
        }
    }

    /// Empty containers, `null`, `false`, `0`, and `""` are falsy; regexes and
    /// functions are always truthy.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Boolean(value) => *value,
            Value::Number(value) => *value != 0.0 && !value.is_nan(),
            Value::String(value) => !value.is_empty(),
            Value::Array(values) => !values.is_empty(),
            Value::Object(entries) => !entries.is_empty(),
            Value::Regex(_) | Value::Function(_) => true,
        }
    }

    /// Ordering is only defined between two numbers, two booleans, or two
    /// strings. Everything else is a runtime error.
    pub fn compare(&self, other: &Value) -> Result<Ordering, RuntimeError> {
        match (self, other) {
            (Value::Number(left), Value::Number(right)) => Ok(left.total_cmp(right)),
            (Value::Boolean(left), Value::Boolean(right)) => Ok(left.cmp(right)),
            (Value::String(left), Value::String(right)) => Ok(left.cmp(right)),
            (left, right) => Err(RuntimeError::new(format!(
                "cannot compare {} with {}",
                left.get_type(),
                right.get_type()
            ))),
        }
    }

    /// The canonical string form: primitives render naturally, containers
    /// render as JSON with sorted keys, regexes render as their source.
    pub fn cast_string(&self) -> Result<String, RuntimeError> {
        match self {
            Value::Null => Ok("null".to_string()),
            Value::Boolean(value) => Ok(value.to_string()),
            Value::Number(value) => Ok(format_number(*value)),
            Value::String(value) => Ok(value.clone()),
            Value::Array(_) | Value::Object(_) => {
                let json = self.to_json()?;
                serde_json::to_string(&json)
                    .map_err(|e| RuntimeError::new(format!("failed to stringify value: {e}")))
            }
            Value::Regex(regex) => Ok(regex.source().to_string()),
            Value::Function(function) => Err(RuntimeError::new(format!(
                "cannot convert function '{}' to a string",
                function.name()
            ))),
        }
    }

    /// Numeric cast: strings parse (and may yield NaN), booleans map to 0/1,
    /// null maps to 0. Containers, regexes, and functions fail.
    pub fn cast_float(&self) -> Result<f64, RuntimeError> {
        match self {
            Value::Null => Ok(0.0),
            Value::Boolean(value) => Ok(if *value { 1.0 } else { 0.0 }),
            Value::Number(value) => Ok(*value),
            Value::String(value) => {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    Ok(0.0)
                } else {
                    Ok(trimmed.parse::<f64>().unwrap_or(f64::NAN))
                }
            }
            other => Err(RuntimeError::new(format!(
                "cannot convert {} to a number",
                other.get_type()
            ))),
        }
    }
}

/// Renders a double the way the language expects: integral values without a
/// fractional part, everything else in shortest round-trip form.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if value == value.trunc() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
