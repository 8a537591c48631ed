use std::collections::BTreeMap;

use crate::interpreter::RuntimeError;

use super::Value;

impl Value {
    /// Ingress from a host JSON value. Non-finite numbers normalize to null;
    /// the core never observes them.
    pub fn from_json(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(value) => Value::Boolean(*value),
            serde_json::Value::Number(value) => match value.as_f64() {
                Some(number) if number.is_finite() => Value::Number(number),
                _ => Value::Null,
            },
            serde_json::Value::String(value) => Value::String(value.clone()),
            serde_json::Value::Array(values) => {
                Value::Array(values.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), Value::from_json(value)))
                    .collect::<BTreeMap<_, _>>(),
            ),
        }
    }

    /// Egress to a host JSON value. Integral doubles become JSON integers,
    /// non-finite doubles become null, regexes render as their source.
    /// Functions are not serializable.
    pub fn to_json(&self) -> Result<serde_json::Value, RuntimeError> {
        match self {
            Value::Null => Ok(serde_json::Value::Null),
            Value::Boolean(value) => Ok(serde_json::Value::Bool(*value)),
            Value::Number(value) => {
                if !value.is_finite() {
                    Ok(serde_json::Value::Null)
                } else if *value == value.trunc() && value.abs() < 9e15 {
                    Ok(serde_json::Value::Number(serde_json::Number::from(
                        *value as i64,
                    )))
                } else {
                    Ok(serde_json::Number::from_f64(*value)
                        .map(serde_json::Value::Number)
                        .unwrap_or(serde_json::Value::Null))
                }
            }
            Value::String(value) => Ok(serde_json::Value::String(value.clone())),
            Value::Array(values) => Ok(serde_json::Value::Array(
                values
                    .iter()
                    .map(Value::to_json)
                    .collect::<Result<Vec<_>, _>>()?,
            )),
            Value::Object(entries) => {
                let mut map = serde_json::Map::new();
                for (key, value) in entries {
                    map.insert(key.clone(), value.to_json()?);
                }
                Ok(serde_json::Value::Object(map))
            }
            Value::Regex(regex) => Ok(serde_json::Value::String(regex.source().to_string())),
            Value::Function(function) => Err(RuntimeError::new(format!(
                "cannot serialize function '{}'",
                function.name()
            ))),
        }
    }
}

impl From<&serde_json::Value> for Value {
    fn from(json: &serde_json::Value) -> Self {
        Value::from_json(json)
    }
}
