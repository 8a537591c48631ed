//! MistQL: a small, embeddable query language over JSON-like values. A query
//! is a single expression that, given a root value, evaluates to a new value.

pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod value;

pub use error::Error;
pub use interpreter::{Extra, Interpreter, RuntimeError, Stack};
pub use value::Value;

/// Parses `source` and evaluates it against `data` with the default builtin
/// set.
pub fn query(source: &str, data: &serde_json::Value) -> Result<Value, Error> {
    Interpreter::new().query(source, data)
}
