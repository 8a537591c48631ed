//! The three error kinds of the language, and the caret indicator that
//! positioned errors render against the original source.

use std::{error::Error as StdError, fmt::Display};

use colored::Colorize;

use crate::interpreter::RuntimeError;
use crate::lexer::LexError;
use crate::parser::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Lex(LexError),
    Parse(ParseError),
    Runtime(RuntimeError),
}

impl From<LexError> for Error {
    fn from(error: LexError) -> Self {
        Error::Lex(error)
    }
}

impl From<ParseError> for Error {
    fn from(error: ParseError) -> Self {
        Error::Parse(error)
    }
}

impl From<RuntimeError> for Error {
    fn from(error: RuntimeError) -> Self {
        Error::Runtime(error)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Lex(error) => write!(f, "lex error: {error}"),
            Error::Parse(error) => write!(f, "parse error: {error}"),
            Error::Runtime(error) => write!(f, "runtime error: {error}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Lex(error) => Some(error),
            Error::Parse(error) => Some(error),
            Error::Runtime(error) => Some(error),
        }
    }
}

/// Renders the offending line (with its predecessor for context) and a red
/// caret under the offending column.
pub fn source_indicator(source: &str, position: usize) -> String {
    let prefix = &source[..position.min(source.len())];
    let line_index = prefix.matches('\n').count();
    let line_start = prefix.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = prefix[line_start..].chars().count();

    let lines = source.lines().collect::<Vec<_>>();
    let line_str = lines.get(line_index).copied().unwrap_or("");
    let prev_line = if line_index > 0 { lines[line_index - 1] } else { "" };

    let number = format!("{}", line_index + 1);
    let margin = " ".repeat(number.len());
    let padding = " ".repeat(column);

    format!(
        "{margin} |{prev_line}\n{number} |{line_str}\n{margin} |{padding}{}",
        "^".red()
    )
}
