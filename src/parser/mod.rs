//! The parser: turns the token stream into a single expression tree,
//! resolving operator precedence, unary stacks, dot access, indexing sugar,
//! struct and array literals, and the space/pipe amalgamation passes.

pub mod ast;
mod cursor;
mod expression;

pub use cursor::*;

use std::{error::Error, fmt::Display};

use crate::error::source_indicator;
use crate::lexer::Token;

use self::ast::Expression;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub position: Option<usize>,
    pub source: String,
}

impl ParseError {
    pub fn at(message: impl ToString, position: usize, source: &str) -> ParseError {
        ParseError {
            message: message.to_string(),
            position: Some(position),
            source: source.to_string(),
        }
    }

    pub fn eof(item: &str) -> ParseError {
        ParseError {
            message: format!("hit end of input while parsing {item}"),
            position: None,
            source: String::new(),
        }
    }

    /// The unpositioned fallback produced by the binary-expression resolver
    /// when its item list is empty.
    pub fn empty_expression() -> ParseError {
        ParseError {
            message: "empty expression".to_string(),
            position: None,
            source: String::new(),
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.position {
            Some(position) => write!(
                f,
                "{}\n{}",
                self.message,
                source_indicator(&self.source, position)
            ),
            None => f.write_str(&self.message),
        }
    }
}

impl Error for ParseError {}

/// Parses a full query. The entire token stream must form one expression.
pub fn parse(tokens: Vec<Token>, source: &str) -> Result<Expression, ParseError> {
    let mut cursor = TokenCursor::new(tokens, source);

    let parsed = expression::parse_expression(&mut cursor)?;

    if let Some(token) = cursor.peek() {
        return Err(cursor.error_at(
            format!("unexpected token '{}'", token.payload),
            token.position,
        ));
    }

    Ok(parsed)
}
