//! Lexical analysis: classifies source text into a flat token stream with
//! byte positions. Whitespace collapses into a synthetic space token that is
//! absorbed next to punctuation and operators, so a space survives only at
//! application boundaries.

mod lexmap;
mod token;

pub use lexmap::*;
pub use token::*;

use once_cell::sync::Lazy;
use std::{error::Error, fmt::Display, iter::Peekable, str::CharIndices};

use crate::error::source_indicator;

macro_rules! special {
    ($map:ident, $name:ident, $value:expr) => {
        $map.insert($value, Special::$name);
    };
}

static SPECIALS: Lazy<LexMap> = Lazy::new(|| {
    let mut m = LexMap::default();

    special!(m, Dot, ".");
    special!(m, Times, "*");
    special!(m, Divide, "/");
    special!(m, Modulo, "%");
    special!(m, Plus, "+");
    special!(m, Minus, "-");
    special!(m, LessThan, "<");
    special!(m, GreaterThan, ">");
    special!(m, LessOrEqual, "<=");
    special!(m, GreaterOrEqual, ">=");
    special!(m, Equal, "==");
    special!(m, NotEqual, "!=");
    special!(m, And, "&&");
    special!(m, Or, "||");
    special!(m, Match, "=~");
    special!(m, ExclamationMark, "!");
    special!(m, LParen, "(");
    special!(m, RParen, ")");
    special!(m, LBracket, "[");
    special!(m, RBracket, "]");
    special!(m, LBrace, "{");
    special!(m, RBrace, "}");
    special!(m, Colon, ":");
    special!(m, Comma, ",");
    special!(m, Pipe, "|");

    m
});

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LexError {
    message: String,
    position: usize,
    source: String,
}

pub type LexResult<T> = Result<T, LexError>;

impl LexError {
    pub fn new(message: impl ToString, position: usize, source: &str) -> Self {
        Self {
            message: message.to_string(),
            position,
            source: source.to_string(),
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

impl Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\n{}",
            self.message,
            source_indicator(&self.source, self.position)
        )
    }
}

impl Error for LexError {}

#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    tokens: Vec<Token>,
    iterator: Peekable<CharIndices<'a>>,
    input: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            tokens: vec![],
            iterator: input.char_indices().peekable(),
            input,
        }
    }

    pub fn lex(mut self) -> LexResult<Vec<Token>> {
        while let Some((position, next)) = self.iterator.peek().copied() {
            match next {
                c if c.is_ascii_whitespace() => self.lex_whitespace(position),
                'a'..='z' | 'A'..='Z' | '_' => self.lex_alphanumeric(position),
                '0'..='9' => self.lex_numeric(position)?,
                '"' => self.lex_string(position)?,
                '@' | '$' => {
                    self.iterator.next();
                    self.tokens.push(Token::new(
                        TokenPayload::Reference(next.to_string()),
                        position,
                    ));
                }
                _ => self.lex_special(position)?,
            }
        }

        if self.last_is_space() {
            self.tokens.pop();
        }

        Ok(self.tokens)
    }

    fn last_is_space(&self) -> bool {
        matches!(
            self.tokens.last(),
            Some(token) if token.payload == TokenPayload::Special(Special::Space)
        )
    }

    fn lex_whitespace(&mut self, position: usize) {
        while self
            .iterator
            .next_if(|(_, c)| c.is_ascii_whitespace())
            .is_some()
        {}

        let absorbed = match self.tokens.last() {
            None => true,
            Some(token) => {
                matches!(&token.payload, TokenPayload::Special(s) if s.absorbs_right())
            }
        };

        if !absorbed {
            self.tokens
                .push(Token::new(TokenPayload::Special(Special::Space), position));
        }
    }

    fn push_special(&mut self, special: Special, position: usize) {
        if special.absorbs_left() && self.last_is_space() {
            self.tokens.pop();
        }

        self.tokens
            .push(Token::new(TokenPayload::Special(special), position));
    }

    fn lex_alphanumeric(&mut self, position: usize) {
        let mut read = String::new();

        while let Some((_, c)) = self
            .iterator
            .next_if(|(_, c)| c.is_ascii_alphanumeric() || *c == '_')
        {
            read.push(c);
        }

        let payload = match read.as_str() {
            "true" => TokenPayload::Boolean(true),
            "false" => TokenPayload::Boolean(false),
            "null" => TokenPayload::Null,
            _ => TokenPayload::Reference(read),
        };

        self.tokens.push(Token::new(payload, position));
    }

    fn consume_digits(&mut self, read: &mut String) {
        while let Some((_, c)) = self.iterator.next_if(|(_, c)| c.is_ascii_digit()) {
            read.push(c);
        }
    }

    fn lex_numeric(&mut self, position: usize) -> LexResult<()> {
        let mut read = String::new();
        self.consume_digits(&mut read);

        // a '.' is part of the number only when a digit follows it
        if matches!(self.iterator.peek(), Some((_, '.'))) {
            let mut ahead = self.iterator.clone();
            ahead.next();
            if matches!(ahead.peek(), Some((_, c)) if c.is_ascii_digit()) {
                self.iterator.next();
                read.push('.');
                self.consume_digits(&mut read);
            }
        }

        if matches!(self.iterator.peek(), Some((_, 'e' | 'E'))) {
            let mut ahead = self.iterator.clone();
            ahead.next();
            let exponent_follows = match ahead.peek() {
                Some((_, c)) if c.is_ascii_digit() => true,
                Some((_, '+' | '-')) => {
                    ahead.next();
                    matches!(ahead.peek(), Some((_, c)) if c.is_ascii_digit())
                }
                _ => false,
            };

            if exponent_follows {
                if let Some((_, e)) = self.iterator.next() {
                    read.push(e);
                }
                if let Some((_, sign)) = self.iterator.next_if(|(_, c)| matches!(c, '+' | '-')) {
                    read.push(sign);
                }
                self.consume_digits(&mut read);
            }
        }

        let value = read.parse::<f64>().map_err(|_| {
            LexError::new(
                format!("failed to parse number '{read}'"),
                position,
                self.input,
            )
        })?;

        self.tokens
            .push(Token::new(TokenPayload::Number(value), position));

        Ok(())
    }

    fn lex_string(&mut self, position: usize) -> LexResult<()> {
        self.iterator.next();

        let end;
        loop {
            match self.iterator.next() {
                None => {
                    return Err(LexError::new(
                        "unterminated string literal",
                        position,
                        self.input,
                    ));
                }
                Some((p, '"')) => {
                    end = p;
                    break;
                }
                Some((_, '\\')) => {
                    // keep the escape pair for the JSON-style decode below;
                    // an escaped quote must not terminate the literal
                    if self.iterator.next().is_none() {
                        return Err(LexError::new(
                            "unterminated string literal",
                            position,
                            self.input,
                        ));
                    }
                }
                Some(_) => {}
            }
        }

        let raw = &self.input[position..=end];
        let value: String = serde_json::from_str(raw).map_err(|_| {
            LexError::new(
                format!("invalid string literal {raw}"),
                position,
                self.input,
            )
        })?;

        self.tokens
            .push(Token::new(TokenPayload::String(value), position));

        Ok(())
    }

    fn lex_special(&mut self, position: usize) -> LexResult<()> {
        let mut read = String::new();

        while let Some((_, c)) = self.iterator.peek().copied() {
            let mut candidate = read.clone();
            candidate.push(c);
            if !SPECIALS.can_match(&candidate) {
                break;
            }
            read.push(c);
            self.iterator.next();
        }

        if read.is_empty() {
            let next = self.iterator.peek().map(|(_, c)| *c).unwrap_or_default();
            return Err(LexError::new(
                format!("unexpected character '{next}'"),
                position,
                self.input,
            ));
        }

        match SPECIALS.get(&read) {
            Some(special) => {
                self.push_special(special, position);
                Ok(())
            }
            None => Err(LexError::new(
                format!("failed to lex '{read}'"),
                position,
                self.input,
            )),
        }
    }
}
