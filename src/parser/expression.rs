use crate::lexer::{Special, TokenPayload};
use crate::value::format_number;

use super::ast::{Expression, Literal};
use super::{ParseError, TokenCursor};

/// A binary-operator slot between two items. Space and pipe join with the
/// lowest precedence and amalgamate whole runs in a second pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Joiner {
    Op(Special),
    Space,
    Pipe,
}

/// Precedence levels for the simple binary operators, tightest first. All
/// levels are left-associative.
const PRECEDENCE: &[&[Special]] = &[
    &[Special::Times, Special::Divide, Special::Modulo],
    &[Special::Plus, Special::Minus],
    &[
        Special::LessThan,
        Special::GreaterThan,
        Special::LessOrEqual,
        Special::GreaterOrEqual,
    ],
    &[Special::Equal, Special::NotEqual, Special::Match],
    &[Special::And],
    &[Special::Or],
];

/// Parses one expression, stopping (without consuming) at closing brackets,
/// commas, and colons.
pub fn parse_expression(cursor: &mut TokenCursor) -> Result<Expression, ParseError> {
    let mut items: Vec<Expression> = vec![];
    let mut joiners: Vec<Joiner> = vec![];

    loop {
        let Some(token) = cursor.peek() else {
            break;
        };
        let expecting_item = items.len() == joiners.len();

        match &token.payload {
            TokenPayload::Special(
                Special::RParen
                | Special::RBracket
                | Special::RBrace
                | Special::Comma
                | Special::Colon,
            ) => break,
            TokenPayload::Special(special) if !expecting_item => {
                let special = *special;
                let position = token.position;
                match special {
                    Special::Space => {
                        cursor.next();
                        joiners.push(Joiner::Space);
                    }
                    Special::Pipe => {
                        cursor.next();
                        joiners.push(Joiner::Pipe);
                    }
                    s if s.is_binary() => {
                        cursor.next();
                        joiners.push(Joiner::Op(s));
                    }
                    _ => {
                        return Err(cursor.error_at(
                            format!("unexpected token '{}'", special.as_str()),
                            position,
                        ));
                    }
                }
            }
            _ if expecting_item => items.push(parse_operand(cursor)?),
            payload => {
                return Err(
                    cursor.error_at(format!("expected an operator, found '{payload}'"), token.position)
                );
            }
        }
    }

    if items.len() == joiners.len() && !items.is_empty() {
        // a trailing joiner, e.g. "a +"
        return Err(match cursor.peek() {
            Some(token) => {
                cursor.error_at("expected an expression", token.position)
            }
            None => ParseError::eof("an expression"),
        });
    }

    resolve(items, joiners)
}

/// Parses a single operand: a parenthetical, literal, reference, or unary
/// run, followed by its postfix dot-access and indexer chain.
fn parse_operand(cursor: &mut TokenCursor) -> Result<Expression, ParseError> {
    let Some(token) = cursor.next() else {
        return Err(ParseError::eof("an expression"));
    };

    let mut expression = match token.payload {
        TokenPayload::Null => Expression::Literal(Literal::Null),
        TokenPayload::Boolean(value) => Expression::Literal(Literal::Boolean(value)),
        TokenPayload::Number(value) => Expression::Literal(Literal::Number(value)),
        TokenPayload::String(value) => Expression::Literal(Literal::String(value)),
        TokenPayload::Reference(name) => Expression::Reference(name),
        TokenPayload::Special(Special::LParen) => {
            if cursor.peek_special(Special::RParen) {
                return Err(cursor.error_at("empty parenthetical", token.position));
            }
            let inner = parse_expression(cursor)?;
            cursor.expect_special(Special::RParen, "a parenthetical")?;
            inner
        }
        TokenPayload::Special(Special::LBracket) => parse_array_literal(cursor)?,
        TokenPayload::Special(Special::LBrace) => parse_object_literal(cursor)?,
        TokenPayload::Special(special) if special.is_unary() => {
            return parse_unary(special, cursor);
        }
        TokenPayload::Special(special) => {
            return Err(cursor.error_at(
                format!("unexpected token '{}'", special.as_str()),
                token.position,
            ));
        }
    };

    loop {
        if cursor.peek_special(Special::Dot) {
            cursor.next();
            expression = parse_dot_access(expression, cursor)?;
        } else if cursor.peek_special(Special::LBracket) {
            cursor.next();
            expression = parse_indexer(expression, cursor)?;
        } else {
            break;
        }
    }

    Ok(expression)
}

/// A maximal run of unary tokens applies right-to-left to the operand that
/// follows, including that operand's postfix chain: `-a.b` is `-(a.b)`.
fn parse_unary(first: Special, cursor: &mut TokenCursor) -> Result<Expression, ParseError> {
    let mut operators = vec![first];

    loop {
        match cursor.peek() {
            Some(token) => match token.payload {
                TokenPayload::Special(special) if special.is_unary() => {
                    cursor.next();
                    operators.push(special);
                }
                _ => break,
            },
            None => break,
        }
    }

    let mut expression = parse_operand(cursor)?;

    for operator in operators.into_iter().rev() {
        let name = match operator {
            Special::Minus => "-/unary",
            _ => "!/unary",
        };
        expression = Expression::application(Expression::reference(name), vec![expression]);
    }

    Ok(expression)
}

fn parse_dot_access(
    target: Expression,
    cursor: &mut TokenCursor,
) -> Result<Expression, ParseError> {
    match cursor.next() {
        Some(token) => match token.payload {
            TokenPayload::Reference(name) => Ok(Expression::application(
                Expression::reference("."),
                vec![target, Expression::Reference(name)],
            )),
            payload => Err(cursor.error_at(
                format!("dot access requires a reference, found '{payload}'"),
                token.position,
            )),
        },
        None => Err(ParseError::eof("a dot access")),
    }
}

/// Postfix `[...]` desugars to the internal `index` builtin:
/// `x[a]` is `index(a, x)`, `x[a:b]` is `index(a, b, x)`, with omitted slice
/// endpoints filled in as null.
fn parse_indexer(target: Expression, cursor: &mut TokenCursor) -> Result<Expression, ParseError> {
    if cursor.peek_special(Special::RBracket) {
        return Err(cursor.error_here("empty index"));
    }

    let start = if cursor.peek_special(Special::Colon) {
        Expression::Literal(Literal::Null)
    } else {
        parse_expression(cursor)?
    };

    if cursor.peek_special(Special::RBracket) {
        cursor.next();
        return Ok(Expression::application(
            Expression::reference("index"),
            vec![start, target],
        ));
    }

    cursor.expect_special(Special::Colon, "an index range")?;

    let end = if cursor.peek_special(Special::RBracket) {
        Expression::Literal(Literal::Null)
    } else {
        parse_expression(cursor)?
    };

    cursor.expect_special(Special::RBracket, "an index range")?;

    Ok(Expression::application(
        Expression::reference("index"),
        vec![start, end, target],
    ))
}

fn parse_array_literal(cursor: &mut TokenCursor) -> Result<Expression, ParseError> {
    let mut values = vec![];

    if cursor.peek_special(Special::RBracket) {
        cursor.next();
        return Ok(Expression::Literal(Literal::Array(values)));
    }

    loop {
        values.push(parse_expression(cursor)?);

        match cursor.next() {
            Some(token) if token.payload == TokenPayload::Special(Special::Comma) => {}
            Some(token) if token.payload == TokenPayload::Special(Special::RBracket) => break,
            Some(token) => {
                return Err(cursor.error_at(
                    format!("unexpected token '{}' in array literal", token.payload),
                    token.position,
                ));
            }
            None => return Err(ParseError::eof("an array literal")),
        }
    }

    Ok(Expression::Literal(Literal::Array(values)))
}

/// Struct literals accept reference keys and literal keys; literal keys are
/// cast to their canonical string form.
fn parse_object_literal(cursor: &mut TokenCursor) -> Result<Expression, ParseError> {
    let mut entries = vec![];

    if cursor.peek_special(Special::RBrace) {
        cursor.next();
        return Ok(Expression::Literal(Literal::Object(entries)));
    }

    loop {
        let key = match cursor.next() {
            Some(token) => match token.payload {
                TokenPayload::Reference(name) => name,
                TokenPayload::String(value) => value,
                TokenPayload::Number(value) => format_number(value),
                TokenPayload::Boolean(value) => value.to_string(),
                TokenPayload::Null => "null".to_string(),
                payload => {
                    return Err(cursor.error_at(
                        format!("struct key must be a reference or literal, found '{payload}'"),
                        token.position,
                    ));
                }
            },
            None => return Err(ParseError::eof("a struct key")),
        };

        cursor.expect_special(Special::Colon, "a struct entry")?;

        entries.push((key, parse_expression(cursor)?));

        match cursor.next() {
            Some(token) if token.payload == TokenPayload::Special(Special::Comma) => {}
            Some(token) if token.payload == TokenPayload::Special(Special::RBrace) => break,
            Some(token) => {
                return Err(cursor.error_at(
                    format!("unexpected token '{}' in struct literal", token.payload),
                    token.position,
                ));
            }
            None => return Err(ParseError::eof("a struct literal")),
        }
    }

    Ok(Expression::Literal(Literal::Object(entries)))
}

/// Folds the collected items and joiners into one expression: first the
/// simple binary levels (left-associative), then space application, then the
/// pipe amalgamation.
fn resolve(mut items: Vec<Expression>, mut joiners: Vec<Joiner>) -> Result<Expression, ParseError> {
    if items.is_empty() {
        return Err(ParseError::empty_expression());
    }

    for level in PRECEDENCE {
        let mut index = 0;
        while index < joiners.len() {
            let Joiner::Op(operator) = joiners[index] else {
                index += 1;
                continue;
            };
            if !level.contains(&operator) {
                index += 1;
                continue;
            }

            let left = items.remove(index);
            let right = items.remove(index);
            items.insert(
                index,
                Expression::application(
                    Expression::reference(operator.as_str()),
                    vec![left, right],
                ),
            );
            joiners.remove(index);
        }
    }

    // space amalgamation: a run of space-joined items becomes one
    // application of the first item to the rest
    let mut item_iter = items.into_iter();
    let Some(first) = item_iter.next() else {
        return Err(ParseError::empty_expression());
    };

    let mut stages: Vec<Expression> = vec![];
    let mut run: Vec<Expression> = vec![first];

    for (joiner, item) in joiners.iter().zip(item_iter) {
        match joiner {
            Joiner::Space => run.push(item),
            Joiner::Pipe => {
                stages.push(collapse_application(run));
                run = vec![item];
            }
            Joiner::Op(_) => return Err(ParseError::empty_expression()),
        }
    }
    stages.push(collapse_application(run));

    if stages.len() == 1 {
        let Some(expression) = stages.pop() else {
            return Err(ParseError::empty_expression());
        };
        Ok(expression)
    } else {
        Ok(Expression::Pipeline { stages })
    }
}

fn collapse_application(mut run: Vec<Expression>) -> Expression {
    if run.len() == 1 {
        run.remove(0)
    } else {
        let callee = run.remove(0);
        Expression::application(callee, run)
    }
}
