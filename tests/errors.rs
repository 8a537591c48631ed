//! The three error kinds and where they come from.

use mistql::Error;
use serde_json::json;

fn fail(source: &str) -> Error {
    mistql::query(source, &json!({"a": 1, "xs": [1, 2]})).expect_err("query must fail")
}

#[test]
fn lex_errors() {
    assert!(matches!(fail("a # b"), Error::Lex(_)));
    assert!(matches!(fail("\"unterminated"), Error::Lex(_)));
    assert!(matches!(fail("a = 1"), Error::Lex(_)));
}

#[test]
fn parse_errors() {
    assert!(matches!(fail("a +"), Error::Parse(_)));
    assert!(matches!(fail("()"), Error::Parse(_)));
    assert!(matches!(fail("a . 3"), Error::Parse(_)));
    assert!(matches!(fail("[1, 2"), Error::Parse(_)));
    assert!(matches!(fail("{a 1}"), Error::Parse(_)));
    assert!(matches!(fail("a b )"), Error::Parse(_)));
}

#[test]
fn unresolved_references_are_runtime_errors() {
    assert!(matches!(fail("missing"), Error::Runtime(_)));
    assert!(matches!(fail("$"), Error::Runtime(_)));
}

#[test]
fn type_mismatches_are_runtime_errors() {
    assert!(matches!(fail("1 + \"a\""), Error::Runtime(_)));
    assert!(matches!(fail("sum [1, \"a\"]"), Error::Runtime(_)));
    assert!(matches!(fail("keys xs"), Error::Runtime(_)));
    assert!(matches!(fail("map @ 42"), Error::Runtime(_)));
    assert!(matches!(fail("-\"x\""), Error::Runtime(_)));
}

#[test]
fn comparisons_across_tags_fail() {
    assert!(matches!(fail("1 < \"2\""), Error::Runtime(_)));
    assert!(matches!(fail("sort [[1], [2]]"), Error::Runtime(_)));
    assert!(matches!(fail("sort [1, \"2\"]"), Error::Runtime(_)));
}

#[test]
fn arity_is_checked() {
    assert!(matches!(fail("count xs xs"), Error::Runtime(_)));
    assert!(matches!(fail("if true 1"), Error::Runtime(_)));
    assert!(matches!(fail("sequence @ xs"), Error::Runtime(_)));
}

#[test]
fn bad_regex_flags_fail() {
    assert!(matches!(fail("regex \"a\" \"z\""), Error::Runtime(_)));
    assert!(matches!(fail("regex \"(\""), Error::Runtime(_)));
}

#[test]
fn index_failures() {
    assert!(matches!(fail("xs[0.5]"), Error::Runtime(_)));
    assert!(matches!(fail("xs[true]"), Error::Runtime(_)));
    assert!(matches!(fail("a[0]"), Error::Runtime(_)));
    assert!(matches!(fail("{x: 1}[0:1]"), Error::Runtime(_)));
    assert!(matches!(fail("null[0:1]"), Error::Runtime(_)));
}

#[test]
fn calling_a_value_fails() {
    assert!(matches!(fail("a xs"), Error::Runtime(_)));
    assert!(matches!(fail("xs | 42"), Error::Runtime(_)));
}

#[test]
fn positioned_errors_render_an_indicator() {
    let error = fail("a ++ b");
    let rendered = error.to_string();

    assert!(rendered.contains('^'));
    assert!(rendered.contains("a ++ b"));
}
