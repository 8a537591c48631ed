//! Cross-cutting language properties.

use serde_json::{json, Value as Json};

fn query(source: &str, data: Json) -> Json {
    mistql::query(source, &data)
        .expect("query should succeed")
        .to_json()
        .expect("result should serialize")
}

#[test]
fn identity_returns_the_root() {
    for data in [
        json!(null),
        json!(42),
        json!("x"),
        json!([1, [2], {"a": null}]),
        json!({"nested": {"deep": [true, false]}}),
    ] {
        assert_eq!(query("@", data.clone()), data);
    }
}

#[test]
fn parsing_is_deterministic() {
    let first = mistql::query("a / 3 + 2 == b * 5", &json!({"a": 9, "b": 1}));
    let second = mistql::query("a / 3 + 2 == b * 5", &json!({"a": 9, "b": 1}));

    assert_eq!(first, second);
}

#[test]
fn entries_fromentries_round_trips() {
    let data = json!({"b": [1, 2], "a": {"x": null}, "c": "s"});

    assert_eq!(query("@ | entries | fromentries", data.clone()), data);
}

#[test]
fn split_join_round_trips() {
    for text in ["a_b_c", "", "_leading", "trailing_", "no separator"] {
        assert_eq!(
            query("@ | split \"_\" | join \"_\"", json!(text)),
            json!(text)
        );
    }
}

#[test]
fn filter_keeps_a_stable_subsequence() {
    assert_eq!(
        query("@ | filter @ > 2", json!([5, 1, 3, 2, 4])),
        json!([5, 3, 4])
    );
}

#[test]
fn filter_find_count_are_consistent() {
    let data = json!([1, 6, 3, 8, 2, 9]);

    assert_eq!(
        query("@ | filter @ > 5 | count", data.clone()),
        json!(3)
    );
    assert_eq!(
        query("@ | filter @ > 5 | first", data.clone()),
        query("@ | find @ > 5", data)
    );
}

#[test]
fn reverse_is_an_involution() {
    let data = json!([1, "a", null, [2]]);

    assert_eq!(query("@ | reverse | reverse", data.clone()), data);
}

#[test]
fn object_enumeration_is_sorted_by_key() {
    let data = json!({"zebra": 1, "apple": 2, "mango": 3});

    assert_eq!(query("keys @", data.clone()), json!(["apple", "mango", "zebra"]));
    assert_eq!(query("values @", data.clone()), json!([2, 3, 1]));
    assert_eq!(
        query("@ | mapvalues @ | keys", data),
        json!(["apple", "mango", "zebra"])
    );
}

#[test]
fn string_indexing_never_splits_scalars() {
    let text = "a\u{1F60A}b\u{00E9}";

    for (index, expected) in [(0, "a"), (1, "\u{1F60A}"), (2, "b"), (3, "\u{00E9}")] {
        assert_eq!(
            query(&format!("@[{index}]"), json!(text)),
            json!(expected)
        );
    }
    assert_eq!(query("@[1:3]", json!(text)), json!("\u{1F60A}b"));
}

#[test]
fn equality_is_structural() {
    assert_eq!(
        query("@ == [{a: 1}, [2], null]", json!([{"a": 1}, [2], null])),
        json!(true)
    );
    assert_eq!(
        query("(regex \"a\" \"i\") == (regex \"a\" \"i\")", json!(null)),
        json!(true)
    );
    assert_eq!(
        query("(regex \"a\") == (regex \"b\")", json!(null)),
        json!(false)
    );
}

#[test]
fn truthiness_drives_filtering() {
    assert_eq!(
        query("@ | filter @", json!([0, 1, "", "x", null, [], [0], {}, false])),
        json!([1, "x", [0]])
    );
}
