//! Behavior of the builtin catalogue through the public API.

use serde_json::{json, Value as Json};

fn query(source: &str, data: Json) -> Json {
    mistql::query(source, &data)
        .expect("query should succeed")
        .to_json()
        .expect("result should serialize")
}

#[test]
fn collection_basics() {
    assert_eq!(query("find @ > 2 @", json!([1, 3, 5])), json!(3));
    assert_eq!(query("find @ > 9 @", json!([1, 3, 5])), json!(null));
    assert_eq!(query("reverse @", json!([1, 2, 3])), json!([3, 2, 1]));
    assert_eq!(query("head 2 @", json!([1, 2, 3])), json!([1, 2]));
    assert_eq!(query("tail 2 @", json!([1, 2, 3])), json!([2, 3]));
    assert_eq!(query("head 9 @", json!([1, 2])), json!([1, 2]));
    assert_eq!(query("first @", json!([7, 8])), json!(7));
    assert_eq!(query("last @", json!([7, 8])), json!(8));
    assert_eq!(query("first @", json!([])), json!(null));
    assert_eq!(query("count @", json!(["a", "b"])), json!(2));
    assert_eq!(query("sum @", json!([1.5, 2.5])), json!(4));
    assert_eq!(query("sum @", json!([])), json!(0));
}

#[test]
fn reduce_folds_left() {
    assert_eq!(
        query("@ | reduce @[0] + @[1] 0", json!([1, 2, 3, 4])),
        json!(10)
    );
    assert_eq!(
        query("@ | reduce @[0] + @[1] \"x\"", json!(["a", "b"])),
        json!("xab")
    );
}

#[test]
fn sort_is_typed_and_stable() {
    assert_eq!(query("sort @", json!([3, 1, 2])), json!([1, 2, 3]));
    assert_eq!(query("sort @", json!(["b", "a"])), json!(["a", "b"]));
    assert_eq!(
        query("@ | sortby rank | map name", json!([
            {"rank": 1, "name": "mid"},
            {"rank": 0, "name": "low"},
            {"rank": 1, "name": "mid-too"},
        ])),
        json!(["low", "mid", "mid-too"])
    );
}

#[test]
fn flatten_one_level() {
    assert_eq!(
        query("flatten @", json!([[1], [2, 3], []])),
        json!([1, 2, 3])
    );
}

#[test]
fn withindices_pairs() {
    assert_eq!(
        query("withindices @", json!(["a", "b"])),
        json!([[0, "a"], [1, "b"]])
    );
}

#[test]
fn groupby_stringifies_keys() {
    assert_eq!(
        query("@ | groupby @ % 2", json!([1, 2, 3, 4])),
        json!({"0": [2, 4], "1": [1, 3]})
    );
}

#[test]
fn object_transforms() {
    let data = json!({"b": 2, "a": 1, "c": 3});

    assert_eq!(query("keys @", data.clone()), json!(["a", "b", "c"]));
    assert_eq!(query("values @", data.clone()), json!([1, 2, 3]));
    assert_eq!(
        query("entries @", data.clone()),
        json!([["a", 1], ["b", 2], ["c", 3]])
    );
    assert_eq!(
        query("@ | mapvalues @ * 10", data.clone()),
        json!({"a": 10, "b": 20, "c": 30})
    );
    assert_eq!(
        query("@ | filtervalues @ > 1", data.clone()),
        json!({"b": 2, "c": 3})
    );
    assert_eq!(
        query("@ | mapkeys @ + \"!\"", data.clone()),
        json!({"a!": 1, "b!": 2, "c!": 3})
    );
    assert_eq!(
        query("@ | filterkeys @ == \"b\"", data),
        json!({"b": 2})
    );
}

#[test]
fn fromentries_fills_missing_slots() {
    assert_eq!(
        query("fromentries @", json!([["a", 1], [2, "b"], ["c"], []])),
        json!({"a": 1, "2": "b", "c": null, "null": null})
    );
}

#[test]
fn casts() {
    assert_eq!(query("string 1.5", json!(null)), json!("1.5"));
    assert_eq!(query("string 2", json!(null)), json!("2"));
    assert_eq!(query("string null", json!(null)), json!("null"));
    assert_eq!(query("string @", json!([1, "x"])), json!("[1,\"x\"]"));
    assert_eq!(
        query("string @", json!({"b": 1, "a": 2})),
        json!("{\"a\":2,\"b\":1}")
    );
    assert_eq!(query("float \"2.5\"", json!(null)), json!(2.5));
    assert_eq!(query("float true", json!(null)), json!(1));
    assert_eq!(query("float null", json!(null)), json!(0));
}

#[test]
fn regex_matching() {
    assert_eq!(
        query("match (regex \"^a+$\") \"aaa\"", json!(null)),
        json!(true)
    );
    assert_eq!(
        query("match (regex \"^A+$\" \"i\") \"aaa\"", json!(null)),
        json!(true)
    );
    assert_eq!(query("match \"abc\" \"abc\"", json!(null)), json!(true));
    assert_eq!(query("match \"abc\" \"abcd\"", json!(null)), json!(false));
    assert_eq!(
        query("\"user@gmail.com\" =~ (regex \"@gmail\")", json!(null)),
        json!(true)
    );
    assert_eq!(query("\"abc\" =~ \"abc\"", json!(null)), json!(true));
}

#[test]
fn replace_without_global_flag_replaces_first() {
    assert_eq!(
        query("\"hello\" | replace \"l\" \"L\"", json!(null)),
        json!("heLlo")
    );
    assert_eq!(
        query("\"hello\" | replace (regex \"l\") \"L\"", json!(null)),
        json!("heLlo")
    );
}

#[test]
fn split_and_join() {
    assert_eq!(
        query("\"a,b,c\" | split \",\"", json!(null)),
        json!(["a", "b", "c"])
    );
    assert_eq!(
        query("\"a1b22c\" | split (regex \"[0-9]+\")", json!(null)),
        json!(["a", "b", "c"])
    );
    assert_eq!(
        query("\"ab\" | split \"\"", json!(null)),
        json!(["a", "b"])
    );
    assert_eq!(
        query("join \", \" @", json!([1, "x", null])),
        json!("1, x, null")
    );
}

#[test]
fn arithmetic_and_logic() {
    assert_eq!(query("1 + 2 * 3", json!(null)), json!(7));
    assert_eq!(query("\"a\" + \"b\"", json!(null)), json!("ab"));
    assert_eq!(query("[1] + [2]", json!(null)), json!([1, 2]));
    assert_eq!(query("7 % 2", json!(null)), json!(1));
    assert_eq!(query("10 / 4", json!(null)), json!(2.5));
    assert_eq!(query("1 < 2", json!(null)), json!(true));
    assert_eq!(query("\"b\" >= \"a\"", json!(null)), json!(true));
    assert_eq!(query("false < true", json!(null)), json!(true));
    assert_eq!(query("1 == 1.0", json!(null)), json!(true));
    assert_eq!(query("[1, 2] == [1, 2]", json!(null)), json!(true));
    assert_eq!(query("{a: 1} != {a: 2}", json!(null)), json!(true));
    assert_eq!(query("-3 + 4", json!(null)), json!(1));
    assert_eq!(query("!0", json!(null)), json!(true));
    assert_eq!(query("!!\"x\"", json!(null)), json!(true));
}

#[test]
fn logic_returns_the_operand() {
    assert_eq!(query("\"x\" || \"y\"", json!(null)), json!("x"));
    assert_eq!(query("0 || \"y\"", json!(null)), json!("y"));
    assert_eq!(query("\"x\" && \"y\"", json!(null)), json!("y"));
    assert_eq!(query("0 && \"y\"", json!(null)), json!(0));
}

#[test]
fn logic_short_circuits() {
    assert_eq!(query("0 && missing", json!(null)), json!(0));
    assert_eq!(query("1 || missing", json!(null)), json!(1));
}

#[test]
fn if_evaluates_one_branch() {
    assert_eq!(query("if true 1 missing", json!(null)), json!(1));
    assert_eq!(query("if 0 missing 2", json!(null)), json!(2));
}

#[test]
fn apply_scopes_a_value() {
    assert_eq!(query("apply @ + 1 41", json!(null)), json!(42));
    assert_eq!(query("apply x {x: 1}", json!(null)), json!(1));
}

#[test]
fn log_passes_through() {
    assert_eq!(query("@ | map log | sum", json!([1, 2])), json!(3));
}

#[test]
fn indexing_rules() {
    assert_eq!(query("@[1]", json!(["a", "b"])), json!("b"));
    assert_eq!(query("@[-1]", json!(["a", "b"])), json!("b"));
    assert_eq!(query("@[5]", json!(["a", "b"])), json!(null));
    assert_eq!(query("@[\"k\"]", json!({"k": 1})), json!(1));
    assert_eq!(query("@[\"nope\"]", json!({"k": 1})), json!(null));
    assert_eq!(query("@[1]", json!(null)), json!(null));
    assert_eq!(query("@[\"x\"]", json!(null)), json!(null));
    assert_eq!(query("@[1:3]", json!([0, 1, 2, 3, 4])), json!([1, 2]));
    assert_eq!(query("@[:2]", json!([0, 1, 2])), json!([0, 1]));
    assert_eq!(query("@[:]", json!([0, 1])), json!([0, 1]));
    assert_eq!(query("\"hello\"[1:3]", json!(null)), json!("el"));
    assert_eq!(query("\"hello\"[-2:]", json!(null)), json!("lo"));
}

#[test]
fn dot_access() {
    assert_eq!(query("a.b.c", json!({"a": {"b": {"c": 42}}})), json!(42));
    assert_eq!(query("a.missing", json!({"a": {}})), json!(null));
    assert_eq!(query("a.b", json!({"a": 3})), json!(null));
}
