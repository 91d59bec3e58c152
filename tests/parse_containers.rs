use rstest::rstest;
use serde_json::{json, Value};

use region_json::constants::BLOCK_CAPACITY;
use region_json::{ArenaOptions, Document, ParseOptions, ValueKind};

fn options() -> ParseOptions {
    ParseOptions::default().with_arena(
        ArenaOptions::new()
            .with_reserve_size(16 << 20)
            .with_commit_size(1 << 16),
    )
}

fn parse(input: &str) -> Document {
    region_json::parse_with_options(input.as_bytes(), &options())
        .unwrap_or_else(|err| panic!("parse failed: {err}"))
}

#[rstest]
#[case("[]", json!([]), 2)]
#[case("{}", json!({}), 2)]
#[case("[ ]", json!([]), 3)]
#[case("{ }", json!({}), 3)]
#[case("[1,2,3]", json!([1, 2, 3]), 7)]
#[case("[ 1 , 2 ]", json!([1, 2]), 9)]
#[case(r#"["a", null, true]"#, json!(["a", null, true]), 17)]
#[case("[1,[2,3],4]", json!([1, [2, 3], 4]), 11)]
#[case(r#"{"a":1,"b":2}"#, json!({"a": 1, "b": 2}), 13)]
#[case(r#"{ "a" : [ ] , "b" : { } }"#, json!({"a": [], "b": {}}), 25)]
#[case(r#"[{"k":[{"x":null}]}]"#, json!([{"k": [{"x": null}]}]), 20)]
fn containers_parse(#[case] input: &str, #[case] expected: Value, #[case] consumed: usize) {
    let doc = parse(input);
    assert_eq!(doc.root().to_json(), expected);
    assert_eq!(doc.consumed(), consumed);
}

#[rstest]
fn object_stores_alternating_keys_and_values() {
    let doc = parse(r#"{"a":1,"b":2}"#);
    let root = doc.root();
    let list = root.value().as_list().unwrap();
    assert_eq!(list.len(), 4);
    assert_eq!(root.len(), 2);

    let slots: Vec<Value> = (0..4).map(|i| root.slot(i).unwrap().to_json()).collect();
    assert_eq!(slots, vec![json!("a"), json!(1), json!("b"), json!(2)]);
}

#[rstest]
fn duplicate_keys_are_all_retained() {
    let doc = parse(r#"{"a":1,"a":2}"#);
    let root = doc.root();
    assert_eq!(root.len(), 2);
    assert_eq!(root.field("a").and_then(|n| n.as_i64()), Some(1));
    let values: Vec<i64> = root
        .entries()
        .filter_map(|(_, value)| value.as_i64())
        .collect();
    assert_eq!(values, vec![1, 2]);
}

#[rstest]
fn nested_array_shape() {
    let doc = parse("[1,[2,3],4]");
    let root = doc.root();
    assert_eq!(root.kind(), ValueKind::Array);
    assert_eq!(root.len(), 3);

    let middle = root.get(1).unwrap();
    assert!(middle.is_array());
    assert_eq!(middle.len(), 2);
    assert_eq!(middle.get(1).and_then(|n| n.as_i64()), Some(3));
    assert!(root.get(3).is_none());
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(BLOCK_CAPACITY)]
#[case(BLOCK_CAPACITY + 1)]
#[case(100)]
#[case(1000)]
fn arrays_survive_block_boundaries(#[case] count: usize) {
    let items: Vec<String> = (0..count).map(|i| i.to_string()).collect();
    let input = format!("[{}]", items.join(","));
    let doc = parse(&input);
    let root = doc.root();

    assert_eq!(root.len(), count);
    let via_iter: Vec<i64> = root.iter().filter_map(|n| n.as_i64()).collect();
    let via_get: Vec<i64> = (0..count)
        .filter_map(|i| root.get(i).and_then(|n| n.as_i64()))
        .collect();
    let expected: Vec<i64> = (0..count as i64).collect();
    assert_eq!(via_iter, expected);
    assert_eq!(via_get, expected);
    assert_eq!(doc.arena().block_count(), count.div_ceil(BLOCK_CAPACITY));
}

#[rstest]
fn large_object_keeps_insertion_order() {
    let pairs: Vec<String> = (0..50).map(|i| format!("\"k{i}\":{i}")).collect();
    let input = format!("{{{}}}", pairs.join(","));
    let doc = parse(&input);
    let keys: Vec<String> = doc
        .root()
        .entries()
        .filter_map(|(key, _)| key.as_str().map(str::to_string))
        .collect();
    let expected: Vec<String> = (0..50).map(|i| format!("k{i}")).collect();
    assert_eq!(keys, expected);
}

#[rstest]
fn serialize_matches_serde_json() {
    let input = r#"{"name":"Ada","langs":["en","fr"],"age":36,"score":9.5,"x":null}"#;
    let doc = parse(input);
    let ours = serde_json::to_string(&doc.root()).unwrap();
    let reference: Value = serde_json::from_str(input).unwrap();
    assert_eq!(ours, serde_json::to_string(&reference).unwrap());
}

#[rstest]
#[case(r#"{"a":1,"a":2}"#, json!({"a": 1}))]
#[case(r#"{"a":{"b":1,"b":2},"a":3,"c":[{"d":4,"d":5}]}"#, json!({"a": {"b": 1}, "c": [{"d": 4}]}))]
fn duplicate_keys_keep_the_first_value_everywhere(#[case] input: &str, #[case] expected: Value) {
    let doc = parse(input);
    let root = doc.root();
    assert_eq!(root.to_json(), expected);
    assert_eq!(serde_json::to_value(root).unwrap(), expected);
    assert_eq!(
        serde_json::to_string(&root).unwrap(),
        serde_json::to_string(&expected).unwrap()
    );
}
