//! Cache key determinism

use proptest::prelude::*;
use rqcell_runtime::{QueryDocument, Variables, build_query_key};
use serde_json::{Value, json};

proptest! {
    #[test]
    fn insertion_order_does_not_matter(
        entries in proptest::collection::btree_map("[a-z]{1,6}", any::<i64>(), 0..8),
        name in proptest::option::of("[A-Z][a-zA-Z]{0,8}"),
    ) {
        let source = match &name {
            Some(name) => format!("query {name} {{ a }}"),
            None => "{ a }".to_string(),
        };
        let document = QueryDocument::parse(source).unwrap();

        let mut forward = Variables::new();
        for (k, v) in &entries {
            forward.insert(k.clone(), json!(v));
        }
        let mut backward = Variables::new();
        for (k, v) in entries.iter().rev() {
            backward.insert(k.clone(), json!(v));
        }

        let a = build_query_key(&document, &forward);
        let b = build_query_key(&document, &backward);
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a.to_string(), b.to_string());
        prop_assert_eq!(a.operation(), name.as_deref());
    }

    #[test]
    fn different_values_give_different_keys(x in any::<i64>(), y in any::<i64>()) {
        prop_assume!(x != y);
        let document = QueryDocument::parse("query Q { a }").unwrap();
        let mut first = Variables::new();
        first.insert("id".into(), json!(x));
        let mut second = Variables::new();
        second.insert("id".into(), json!(y));
        prop_assert_ne!(build_query_key(&document, &first), build_query_key(&document, &second));
    }
}

#[test]
fn nested_objects_are_canonical() {
    let document = QueryDocument::parse("query Search { a }").unwrap();
    let mut vars = Variables::new();
    vars.insert("filter".into(), json!({ "z": 1, "a": { "y": true, "b": null } }));
    let key = build_query_key(&document, &vars);
    assert_eq!(
        key.to_value(),
        json!(["Search", { "filter": { "a": { "b": null, "y": true }, "z": 1 } }])
    );
    assert_eq!(
        key.to_string(),
        r#"["Search",{"filter":{"a":{"b":null,"y":true},"z":1}}]"#
    );
    assert!(matches!(key.variables(), Value::Object(_)));
}
