//! Shared document generators for jsonql benchmarks

use serde_json::{Value, json};

/// Build a document with `width` top-level records, each holding a small
/// mapping with a nested tag list
pub fn wide_document(width: usize) -> Value {
    let mut map = serde_json::Map::new();
    for i in 0..width {
        map.insert(
            format!("record{i}"),
            json!({
                "id": i,
                "name": format!("item-{i}"),
                "active": i % 2 == 0,
                "tags": [format!("tag-{}", i % 7), "common"]
            }),
        );
    }
    Value::Object(map)
}

/// Build a document nested `depth` levels deep with a single leaf
pub fn deep_document(depth: usize) -> Value {
    let mut value = json!({"leaf": "end"});
    for _ in 0..depth {
        value = json!({"child": value});
    }
    json!({"root": value})
}
