//! Flattening a tree back into `path -> value` entries.
//!
//! The inverse of [`super::render`] for trees whose mapping keys contain no
//! `.`, `[` or `]`. Sequence positions use the bracket grammar. Empty
//! mappings and sequences are kept as leaves so they survive a round trip.

use serde_json::Value;
use std::collections::BTreeMap;

/// Flatten a mapping-rooted tree. Any other root yields no entries.
pub fn flatten(tree: &Value) -> BTreeMap<String, Value> {
    let mut entries = BTreeMap::new();
    if let Value::Object(map) = tree {
        for (key, value) in map {
            flatten_into(key.clone(), value, &mut entries);
        }
    }
    entries
}

fn flatten_into(prefix: String, value: &Value, entries: &mut BTreeMap<String, Value>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                flatten_into(format!("{}.{}", prefix, key), child, entries);
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for (index, child) in items.iter().enumerate() {
                flatten_into(format!("{}[{}]", prefix, index), child, entries);
            }
        }
        leaf => {
            entries.insert(prefix, leaf.clone());
        }
    }
}
