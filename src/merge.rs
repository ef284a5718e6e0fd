//! Merge Engine
//!
//! Per-key policy shared by flat overlays and rendered documents:
//! - absent key: take the incoming value verbatim
//! - incoming sequence: base sequence then incoming sequence, de-duplicated,
//!   first occurrence wins
//! - anything else: incoming overwrites base
//!
//! Document merges additionally recurse when both sides are mappings.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::trace;

/// Drop repeated elements, keeping the first occurrence of each.
///
/// Uses equality only, so it works for element types that are not hashable
/// (such as `serde_json::Value`).
pub fn dedup_preserving_order<T: PartialEq>(items: Vec<T>) -> Vec<T> {
    let mut unique: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique
}

/// Concatenate `base` then `incoming` and de-duplicate the result.
pub fn concat_dedup<T: PartialEq + Clone>(base: &[T], incoming: &[T]) -> Vec<T> {
    dedup_preserving_order(base.iter().chain(incoming.iter()).cloned().collect())
}

/// Apply the per-key policy for a single value already present in the base.
pub fn merge_value(base: &mut Value, incoming: Value) {
    match incoming {
        Value::Array(incoming_items) => {
            let mut items = match std::mem::take(base) {
                Value::Array(existing) => existing,
                _ => Vec::new(),
            };
            items.extend(incoming_items);
            *base = Value::Array(dedup_preserving_order(items));
        }
        other => {
            trace!(from = %base, to = %other, "Overwriting value during merge");
            *base = other;
        }
    }
}

/// Merge a flat `path -> value` overlay into `base`, key by key.
///
/// Keys only present in `base` are kept untouched.
pub fn merge_entries(base: &mut BTreeMap<String, Value>, incoming: BTreeMap<String, Value>) {
    for (key, value) in incoming {
        match base.get_mut(&key) {
            Some(existing) => merge_value(existing, value),
            None => {
                base.insert(key, value);
            }
        }
    }
}

/// Deep-merge a rendered document into `base`.
///
/// Mappings merge recursively; every other position follows [`merge_value`].
pub fn merge_documents(base: &mut Value, incoming: Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(incoming_map)) => {
            merge_maps(base_map, incoming_map);
        }
        (base, incoming) => merge_value(base, incoming),
    }
}

fn merge_maps(base: &mut Map<String, Value>, incoming: Map<String, Value>) {
    for (key, value) in incoming {
        match base.get_mut(&key) {
            Some(existing) => merge_documents(existing, value),
            None => {
                base.insert(key, value);
            }
        }
    }
}
