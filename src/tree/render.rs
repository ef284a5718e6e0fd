//! Folding `path -> value` entries into a nested tree.
//!
//! Structural collisions are resolved last-write-wins: when a path needs a
//! mapping (or sequence) where a scalar or a node of the other kind already
//! sits, that node is replaced. The replacement is logged at debug level.

use crate::error::PathError;
use crate::path::{parse_tree_path, Path, PathSegment};
use crate::tree::kind_name;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// Render entries into a fresh mapping.
pub fn render(entries: &BTreeMap<String, Value>) -> Result<Value, PathError> {
    render_into(Value::Object(Map::new()), entries)
}

/// Render entries on top of `seed`, which may already hold a partial document.
pub fn render_into(seed: Value, entries: &BTreeMap<String, Value>) -> Result<Value, PathError> {
    let mut tree = seed;
    for (key, value) in entries {
        let path = parse_tree_path(key)?;
        insert_path(&mut tree, &path, value.clone());
    }
    Ok(tree)
}

/// Place `value` at `path` inside `tree`, creating mappings and growing
/// sequences (padded with nulls) as needed.
pub fn insert_path(tree: &mut Value, path: &Path, value: Value) {
    *node_at_path(tree, path) = value;
}

/// Walk `path` inside `tree`, creating every missing node on the way, and
/// return the addressed node (null if it did not exist).
pub fn node_at_path<'a>(tree: &'a mut Value, path: &Path) -> &'a mut Value {
    let mut node = tree;
    for segment in path.segments() {
        node = match segment {
            PathSegment::FieldName(name) => {
                if !node.is_object() {
                    note_collision(node, path, "mapping");
                    *node = Value::Object(Map::new());
                }
                let Value::Object(map) = node else {
                    unreachable!("node was just replaced by a mapping")
                };
                map.entry(name.clone()).or_insert(Value::Null)
            }
            PathSegment::Index(index) => {
                if !node.is_array() {
                    note_collision(node, path, "sequence");
                    *node = Value::Array(Vec::new());
                }
                let Value::Array(items) = node else {
                    unreachable!("node was just replaced by a sequence")
                };
                if items.len() <= *index {
                    items.resize(index + 1, Value::Null);
                }
                &mut items[*index]
            }
        };
    }
    node
}

fn note_collision(node: &Value, path: &Path, wanted: &'static str) {
    if !node.is_null() {
        debug!(
            path = %path,
            found = kind_name(node),
            wanted,
            "Structural collision, overwriting node"
        );
    }
}
