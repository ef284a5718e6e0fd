//! Generic Configuration Trees
//!
//! Untyped nested documents (`serde_json::Value`: scalar, sequence, or
//! string-keyed mapping) built by folding dotted paths, plus the
//! numeric-suffix grouping convention and the inverse flattening.

pub mod flatten;
pub mod group;
pub mod render;

pub use flatten::flatten;
pub use group::group_numeric_suffix;
pub use render::{insert_path, node_at_path, render, render_into};

/// Node kind name used in errors and log events.
pub fn kind_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "sequence",
        serde_json::Value::Object(_) => "mapping",
    }
}
