//! Numeric-suffix grouping
//!
//! Authoring an array of objects as flat pairs:
//!
//! ```text
//! Fields.1 = [f1]   Operator.1 = ">="
//! Fields.2 = [f2]   Operator.2 = "<="
//! ```
//!
//! groups into `[{Fields: [f1], Operator: ">="}, {Fields: [f2], Operator: "<="}]`.
//! The suffix is a grouping key, not a structural index.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Split `Base.N` into `("Base", N)`. Keys without a numeric suffix yield `None`.
pub fn split_numeric_suffix(key: &str) -> Option<(&str, usize)> {
    let (base, suffix) = key.rsplit_once('.')?;
    if base.is_empty() || suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok().map(|index| (base, index))
}

/// Group `Base.N` keys into one mapping per distinct `N`, ordered by `N`.
///
/// Returns `None` when no key carries a numeric suffix, which is distinct
/// from `Some(vec![])`. Keys without a suffix are left out.
pub fn group_numeric_suffix(flat: &BTreeMap<String, Value>) -> Option<Vec<Map<String, Value>>> {
    let mut groups: BTreeMap<usize, Map<String, Value>> = BTreeMap::new();
    for (key, value) in flat {
        if let Some((base, index)) = split_numeric_suffix(key) {
            groups
                .entry(index)
                .or_default()
                .insert(base.to_string(), value.clone());
        }
    }

    if groups.is_empty() {
        None
    } else {
        Some(groups.into_values().collect())
    }
}
