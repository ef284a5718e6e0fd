//! Property-based tests for merge, growth, and render guarantees

use proptest::prelude::*;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use stitch::merge::merge_value;
use stitch::tree::{flatten, render};
use stitch::{addressable, set_typed_field, Overlay};

#[derive(Debug, Default, PartialEq)]
struct Item {
    name: String,
    weight: u32,
}

#[derive(Debug, Default)]
struct Inventory {
    items: Vec<Item>,
}

addressable!(
    Item {
        "Name" => name,
        "Weight" => weight,
    };
    Inventory {
        "Items" => items,
    }
);

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z ]{0,8}".prop_map(Value::from),
    ]
}

fn subtree() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

fn document() -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-z]{1,6}", subtree(), 0..5)
        .prop_map(|m| Value::Object(m.into_iter().collect::<Map<_, _>>()))
}

/// Merging an overlay of scalar entries into itself any number of times
/// matches merging once
#[test]
fn test_scalar_merge_idempotence_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(
                prop::collection::btree_map("[a-z]{1,6}", leaf(), 1..8),
                1usize..5,
            ),
            |(entries, times)| {
                let mut source = Overlay::new();
                for (path, value) in &entries {
                    source.set("section", path, value.clone()).unwrap();
                }

                let mut once = source.clone();
                once.merge(source.clone()).unwrap();

                let mut many = source.clone();
                for _ in 0..times {
                    many.merge(source.clone()).unwrap();
                }

                prop_assert_eq!(once, many);
                Ok(())
            },
        )
        .unwrap();
}

/// Sequence merge keeps every element once, in first-occurrence order
/// across base-then-incoming
#[test]
fn test_sequence_merge_dedup_order_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(
                prop::collection::vec(0u8..10, 0..12),
                prop::collection::vec(0u8..10, 0..12),
            ),
            |(base, incoming)| {
                let mut merged = Value::from(base.clone());
                merge_value(&mut merged, Value::from(incoming.clone()));

                let concatenated: Vec<u8> = base.iter().chain(incoming.iter()).copied().collect();
                let expected: Vec<u8> = concatenated
                    .iter()
                    .enumerate()
                    .filter(|(i, item)| concatenated.iter().position(|x| x == *item) == Some(*i))
                    .map(|(_, item)| *item)
                    .collect();

                prop_assert_eq!(merged, Value::from(expected));
                Ok(())
            },
        )
        .unwrap();
}

/// Addressing index k grows a sequence to k + 1 zero-valued elements
#[test]
fn test_dense_growth_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(0usize..64, "[a-z]{1,8}"), |(index, name)| {
            let mut inventory = Inventory::default();
            set_typed_field(&format!("Items.{}.Name", index), &mut inventory, name.as_str())
                .unwrap();

            prop_assert_eq!(inventory.items.len(), index + 1);
            prop_assert!(inventory.items[..index].iter().all(|item| *item == Item::default()));
            prop_assert_eq!(&inventory.items[index].name, &name);
            prop_assert_eq!(inventory.items[index].weight, 0);
            Ok(())
        })
        .unwrap();
}

/// Flattening a scalar-leaf tree and rendering it again reproduces the tree
#[test]
fn test_flatten_render_round_trip_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&document(), |tree| {
            let flat: BTreeMap<String, Value> = flatten(&tree);
            prop_assert_eq!(render(&flat).unwrap(), tree);
            Ok(())
        })
        .unwrap();
}
