//! Overlay composition across contributors, seeds, and render passes.

use serde_json::{json, Value};
use stitch::tree::{flatten, render};
use stitch::{ComposeError, Overlay, PathError};

#[test]
fn test_contributor_order_does_not_change_scalars_it_does_not_touch() {
    let mut first = Overlay::new();
    first.set("exporters", "otlp.endpoint", "a:4317").unwrap();
    first.set("exporters", "otlp.compression", "gzip").unwrap();

    let mut second = Overlay::new();
    second.set("exporters", "otlp.endpoint", "b:4317").unwrap();

    first.merge(second).unwrap();
    let tree = first.render_to_tree(None).unwrap();
    assert_eq!(
        tree,
        json!({"exporters": {"otlp": {"endpoint": "b:4317", "compression": "gzip"}}})
    );
}

#[test]
fn test_rendered_overlays_merge_as_documents() {
    let mut first = Overlay::new();
    first.set("service", "extensions", json!(["health_check"])).unwrap();
    first.render_to_tree(None).unwrap();

    let mut second = Overlay::new();
    second.set("service", "extensions", json!(["pprof", "health_check"])).unwrap();
    second.render_to_tree(None).unwrap();

    first.merge(second).unwrap();
    assert_eq!(
        first.render_to_tree(None).unwrap(),
        json!({"service": {"extensions": ["health_check", "pprof"]}})
    );
}

#[test]
fn test_composition_across_sources_through_seed() {
    let mut collector = Overlay::new();
    collector.set("receivers", "otlp.protocols.http.endpoint", "0.0.0.0:4318").unwrap();
    let partial = collector.render_to_tree(None).unwrap();

    let mut extras = Overlay::new();
    extras.set("receivers", "otlp.protocols.grpc.endpoint", "0.0.0.0:4317").unwrap();
    let tree = extras.render_to_tree(Some(partial)).unwrap();

    assert_eq!(
        tree,
        json!({"receivers": {"otlp": {"protocols": {
            "grpc": {"endpoint": "0.0.0.0:4317"},
            "http": {"endpoint": "0.0.0.0:4318"}
        }}}})
    );
}

#[test]
fn test_set_after_render_on_grouped_section_is_incompatible() {
    let mut overlay = Overlay::new();
    overlay.declare_grouped("conditions").unwrap();
    overlay.set("conditions", "Field.0", "status").unwrap();
    overlay.render_to_tree(None).unwrap();

    assert!(matches!(
        overlay.set("conditions", "Field.1", "error"),
        Err(ComposeError::IncompatibleMerge { .. })
    ));
}

#[test]
fn test_malformed_section_name() {
    let mut overlay = Overlay::new();
    assert!(matches!(
        overlay.set("rules]", "Name", "x"),
        Err(ComposeError::Path(PathError::MalformedPath { .. }))
    ));
}

#[test]
fn test_flatten_of_rendered_overlay_reproduces_entries() {
    let mut overlay = Overlay::new();
    overlay.set("root", "a.b", 1).unwrap();
    overlay.set("root", "a.c[1]", "x").unwrap();
    let tree = overlay.render_to_tree(None).unwrap();

    let flat = flatten(&tree);
    assert_eq!(flat["root.a.b"], json!(1));
    assert_eq!(flat["root.a.c[0]"], Value::Null);
    assert_eq!(flat["root.a.c[1]"], json!("x"));
    assert_eq!(render(&flat).unwrap(), tree);
}
