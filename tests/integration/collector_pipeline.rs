//! Collector documents composed from several contributors and normalized.

use serde_json::json;
use stitch::pipeline::{render_collector, render_collector_bytes, CollectorConfig};
use stitch::settings::SettingsLoader;
use stitch::{Overlay, PipelineRules};

fn base_contribution() -> Overlay {
    let mut overlay = Overlay::new();
    overlay
        .set("receivers", "otlp.protocols.grpc.endpoint", "0.0.0.0:4317")
        .unwrap();
    overlay.set("exporters", "otlp.endpoint", "api.example.com:443").unwrap();
    overlay.set("processors", "batch.timeout", "5s").unwrap();
    overlay
        .set("service", "pipelines.traces.receivers", json!(["otlp"]))
        .unwrap();
    overlay
        .set("service", "pipelines.traces.processors", json!(["batch"]))
        .unwrap();
    overlay
        .set("service", "pipelines.traces.exporters", json!(["otlp"]))
        .unwrap();
    overlay
}

fn limiter_contribution() -> Overlay {
    let mut overlay = Overlay::new();
    overlay
        .set("processors", "memory_limiter/otlp.limit_mib", 512)
        .unwrap();
    overlay
        .set("processors", "memory_limiter/otlp.check_interval", "1s")
        .unwrap();
    overlay
        .set(
            "service",
            "pipelines.traces.processors",
            json!(["memory_limiter/otlp", "batch"]),
        )
        .unwrap();
    overlay
}

#[test]
fn test_contributors_compose_into_ordered_pipeline() {
    let mut overlay = base_contribution();
    overlay.merge(limiter_contribution()).unwrap();

    let config = render_collector(&mut overlay, &PipelineRules::default()).unwrap();
    let traces = &config.service.pipelines["traces"];
    assert_eq!(traces.receivers, vec!["otlp"]);
    assert_eq!(
        traces.processors,
        vec!["memory_limiter/otlp", "usage", "batch"]
    );
    assert_eq!(traces.exporters, vec!["otlp"]);
    assert_eq!(
        config.processors["memory_limiter/otlp"],
        json!({"limit_mib": 512, "check_interval": "1s"})
    );
    assert!(config.extensions.contains_key("honeycomb"));
    assert_eq!(config.service.extensions, vec!["honeycomb"]);
}

#[test]
fn test_collector_yaml_round_trips_through_typed_document() {
    let mut overlay = base_contribution();
    let yaml = render_collector_bytes(&mut overlay, &PipelineRules::default()).unwrap();

    let reparsed: CollectorConfig = serde_yaml::from_slice(&yaml).unwrap();
    let mut again = base_contribution();
    let direct = render_collector(&mut again, &PipelineRules::default()).unwrap();
    assert_eq!(reparsed, direct);
}

#[test]
fn test_rendering_twice_is_stable() {
    let mut overlay = base_contribution();
    let first = render_collector_bytes(&mut overlay, &PipelineRules::default()).unwrap();
    let second = render_collector_bytes(&mut overlay, &PipelineRules::default()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_rules_from_settings() {
    let mut rules = SettingsLoader::load_default().unwrap().pipeline;
    rules.required_processor = "metering".to_string();
    rules.reserved_prefix = "memory_limiter".to_string();

    let mut overlay = base_contribution();
    overlay.merge(limiter_contribution()).unwrap();
    let config = render_collector(&mut overlay, &rules).unwrap();

    assert_eq!(
        config.service.pipelines["traces"].processors,
        vec!["memory_limiter/otlp", "metering", "batch"]
    );
    assert!(config.processors.contains_key("metering"));
    assert!(!config.processors.contains_key("usage"));
}
