//! Collector Pipeline Normalization
//!
//! The collector document is rendered as a generic tree, decoded once into
//! [`CollectorConfig`] (which fixes key order and drops flow-style
//! artifacts), then normalized:
//!
//! 1. the required extension is defined and enabled in `service.extensions`
//! 2. the required processor is defined
//! 3. every pipeline's processors are ordered as: reserved-prefix entries,
//!    the required processor exactly once, then everything else, with a
//!    final order-preserving de-duplication

use crate::error::ComposeError;
use crate::merge::dedup_preserving_order;
use crate::overlay::Overlay;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// Typed collector document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectorConfig {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub receivers: BTreeMap<String, Value>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub processors: BTreeMap<String, Value>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub exporters: BTreeMap<String, Value>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub connectors: BTreeMap<String, Value>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: BTreeMap<String, Value>,

    #[serde(default)]
    pub service: ServiceConfig,
}

/// The `service` section: enabled extensions, pipelines, own telemetry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pipelines: BTreeMap<String, PipelineConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telemetry: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub receivers: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub processors: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exporters: Vec<String>,
}

/// Names the normalizer enforces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineRules {
    /// Extension that must be defined and enabled
    #[serde(default = "default_required_extension")]
    pub required_extension: String,

    /// Processor that must run in every pipeline
    #[serde(default = "default_required_processor")]
    pub required_processor: String,

    /// Processors with this prefix run before the required processor
    #[serde(default = "default_reserved_prefix")]
    pub reserved_prefix: String,
}

pub(crate) fn default_required_extension() -> String {
    "honeycomb".to_string()
}

pub(crate) fn default_required_processor() -> String {
    "usage".to_string()
}

pub(crate) fn default_reserved_prefix() -> String {
    "memory_limiter".to_string()
}

impl Default for PipelineRules {
    fn default() -> Self {
        Self {
            required_extension: default_required_extension(),
            required_processor: default_required_processor(),
            reserved_prefix: default_reserved_prefix(),
        }
    }
}

/// Order one pipeline's processors into reserved / required / rest bands.
pub fn order_processors(processors: &[String], rules: &PipelineRules) -> Vec<String> {
    let (reserved, rest): (Vec<String>, Vec<String>) = processors
        .iter()
        .filter(|name| **name != rules.required_processor)
        .cloned()
        .partition(|name| name.starts_with(&rules.reserved_prefix));

    let mut ordered = reserved;
    ordered.push(rules.required_processor.clone());
    ordered.extend(rest);
    dedup_preserving_order(ordered)
}

/// Enforce required components and processor ordering in place.
pub fn normalize(config: &mut CollectorConfig, rules: &PipelineRules) {
    if !config.extensions.contains_key(&rules.required_extension) {
        debug!(extension = %rules.required_extension, "Adding required extension");
        config
            .extensions
            .insert(rules.required_extension.clone(), Value::Object(Map::new()));
    }
    if !config.service.extensions.contains(&rules.required_extension) {
        config
            .service
            .extensions
            .push(rules.required_extension.clone());
    }

    if !config.processors.contains_key(&rules.required_processor) {
        debug!(processor = %rules.required_processor, "Adding required processor");
        config
            .processors
            .insert(rules.required_processor.clone(), Value::Object(Map::new()));
    }

    for (name, pipeline) in config.service.pipelines.iter_mut() {
        let ordered = order_processors(&pipeline.processors, rules);
        if ordered != pipeline.processors {
            debug!(pipeline = %name, processors = ?ordered, "Reordered pipeline processors");
        }
        pipeline.processors = ordered;
    }
}

/// Render an overlay as a normalized collector document.
pub fn render_collector(
    overlay: &mut Overlay,
    rules: &PipelineRules,
) -> Result<CollectorConfig, ComposeError> {
    let mut config: CollectorConfig = overlay.decode()?;
    normalize(&mut config, rules);
    Ok(config)
}

/// Render an overlay as normalized collector YAML.
pub fn render_collector_bytes(
    overlay: &mut Overlay,
    rules: &PipelineRules,
) -> Result<Vec<u8>, ComposeError> {
    let config = render_collector(overlay, rules)?;
    Ok(serde_yaml::to_string(&config)?.into_bytes())
}
