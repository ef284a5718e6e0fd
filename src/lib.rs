//! Stitch: Path-Addressed Configuration Composition
//!
//! Composes hierarchical configuration documents (collector pipelines,
//! sampler rules) from fragments written as flat, dotted key paths. Several
//! contributors each set a slice of configuration in an [`overlay::Overlay`];
//! overlays merge, render into one generic tree, and either serialize to
//! YAML or land in typed structs through serde or the typed path mutator.

pub mod error;
pub mod logging;
pub mod merge;
pub mod overlay;
pub mod path;
pub mod pipeline;
pub mod settings;
pub mod tree;
pub mod typed;

pub use error::{ComposeError, PathError};
pub use overlay::{Overlay, SectionLayout};
pub use path::{parse_tree_path, parse_typed_path, Path, PathSegment, MAX_INDEX};
pub use pipeline::{CollectorConfig, PipelineRules};
pub use typed::set_typed_field;
