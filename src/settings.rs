//! Engine Settings
//!
//! Layered runtime settings for the composition engine: built-in defaults,
//! then an optional settings file, then `STITCH_*` environment variables.

use crate::error::ComposeError;
use crate::logging::LoggingConfig;
use crate::pipeline::PipelineRules;
use serde::{Deserialize, Serialize};
use std::path::Path;

mod defaults;
mod sources;

pub use sources::ENV_PREFIX;

/// Root settings structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Required components and processor ordering for collector documents
    #[serde(default)]
    pub pipeline: PipelineRules,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Loads [`Settings`] from the layered sources
pub struct SettingsLoader;

impl SettingsLoader {
    /// Load settings, optionally reading `file` between defaults and environment.
    pub fn load(file: Option<&Path>) -> Result<Settings, ComposeError> {
        let mut builder = defaults::builder_with_defaults()?;
        if let Some(path) = file {
            builder = sources::add_file(builder, path);
        }
        builder = sources::add_environment(builder);

        let settings: Settings = builder.build()?.try_deserialize()?;
        Ok(settings)
    }

    /// Load defaults and environment only.
    pub fn load_default() -> Result<Settings, ComposeError> {
        Self::load(None)
    }
}
