//! Built-in defaults, the lowest-precedence layer.

use crate::logging::{default_format, default_log_level, default_output};
use crate::pipeline::{
    default_required_extension, default_required_processor, default_reserved_prefix,
};
use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with the engine defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("pipeline.required_extension", default_required_extension())?
        .set_default("pipeline.required_processor", default_required_processor())?
        .set_default("pipeline.reserved_prefix", default_reserved_prefix())?
        .set_default("logging.level", default_log_level())?
        .set_default("logging.format", default_format())?
        .set_default("logging.output", default_output())
}
