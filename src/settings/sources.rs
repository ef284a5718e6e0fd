//! Settings sources layered over the defaults: an optional file, then the environment.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;
use config::File;
use std::path::Path;
use tracing::warn;

/// Environment variable prefix, e.g. `STITCH_PIPELINE__REQUIRED_PROCESSOR`.
pub const ENV_PREFIX: &str = "STITCH";

/// Add a settings file. The format follows the file extension.
/// A missing file is skipped with a warning.
pub fn add_file(builder: ConfigBuilder<DefaultState>, path: &Path) -> ConfigBuilder<DefaultState> {
    if !path.exists() {
        warn!(
            settings_path = %path.display(),
            "Settings file not found, using defaults and environment only"
        );
        return builder;
    }
    builder.add_source(File::from(path).required(true))
}

/// Add `STITCH_*` environment overrides, `__` separating nested keys.
pub fn add_environment(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__"),
    )
}
