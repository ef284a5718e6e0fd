//! Error types for the Stitch configuration composition engine.

use thiserror::Error;

/// Errors raised while parsing a path or applying it to a typed struct graph
#[derive(Debug, Error)]
pub enum PathError {
    #[error("Malformed path '{path}': {reason}")]
    MalformedPath { path: String, reason: String },

    #[error("Unknown field '{field}' on {owner}")]
    UnknownField { field: String, owner: &'static str },

    #[error("Cannot descend into '{segment}': {type_name} is not a struct")]
    NotAStruct {
        segment: String,
        type_name: &'static str,
    },

    #[error("Root {type_name} is nil")]
    NilRoot { type_name: &'static str },

    #[error("Invalid duration '{value}': {source}")]
    InvalidDuration {
        value: String,
        #[source]
        source: humantime::DurationError,
    },

    #[error("Type mismatch: cannot assign {found} to {expected}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

impl PathError {
    pub(crate) fn malformed(path: &str, reason: impl Into<String>) -> Self {
        PathError::MalformedPath {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors raised by overlay composition and the rendering boundary
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error("Incompatible merge in section '{section}': cannot merge {incoming} into {base}")]
    IncompatibleMerge {
        section: String,
        base: &'static str,
        incoming: &'static str,
    },

    #[error("Failed to encode document: {0}")]
    Encode(#[from] serde_yaml::Error),

    #[error("Failed to decode document: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<config::ConfigError> for ComposeError {
    fn from(err: config::ConfigError) -> Self {
        ComposeError::Config(err.to_string())
    }
}
