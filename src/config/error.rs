//! Errors raised while loading settings.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to produce a valid [`super::Settings`] value.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("failed to read settings file {path}: {source}")]
    Io {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid JSON for the settings schema.
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// An environment override could not be parsed.
    #[error("invalid value {value:?} for {key}")]
    InvalidOverride {
        /// Environment variable name.
        key: String,
        /// Raw value that failed to parse.
        value: String,
    },

    /// A setting holds a value outside its accepted range.
    #[error("invalid setting {key}: {reason}")]
    InvalidValue {
        /// Dotted settings path.
        key: &'static str,
        /// Human-readable reason.
        reason: String,
    },
}
