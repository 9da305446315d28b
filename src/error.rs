use std::path::PathBuf;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Failure to produce the text body of an inline dialog.
///
/// Never returned to callers of the shell: the lifecycle controller renders it
/// into the dialog's content region.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid resource locator '{locator}': {reason}")]
    InvalidLocator { locator: String, reason: String },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP error: {0}")]
    Status(u16),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("preference file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode preferences: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors surfaced to the host through the command layer.
#[derive(Debug, Error)]
pub enum DesktopError {
    #[error("shortcut '{0}' is not registered on the desktop")]
    UnknownIcon(String),

    #[error("desktop state lock poisoned: {0}")]
    StatePoisoned(String),

    #[error(transparent)]
    Prefs(#[from] PrefsError),
}

impl<T> From<std::sync::PoisonError<T>> for DesktopError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        DesktopError::StatePoisoned(err.to_string())
    }
}

// Commands hand errors to the web view as plain strings
impl Serialize for DesktopError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
