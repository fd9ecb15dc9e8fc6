//! Error types.

use thiserror::Error;

/// Error returned by a component loader.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct LoadError {
    /// Error message
    pub message: String,
}

impl LoadError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<String> for LoadError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for LoadError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Errors from resolving and loading modal components.
///
/// Cloneable so a single load outcome can be handed to every waiter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No source carries this logical name.
    #[error("no modal component named '{name}'")]
    NotFound { name: String },

    /// The source exists but its loader failed.
    #[error("modal component '{name}' failed to load: {source}")]
    LoadFailed {
        name: String,
        #[source]
        source: LoadError,
    },

    /// Two sources resolve to the same logical name.
    #[error("modal component '{name}' is declared by both '{first}' and '{second}'")]
    DuplicateSource {
        name: String,
        first: String,
        second: String,
    },

    /// The path carries neither the `mdl` nor the `amdl` marker.
    #[error("'{path}' is not a modal source (expected a .mdl or .amdl marker)")]
    InvalidSource { path: String },
}

/// Errors from interpreting a modal response.
#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("failed to decode modal response: {0}")]
    Decode(#[from] serde_json::Error),
}
