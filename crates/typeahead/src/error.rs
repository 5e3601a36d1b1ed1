//! Error types for the typeahead widget.

use std::path::PathBuf;

/// Result type alias for fallible typeahead setup.
pub type Result<T> = std::result::Result<T, TypeaheadError>;

/// A candidate retrieval that did not produce a candidate list.
///
/// Retrieval failures never escape event handling: the widget recovers
/// locally and reports them through its `retrieval_failed` signal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RetrievalError {
    /// The candidate source rejected the query.
    #[error("Candidate retrieval failed: {message}")]
    Failed { message: String },

    /// The candidate source gave up waiting.
    #[error("Candidate retrieval timed out")]
    TimedOut,

    /// The retrieval was abandoned before it finished.
    #[error("Candidate retrieval was cancelled")]
    Cancelled,
}

impl RetrievalError {
    /// Create a failure with a message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parsing error.
    #[error("Failed to parse typeahead config: {0}")]
    Parse(#[from] toml::de::Error),

    /// File I/O error.
    #[error("Failed to read typeahead config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A field holds a value the widget cannot work with.
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: &'static str, message: String },
}

impl ConfigError {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a value error.
    pub fn invalid_value(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            message: message.into(),
        }
    }
}

/// Errors surfaced while building a typeahead.
#[derive(Debug, thiserror::Error)]
pub enum TypeaheadError {
    /// Configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The async runtime could not be created.
    #[error(transparent)]
    Runtime(#[from] typeahead_core::CoreError),
}
