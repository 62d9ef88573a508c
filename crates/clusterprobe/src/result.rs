//! Result and error types for clusterprobe.
//!
//! Only run-level failures live here: configuration problems detected
//! before scheduling and render/I/O failures after it. A probe that breaks
//! is never an error at this level; it becomes an [`Outcome`](crate::Outcome).

use thiserror::Error;

/// Result type for clusterprobe operations
pub type ClusterProbeResult<T> = Result<T, ClusterProbeError>;

/// Errors that fail a whole run
#[derive(Debug, Error)]
pub enum ClusterProbeError {
    /// Invalid run configuration (e.g. no probe left after filtering)
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Two probes registered with the same id
    #[error("Duplicate probe id: {id}")]
    DuplicateProbe {
        /// Offending probe id
        id: String,
    },

    /// Category filter named a category that has no canonical mapping
    #[error("Unknown category: {name}")]
    UnknownCategory {
        /// Name as given by the caller
        name: String,
    },

    /// Report rendering failed
    #[error("Render failed: {message}")]
    Render {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl ClusterProbeError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a render error
    #[must_use]
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    /// True for errors raised before any probe was dispatched
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Config { .. } | Self::DuplicateProbe { .. } | Self::UnknownCategory { .. }
        )
    }
}
