//! Error types for the CLI

use std::path::Path;
use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Probe manifest could not be loaded or is invalid
    #[error("Invalid manifest {path}: {message}")]
    Manifest {
        /// Manifest path
        path: String,
        /// Error message
        message: String,
    },

    /// Report generation error
    #[error("Report generation failed: {message}")]
    ReportGeneration {
        /// Error message
        message: String,
    },

    /// `--strict` was given and the run has findings
    #[error("Strict mode: {findings} probe(s) reported Warning, Critical or Unknown")]
    Strict {
        /// Number of offending outcomes
        findings: usize,
    },

    /// JSON output error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Clusterprobe library error
    #[error("{0}")]
    ClusterProbe(#[from] clusterprobe::ClusterProbeError),
}

impl CliError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a manifest error
    #[must_use]
    pub fn manifest(path: &Path, message: impl Into<String>) -> Self {
        Self::Manifest {
            path: path.display().to_string(),
            message: message.into(),
        }
    }

    /// Create a report generation error
    #[must_use]
    pub fn report_generation(message: impl Into<String>) -> Self {
        Self::ReportGeneration {
            message: message.into(),
        }
    }

    /// Process exit code: 2 for strict-mode findings, 1 otherwise
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Strict { .. } => 2,
            _ => 1,
        }
    }
}
