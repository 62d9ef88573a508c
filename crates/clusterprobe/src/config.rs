//! Run configuration.
//!
//! Consumed as a struct; argv parsing happens in the CLI crate. A config can
//! also be loaded from YAML:
//!
//! ```yaml
//! categories: [networking, security]
//! mode: concurrent
//! timeout_ms: 30000
//! fail_fast: false
//! progress: true
//! ```

use crate::category::CategoryFilter;
use crate::result::{ClusterProbeError, ClusterProbeResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default per-probe timeout
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// How probes are dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// One probe at a time, in registration order. Supports fail-fast.
    Sequential,
    /// Every probe at once, one thread each.
    ///
    /// Fail-fast is not supported here: all probes are dispatched up front
    /// and run to completion or timeout.
    #[default]
    Concurrent,
}

impl ExecutionMode {
    /// Lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Concurrent => "concurrent",
        }
    }
}

/// Configuration for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Category names to restrict the run to; empty means all
    pub categories: Vec<String>,
    /// Dispatch mode
    pub mode: ExecutionMode,
    /// Per-probe timeout in milliseconds; 0 means unbounded
    pub timeout_ms: u64,
    /// Stop after the first probe that errors (sequential mode only)
    pub fail_fast: bool,
    /// Emit progress events
    pub progress: bool,
    /// Verbose progress (per-probe lines)
    pub verbose: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            mode: ExecutionMode::Concurrent,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            fail_fast: false,
            progress: true,
            verbose: false,
        }
    }
}

impl RunConfig {
    /// Create a new builder
    #[must_use]
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder::default()
    }

    /// Per-probe timeout, `None` when unbounded
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        if self.timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.timeout_ms))
        }
    }

    /// Resolve the category names into a filter
    ///
    /// # Errors
    ///
    /// Returns [`ClusterProbeError::UnknownCategory`] for an unmapped name.
    pub fn category_filter(&self) -> ClusterProbeResult<CategoryFilter> {
        CategoryFilter::from_names(&self.categories)
    }

    /// Whether fail-fast will actually take effect
    #[must_use]
    pub const fn fail_fast_active(&self) -> bool {
        self.fail_fast && matches!(self.mode, ExecutionMode::Sequential)
    }

    /// Parse a YAML document
    ///
    /// # Errors
    ///
    /// Returns [`ClusterProbeError::Yaml`] on malformed input.
    pub fn from_yaml_str(yaml: &str) -> ClusterProbeResult<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Load a YAML config file
    ///
    /// # Errors
    ///
    /// Returns an I/O or YAML error, or a configuration error naming the file.
    pub fn load(path: &Path) -> ClusterProbeResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text).map_err(|e| {
            ClusterProbeError::config(format!("{}: {e}", path.display()))
        })
    }
}

/// Builder for [`RunConfig`]
#[derive(Debug, Clone, Default)]
pub struct RunConfigBuilder {
    config: RunConfig,
}

impl RunConfigBuilder {
    /// Restrict to categories
    #[must_use]
    pub fn categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Set the execution mode
    #[must_use]
    pub const fn mode(mut self, mode: ExecutionMode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Shorthand for sequential mode
    #[must_use]
    pub const fn sequential(self) -> Self {
        self.mode(ExecutionMode::Sequential)
    }

    /// Set the per-probe timeout; `Duration::ZERO` means unbounded
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Enable/disable fail-fast
    #[must_use]
    pub const fn fail_fast(mut self, enabled: bool) -> Self {
        self.config.fail_fast = enabled;
        self
    }

    /// Enable/disable progress events
    #[must_use]
    pub const fn progress(mut self, enabled: bool) -> Self {
        self.config.progress = enabled;
        self
    }

    /// Enable/disable verbose progress
    #[must_use]
    pub const fn verbose(mut self, enabled: bool) -> Self {
        self.config.verbose = enabled;
        self
    }

    /// Build the configuration
    #[must_use]
    pub fn build(self) -> RunConfig {
        self.config
    }
}
