//! The probe contract and the registry probes are collected into.
//!
//! # Contract
//!
//! - [`Probe::info`] is pure and stable: the same probe reports the same
//!   identity for the whole run.
//! - [`Probe::execute`] may block on I/O and may be called from any thread.
//! - `Err(ProbeFailure)` means "the check could not determine an answer".
//!   The scheduler discards whatever the probe intended and records its own
//!   Critical outcome with [`Termination::Errored`](crate::Termination).
//! - `Ok(outcome)` with [`Status::Critical`](crate::Status) means "the check
//!   worked and the target is unhealthy".
//! - A probe should poll [`ProbeContext::is_cancelled`] between slow steps;
//!   once its deadline passes nobody reads its answer.

use crate::cancel::CancellationToken;
use crate::category::{Category, CategoryFilter};
use crate::outcome::Outcome;
use crate::result::{ClusterProbeError, ClusterProbeResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Identity of a probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeInfo {
    /// Stable id, unique within a registry
    pub id: String,
    /// Display name
    pub name: String,
    /// What the probe checks
    pub description: String,
    /// Operational domain
    pub category: Category,
    /// Documentation links shown in detailed report sections
    #[serde(default)]
    pub references: Vec<String>,
}

impl ProbeInfo {
    /// Create probe identity
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category,
            references: Vec::new(),
        }
    }

    /// Set the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a reference link
    #[must_use]
    pub fn with_reference(mut self, url: impl Into<String>) -> Self {
        self.references.push(url.into());
        self
    }
}

/// Why a probe could not produce a verdict
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeFailure {
    /// External command could not be run or exited abnormally
    #[error("command `{command}` failed: {message}")]
    Command {
        /// Command line that was run
        command: String,
        /// Error message
        message: String,
    },

    /// Output could not be interpreted
    #[error("could not parse output: {message}")]
    Parse {
        /// Error message
        message: String,
    },

    /// Probe noticed its context was cancelled and gave up
    #[error("cancelled")]
    Cancelled,

    /// Anything else
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

impl ProbeFailure {
    /// Create a generic failure
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Create a parse failure
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}

/// Execution context handed to [`Probe::execute`]
#[derive(Debug, Clone)]
pub struct ProbeContext {
    token: CancellationToken,
    run_token: CancellationToken,
    timeout: Option<Duration>,
    started: Instant,
}

impl ProbeContext {
    pub(crate) fn new(
        token: CancellationToken,
        run_token: CancellationToken,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            token,
            run_token,
            timeout,
            started: Instant::now(),
        }
    }

    /// Context with no deadline and no cancellation, for calling a probe
    /// directly outside a scheduler
    #[must_use]
    pub fn detached() -> Self {
        Self::new(CancellationToken::new(), CancellationToken::new(), None)
    }

    /// Whether the probe's answer is no longer wanted
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled() || self.run_token.is_cancelled()
    }

    /// Per-probe timeout, `None` when unbounded
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Time left before the deadline, `None` when unbounded
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.timeout
            .map(|limit| limit.saturating_sub(self.started.elapsed()))
    }
}

/// A diagnostic unit
pub trait Probe: Send + Sync {
    /// Identity: id, name, description, category
    fn info(&self) -> ProbeInfo;

    /// Run the check
    ///
    /// # Errors
    ///
    /// Returns [`ProbeFailure`] when the check itself could not determine
    /// an answer.
    fn execute(&self, ctx: &ProbeContext) -> Result<Outcome, ProbeFailure>;
}

type ProbeFn = dyn Fn(&ProbeContext) -> Result<Outcome, ProbeFailure> + Send + Sync;

/// Closure-backed probe
pub struct FnProbe {
    info: ProbeInfo,
    run: Box<ProbeFn>,
}

impl FnProbe {
    /// Wrap a closure as a probe
    pub fn new<F>(info: ProbeInfo, run: F) -> Self
    where
        F: Fn(&ProbeContext) -> Result<Outcome, ProbeFailure> + Send + Sync + 'static,
    {
        Self {
            info,
            run: Box::new(run),
        }
    }
}

impl fmt::Debug for FnProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnProbe").field("info", &self.info).finish()
    }
}

impl Probe for FnProbe {
    fn info(&self) -> ProbeInfo {
        self.info.clone()
    }

    fn execute(&self, ctx: &ProbeContext) -> Result<Outcome, ProbeFailure> {
        (self.run)(ctx)
    }
}

/// A probe together with the identity captured at registration
#[derive(Clone)]
pub struct RegisteredProbe {
    /// Identity as reported when registered
    pub info: ProbeInfo,
    /// The probe itself
    pub probe: Arc<dyn Probe>,
}

impl fmt::Debug for RegisteredProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredProbe")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

/// Ordered probe collection, built once per run
#[derive(Debug, Clone, Default)]
pub struct ProbeRegistry {
    probes: Vec<RegisteredProbe>,
}

impl ProbeRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a probe
    ///
    /// # Errors
    ///
    /// Returns [`ClusterProbeError::DuplicateProbe`] if the id is taken, or
    /// a configuration error for an empty id.
    pub fn register<P: Probe + 'static>(&mut self, probe: P) -> ClusterProbeResult<()> {
        self.register_arc(Arc::new(probe))
    }

    /// Register a shared probe
    ///
    /// # Errors
    ///
    /// Same as [`ProbeRegistry::register`].
    pub fn register_arc(&mut self, probe: Arc<dyn Probe>) -> ClusterProbeResult<()> {
        let info = probe.info();
        if info.id.trim().is_empty() {
            return Err(ClusterProbeError::config(format!(
                "probe '{}' has an empty id",
                info.name
            )));
        }
        if self.get(&info.id).is_some() {
            return Err(ClusterProbeError::DuplicateProbe { id: info.id });
        }
        self.probes.push(RegisteredProbe { info, probe });
        Ok(())
    }

    /// Builder-style registration
    ///
    /// # Errors
    ///
    /// Same as [`ProbeRegistry::register`].
    pub fn with<P: Probe + 'static>(mut self, probe: P) -> ClusterProbeResult<Self> {
        self.register(probe)?;
        Ok(self)
    }

    /// Look up a probe by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&RegisteredProbe> {
        self.probes.iter().find(|p| p.info.id == id)
    }

    /// Number of registered probes
    #[must_use]
    pub fn len(&self) -> usize {
        self.probes.len()
    }

    /// Whether no probe is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// Probes in registration order
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredProbe> {
        self.probes.iter()
    }

    /// Probes passing the filter, in registration order
    #[must_use]
    pub fn select(&self, filter: &CategoryFilter) -> Vec<RegisteredProbe> {
        self.probes
            .iter()
            .filter(|p| filter.matches(p.info.category))
            .cloned()
            .collect()
    }
}
