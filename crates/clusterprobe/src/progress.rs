//! Progress events emitted by the scheduler.

use crate::config::ExecutionMode;
use crate::outcome::{Outcome, Termination};
use crate::probe::ProbeInfo;
use crate::run::RunResult;
use serde::{Deserialize, Serialize};

/// Lifecycle of one probe within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProbeState {
    /// Selected, not yet dispatched
    Pending,
    /// Dispatched to a worker
    Running,
    /// Returned its own verdict
    Completed,
    /// Returned an error or panicked
    Errored,
    /// Did not answer before the timeout
    TimedOut,
    /// Never dispatched (fail-fast or run cancellation)
    Skipped,
}

impl ProbeState {
    /// Whether the probe has left the run
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending | Self::Running)
    }
}

impl From<Termination> for ProbeState {
    fn from(termination: Termination) -> Self {
        match termination {
            Termination::Completed => Self::Completed,
            Termination::Errored => Self::Errored,
            Termination::TimedOut => Self::TimedOut,
        }
    }
}

/// Receiver of scheduler progress.
///
/// Called from worker supervisor threads in concurrent mode, so
/// implementations must be thread-safe. Every method has a no-op default.
pub trait ProgressSink: Send + Sync {
    /// The run is about to dispatch `total` probes
    fn run_started(&self, _total: usize, _mode: ExecutionMode) {}

    /// A probe changed state (Running or Skipped)
    fn probe_state(&self, _probe: &ProbeInfo, _state: ProbeState) {}

    /// A probe produced its outcome
    fn probe_finished(&self, _probe: &ProbeInfo, _outcome: &Outcome) {}

    /// The run is complete
    fn run_finished(&self, _run: &RunResult) {}
}

/// Sink that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {}
