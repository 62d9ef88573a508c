//! Scheduler - runs probes and collects one outcome per probe
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │  Scheduler::run                                                      │
//! │  ──────────────                                                      │
//! │                                                                      │
//! │  registry ──► category filter ──► selected probes (registration order)│
//! │                                                                      │
//! │  ┌────────────────────┐          ┌────────────────────────┐          │
//! │  │ Sequential         │          │ Concurrent             │          │
//! │  │                    │          │                        │          │
//! │  │ one at a time,     │          │ one supervisor per     │          │
//! │  │ fail-fast may stop │          │ probe, Mutex<HashMap>  │          │
//! │  │ the line           │          │ collects outcomes      │          │
//! │  └─────────┬──────────┘          └───────────┬────────────┘          │
//! │            └──────────────┬──────────────────┘                       │
//! │                           ▼                                          │
//! │   execute_one: worker thread + catch_unwind                          │
//! │                select! { result | timeout }                          │
//! │                           ▼                                          │
//! │                       RunResult                                      │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A probe that times out is abandoned: its cancellation token is tripped
//! and its worker thread is detached, but nothing forces it to stop. Side
//! effects of a timed-out probe may continue after the run ends.

use crate::cancel::CancellationToken;
use crate::config::{ExecutionMode, RunConfig};
use crate::outcome::Outcome;
use crate::probe::{ProbeContext, ProbeFailure, ProbeRegistry, RegisteredProbe};
use crate::progress::{NoProgress, ProbeState, ProgressSink};
use crate::result::{ClusterProbeError, ClusterProbeResult};
use crate::run::RunResult;
use crate::status::Status;
use chrono::Utc;
use crossbeam_channel::{after, bounded, never, select, Receiver};
use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

type WorkerResult = thread::Result<Result<Outcome, ProbeFailure>>;

/// Runs a probe registry under a [`RunConfig`]
pub struct Scheduler {
    config: RunConfig,
    progress: Arc<dyn ProgressSink>,
    cancel: CancellationToken,
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("config", &self.config)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl Scheduler {
    /// Create a scheduler
    #[must_use]
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            progress: Arc::new(NoProgress),
            cancel: CancellationToken::new(),
        }
    }

    /// Report progress to `sink` (only if `config.progress` is set)
    #[must_use]
    pub fn with_progress(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = sink;
        self
    }

    /// Stop dispatching new probes once `token` is cancelled
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run every probe that passes the category filter.
    ///
    /// Probe failures, panics and timeouts are recorded as outcomes; they
    /// never fail the run.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a category name is unknown or no
    /// probe is left after filtering. No probe runs in that case.
    pub fn run(&self, registry: &ProbeRegistry) -> ClusterProbeResult<RunResult> {
        let filter = self.config.category_filter()?;
        let selected = registry.select(&filter);
        if selected.is_empty() {
            let scope = if filter.is_unrestricted() {
                "the registry is empty".to_string()
            } else {
                let names: Vec<_> = filter.categories().map(|c| c.key()).collect();
                format!("no probe matches categories [{}]", names.join(", "))
            };
            return Err(ClusterProbeError::config(format!(
                "nothing to run: {scope}"
            )));
        }

        let mode = self.config.mode;
        if self.config.fail_fast && mode == ExecutionMode::Concurrent {
            warn!("fail-fast is ignored in concurrent mode; every probe runs to completion");
        }

        let infos = selected.iter().map(|p| p.info.clone()).collect();
        let mut run = RunResult::new(mode, infos, Utc::now());
        info!(
            run_id = %run.run_id(),
            probes = selected.len(),
            mode = mode.as_str(),
            timeout_ms = self.config.timeout_ms,
            "starting probe run"
        );

        if let Some(sink) = self.sink() {
            sink.run_started(selected.len(), mode);
        }

        let started = Instant::now();
        let outcomes = match mode {
            ExecutionMode::Sequential => self.run_sequential(&selected),
            ExecutionMode::Concurrent => self.run_concurrent(&selected),
        };
        run.finish(outcomes, started.elapsed());

        if let Some(sink) = self.sink() {
            for probe in selected.iter().filter(|p| run.is_skipped(&p.info.id)) {
                sink.probe_state(&probe.info, ProbeState::Skipped);
            }
            sink.run_finished(&run);
        }

        info!(
            run_id = %run.run_id(),
            executed = run.executed_count(),
            skipped = run.skipped().len(),
            elapsed_ms = run.elapsed().as_millis() as u64,
            "probe run finished"
        );
        Ok(run)
    }

    fn sink(&self) -> Option<&dyn ProgressSink> {
        self.config.progress.then_some(self.progress.as_ref())
    }

    fn run_sequential(&self, selected: &[RegisteredProbe]) -> HashMap<String, Outcome> {
        let mut outcomes = HashMap::with_capacity(selected.len());

        for probe in selected {
            if self.cancel.is_cancelled() {
                info!("run cancelled; remaining probes are skipped");
                break;
            }

            let outcome = self.supervise(probe);
            let stop = self.config.fail_fast
                && outcome.status == Status::Critical
                && outcome.termination().is_synthesized();
            outcomes.insert(probe.info.id.clone(), outcome);

            if stop {
                warn!(probe = %probe.info.id, "fail-fast: stopping after probe error");
                break;
            }
        }

        outcomes
    }

    fn run_concurrent(&self, selected: &[RegisteredProbe]) -> HashMap<String, Outcome> {
        let collected = Mutex::new(HashMap::with_capacity(selected.len()));

        thread::scope(|scope| {
            for probe in selected {
                if self.cancel.is_cancelled() {
                    info!("run cancelled; remaining probes are skipped");
                    break;
                }

                let collected = &collected;
                let spawned = thread::Builder::new()
                    .name(format!("supervise-{}", probe.info.id))
                    .spawn_scoped(scope, move || {
                        let outcome = self.supervise(probe);
                        record(collected, &probe.info.id, outcome);
                    });

                if let Err(e) = spawned {
                    let mut outcome =
                        Outcome::errored(format!("Probe failed: could not start supervisor: {e}"));
                    outcome.stamp(&probe.info.id, Duration::ZERO);
                    record(collected, &probe.info.id, outcome);
                }
            }
        });

        collected
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Run one probe with progress notifications around it
    fn supervise(&self, probe: &RegisteredProbe) -> Outcome {
        if let Some(sink) = self.sink() {
            sink.probe_state(&probe.info, ProbeState::Running);
        }

        let outcome = self.execute_one(probe);

        if let Some(sink) = self.sink() {
            sink.probe_finished(&probe.info, &outcome);
        }
        outcome
    }

    /// Run one probe on its own worker thread, bounded by the timeout
    fn execute_one(&self, probe: &RegisteredProbe) -> Outcome {
        let id = probe.info.id.as_str();
        let limit = self.config.timeout();
        let token = CancellationToken::new();
        let ctx = ProbeContext::new(token.clone(), self.cancel.clone(), limit);
        let (tx, rx) = bounded::<WorkerResult>(1);
        let worker = Arc::clone(&probe.probe);

        debug!(probe = id, "dispatching probe");
        let dispatched = Instant::now();
        let spawned = thread::Builder::new()
            .name(format!("probe-{id}"))
            .spawn(move || {
                let result = panic::catch_unwind(AssertUnwindSafe(|| worker.execute(&ctx)));
                // The receiver is gone if the probe already timed out.
                let _ = tx.send(result);
            });

        let mut outcome = match spawned {
            Ok(_detached) => await_worker(id, &rx, limit, &token),
            Err(e) => Outcome::errored(format!("Probe failed: could not start worker: {e}")),
        };
        outcome.stamp(id, dispatched.elapsed());

        debug!(
            probe = id,
            status = outcome.status.key(),
            termination = ?outcome.termination(),
            duration_ms = outcome.duration().as_millis() as u64,
            "probe finished"
        );
        outcome
    }
}

fn await_worker(
    id: &str,
    rx: &Receiver<WorkerResult>,
    limit: Option<Duration>,
    token: &CancellationToken,
) -> Outcome {
    let deadline = limit.map_or_else(never, after);

    select! {
        recv(rx) -> msg => match msg {
            Ok(Ok(Ok(outcome))) => outcome.completed(),
            Ok(Ok(Err(failure))) => {
                debug!(probe = id, error = %failure, "probe returned an error");
                Outcome::errored(format!("Probe failed: {failure}"))
            }
            Ok(Err(payload)) => {
                let message = panic_message(payload.as_ref());
                warn!(probe = id, panic = %message, "probe panicked");
                Outcome::errored(format!("Probe panicked: {message}"))
            }
            Err(_) => Outcome::errored("Probe failed: worker exited without reporting"),
        },
        recv(deadline) -> _ => {
            token.cancel();
            let limit = limit.unwrap_or_default();
            warn!(probe = id, timeout_ms = limit.as_millis() as u64, "probe timed out; abandoning worker");
            Outcome::timed_out(limit)
        },
    }
}

fn record(collected: &Mutex<HashMap<String, Outcome>>, id: &str, outcome: Outcome) {
    collected
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(id.to_string(), outcome);
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
