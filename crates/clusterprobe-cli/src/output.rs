//! Output formatting and progress reporting

use clusterprobe::render::style::status_style;
use clusterprobe::{ExecutionMode, Outcome, ProbeInfo, ProbeState, ProgressSink, RunResult};
use console::{style, Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Progress reporter for probe execution
///
/// Receives scheduler events from worker threads, so all state sits behind
/// `&self`.
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    progress_bar: Mutex<Option<ProgressBar>>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
    /// Print one line per finished probe
    pub verbose: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ProgressReporter {
    /// Create a new progress reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            progress_bar: Mutex::new(None),
            use_color,
            quiet,
            verbose: false,
        }
    }

    /// Enable per-probe lines
    #[must_use]
    pub const fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn bar(&self) -> MutexGuard<'_, Option<ProgressBar>> {
        self.progress_bar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a progress bar for `total` probes
    pub fn start_progress(&self, total: u64, message: &str) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb.set_message(message.to_string());
        *self.bar() = Some(pb);
    }

    /// Increment progress
    pub fn increment(&self, delta: u64) {
        if let Some(ref pb) = *self.bar() {
            pb.inc(delta);
        }
    }

    /// Update progress message
    pub fn set_message(&self, message: &str) {
        if let Some(ref pb) = *self.bar() {
            pb.set_message(message.to_string());
        }
    }

    /// Remove the progress bar
    pub fn finish(&self) {
        if let Some(pb) = self.bar().take() {
            pb.finish_and_clear();
        }
    }

    /// Position of the bar, if one is showing
    #[must_use]
    pub fn position(&self) -> Option<u64> {
        self.bar().as_ref().map(ProgressBar::position)
    }

    fn write_line(&self, line: &str) {
        let bar = self.bar();
        match bar.as_ref() {
            Some(pb) => pb.suspend(|| {
                let _ = self.term.write_line(line);
            }),
            None => {
                let _ = self.term.write_line(line);
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("✓").green().bold().to_string()
        } else {
            "OK".to_string()
        };

        self.write_line(&format!("{prefix} {message}"));
    }

    /// Print a failure message
    pub fn failure(&self, message: &str) {
        // Always print failures, even in quiet mode
        let prefix = if self.use_color {
            style("✗").red().bold().to_string()
        } else {
            "FAIL".to_string()
        };

        self.write_line(&format!("{prefix} {message}"));
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("⚠").yellow().bold().to_string()
        } else {
            "WARN".to_string()
        };

        self.write_line(&format!("{prefix} {message}"));
    }

    /// One-line rendering of a finished probe
    #[must_use]
    pub fn probe_line(&self, probe: &ProbeInfo, outcome: &Outcome) -> String {
        let look = status_style(outcome.status);
        let label = format!("{:<8}", look.label);
        let label = if self.use_color {
            Style::new()
                .fg(look.ansi)
                .bold()
                .force_styling(true)
                .apply_to(label)
                .to_string()
        } else {
            label
        };
        format!(
            "{label} {} ({}ms) {}",
            probe.id,
            outcome.duration().as_millis(),
            outcome.message
        )
    }
}

impl ProgressSink for ProgressReporter {
    fn run_started(&self, total: usize, mode: ExecutionMode) {
        self.start_progress(total as u64, mode.as_str());
    }

    fn probe_state(&self, probe: &ProbeInfo, state: ProbeState) {
        match state {
            ProbeState::Running => self.set_message(&probe.id),
            ProbeState::Skipped => {
                self.increment(1);
                if self.verbose {
                    self.warning(&format!("{} skipped", probe.id));
                }
            }
            _ => {}
        }
    }

    fn probe_finished(&self, probe: &ProbeInfo, outcome: &Outcome) {
        self.increment(1);
        if self.verbose && !self.quiet {
            self.write_line(&self.probe_line(probe, outcome));
        }
    }

    fn run_finished(&self, _run: &RunResult) {
        self.finish();
    }
}
