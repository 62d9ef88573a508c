//! Probes backed by an external command.
//!
//! The exit code picks a [`Verdict`](crate::manifest::Verdict); stdout (or
//! stderr when stdout is empty) becomes the outcome's opaque detail. The
//! child is polled so that a cancelled context kills it instead of leaving
//! it running after the scheduler has moved on.

use crate::manifest::Expectations;
use clusterprobe::{Outcome, Probe, ProbeContext, ProbeFailure, ProbeInfo};
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Runs a program and maps its exit code to an outcome
#[derive(Debug, Clone)]
pub struct CommandProbe {
    info: ProbeInfo,
    program: String,
    args: Vec<String>,
    expectations: Expectations,
}

impl CommandProbe {
    /// Create a command probe with default expectations
    #[must_use]
    pub fn new(info: ProbeInfo, program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            info,
            program: program.into(),
            args,
            expectations: Expectations::default(),
        }
    }

    /// Set the exit-code mapping
    #[must_use]
    pub fn with_expectations(mut self, expectations: Expectations) -> Self {
        self.expectations = expectations;
        self
    }

    /// Command line as typed
    #[must_use]
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn failure(&self, message: impl Into<String>) -> ProbeFailure {
        ProbeFailure::Command {
            command: self.command_line(),
            message: message.into(),
        }
    }

    fn spawn(&self) -> Result<Child, ProbeFailure> {
        Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.failure(format!("cannot start: {e}")))
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn collect(reader: JoinHandle<String>) -> String {
    reader.join().unwrap_or_default()
}

impl Probe for CommandProbe {
    fn info(&self) -> ProbeInfo {
        self.info.clone()
    }

    fn execute(&self, ctx: &ProbeContext) -> Result<Outcome, ProbeFailure> {
        let mut child = self.spawn()?;
        tracing::debug!(
            probe = %self.info.id,
            pid = child.id(),
            command = %self.command_line(),
            "command started"
        );

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = loop {
            if let Some(status) = child
                .try_wait()
                .map_err(|e| self.failure(format!("cannot wait: {e}")))?
            {
                break status;
            }
            if ctx.is_cancelled() {
                let _ = child.kill();
                let _ = child.wait();
                tracing::debug!(probe = %self.info.id, "command killed after cancellation");
                return Err(ProbeFailure::Cancelled);
            }
            thread::sleep(POLL_INTERVAL);
        };

        let stdout = collect(stdout);
        let stderr = collect(stderr);

        let Some(code) = status.code() else {
            return Err(self.failure(format!("terminated abnormally ({status})")));
        };

        let mut outcome = self.expectations.verdict_for(code).outcome(code);
        let detail = if stdout.trim().is_empty() {
            stderr.trim_end()
        } else {
            stdout.trim_end()
        };
        if !detail.is_empty() {
            outcome = outcome.with_detail(detail);
        }
        Ok(outcome)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::manifest::Verdict;
    use clusterprobe::{Category, Disposition, Status};

    fn info(id: &str) -> ProbeInfo {
        ProbeInfo::new(id, id, Category::Nodes)
    }

    #[cfg(unix)]
    fn shell(id: &str, script: &str) -> CommandProbe {
        CommandProbe::new(info(id), "sh", vec!["-c".to_string(), script.to_string()])
    }

    #[test]
    fn test_command_line() {
        let probe = CommandProbe::new(
            info("nodes"),
            "kubectl",
            vec!["get".to_string(), "nodes".to_string()],
        );
        assert_eq!(probe.command_line(), "kubectl get nodes");
    }

    #[test]
    fn test_missing_program_is_command_failure() {
        let probe = CommandProbe::new(info("ghost"), "clusterprobe-no-such-binary", Vec::new());
        let err = probe.execute(&ProbeContext::detached()).unwrap_err();
        match err {
            ProbeFailure::Command { command, message } => {
                assert_eq!(command, "clusterprobe-no-such-binary");
                assert!(message.starts_with("cannot start"));
            }
            other => panic!("unexpected failure {other:?}"),
        }
    }

    #[cfg(unix)]
    mod exit_code_tests {
        use super::*;

        #[test]
        fn test_success_keeps_stdout_as_detail() {
            let outcome = shell("ok", "echo all nodes ready")
                .execute(&ProbeContext::detached())
                .unwrap();
            assert_eq!(outcome.status, Status::Ok);
            assert_eq!(outcome.message, "Command succeeded");
            assert_eq!(outcome.detail.as_deref(), Some("all nodes ready"));
        }

        #[test]
        fn test_failure_falls_back_to_stderr() {
            let outcome = shell("fail", "echo boom >&2; exit 4")
                .execute(&ProbeContext::detached())
                .unwrap();
            assert_eq!(outcome.status, Status::Warning);
            assert_eq!(outcome.message, "Command exited with status 4");
            assert_eq!(outcome.detail.as_deref(), Some("boom"));
        }

        #[test]
        fn test_exit_code_override() {
            let mut expectations = Expectations::default();
            let mut verdict = Verdict::new(Status::Critical, "quota exceeded ({code})");
            verdict.disposition = Some(Disposition::ChangeRequired);
            expectations.exit_codes.insert(3, verdict);

            let outcome = shell("quota", "exit 3")
                .with_expectations(expectations)
                .execute(&ProbeContext::detached())
                .unwrap();
            assert_eq!(outcome.status, Status::Critical);
            assert_eq!(outcome.disposition, Disposition::ChangeRequired);
            assert_eq!(outcome.message, "quota exceeded (3)");
            assert_eq!(outcome.detail, None);
        }

        #[test]
        fn test_signal_is_command_failure() {
            let err = shell("killed", "kill -9 $$")
                .execute(&ProbeContext::detached())
                .unwrap_err();
            assert!(matches!(err, ProbeFailure::Command { .. }));
        }
    }

    #[cfg(unix)]
    mod scheduler_tests {
        use super::*;
        use clusterprobe::{ProbeRegistry, RunConfig, Scheduler, Termination};
        use std::time::{Duration, Instant};

        #[test]
        fn test_timeout_abandons_slow_command() {
            let registry = ProbeRegistry::new().with(shell("slow", "sleep 5")).unwrap();
            let config = RunConfig::builder()
                .sequential()
                .timeout(Duration::from_millis(200))
                .progress(false)
                .build();

            let started = Instant::now();
            let run = Scheduler::new(config).run(&registry).unwrap();
            assert!(started.elapsed() < Duration::from_secs(3));

            let outcome = run.outcome("slow").unwrap();
            assert_eq!(outcome.termination(), Termination::TimedOut);
            assert_eq!(outcome.status, Status::Critical);
        }
    }
}
