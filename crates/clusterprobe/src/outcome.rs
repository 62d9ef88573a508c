//! Outcome of a single probe execution.

use crate::status::{Disposition, Status};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Terminal state that produced an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Termination {
    /// The probe returned its own verdict
    #[default]
    Completed,
    /// The probe returned an error or panicked; the verdict was synthesized
    Errored,
    /// The probe did not answer in time; the verdict was synthesized
    TimedOut,
}

impl Termination {
    /// Whether the scheduler, not the probe, wrote the verdict
    #[must_use]
    pub const fn is_synthesized(self) -> bool {
        !matches!(self, Self::Completed)
    }
}

/// Result of running one probe.
///
/// Probes fill in status, message, disposition, detail and recommendations.
/// The scheduler stamps the probe id, duration and termination when it
/// records the outcome, overwriting anything the probe put there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    probe_id: String,
    /// Severity of the finding
    pub status: Status,
    /// Short human-readable observation
    pub message: String,
    /// What to do about the finding
    pub disposition: Disposition,
    /// Long-form detail: raw command output or ready-made markup
    pub detail: Option<String>,
    /// Remediation suggestions
    pub recommendations: Vec<String>,
    duration: Duration,
    termination: Termination,
}

impl Outcome {
    /// Create an outcome with the given status and message
    ///
    /// The disposition starts as [`Disposition::PendingEvaluation`] whatever
    /// the status; probes set it with [`Outcome::with_disposition`].
    #[must_use]
    pub fn new(status: Status, message: impl Into<String>) -> Self {
        Self {
            probe_id: String::new(),
            status,
            message: message.into(),
            disposition: Disposition::default(),
            detail: None,
            recommendations: Vec::new(),
            duration: Duration::ZERO,
            termination: Termination::Completed,
        }
    }

    /// Healthy result
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self::new(Status::Ok, message)
    }

    /// Informational result
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Status::Info, message)
    }

    /// Warning result
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Status::Warning, message)
    }

    /// Critical result: the probe determined the target is unhealthy
    #[must_use]
    pub fn critical(message: impl Into<String>) -> Self {
        Self::new(Status::Critical, message)
    }

    /// Check does not apply
    #[must_use]
    pub fn not_applicable(message: impl Into<String>) -> Self {
        Self::new(Status::NotApplicable, message)
    }

    /// Result could not be determined
    #[must_use]
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(Status::Unknown, message)
    }

    /// Set the disposition
    #[must_use]
    pub const fn with_disposition(mut self, disposition: Disposition) -> Self {
        self.disposition = disposition;
        self
    }

    /// Attach a detail blob
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Append a recommendation
    #[must_use]
    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendations.push(recommendation.into());
        self
    }

    /// Append several recommendations
    #[must_use]
    pub fn with_recommendations<I, S>(mut self, recommendations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recommendations
            .extend(recommendations.into_iter().map(Into::into));
        self
    }

    /// Id of the probe that produced this outcome
    #[must_use]
    pub fn probe_id(&self) -> &str {
        &self.probe_id
    }

    /// Wall-clock time from dispatch to receipt
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Terminal state that produced this outcome
    #[must_use]
    pub const fn termination(&self) -> Termination {
        self.termination
    }

    /// Outcome for a probe whose `execute` returned an error or panicked
    #[must_use]
    pub(crate) fn errored(message: impl Into<String>) -> Self {
        let mut outcome = Self::critical(message)
            .with_recommendation("Re-run the probe with verbose logging to inspect the failure");
        outcome.termination = Termination::Errored;
        outcome
    }

    /// Outcome for a probe that did not answer before its deadline
    #[must_use]
    pub(crate) fn timed_out(limit: Duration) -> Self {
        let mut outcome = Self::critical(format!(
            "Probe timed out after {}ms",
            limit.as_millis()
        ))
        .with_recommendation("Check API server responsiveness or raise the probe timeout");
        outcome.termination = Termination::TimedOut;
        outcome
    }

    /// A verdict the probe returned itself
    #[must_use]
    pub(crate) fn completed(mut self) -> Self {
        self.termination = Termination::Completed;
        self
    }

    /// Record ownership and timing; called once by the scheduler
    pub(crate) fn stamp(&mut self, probe_id: &str, duration: Duration) {
        self.probe_id = probe_id.to_string();
        self.duration = duration;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_disposition_default_ignores_status() {
        for status in Status::ALL {
            assert_eq!(
                Outcome::new(status, "x").disposition,
                Disposition::PendingEvaluation,
                "{status:?}"
            );
        }
        assert_eq!(Outcome::ok("fine").disposition, Disposition::PendingEvaluation);
        assert_eq!(
            Outcome::not_applicable("n/a").disposition,
            Disposition::PendingEvaluation
        );
    }

    #[test]
    fn test_builder_keeps_both_axes() {
        let advisory = Outcome::warning("old kernel").with_disposition(Disposition::Advisory);
        let required =
            Outcome::warning("old kernel").with_disposition(Disposition::ChangeRequired);
        assert_eq!(advisory.status, required.status);
        assert_ne!(advisory.disposition, required.disposition);
    }

    #[test]
    fn test_recommendations_accumulate() {
        let outcome = Outcome::critical("etcd down")
            .with_recommendation("restart etcd")
            .with_recommendations(["check disk", "check quorum"]);
        assert_eq!(outcome.recommendations.len(), 3);
        assert_eq!(outcome.recommendations[2], "check quorum");
    }

    #[test]
    fn test_synthesized_outcomes() {
        let errored = Outcome::errored("Probe failed: kubectl not found");
        assert_eq!(errored.status, Status::Critical);
        assert_eq!(errored.termination(), Termination::Errored);
        assert!(errored.message.contains("kubectl not found"));

        let timed_out = Outcome::timed_out(Duration::from_millis(250));
        assert_eq!(timed_out.termination(), Termination::TimedOut);
        assert!(timed_out.message.contains("timed out after 250ms"));
        assert!(timed_out.termination().is_synthesized());
    }

    #[test]
    fn test_deliberate_critical_is_completed() {
        let outcome = Outcome::critical("3 nodes NotReady");
        assert_eq!(outcome.termination(), Termination::Completed);
        assert!(!outcome.termination().is_synthesized());
    }

    #[test]
    fn test_stamp() {
        let mut outcome = Outcome::ok("fine");
        outcome.stamp("nodes-ready", Duration::from_millis(42));
        assert_eq!(outcome.probe_id(), "nodes-ready");
        assert_eq!(outcome.duration(), Duration::from_millis(42));
    }
}
