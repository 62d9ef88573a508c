//! The result of one scheduler run.

use crate::aggregate::StatusCounts;
use crate::config::ExecutionMode;
use crate::outcome::Outcome;
use crate::probe::ProbeInfo;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::Duration;
use uuid::Uuid;

/// Every outcome of a run, keyed by probe id.
///
/// Owned by the caller once [`Scheduler::run`](crate::Scheduler::run)
/// returns and only ever lent out by shared reference, so renderers cannot
/// modify it. Each eligible probe has exactly one of: an outcome, or an
/// entry in [`RunResult::skipped`].
#[derive(Debug, Clone)]
pub struct RunResult {
    run_id: Uuid,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    elapsed: Duration,
    mode: ExecutionMode,
    probes: Vec<ProbeInfo>,
    outcomes: HashMap<String, Outcome>,
    skipped: Vec<String>,
}

impl RunResult {
    pub(crate) fn new(
        mode: ExecutionMode,
        probes: Vec<ProbeInfo>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at,
            finished_at: started_at,
            elapsed: Duration::ZERO,
            mode,
            probes,
            outcomes: HashMap::new(),
            skipped: Vec::new(),
        }
    }

    pub(crate) fn finish(
        &mut self,
        mut outcomes: HashMap<String, Outcome>,
        elapsed: Duration,
    ) {
        // Anything eligible without an outcome was never dispatched.
        self.skipped = self
            .probes
            .iter()
            .filter(|p| !outcomes.contains_key(&p.id))
            .map(|p| p.id.clone())
            .collect();
        outcomes.retain(|id, _| self.probes.iter().any(|p| &p.id == id));
        self.outcomes = outcomes;
        self.elapsed = elapsed;
        self.finished_at = Utc::now();
    }

    /// Unique id of this run
    #[must_use]
    pub const fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// When the first probe was dispatched
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// When the last outcome was recorded
    #[must_use]
    pub const fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }

    /// Total wall-clock time of the run
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Mode the run executed in
    #[must_use]
    pub const fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Probes that passed the category filter, in registration order
    #[must_use]
    pub fn probes(&self) -> &[ProbeInfo] {
        &self.probes
    }

    /// Outcome of one probe
    #[must_use]
    pub fn outcome(&self, probe_id: &str) -> Option<&Outcome> {
        self.outcomes.get(probe_id)
    }

    /// Outcomes in registration order (skipped probes omitted)
    pub fn outcomes(&self) -> impl Iterator<Item = &Outcome> {
        self.probes
            .iter()
            .filter_map(|p| self.outcomes.get(&p.id))
    }

    /// Ids of probes never dispatched, in registration order
    #[must_use]
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    /// Whether a probe was skipped
    #[must_use]
    pub fn is_skipped(&self, probe_id: &str) -> bool {
        self.skipped.iter().any(|id| id == probe_id)
    }

    /// Number of probes that produced an outcome
    #[must_use]
    pub fn executed_count(&self) -> usize {
        self.outcomes.len()
    }

    /// Counts by status, recomputed from the outcomes on every call
    #[must_use]
    pub fn counts_by_status(&self) -> StatusCounts {
        StatusCounts::tally(self.outcomes(), self.skipped.len())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::status::Status;

    fn info(id: &str) -> ProbeInfo {
        ProbeInfo::new(id, id, Category::Nodes)
    }

    fn stamped(id: &str, outcome: Outcome) -> (String, Outcome) {
        let mut outcome = outcome;
        outcome.stamp(id, Duration::from_millis(1));
        (id.to_string(), outcome)
    }

    #[test]
    fn test_finish_derives_skipped() {
        let mut run = RunResult::new(
            ExecutionMode::Sequential,
            vec![info("p1"), info("p2"), info("p3")],
            Utc::now(),
        );
        let outcomes: HashMap<_, _> = [
            stamped("p1", Outcome::ok("fine")),
            stamped("p2", Outcome::critical("down")),
        ]
        .into_iter()
        .collect();
        run.finish(outcomes, Duration::from_millis(5));

        assert_eq!(run.skipped(), ["p3".to_string()]);
        assert!(run.is_skipped("p3"));
        assert_eq!(run.executed_count(), 2);
        assert!(run.finished_at() >= run.started_at());
    }

    #[test]
    fn test_outcomes_follow_registration_order() {
        let mut run = RunResult::new(
            ExecutionMode::Concurrent,
            vec![info("z"), info("a"), info("m")],
            Utc::now(),
        );
        let outcomes: HashMap<_, _> = [
            stamped("m", Outcome::ok("m")),
            stamped("a", Outcome::ok("a")),
            stamped("z", Outcome::ok("z")),
        ]
        .into_iter()
        .collect();
        run.finish(outcomes, Duration::ZERO);

        let ids: Vec<_> = run.outcomes().map(Outcome::probe_id).collect();
        assert_eq!(ids, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_counts_are_recomputed() {
        let mut run = RunResult::new(ExecutionMode::Concurrent, vec![info("a")], Utc::now());
        run.finish(
            [stamped("a", Outcome::warning("w"))].into_iter().collect(),
            Duration::ZERO,
        );
        assert_eq!(run.counts_by_status().get(Status::Warning), 1);
        assert_eq!(run.counts_by_status(), run.counts_by_status());
    }

    #[test]
    fn test_outcomes_for_unknown_probes_are_dropped() {
        let mut run = RunResult::new(ExecutionMode::Concurrent, vec![info("a")], Utc::now());
        run.finish(
            [stamped("a", Outcome::ok("a")), stamped("ghost", Outcome::ok("g"))]
                .into_iter()
                .collect(),
            Duration::ZERO,
        );
        assert!(run.outcome("ghost").is_none());
        assert_eq!(run.executed_count(), 1);
    }
}
