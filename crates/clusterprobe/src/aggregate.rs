//! Derived, read-only views over a [`RunResult`].
//!
//! Nothing here holds state of its own: an [`Aggregate`] is rebuilt from the
//! run whenever it is needed, and ordering always comes from probe
//! registration, never from the order probes happened to finish in.

use crate::category::Category;
use crate::outcome::Outcome;
use crate::probe::ProbeInfo;
use crate::run::RunResult;
use crate::status::Status;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of outcomes per status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusCounts {
    /// Outcomes with [`Status::Ok`]
    pub ok: usize,
    /// Outcomes with [`Status::Info`]
    pub info: usize,
    /// Outcomes with [`Status::Warning`]
    pub warning: usize,
    /// Outcomes with [`Status::Critical`]
    pub critical: usize,
    /// Outcomes with [`Status::NotApplicable`]
    pub not_applicable: usize,
    /// Outcomes with [`Status::Unknown`]
    pub unknown: usize,
    /// Probes never dispatched
    pub skipped: usize,
}

impl StatusCounts {
    /// Count a set of outcomes
    #[must_use]
    pub fn tally<'a, I>(outcomes: I, skipped: usize) -> Self
    where
        I: IntoIterator<Item = &'a Outcome>,
    {
        let mut counts = Self {
            skipped,
            ..Self::default()
        };
        for outcome in outcomes {
            *counts.slot(outcome.status) += 1;
        }
        counts
    }

    fn slot(&mut self, status: Status) -> &mut usize {
        match status {
            Status::Ok => &mut self.ok,
            Status::Info => &mut self.info,
            Status::Warning => &mut self.warning,
            Status::Critical => &mut self.critical,
            Status::NotApplicable => &mut self.not_applicable,
            Status::Unknown => &mut self.unknown,
        }
    }

    /// Count for one status
    #[must_use]
    pub const fn get(&self, status: Status) -> usize {
        match status {
            Status::Ok => self.ok,
            Status::Info => self.info,
            Status::Warning => self.warning,
            Status::Critical => self.critical,
            Status::NotApplicable => self.not_applicable,
            Status::Unknown => self.unknown,
        }
    }

    /// Probes that produced an outcome
    #[must_use]
    pub const fn executed(&self) -> usize {
        self.ok + self.info + self.warning + self.critical + self.not_applicable + self.unknown
    }

    /// Eligible probes, executed or skipped
    #[must_use]
    pub const fn total(&self) -> usize {
        self.executed() + self.skipped
    }

    /// Warning plus Critical
    #[must_use]
    pub const fn problems(&self) -> usize {
        self.warning + self.critical
    }

    /// `(status, count)` pairs in summary order
    pub fn iter(&self) -> impl Iterator<Item = (Status, usize)> + '_ {
        Status::ALL.into_iter().map(|s| (s, self.get(s)))
    }
}

/// One probe row of a report: identity plus its outcome, if it ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry<'a> {
    /// Probe identity
    pub info: &'a ProbeInfo,
    /// `None` when the probe was skipped
    pub outcome: Option<&'a Outcome>,
}

impl<'a> Entry<'a> {
    /// Whether the probe never ran
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        self.outcome.is_none()
    }

    /// Status, `None` when skipped
    #[must_use]
    pub fn status(&self) -> Option<Status> {
        self.outcome.map(|o| o.status)
    }

    /// Whether this row is a Warning or Critical finding
    #[must_use]
    pub fn is_problem(&self) -> bool {
        self.status().is_some_and(Status::is_problem)
    }
}

/// Category- and status-indexed view over a run
#[derive(Debug, Clone)]
pub struct Aggregate<'a> {
    run: &'a RunResult,
    entries: Vec<Entry<'a>>,
    by_category: BTreeMap<Category, Vec<Entry<'a>>>,
    by_status: Vec<(Status, Vec<Entry<'a>>)>,
    counts: StatusCounts,
}

impl<'a> Aggregate<'a> {
    /// Build the view
    #[must_use]
    pub fn new(run: &'a RunResult) -> Self {
        let entries: Vec<Entry<'a>> = run
            .probes()
            .iter()
            .map(|info| Entry {
                info,
                outcome: run.outcome(&info.id),
            })
            .collect();

        let mut by_category: BTreeMap<Category, Vec<Entry<'a>>> = BTreeMap::new();
        for entry in &entries {
            by_category
                .entry(entry.info.category)
                .or_default()
                .push(*entry);
        }

        let by_status = Status::ALL
            .into_iter()
            .map(|status| {
                let matching = entries
                    .iter()
                    .filter(|e| e.status() == Some(status))
                    .copied()
                    .collect();
                (status, matching)
            })
            .collect();

        let counts = StatusCounts::tally(
            entries.iter().filter_map(|e| e.outcome),
            entries.iter().filter(|e| e.is_skipped()).count(),
        );

        Self {
            run,
            entries,
            by_category,
            by_status,
            counts,
        }
    }

    /// The underlying run, for metadata
    #[must_use]
    pub const fn run(&self) -> &'a RunResult {
        self.run
    }

    /// All rows in registration order
    #[must_use]
    pub fn entries(&self) -> &[Entry<'a>] {
        &self.entries
    }

    /// Rows grouped by category; only categories with probes are present
    #[must_use]
    pub const fn by_category(&self) -> &BTreeMap<Category, Vec<Entry<'a>>> {
        &self.by_category
    }

    /// Rows of one status, in registration order (skipped rows never appear)
    #[must_use]
    pub fn with_status(&self, status: Status) -> &[Entry<'a>] {
        self.by_status
            .iter()
            .find(|(s, _)| *s == status)
            .map_or(&[][..], |(_, entries)| entries.as_slice())
    }

    /// Rows whose probe was skipped
    pub fn skipped(&self) -> impl Iterator<Item = &Entry<'a>> {
        self.entries.iter().filter(|e| e.is_skipped())
    }

    /// Warning and Critical rows, in registration order
    pub fn problems(&self) -> impl Iterator<Item = &Entry<'a>> {
        self.entries.iter().filter(|e| e.is_problem())
    }

    /// Summary counts
    #[must_use]
    pub const fn counts(&self) -> StatusCounts {
        self.counts
    }

    /// No Warning, Critical or Unknown outcome
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.counts.problems() == 0 && self.counts.unknown == 0
    }
}

impl PartialEq for Aggregate<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
            && self.by_category == other.by_category
            && self.by_status == other.by_status
            && self.counts == other.counts
    }
}
