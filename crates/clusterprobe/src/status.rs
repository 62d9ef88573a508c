//! The two independent classification axes of an outcome.
//!
//! [`Status`] says how bad the finding is; [`Disposition`] says what the
//! operator should do about it. A Warning can be purely advisory or can
//! require a change, so neither axis is ever derived from the other.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a finding.
///
/// `Ok < Info < Warning < Critical` form the severity scale;
/// `NotApplicable` and `Unknown` sit outside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    /// Target is healthy
    Ok,
    /// Informational finding
    Info,
    /// Degraded or risky configuration
    Warning,
    /// Target is unhealthy, or the probe itself broke
    Critical,
    /// Check does not apply to this cluster
    NotApplicable,
    /// Result could not be determined
    Unknown,
}

impl Status {
    /// Every status, in summary order
    pub const ALL: [Self; 6] = [
        Self::Ok,
        Self::Info,
        Self::Warning,
        Self::Critical,
        Self::NotApplicable,
        Self::Unknown,
    ];

    /// Position on the severity scale, `None` for non-severity values
    #[must_use]
    pub const fn severity(self) -> Option<u8> {
        match self {
            Self::Ok => Some(0),
            Self::Info => Some(1),
            Self::Warning => Some(2),
            Self::Critical => Some(3),
            Self::NotApplicable | Self::Unknown => None,
        }
    }

    /// Warning or Critical: shown in the text summary and marks a run unclean
    #[must_use]
    pub const fn is_problem(self) -> bool {
        matches!(self, Self::Warning | Self::Critical)
    }

    /// Machine key (matches the serde representation)
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Critical => "critical",
            Self::NotApplicable => "not-applicable",
            Self::Unknown => "unknown",
        }
    }

    /// Display label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Info => "Info",
            Self::Warning => "Warning",
            Self::Critical => "Critical",
            Self::NotApplicable => "N/A",
            Self::Unknown => "Unknown",
        }
    }

    /// Compare two statuses on the severity scale only
    #[must_use]
    pub fn is_more_severe_than(self, other: Self) -> bool {
        match (self.severity(), other.severity()) {
            (Some(a), Some(b)) => a > b,
            (Some(_), None) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Remediation intent of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Disposition {
    /// Nothing to do
    NoChangeNeeded,
    /// A change would improve the cluster
    ChangeRecommended,
    /// A change must be made
    ChangeRequired,
    /// Informational only
    Advisory,
    /// Check does not apply
    NotApplicable,
    /// Needs a human to evaluate
    #[default]
    PendingEvaluation,
}

impl Disposition {
    /// Every disposition, in legend order
    pub const ALL: [Self; 6] = [
        Self::NoChangeNeeded,
        Self::ChangeRecommended,
        Self::ChangeRequired,
        Self::Advisory,
        Self::NotApplicable,
        Self::PendingEvaluation,
    ];

    /// Machine key (matches the serde representation)
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::NoChangeNeeded => "no-change-needed",
            Self::ChangeRecommended => "change-recommended",
            Self::ChangeRequired => "change-required",
            Self::Advisory => "advisory",
            Self::NotApplicable => "not-applicable",
            Self::PendingEvaluation => "pending-evaluation",
        }
    }

    /// Display label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NoChangeNeeded => "No change needed",
            Self::ChangeRecommended => "Change recommended",
            Self::ChangeRequired => "Change required",
            Self::Advisory => "Advisory",
            Self::NotApplicable => "Not applicable",
            Self::PendingEvaluation => "Pending evaluation",
        }
    }

    /// Whether an operator has to act
    #[must_use]
    pub const fn is_actionable(self) -> bool {
        matches!(self, Self::ChangeRecommended | Self::ChangeRequired)
    }
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
