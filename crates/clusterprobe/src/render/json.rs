//! JSON report: one document per run with a versioned schema.

use super::{RenderOptions, ReportFormat, Renderer};
use crate::aggregate::{Aggregate, Entry, StatusCounts};
use crate::category::Category;
use crate::config::ExecutionMode;
use crate::outcome::{Outcome, Termination};
use crate::result::{ClusterProbeError, ClusterProbeResult};
use crate::status::{Disposition, Status};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Schema version written into every report
pub const SCHEMA_VERSION: u32 = 1;

/// Top-level JSON document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonReport {
    /// Schema version, see [`SCHEMA_VERSION`]
    pub schema_version: u32,
    /// When the document was rendered
    pub generated_at: DateTime<Utc>,
    /// Report title
    pub title: String,
    /// Run metadata
    pub run: JsonRunInfo,
    /// Totals
    pub summary: JsonSummary,
    /// One record per eligible probe, in registration order
    pub probes: Vec<JsonProbeRecord>,
}

/// Run metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonRunInfo {
    /// Run id
    pub run_id: Uuid,
    /// Cluster name, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    /// Execution mode
    pub mode: ExecutionMode,
    /// Run start
    pub started_at: DateTime<Utc>,
    /// Run end
    pub finished_at: DateTime<Utc>,
    /// Wall-clock duration
    pub elapsed_ms: u64,
}

/// Totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonSummary {
    /// Eligible probes
    pub total: usize,
    /// Probes never dispatched
    pub skipped: usize,
    /// No Warning, Critical or Unknown outcome
    pub clean: bool,
    /// Count per status
    pub counts: StatusCounts,
}

/// One probe row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonProbeRecord {
    /// Probe id
    pub id: String,
    /// Display name
    pub name: String,
    /// What the probe checks
    #[serde(default)]
    pub description: String,
    /// Category
    pub category: Category,
    /// Status; absent when skipped
    pub status: Option<Status>,
    /// Disposition; absent when skipped
    pub disposition: Option<Disposition>,
    /// How the outcome was produced; absent when skipped
    pub termination: Option<Termination>,
    /// Observation
    pub message: Option<String>,
    /// Raw detail blob
    pub detail: Option<String>,
    /// Remediation suggestions
    #[serde(default)]
    pub recommendations: Vec<String>,
    /// Documentation links
    #[serde(default)]
    pub references: Vec<String>,
    /// Probe duration
    pub duration_ms: Option<u64>,
    /// Whether the probe never ran
    pub skipped: bool,
}

impl JsonProbeRecord {
    fn from_entry(entry: &Entry<'_>) -> Self {
        let outcome = entry.outcome;
        Self {
            id: entry.info.id.clone(),
            name: entry.info.name.clone(),
            description: entry.info.description.clone(),
            category: entry.info.category,
            status: outcome.map(|o| o.status),
            disposition: outcome.map(|o| o.disposition),
            termination: outcome.map(Outcome::termination),
            message: outcome.map(|o| o.message.clone()),
            detail: outcome.and_then(|o| o.detail.clone()),
            recommendations: outcome.map(|o| o.recommendations.clone()).unwrap_or_default(),
            references: entry.info.references.clone(),
            duration_ms: outcome.map(|o| o.duration().as_millis() as u64),
            skipped: entry.is_skipped(),
        }
    }
}

impl JsonReport {
    /// Build the document from an aggregate
    #[must_use]
    pub fn from_aggregate(aggregate: &Aggregate<'_>, options: &RenderOptions) -> Self {
        let run = aggregate.run();
        let counts = aggregate.counts();
        Self {
            schema_version: SCHEMA_VERSION,
            generated_at: Utc::now(),
            title: options.title.clone(),
            run: JsonRunInfo {
                run_id: run.run_id(),
                cluster: options.cluster.clone(),
                mode: run.mode(),
                started_at: run.started_at(),
                finished_at: run.finished_at(),
                elapsed_ms: run.elapsed().as_millis() as u64,
            },
            summary: JsonSummary {
                total: counts.total(),
                skipped: counts.skipped,
                clean: aggregate.is_clean(),
                counts,
            },
            probes: aggregate
                .entries()
                .iter()
                .map(JsonProbeRecord::from_entry)
                .collect(),
        }
    }

    /// Parse a rendered report
    ///
    /// # Errors
    ///
    /// Returns [`ClusterProbeError::Json`] on malformed input.
    pub fn parse(json: &str) -> ClusterProbeResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Renders [`JsonReport`] documents
#[derive(Debug, Clone, Default)]
pub struct JsonRenderer {
    options: RenderOptions,
}

impl JsonRenderer {
    /// Create a JSON renderer
    #[must_use]
    pub const fn new(options: RenderOptions) -> Self {
        Self { options }
    }
}

impl Renderer for JsonRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }

    fn render(&self, aggregate: &Aggregate<'_>) -> ClusterProbeResult<String> {
        let report = JsonReport::from_aggregate(aggregate, &self.options);
        serde_json::to_string_pretty(&report)
            .map_err(|e| ClusterProbeError::render(format!("JSON serialization: {e}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::render::tests::sample_run;

    #[test]
    fn test_round_trip_preserves_verdicts() {
        let run = sample_run();
        let aggregate = Aggregate::new(&run);
        let json = JsonRenderer::default().render(&aggregate).unwrap();
        let report = JsonReport::parse(&json).unwrap();

        assert_eq!(report.schema_version, SCHEMA_VERSION);
        assert_eq!(report.summary.counts, run.counts_by_status());
        assert_eq!(report.run.run_id, run.run_id());

        let parsed: Vec<_> = report
            .probes
            .iter()
            .map(|p| (p.id.as_str(), p.status, p.disposition))
            .collect();
        let original: Vec<_> = aggregate
            .entries()
            .iter()
            .map(|e| {
                (
                    e.info.id.as_str(),
                    e.status(),
                    e.outcome.map(|o| o.disposition),
                )
            })
            .collect();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_skipped_probe_record() {
        let run = sample_run();
        let aggregate = Aggregate::new(&run);
        let report = JsonReport::from_aggregate(&aggregate, &RenderOptions::default());
        let skipped = report
            .probes
            .iter()
            .find(|p| p.id == "metrics-server")
            .unwrap();
        assert!(skipped.skipped);
        assert_eq!(skipped.status, None);
        assert_eq!(skipped.duration_ms, None);
        assert_eq!(report.summary.skipped, 1);
        assert_eq!(report.summary.total, 6);
        assert!(!report.summary.clean);
    }

    #[test]
    fn test_wire_names() {
        let run = sample_run();
        let aggregate = Aggregate::new(&run);
        let json = JsonRenderer::new(RenderOptions::default().with_cluster("prod-eu"))
            .render(&aggregate)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["schema_version"], 1);
        assert_eq!(value["run"]["cluster"], "prod-eu");
        assert_eq!(value["run"]["mode"], "concurrent");
        assert_eq!(value["probes"][1]["status"], "critical");
        assert_eq!(value["probes"][1]["disposition"], "change-required");
        assert_eq!(value["probes"][1]["category"], "nodes");
        assert_eq!(value["probes"][1]["termination"], "completed");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(JsonReport::parse("{\"schema_version\": 1}").is_err());
    }
}
