//! Report renderers.
//!
//! Each renderer turns an [`Aggregate`] into a document. Renderers read the
//! run; they never change status or disposition, so every format shows the
//! same Warning/Critical set.

mod asciidoc;
mod html;
mod json;
pub mod style;
mod text;

pub use asciidoc::AsciidocRenderer;
pub use html::HtmlRenderer;
pub use json::{JsonProbeRecord, JsonRenderer, JsonReport, JsonRunInfo, JsonSummary, SCHEMA_VERSION};
pub use text::TextRenderer;

use crate::aggregate::Aggregate;
use crate::result::{ClusterProbeError, ClusterProbeResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output format of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// AsciiDoc document (structured markup)
    #[default]
    Asciidoc,
    /// Standalone HTML page
    Html,
    /// Machine-readable JSON
    Json,
    /// Terminal summary
    Text,
}

impl ReportFormat {
    /// Every format
    pub const ALL: [Self; 4] = [Self::Asciidoc, Self::Html, Self::Json, Self::Text];

    /// File extension, without the dot
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Asciidoc => "adoc",
            Self::Html => "html",
            Self::Json => "json",
            Self::Text => "txt",
        }
    }

    /// Lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asciidoc => "asciidoc",
            Self::Html => "html",
            Self::Json => "json",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportFormat {
    type Err = ClusterProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asciidoc" | "adoc" => Ok(Self::Asciidoc),
            "html" | "htm" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            "text" | "txt" | "console" => Ok(Self::Text),
            other => Err(ClusterProbeError::config(format!(
                "unknown report format '{other}' (expected asciidoc, html, json or text)"
            ))),
        }
    }
}

/// Options shared by all renderers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Document title
    pub title: String,
    /// Name of the cluster under test, shown in run metadata
    pub cluster: Option<String>,
    /// ANSI colors in the text renderer
    pub use_color: bool,
    /// Per-probe detailed sections in AsciiDoc and HTML
    pub include_details: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: "Cluster Health Report".to_string(),
            cluster: None,
            use_color: false,
            include_details: true,
        }
    }
}

impl RenderOptions {
    /// Set the title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the cluster name
    #[must_use]
    pub fn with_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.cluster = Some(cluster.into());
        self
    }

    /// Enable/disable ANSI colors
    #[must_use]
    pub const fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    /// Enable/disable per-probe sections
    #[must_use]
    pub const fn with_details(mut self, include: bool) -> Self {
        self.include_details = include;
        self
    }
}

/// Produces one report document from an aggregate
pub trait Renderer: Send + Sync {
    /// Format this renderer produces
    fn format(&self) -> ReportFormat;

    /// Render the document
    ///
    /// # Errors
    ///
    /// Returns [`ClusterProbeError::Render`] or a serialization error.
    fn render(&self, aggregate: &Aggregate<'_>) -> ClusterProbeResult<String>;
}

/// Create a renderer for a format
#[must_use]
pub fn create_renderer(format: ReportFormat, options: RenderOptions) -> Box<dyn Renderer> {
    match format {
        ReportFormat::Asciidoc => Box::new(AsciidocRenderer::new(options)),
        ReportFormat::Html => Box::new(HtmlRenderer::new(options)),
        ReportFormat::Json => Box::new(JsonRenderer::new(options)),
        ReportFormat::Text => Box::new(TextRenderer::new(options)),
    }
}

/// Human-readable duration, e.g. `850ms` or `12.40s`
pub(crate) fn format_duration(d: std::time::Duration) -> String {
    if d.as_millis() < 1000 {
        format!("{}ms", d.as_millis())
    } else {
        format!("{:.2}s", d.as_secs_f64())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
pub(crate) mod tests {
    use super::*;
    use crate::category::Category;
    use crate::config::ExecutionMode;
    use crate::outcome::Outcome;
    use crate::probe::ProbeInfo;
    use crate::run::RunResult;
    use crate::status::{Disposition, Status};
    use chrono::Utc;
    use std::collections::{BTreeSet, HashMap};
    use std::time::Duration;

    /// A run with one probe of every interesting shape
    pub(crate) fn sample_run() -> RunResult {
        let probes = vec![
            ProbeInfo::new("api-version", "API server version", Category::ClusterConfig)
                .with_description("Reports the control plane version")
                .with_reference("https://kubernetes.io/releases/"),
            ProbeInfo::new("nodes-ready", "Nodes ready", Category::Nodes),
            ProbeInfo::new("dns-resolve", "Cluster DNS", Category::Networking),
            ProbeInfo::new("pv-bound", "Persistent volumes bound", Category::Storage),
            ProbeInfo::new("rbac-wildcards", "RBAC wildcard rules", Category::Security),
            ProbeInfo::new("metrics-server", "Metrics server", Category::Observability),
        ];
        let outcomes = [
            (
                "api-version",
                Outcome::info("v1.29.3").with_detail("Server Version: v1.29.3\n"),
            ),
            (
                "nodes-ready",
                Outcome::critical("1 of 3 nodes NotReady")
                    .with_disposition(Disposition::ChangeRequired)
                    .with_detail("[cols=\"1,1\"]\n|===\n|Node |Ready\n|n3 |False\n|===\n")
                    .with_recommendation("Inspect kubelet logs on n3"),
            ),
            (
                "dns-resolve",
                Outcome::warning("CoreDNS has a single replica <1/2>")
                    .with_disposition(Disposition::ChangeRecommended)
                    .with_detail("<table><tr><td>coredns</td><td>1</td></tr></table>"),
            ),
            ("pv-bound", Outcome::ok("All volumes bound")),
            (
                "rbac-wildcards",
                Outcome::warning("2 roles grant '*' | verbs").with_disposition(Disposition::Advisory),
            ),
        ];

        let mut run = RunResult::new(ExecutionMode::Concurrent, probes, Utc::now());
        let map: HashMap<String, Outcome> = outcomes
            .into_iter()
            .map(|(id, mut outcome)| {
                outcome.stamp(id, Duration::from_millis(120));
                (id.to_string(), outcome)
            })
            .collect();
        run.finish(map, Duration::from_millis(900));
        run
    }

    #[test]
    fn test_format_extensions() {
        let extensions: Vec<_> = ReportFormat::ALL.iter().map(|f| f.extension()).collect();
        assert_eq!(extensions, vec!["adoc", "html", "json", "txt"]);
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("ADOC".parse::<ReportFormat>().unwrap(), ReportFormat::Asciidoc);
        assert_eq!("console".parse::<ReportFormat>().unwrap(), ReportFormat::Text);
        assert!("pdf".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_factory_matches_format() {
        for format in ReportFormat::ALL {
            assert_eq!(create_renderer(format, RenderOptions::default()).format(), format);
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(850)), "850ms");
        assert_eq!(format_duration(Duration::from_millis(12_400)), "12.40s");
    }

    fn shows_problem_row(doc: &str, format: ReportFormat, id: &str) -> bool {
        [Status::Warning, Status::Critical].into_iter().any(|status| {
            let st = style::status_style(status);
            match format {
                ReportFormat::Asciidoc => {
                    let link = format!("<<{},", style::anchor(id));
                    let cell = format!("[{}]#{}#", st.role, st.label);
                    doc.lines().any(|l| l.contains(&link) && l.contains(&cell))
                }
                _ => doc.contains(&format!(
                    r#"<tr class="status-{}" data-probe="{id}">"#,
                    status.key()
                )),
            }
        })
    }

    /// Every renderer reports the same Warning/Critical probes
    #[test]
    fn test_renderers_agree_on_problem_set() {
        let run = sample_run();
        let aggregate = Aggregate::new(&run);
        let expected: BTreeSet<String> = aggregate
            .problems()
            .map(|e| e.info.id.clone())
            .collect();
        assert_eq!(
            expected,
            ["dns-resolve", "nodes-ready", "rbac-wildcards"]
                .into_iter()
                .map(String::from)
                .collect()
        );

        let json = JsonRenderer::new(RenderOptions::default())
            .render(&aggregate)
            .unwrap();
        let report: JsonReport = serde_json::from_str(&json).unwrap();
        let from_json: BTreeSet<String> = report
            .probes
            .iter()
            .filter(|p| p.status.is_some_and(Status::is_problem))
            .map(|p| p.id.clone())
            .collect();
        assert_eq!(from_json, expected);

        let text = TextRenderer::new(RenderOptions::default())
            .render(&aggregate)
            .unwrap();
        let from_text: BTreeSet<String> = run
            .probes()
            .iter()
            .filter(|p| text.contains(&format!("[{}]", p.id)))
            .map(|p| p.id.clone())
            .collect();
        assert_eq!(from_text, expected);

        for format in [ReportFormat::Asciidoc, ReportFormat::Html] {
            let doc = create_renderer(format, RenderOptions::default())
                .render(&aggregate)
                .unwrap();
            let shown: BTreeSet<String> = run
                .probes()
                .iter()
                .filter(|p| shows_problem_row(&doc, format, &p.id))
                .map(|p| p.id.clone())
                .collect();
            assert_eq!(shown, expected, "{format} disagrees");
        }
    }
}
