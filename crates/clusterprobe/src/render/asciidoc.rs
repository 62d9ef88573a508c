//! AsciiDoc report.
//!
//! Layout: title and run metadata, disposition legend, summary table, then
//! one section per category with its own table and a subsection per probe.
//! Disposition cells are colored with the `cellbgcolor` attribute, which
//! persists across cells, so every row resets it in its first cell.

use super::style::{
    anchor, disposition_style, escape_asciidoc_cell, escape_asciidoc_line,
    escape_asciidoc_paragraph, status_style, DetailBlock,
};
use super::{format_duration, RenderOptions, ReportFormat, Renderer};
use crate::aggregate::{Aggregate, Entry};
use crate::result::ClusterProbeResult;
use crate::status::Disposition;

const RESET: &str = "{set:cellbgcolor!}";

/// Renders AsciiDoc documents
#[derive(Debug, Clone, Default)]
pub struct AsciidocRenderer {
    options: RenderOptions,
}

impl AsciidocRenderer {
    /// Create an AsciiDoc renderer
    #[must_use]
    pub const fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    fn header(&self, doc: &mut String, aggregate: &Aggregate<'_>) {
        let run = aggregate.run();
        let counts = aggregate.counts();

        doc.push_str(&format!("= {}\n", self.options.title));
        doc.push_str(":toc: left\n:toclevels: 2\n:sectanchors:\n:icons: font\n\n");

        doc.push_str("[horizontal]\n");
        if let Some(cluster) = &self.options.cluster {
            doc.push_str(&format!("Cluster:: {cluster}\n"));
        }
        doc.push_str(&format!("Run ID:: `{}`\n", run.run_id()));
        doc.push_str(&format!(
            "Started:: {}\n",
            run.started_at().format("%Y-%m-%d %H:%M:%S UTC")
        ));
        doc.push_str(&format!("Duration:: {}\n", format_duration(run.elapsed())));
        doc.push_str(&format!("Mode:: {}\n", run.mode().as_str()));
        doc.push_str(&format!(
            "Probes:: {} executed, {} skipped\n",
            counts.executed(),
            counts.skipped
        ));
        let verdict = if aggregate.is_clean() {
            "[green]#Clean#"
        } else {
            "[red]#Findings require attention#"
        };
        doc.push_str(&format!("Result:: {verdict}\n\n"));
    }

    fn counts_table(doc: &mut String, aggregate: &Aggregate<'_>) {
        let counts = aggregate.counts();
        doc.push_str("== Summary\n\n");
        doc.push_str(".Outcomes by status\n[cols=\"3,1\",options=\"header\"]\n|===\n|Status |Probes\n");
        for (status, count) in counts.iter() {
            let style = status_style(status);
            doc.push_str(&format!("|[{}]#{}# |{count}\n", style.role, style.label));
        }
        doc.push_str(&format!("|Skipped |{}\n", counts.skipped));
        doc.push_str("|===\n\n");
    }

    fn legend(doc: &mut String) {
        doc.push_str(".Disposition legend\n[cols=\"1,3\",options=\"header\"]\n|===\n|Disposition |Meaning\n");
        for disposition in Disposition::ALL {
            let style = disposition_style(disposition);
            doc.push_str(&format!(
                "|{{set:cellbgcolor:{}}}{} |{RESET}{}\n",
                style.hex, style.label, style.legend
            ));
        }
        doc.push_str("|===\n\n");
    }

    fn table(doc: &mut String, title: &str, entries: &[Entry<'_>], with_category: bool) {
        doc.push_str(&format!(".{title}\n"));
        if with_category {
            doc.push_str("[cols=\"2,3,1,5,2\",options=\"header\"]\n|===\n");
            doc.push_str("|Category |Probe |Status |Observation |Disposition\n");
        } else {
            doc.push_str("[cols=\"3,1,5,2\",options=\"header\"]\n|===\n");
            doc.push_str("|Probe |Status |Observation |Disposition\n");
        }

        for entry in entries {
            let mut row = String::from("|");
            row.push_str(RESET);
            if with_category {
                row.push_str(&format!("{} |", entry.info.category.label()));
            }
            row.push_str(&format!(
                "<<{},{}>> |",
                anchor(&entry.info.id),
                escape_asciidoc_cell(&escape_asciidoc_line(&entry.info.name))
            ));

            match entry.outcome {
                Some(outcome) => {
                    let status = status_style(outcome.status);
                    let disposition = disposition_style(outcome.disposition);
                    row.push_str(&format!(
                        "[{}]#{}# |{} |{{set:cellbgcolor:{}}}{}",
                        status.role,
                        status.label,
                        escape_asciidoc_cell(&outcome.message),
                        disposition.hex,
                        disposition.label
                    ));
                }
                None => row.push_str("Skipped |Not dispatched |-"),
            }
            doc.push_str(&row);
            doc.push('\n');
        }
        doc.push_str("|===\n\n");
    }

    fn probe_section(doc: &mut String, entry: &Entry<'_>) {
        let info = entry.info;
        doc.push_str(&format!(
            "[[{}]]\n=== {}\n\n",
            anchor(&info.id),
            escape_asciidoc_line(&info.name)
        ));
        if !info.description.trim().is_empty() {
            doc.push_str(&format!("{}\n\n", escape_asciidoc_paragraph(&info.description)));
        }

        let Some(outcome) = entry.outcome else {
            doc.push_str("NOTE: Skipped. The probe was not dispatched because the run stopped early.\n\n");
            return;
        };

        let status = status_style(outcome.status);
        let disposition = disposition_style(outcome.disposition);
        doc.push_str("[horizontal]\n");
        doc.push_str(&format!("ID:: `{}`\n", info.id));
        doc.push_str(&format!("Status:: [{}]#{}#\n", status.role, status.label));
        doc.push_str(&format!("Disposition:: *{}*\n", disposition.label));
        doc.push_str(&format!("Duration:: {}\n\n", format_duration(outcome.duration())));

        if let Some(detail) = &outcome.detail {
            doc.push_str(".Detail\n");
            doc.push_str(&DetailBlock::classify(detail, ReportFormat::Asciidoc).to_asciidoc());
            doc.push_str("\n\n");
        }

        doc.push_str(&format!(
            ".Observation\n{}\n\n",
            escape_asciidoc_paragraph(&outcome.message)
        ));

        doc.push_str(".Recommendations\n");
        if outcome.recommendations.is_empty() {
            doc.push_str("None.\n\n");
        } else {
            for recommendation in &outcome.recommendations {
                doc.push_str(&format!("* {}\n", escape_asciidoc_line(recommendation)));
            }
            doc.push('\n');
        }

        if !info.references.is_empty() {
            doc.push_str(".References\n");
            for reference in &info.references {
                doc.push_str(&format!("* {reference}[]\n"));
            }
            doc.push('\n');
        }
    }
}

impl Renderer for AsciidocRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Asciidoc
    }

    fn render(&self, aggregate: &Aggregate<'_>) -> ClusterProbeResult<String> {
        let mut doc = String::new();

        self.header(&mut doc, aggregate);
        Self::counts_table(&mut doc, aggregate);
        Self::legend(&mut doc);
        Self::table(&mut doc, "All probes", aggregate.entries(), true);

        for (category, entries) in aggregate.by_category() {
            doc.push_str(&format!("== {}\n\n", category.label()));
            Self::table(&mut doc, &format!("{} probes", category.label()), entries, false);
            if self.options.include_details {
                for entry in entries {
                    Self::probe_section(&mut doc, entry);
                }
            }
        }

        Ok(doc)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::config::ExecutionMode;
    use crate::outcome::Outcome;
    use crate::probe::ProbeInfo;
    use crate::render::tests::sample_run;
    use crate::run::RunResult;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::time::Duration;

    fn render(options: RenderOptions) -> String {
        let run = sample_run();
        AsciidocRenderer::new(options)
            .render(&Aggregate::new(&run))
            .unwrap()
    }

    #[test]
    fn test_header_and_metadata() {
        let doc = render(RenderOptions::default().with_cluster("prod-eu"));
        assert!(doc.starts_with("= Cluster Health Report\n"));
        assert!(doc.contains("Cluster:: prod-eu"));
        assert!(doc.contains("Probes:: 5 executed, 1 skipped"));
        assert!(doc.contains("[red]#Findings require attention#"));
    }

    #[test]
    fn test_legend_lists_every_disposition() {
        let doc = render(RenderOptions::default());
        for disposition in Disposition::ALL {
            assert!(doc.contains(disposition_style(disposition).legend));
        }
    }

    #[test]
    fn test_summary_row_shape() {
        let doc = render(RenderOptions::default());
        let row = doc
            .lines()
            .find(|l| l.contains("<<probe-nodes-ready,") && l.contains("Nodes |"))
            .unwrap();
        assert_eq!(
            row,
            "|{set:cellbgcolor!}Nodes |<<probe-nodes-ready,Nodes ready>> |[red]#Critical# \
             |1 of 3 nodes NotReady |{set:cellbgcolor:#ffcdd2}Change required"
        );
    }

    #[test]
    fn test_cell_text_is_escaped() {
        let doc = render(RenderOptions::default());
        assert!(doc.contains("2 roles grant '*' \\| verbs"));
    }

    #[test]
    fn test_detail_blocks() {
        let doc = render(RenderOptions::default());
        // native table embedded as-is
        assert!(doc.contains(".Detail\n[cols=\"1,1\"]\n|===\n|Node |Ready\n|n3 |False\n|===\n"));
        // raw output wrapped in a literal block
        assert!(doc.contains(".Detail\n....\nServer Version: v1.29.3\n....\n"));
    }

    #[test]
    fn test_recommendations_and_none_marker() {
        let doc = render(RenderOptions::default());
        assert!(doc.contains(".Recommendations\n* Inspect kubelet logs on n3\n"));
        assert!(doc.contains(".Recommendations\nNone.\n"));
        assert!(doc.contains("* https://kubernetes.io/releases/[]"));
    }

    #[test]
    fn test_skipped_probe_section() {
        let doc = render(RenderOptions::default());
        assert!(doc.contains("[[probe-metrics-server]]\n=== Metrics server"));
        assert!(doc.contains("Skipped |Not dispatched |-"));
    }

    #[test]
    fn test_category_sections_follow_enum_order() {
        let doc = render(RenderOptions::default());
        let nodes = doc.find("\n== Nodes\n").unwrap();
        let security = doc.find("\n== Security\n").unwrap();
        assert!(nodes < security);
    }

    #[test]
    fn test_section_text_cannot_break_structure() {
        let probes = vec![ProbeInfo::new("etcd", "Etcd\n= health", Category::ClusterConfig)
            .with_description("|===\nmembers")];
        let mut run = RunResult::new(ExecutionMode::Sequential, probes, Utc::now());
        let mut outcome = Outcome::critical("== 2 of 3 members\n|=== quorum lost")
            .with_recommendation("* restart etcd-2");
        outcome.stamp("etcd", Duration::from_millis(5));
        run.finish(HashMap::from([("etcd".to_string(), outcome)]), Duration::from_millis(5));

        let doc = AsciidocRenderer::default()
            .render(&Aggregate::new(&run))
            .unwrap();
        assert!(doc.contains("=== Etcd = health\n"));
        assert!(doc.contains("{empty}|=== +\nmembers\n"));
        assert!(doc.contains(
            ".Observation\n{empty}== 2 of 3 members +\n{empty}|=== quorum lost\n"
        ));
        assert!(doc.contains("* {empty}* restart etcd-2\n"));
        assert!(doc.contains("<<probe-etcd,Etcd = health>>"));
        assert!(!doc.lines().any(|l| l == "= health"));
    }

    #[test]
    fn test_similar_ids_get_distinct_anchors() {
        let probes = vec![
            ProbeInfo::new("nodes.ready", "Nodes ready (dotted)", Category::Nodes),
            ProbeInfo::new("nodes-ready", "Nodes ready", Category::Nodes),
        ];
        let mut run = RunResult::new(ExecutionMode::Sequential, probes, Utc::now());
        let outcomes = ["nodes.ready", "nodes-ready"].map(|id| {
            let mut outcome = Outcome::ok("Ready");
            outcome.stamp(id, Duration::from_millis(1));
            (id.to_string(), outcome)
        });
        run.finish(HashMap::from(outcomes), Duration::from_millis(2));

        let doc = AsciidocRenderer::default()
            .render(&Aggregate::new(&run))
            .unwrap();
        assert_eq!(doc.matches("[[probe-nodes-ready]]").count(), 1);
        assert_eq!(doc.matches("[[probe-nodes_2eready]]").count(), 1);
    }

    #[test]
    fn test_details_can_be_disabled() {
        let doc = render(RenderOptions::default().with_details(false));
        assert!(!doc.contains("=== Nodes ready"));
        assert!(doc.contains("<<probe-nodes-ready,Nodes ready>>"));
    }
}
