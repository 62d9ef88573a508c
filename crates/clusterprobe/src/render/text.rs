//! Terminal summary: counts, then Warning/Critical findings only.

use super::style::status_style;
use super::{format_duration, RenderOptions, ReportFormat, Renderer};
use crate::aggregate::Aggregate;
use crate::result::ClusterProbeResult;
use crate::status::Status;
use console::Style;

/// Renders a short plain-text summary
#[derive(Debug, Clone, Default)]
pub struct TextRenderer {
    options: RenderOptions,
}

impl TextRenderer {
    /// Create a text renderer
    #[must_use]
    pub const fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    fn style(&self, status: Status) -> Style {
        Style::new()
            .fg(status_style(status).ansi)
            .bold()
            .force_styling(self.options.use_color)
    }

    fn dim(&self) -> Style {
        Style::new().dim().force_styling(self.options.use_color)
    }
}

impl Renderer for TextRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Text
    }

    fn render(&self, aggregate: &Aggregate<'_>) -> ClusterProbeResult<String> {
        let run = aggregate.run();
        let counts = aggregate.counts();
        let mut out = String::new();

        out.push_str(&format!("{}\n", self.options.title));
        if let Some(cluster) = &self.options.cluster {
            out.push_str(&format!("Cluster: {cluster}\n"));
        }
        out.push_str(&format!(
            "{}\n\n",
            self.dim().apply_to(format!(
                "Run {} ({}, {})",
                run.run_id(),
                run.mode().as_str(),
                format_duration(run.elapsed())
            ))
        ));

        for (status, count) in counts.iter() {
            let label = format!("{:<10}", status_style(status).label);
            out.push_str(&format!("  {} {count:>4}\n", self.style(status).apply_to(label)));
        }
        out.push_str(&format!("  {:<10} {:>4}\n\n", "Skipped", counts.skipped));

        let problems: Vec<_> = [Status::Critical, Status::Warning]
            .into_iter()
            .flat_map(|status| aggregate.with_status(status).iter())
            .collect();

        if problems.is_empty() {
            out.push_str("No warnings or critical findings.\n");
        } else {
            out.push_str(&format!("Findings ({}):\n", problems.len()));
            for entry in problems {
                let Some(outcome) = entry.outcome else {
                    continue;
                };
                let label = format!("{:<8}", status_style(outcome.status).label);
                out.push_str(&format!(
                    "  {} [{}] {}: {} ({})\n",
                    self.style(outcome.status).apply_to(label),
                    entry.info.id,
                    entry.info.name,
                    outcome.message,
                    outcome.disposition.label()
                ));
                for recommendation in &outcome.recommendations {
                    out.push_str(&format!("           -> {recommendation}\n"));
                }
            }
        }

        if counts.skipped > 0 {
            out.push_str(&format!(
                "\n{} probe(s) skipped after the run stopped early.\n",
                counts.skipped
            ));
        }

        let verdict = if aggregate.is_clean() {
            Style::new().green().bold()
        } else {
            Style::new().red().bold()
        }
        .force_styling(self.options.use_color);
        let text = if aggregate.is_clean() {
            "Result: clean"
        } else {
            "Result: findings require attention"
        };
        out.push_str(&format!("\n{}\n", verdict.apply_to(text)));

        Ok(out)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::render::tests::sample_run;

    fn render(options: RenderOptions) -> String {
        let run = sample_run();
        TextRenderer::new(options)
            .render(&Aggregate::new(&run))
            .unwrap()
    }

    #[test]
    fn test_counts_block() {
        let text = render(RenderOptions::default());
        assert!(text.contains("  Warning       2\n"));
        assert!(text.contains("  Critical      1\n"));
        assert!(text.contains("  Skipped       1\n"));
    }

    #[test]
    fn test_only_problems_are_listed() {
        let text = render(RenderOptions::default());
        assert!(text.contains("Findings (3):"));
        assert!(text.contains("[nodes-ready] Nodes ready: 1 of 3 nodes NotReady (Change required)"));
        assert!(text.contains("-> Inspect kubelet logs on n3"));
        assert!(!text.contains("[pv-bound]"));
        assert!(!text.contains("[api-version]"));
    }

    #[test]
    fn test_critical_listed_before_warning() {
        let text = render(RenderOptions::default());
        let critical = text.find("[nodes-ready]").unwrap();
        let warning = text.find("[dns-resolve]").unwrap();
        assert!(critical < warning);
    }

    #[test]
    fn test_plain_without_color() {
        let text = render(RenderOptions::default());
        assert!(!text.contains('\u{1b}'));
        assert!(text.ends_with("Result: findings require attention\n"));
    }

    #[test]
    fn test_ansi_with_color() {
        let text = render(RenderOptions::default().with_color(true));
        assert!(text.contains('\u{1b}'));
    }
}
