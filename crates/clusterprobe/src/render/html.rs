//! Standalone HTML report.

use super::style::{anchor, disposition_style, escape_html, status_style, DetailBlock};
use super::{format_duration, RenderOptions, ReportFormat, Renderer};
use crate::aggregate::{Aggregate, Entry};
use crate::result::ClusterProbeResult;
use crate::status::{Disposition, Status};

/// Renders HTML pages
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer {
    options: RenderOptions,
}

impl HtmlRenderer {
    /// Create an HTML renderer
    #[must_use]
    pub const fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    fn stylesheet() -> String {
        let mut css = String::from(
            r"        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 20px; }
        .meta { background: #f5f5f5; padding: 20px; border-radius: 8px; margin-bottom: 20px; }
        table { border-collapse: collapse; margin: 10px 0 20px; width: 100%; }
        th, td { border: 1px solid #ddd; padding: 6px 10px; text-align: left; vertical-align: top; }
        th { background: #fafafa; }
        .status { font-weight: bold; }
        .probe { padding: 10px; margin: 10px 0; border-left: 4px solid #ddd; }
        pre.detail { background: #263238; color: #eceff1; padding: 10px; overflow-x: auto; white-space: pre-wrap; }
        .none { color: #757575; font-style: italic; }
        .clean { color: #2e7d32; }
        .unclean { color: #c62828; }
",
        );
        for status in Status::ALL {
            let style = status_style(status);
            css.push_str(&format!(
                "        .status-{key} .status {{ color: {hex}; }}\n        .probe.status-{key} {{ border-left-color: {hex}; }}\n",
                key = status.key(),
                hex = style.hex
            ));
        }
        for disposition in Disposition::ALL {
            css.push_str(&format!(
                "        .disposition-{} {{ background: {}; }}\n",
                disposition.key(),
                disposition_style(disposition).hex
            ));
        }
        css
    }

    fn row(entry: &Entry<'_>, with_category: bool) -> String {
        let class = entry.status().map_or("skipped", Status::key);
        let mut row = format!(
            r#"<tr class="status-{class}" data-probe="{}">"#,
            escape_html(&entry.info.id)
        );
        if with_category {
            row.push_str(&format!("<td>{}</td>", entry.info.category.label()));
        }
        row.push_str(&format!(
            r##"<td><a href="#{}">{}</a></td>"##,
            anchor(&entry.info.id),
            escape_html(&entry.info.name)
        ));
        match entry.outcome {
            Some(outcome) => {
                row.push_str(&format!(
                    r#"<td class="status">{}</td><td>{}</td><td class="disposition-{}">{}</td>"#,
                    status_style(outcome.status).label,
                    escape_html(&outcome.message),
                    outcome.disposition.key(),
                    disposition_style(outcome.disposition).label
                ));
            }
            None => row.push_str(
                r#"<td class="status">Skipped</td><td class="none">Not dispatched</td><td>-</td>"#,
            ),
        }
        row.push_str("</tr>\n");
        row
    }

    fn table(html: &mut String, entries: &[Entry<'_>], with_category: bool) {
        html.push_str("<table>\n<tr>");
        if with_category {
            html.push_str("<th>Category</th>");
        }
        html.push_str("<th>Probe</th><th>Status</th><th>Observation</th><th>Disposition</th></tr>\n");
        for entry in entries {
            html.push_str(&Self::row(entry, with_category));
        }
        html.push_str("</table>\n");
    }

    fn probe_section(html: &mut String, entry: &Entry<'_>) {
        let info = entry.info;
        let class = entry.status().map_or("skipped", Status::key);
        html.push_str(&format!(
            r#"<div class="probe status-{class}" id="{}">
<h3>{}</h3>
"#,
            anchor(&info.id),
            escape_html(&info.name)
        ));
        if !info.description.is_empty() {
            html.push_str(&format!("<p>{}</p>\n", escape_html(&info.description)));
        }

        let Some(outcome) = entry.outcome else {
            html.push_str(
                "<p class=\"none\">Skipped: the probe was not dispatched because the run stopped early.</p>\n</div>\n",
            );
            return;
        };

        html.push_str(&format!(
            r#"<p><span class="status">{}</span> &middot; <span class="disposition-{}">{}</span> &middot; {}</p>
"#,
            status_style(outcome.status).label,
            outcome.disposition.key(),
            disposition_style(outcome.disposition).label,
            format_duration(outcome.duration())
        ));

        if let Some(detail) = &outcome.detail {
            html.push_str("<h4>Detail</h4>\n");
            html.push_str(&DetailBlock::classify(detail, ReportFormat::Html).to_html());
            html.push('\n');
        }

        html.push_str(&format!(
            "<h4>Observation</h4>\n<p>{}</p>\n",
            escape_html(&outcome.message)
        ));

        html.push_str("<h4>Recommendations</h4>\n");
        if outcome.recommendations.is_empty() {
            html.push_str("<p class=\"none\">None</p>\n");
        } else {
            html.push_str("<ul>\n");
            for recommendation in &outcome.recommendations {
                html.push_str(&format!("<li>{}</li>\n", escape_html(recommendation)));
            }
            html.push_str("</ul>\n");
        }

        if !info.references.is_empty() {
            html.push_str("<h4>References</h4>\n<ul>\n");
            for reference in &info.references {
                let link = escape_html(reference);
                html.push_str(&format!(r#"<li><a href="{link}">{link}</a></li>"#));
                html.push('\n');
            }
            html.push_str("</ul>\n");
        }
        html.push_str("</div>\n");
    }
}

impl Renderer for HtmlRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Html
    }

    fn render(&self, aggregate: &Aggregate<'_>) -> ClusterProbeResult<String> {
        let run = aggregate.run();
        let counts = aggregate.counts();
        let title = escape_html(&self.options.title);
        let mut html = String::new();

        // Header
        html.push_str(&format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <style>
{}    </style>
</head>
<body>
"#,
            Self::stylesheet()
        ));

        // Run metadata
        let (verdict_class, verdict) = if aggregate.is_clean() {
            ("clean", "Clean")
        } else {
            ("unclean", "Findings require attention")
        };
        html.push_str(&format!("<div class=\"meta\">\n    <h1>{title}</h1>\n"));
        if let Some(cluster) = &self.options.cluster {
            html.push_str(&format!(
                "    <p>Cluster: {}</p>\n",
                escape_html(cluster)
            ));
        }
        html.push_str(&format!(
            r#"    <p>Run <code>{}</code> started {} in {} mode, took {}</p>
    <p>{} executed, {} skipped: <strong class="{verdict_class}">{verdict}</strong></p>
</div>
"#,
            run.run_id(),
            run.started_at().format("%Y-%m-%d %H:%M:%S UTC"),
            run.mode().as_str(),
            format_duration(run.elapsed()),
            counts.executed(),
            counts.skipped
        ));

        // Counts
        html.push_str("<h2>Summary</h2>\n<table>\n<tr><th>Status</th><th>Probes</th></tr>\n");
        for (status, count) in counts.iter() {
            html.push_str(&format!(
                r#"<tr class="status-{}"><td class="status">{}</td><td>{count}</td></tr>"#,
                status.key(),
                status_style(status).label
            ));
            html.push('\n');
        }
        html.push_str(&format!(
            "<tr><td>Skipped</td><td>{}</td></tr>\n</table>\n",
            counts.skipped
        ));

        // Legend
        html.push_str("<h2>Disposition legend</h2>\n<table>\n<tr><th>Disposition</th><th>Meaning</th></tr>\n");
        for disposition in Disposition::ALL {
            let style = disposition_style(disposition);
            html.push_str(&format!(
                r#"<tr><td class="disposition-{}">{}</td><td>{}</td></tr>"#,
                disposition.key(),
                style.label,
                style.legend
            ));
            html.push('\n');
        }
        html.push_str("</table>\n");

        // All probes
        html.push_str("<h2>All probes</h2>\n");
        Self::table(&mut html, aggregate.entries(), true);

        // Per category
        for (category, entries) in aggregate.by_category() {
            html.push_str(&format!("<h2>{}</h2>\n", category.label()));
            Self::table(&mut html, entries, false);
            if self.options.include_details {
                for entry in entries {
                    Self::probe_section(&mut html, entry);
                }
            }
        }

        // Footer
        html.push_str(&format!(
            r"
<footer>
    <p>Generated by clusterprobe {}</p>
</footer>
</body>
</html>
",
            env!("CARGO_PKG_VERSION")
        ));

        Ok(html)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::render::tests::sample_run;

    fn render(options: RenderOptions) -> String {
        let run = sample_run();
        HtmlRenderer::new(options)
            .render(&Aggregate::new(&run))
            .unwrap()
    }

    #[test]
    fn test_document_shell() {
        let html = render(RenderOptions::default().with_title("Prod <EU>"));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Prod &lt;EU&gt;</title>"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_probe_text_is_escaped() {
        let html = render(RenderOptions::default());
        assert!(html.contains("CoreDNS has a single replica &lt;1/2&gt;"));
        assert!(!html.contains("replica <1/2>"));
    }

    #[test]
    fn test_native_html_detail_is_embedded() {
        let html = render(RenderOptions::default());
        assert!(html.contains("<table><tr><td>coredns</td><td>1</td></tr></table>"));
    }

    #[test]
    fn test_raw_detail_is_preformatted() {
        let html = render(RenderOptions::default());
        assert!(html.contains(r#"<pre class="detail">Server Version: v1.29.3</pre>"#));
        // AsciiDoc markup is not HTML; it is shown as text
        assert!(html.contains(r#"<pre class="detail">[cols=&quot;1,1&quot;]"#));
    }

    #[test]
    fn test_rows_carry_status_classes() {
        let html = render(RenderOptions::default());
        assert!(html.contains(r#"<tr class="status-critical" data-probe="nodes-ready">"#));
        assert!(html.contains(r#"<tr class="status-skipped" data-probe="metrics-server">"#));
        assert!(html.contains(r#"<td class="disposition-change-required">Change required</td>"#));
    }

    #[test]
    fn test_recommendation_markers() {
        let html = render(RenderOptions::default());
        assert!(html.contains("<li>Inspect kubelet logs on n3</li>"));
        assert!(html.contains(r#"<p class="none">None</p>"#));
    }

    #[test]
    fn test_details_can_be_disabled() {
        let html = render(RenderOptions::default().with_details(false));
        assert!(!html.contains(r#"<div class="probe"#));
    }
}
