//! Presentation rules shared by every renderer.

use super::ReportFormat;
use crate::status::{Disposition, Status};
use console::Color;
use regex::Regex;
use std::sync::OnceLock;

/// How a status is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusStyle {
    /// Display label
    pub label: &'static str,
    /// CSS color
    pub hex: &'static str,
    /// Built-in AsciiDoc color role
    pub role: &'static str,
    /// Terminal color
    pub ansi: Color,
}

/// Style for a status
#[must_use]
pub const fn status_style(status: Status) -> StatusStyle {
    let (hex, role, ansi) = match status {
        Status::Ok => ("#2e7d32", "green", Color::Green),
        Status::Info => ("#1565c0", "blue", Color::Blue),
        Status::Warning => ("#ef6c00", "olive", Color::Yellow),
        Status::Critical => ("#c62828", "red", Color::Red),
        Status::NotApplicable => ("#757575", "gray", Color::White),
        Status::Unknown => ("#6a1b9a", "purple", Color::Magenta),
    };
    StatusStyle {
        label: status.label(),
        hex,
        role,
        ansi,
    }
}

/// How a disposition is drawn, plus its legend entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispositionStyle {
    /// Display label
    pub label: &'static str,
    /// Background color of the cell
    pub hex: &'static str,
    /// Legend explanation
    pub legend: &'static str,
}

/// Style for a disposition
#[must_use]
pub const fn disposition_style(disposition: Disposition) -> DispositionStyle {
    let (hex, legend) = match disposition {
        Disposition::NoChangeNeeded => ("#c8e6c9", "The check passed; nothing to do."),
        Disposition::ChangeRecommended => (
            "#fff59d",
            "A change would improve the cluster but is not mandatory.",
        ),
        Disposition::ChangeRequired => ("#ffcdd2", "A change must be made."),
        Disposition::Advisory => ("#bbdefb", "For information; no action expected."),
        Disposition::NotApplicable => ("#eeeeee", "The check does not apply to this cluster."),
        Disposition::PendingEvaluation => (
            "#ffe0b2",
            "The finding needs to be reviewed by an operator.",
        ),
    };
    DispositionStyle {
        label: disposition.label(),
        hex,
        legend,
    }
}

/// A detail blob, classified for one output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailBlock<'a> {
    /// Already markup in the target format; embed verbatim
    Native(&'a str),
    /// Plain text (command output); wrap in a literal block
    Raw(&'a str),
}

impl<'a> DetailBlock<'a> {
    /// Decide how `detail` should be embedded in `format`
    #[must_use]
    pub fn classify(detail: &'a str, format: ReportFormat) -> Self {
        let native = match format {
            ReportFormat::Asciidoc => is_asciidoc(detail),
            ReportFormat::Html => is_html(detail),
            ReportFormat::Json | ReportFormat::Text => false,
        };
        if native {
            Self::Native(detail)
        } else {
            Self::Raw(detail)
        }
    }

    /// Whether the blob is embedded verbatim
    #[must_use]
    pub const fn is_native(&self) -> bool {
        matches!(self, Self::Native(_))
    }

    /// Render for AsciiDoc
    #[must_use]
    pub fn to_asciidoc(&self) -> String {
        match self {
            Self::Native(text) => (*text).trim_end().to_string(),
            Self::Raw(text) => {
                // A literal block ends at the first line that repeats its
                // delimiter, so lengthen the fence past any run in the text.
                let longest = text
                    .lines()
                    .map(str::trim_end)
                    .filter(|l| !l.is_empty() && l.chars().all(|c| c == '.'))
                    .map(str::len)
                    .max()
                    .unwrap_or(0);
                let fence = ".".repeat(longest.max(3) + 1);
                format!("{fence}\n{}\n{fence}", text.trim_end())
            }
        }
    }

    /// Render for HTML
    #[must_use]
    pub fn to_html(&self) -> String {
        match self {
            Self::Native(text) => (*text).trim().to_string(),
            Self::Raw(text) => format!(
                r#"<pre class="detail">{}</pre>"#,
                escape_html(text.trim_end())
            ),
        }
    }
}

struct AsciidocMarkers {
    section_title: Regex,
    block_attributes: Regex,
    delimiter: Regex,
}

fn asciidoc_markers() -> Option<&'static AsciidocMarkers> {
    static MARKERS: OnceLock<Option<AsciidocMarkers>> = OnceLock::new();
    MARKERS
        .get_or_init(|| {
            Some(AsciidocMarkers {
                section_title: Regex::new(r"^={1,5} \S").ok()?,
                block_attributes: Regex::new(r#"^\[[a-zA-Z#.%"][^\]]*\]$"#).ok()?,
                delimiter: Regex::new(r"^(\|===|-{4,}|\*{4,}|={4,}|\.{4,}|_{4,})$").ok()?,
            })
        })
        .as_ref()
}

fn html_open_tag() -> Option<&'static Regex> {
    static OPEN: OnceLock<Option<Regex>> = OnceLock::new();
    OPEN.get_or_init(|| Regex::new(r"^<([a-zA-Z][a-zA-Z0-9]*)[\s>]").ok())
        .as_ref()
}

/// Markup is recognized from the document's opening or from a complete
/// table; a marker-like line buried in command output does not count.
fn is_asciidoc(detail: &str) -> bool {
    let Some(markers) = asciidoc_markers() else {
        return false;
    };
    let mut lines = detail
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.is_empty());
    let Some(first) = lines.next() else {
        return false;
    };

    if markers.section_title.is_match(first) {
        return true;
    }
    if markers.block_attributes.is_match(first) {
        return lines.next().is_some_and(|l| markers.delimiter.is_match(l));
    }

    let table_fences = detail.lines().filter(|l| l.trim_end() == "|===").count();
    first == "|===" && table_fences >= 2 && table_fences % 2 == 0
}

fn is_html(detail: &str) -> bool {
    let trimmed = detail.trim();
    html_open_tag()
        .and_then(|re| re.captures(trimmed))
        .and_then(|c| c.get(1))
        .is_some_and(|tag| {
            let closing = format!("</{}>", tag.as_str().to_ascii_lowercase());
            trimmed.to_ascii_lowercase().ends_with(&closing)
        })
}

/// Escape HTML special characters
#[must_use]
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escape text placed inside an AsciiDoc table cell
#[must_use]
pub fn escape_asciidoc_cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " +\n")
}

/// Characters that open a block or list when they start an AsciiDoc line
const ASCIIDOC_LINE_MARKERS: &[char] = &[
    '=', '|', '*', '.', '-', '[', ':', '/', '+', '<', '>', '_', '#', '\'',
];

fn guard_asciidoc_line(line: &str) -> String {
    let line = line.trim();
    let numbered = line
        .split_once(". ")
        .is_some_and(|(n, _)| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()));
    if line.starts_with(ASCIIDOC_LINE_MARKERS) || numbered {
        format!("{{empty}}{line}")
    } else {
        line.to_string()
    }
}

/// Make free text safe as a single AsciiDoc line (titles, list items)
#[must_use]
pub fn escape_asciidoc_line(s: &str) -> String {
    let joined = s
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    guard_asciidoc_line(&joined)
}

/// Make free text safe as one AsciiDoc paragraph, keeping its line breaks
#[must_use]
pub fn escape_asciidoc_paragraph(s: &str) -> String {
    s.lines()
        .filter(|l| !l.trim().is_empty())
        .map(guard_asciidoc_line)
        .collect::<Vec<_>>()
        .join(" +\n")
}

/// Anchor id for a probe section
///
/// ASCII letters, digits and `-` are kept; every other byte becomes `_`
/// plus two hex digits, so distinct ids never share an anchor.
#[must_use]
pub fn anchor(probe_id: &str) -> String {
    let mut slug = String::with_capacity(probe_id.len() + 6);
    slug.push_str("probe-");
    for byte in probe_id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            slug.push(char::from(byte));
        } else {
            slug.push_str(&format!("_{byte:02x}"));
        }
    }
    slug
}
