//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use clusterprobe::ReportFormat;
use std::path::PathBuf;

/// Clusterprobe: run diagnostic probes against a cluster and write compliance reports
#[derive(Parser, Debug)]
#[command(name = "clusterprobe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Emit log records as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the probes of a manifest and write reports
    Run(RunArgs),

    /// List the probes a manifest declares
    List(ListArgs),

    /// Show known categories and their accepted aliases
    Categories,
}

/// Arguments for the run command
#[derive(Parser, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct RunArgs {
    /// Probe manifest (YAML)
    #[arg(short, long, env = "CLUSTERPROBE_MANIFEST")]
    pub manifest: PathBuf,

    /// Run configuration file (YAML); flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Only run probes in these categories (comma separated, aliases accepted)
    #[arg(short, long, value_delimiter = ',')]
    pub categories: Vec<String>,

    /// Run probes one at a time in manifest order
    #[arg(long)]
    pub sequential: bool,

    /// Per-probe timeout in milliseconds (0 = unbounded)
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Stop after the first probe that errors or times out (sequential only)
    #[arg(long)]
    pub fail_fast: bool,

    /// Report formats to write (comma separated)
    #[arg(short, long, value_enum, value_delimiter = ',', default_value = "asciidoc")]
    pub format: Vec<ReportFormatArg>,

    /// Output directory for reports
    #[arg(short, long, default_value = "target/clusterprobe")]
    pub output: PathBuf,

    /// Report file name without extension
    #[arg(long, default_value = clusterprobe::report::DEFAULT_BASENAME)]
    pub basename: String,

    /// Do not append a timestamp to report file names
    #[arg(long)]
    pub no_timestamp: bool,

    /// Report title
    #[arg(long)]
    pub title: Option<String>,

    /// Cluster name shown in report headers
    #[arg(long, env = "CLUSTERPROBE_CLUSTER")]
    pub cluster: Option<String>,

    /// Leave long-form probe detail out of reports
    #[arg(long)]
    pub no_details: bool,

    /// Exit with status 2 when any probe reports Warning, Critical or Unknown
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Probe manifest (YAML)
    #[arg(short, long, env = "CLUSTERPROBE_MANIFEST")]
    pub manifest: PathBuf,

    /// Only list probes in these categories
    #[arg(short, long, value_delimiter = ',')]
    pub categories: Vec<String>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Report format argument
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormatArg {
    /// AsciiDoc document
    #[value(alias = "adoc")]
    Asciidoc,
    /// Standalone HTML page
    #[value(alias = "htm")]
    Html,
    /// Machine-readable JSON
    Json,
    /// Plain-text summary
    #[value(alias = "txt")]
    Text,
}

impl From<ReportFormatArg> for ReportFormat {
    fn from(arg: ReportFormatArg) -> Self {
        match arg {
            ReportFormatArg::Asciidoc => Self::Asciidoc,
            ReportFormatArg::Html => Self::Html,
            ReportFormatArg::Json => Self::Json,
            ReportFormatArg::Text => Self::Text,
        }
    }
}

/// Color argument
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
