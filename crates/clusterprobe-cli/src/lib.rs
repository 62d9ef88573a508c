//! Clusterprobe CLI Library
//!
//! Command-line front end for the `clusterprobe` scheduler: loads a YAML
//! manifest of command-backed probes, runs them with a progress bar and
//! writes AsciiDoc, HTML, JSON or text reports.
//!
//! ## Usage
//!
//! ```bash
//! clusterprobe categories                         # Known categories and aliases
//! clusterprobe list -m probes.yaml                # Probes in a manifest
//! clusterprobe run -m probes.yaml                 # Run everything, write AsciiDoc
//! clusterprobe run -m probes.yaml -c dns,rbac \
//!     --format html,json --sequential --fail-fast  # Subset, several formats
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::format_push_string)]
#![allow(clippy::missing_errors_doc)]

pub mod command_probe;
mod commands;
mod config;
mod error;
pub mod handlers;
pub mod logging;
pub mod manifest;
mod output;

pub use command_probe::CommandProbe;
pub use commands::{Cli, ColorArg, Commands, ListArgs, ReportFormatArg, RunArgs};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use logging::init_logging;
pub use manifest::{Expectations, Manifest, ProbeSpec, Verdict};
pub use output::ProgressReporter;
