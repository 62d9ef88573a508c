//! Log subscriber setup.
//!
//! `RUST_LOG` wins when set; otherwise the filter follows `-q`/`-v`.
//! Records go to stderr so stdout stays free for summaries and JSON listings.

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use tracing_subscriber::EnvFilter;

/// Build the level filter for a configuration
#[must_use]
pub fn env_filter(config: &CliConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.verbosity.default_log_filter()))
}

/// Install the global subscriber
///
/// # Errors
///
/// Returns a configuration error if a subscriber is already installed.
pub fn init_logging(config: &CliConfig) -> CliResult<()> {
    let filter = env_filter(config);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(config.verbosity.is_debug());

    let installed = if config.log_json {
        builder.json().try_init()
    } else {
        builder.with_ansi(config.color.should_color()).try_init()
    };
    installed.map_err(|e| CliError::config(format!("cannot install log subscriber: {e}")))
}
