//! Clusterprobe CLI: run diagnostic probes and write compliance reports
//!
//! ## Usage
//!
//! ```bash
//! clusterprobe run -m probes.yaml --format adoc,json
//! clusterprobe run -m probes.yaml --strict   # exit 2 on findings
//! ```

use clap::Parser;
use clusterprobe_cli::{
    handlers, init_logging, Cli, CliConfig, CliResult, ColorChoice, Commands, Verbosity,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    // Build configuration from CLI args
    let config = build_config(&cli);
    init_logging(&config)?;

    match cli.command {
        Commands::Run(args) => handlers::execute_run(&config, &args).map(|_| ()),
        Commands::List(args) => handlers::execute_list(&args),
        Commands::Categories => {
            handlers::execute_categories();
            Ok(())
        }
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else {
        match cli.verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    };

    let color: ColorChoice = cli.color.into();

    CliConfig::new()
        .with_verbosity(verbosity)
        .with_color(color)
        .with_log_json(cli.log_json)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn config_for(argv: &[&str]) -> CliConfig {
        build_config(&Cli::try_parse_from(argv).unwrap())
    }

    #[test]
    fn test_verbosity_mapping() {
        assert_eq!(
            config_for(&["clusterprobe", "categories"]).verbosity,
            Verbosity::Normal
        );
        assert_eq!(
            config_for(&["clusterprobe", "-v", "categories"]).verbosity,
            Verbosity::Verbose
        );
        assert_eq!(
            config_for(&["clusterprobe", "-vvv", "categories"]).verbosity,
            Verbosity::Debug
        );
    }

    #[test]
    fn test_quiet_wins_over_verbose() {
        let config = config_for(&["clusterprobe", "-v", "-q", "categories"]);
        assert_eq!(config.verbosity, Verbosity::Quiet);
    }

    #[test]
    fn test_color_and_json_logging() {
        let config = config_for(&["clusterprobe", "--color", "always", "--log-json", "categories"]);
        assert_eq!(config.color, ColorChoice::Always);
        assert!(config.log_json);
    }
}
