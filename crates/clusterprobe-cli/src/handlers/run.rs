//! Run command handler

use crate::commands::{ReportFormatArg, RunArgs};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::manifest::Manifest;
use crate::output::ProgressReporter;
use clusterprobe::{
    create_renderer, Aggregate, ExecutionMode, RenderOptions, ReportFormat, ReportWriter,
    RunConfig, Scheduler, Status,
};
use std::path::PathBuf;
use std::sync::Arc;

/// Merge the optional config file with command-line flags
///
/// Flags only override when given; `-q` turns progress off and `-v` turns
/// per-probe lines on.
pub fn build_run_config(config: &CliConfig, args: &RunArgs) -> CliResult<RunConfig> {
    let mut run_config = match &args.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };

    if !args.categories.is_empty() {
        run_config.categories.clone_from(&args.categories);
    }
    if args.sequential {
        run_config.mode = ExecutionMode::Sequential;
    }
    if let Some(timeout_ms) = args.timeout {
        run_config.timeout_ms = timeout_ms;
    }
    if args.fail_fast {
        run_config.fail_fast = true;
    }
    if config.verbosity.is_quiet() {
        run_config.progress = false;
    }
    if config.verbosity.is_verbose() {
        run_config.verbose = true;
    }

    run_config.category_filter()?;
    Ok(run_config)
}

/// Report options from flags
#[must_use]
pub fn render_options(args: &RunArgs) -> RenderOptions {
    let mut options = RenderOptions::default().with_details(!args.no_details);
    if let Some(title) = &args.title {
        options = options.with_title(title);
    }
    if let Some(cluster) = &args.cluster {
        options = options.with_cluster(cluster);
    }
    options
}

/// Requested formats, first occurrence wins
#[must_use]
pub fn unique_formats(formats: &[ReportFormatArg]) -> Vec<ReportFormat> {
    let mut unique: Vec<ReportFormat> = Vec::with_capacity(formats.len());
    for format in formats.iter().copied().map(ReportFormat::from) {
        if !unique.contains(&format) {
            unique.push(format);
        }
    }
    unique
}

/// Number of outcomes that make a run unclean
#[must_use]
pub fn findings(aggregate: &Aggregate<'_>) -> usize {
    let counts = aggregate.counts();
    counts.problems() + counts.get(Status::Unknown)
}

/// Execute the run command, returning the report files written
pub fn execute_run(config: &CliConfig, args: &RunArgs) -> CliResult<Vec<PathBuf>> {
    let use_color = config.color.should_color();
    let quiet = config.verbosity.is_quiet();

    let manifest = Manifest::load(&args.manifest)?;
    let registry = manifest.to_registry()?;
    let run_config = build_run_config(config, args)?;

    let reporter =
        Arc::new(ProgressReporter::new(use_color, quiet).with_verbose(run_config.verbose));
    let scheduler = Scheduler::new(run_config).with_progress(reporter.clone());
    let run = scheduler.run(&registry)?;
    let aggregate = Aggregate::new(&run);

    let options = render_options(args);
    let writer = ReportWriter::new(&args.output)
        .with_basename(&args.basename)
        .with_timestamp(!args.no_timestamp);

    let mut written = Vec::new();
    for format in unique_formats(&args.format) {
        let renderer = create_renderer(format, options.clone());
        let path = writer
            .write_report(renderer.as_ref(), &aggregate)
            .map_err(|e| CliError::report_generation(format!("{format} report: {e}")))?;
        reporter.success(&format!("Wrote {format} report to {}", path.display()));
        written.push(path);
    }

    if !quiet {
        let summary =
            create_renderer(ReportFormat::Text, options.with_color(use_color)).render(&aggregate)?;
        print!("{summary}");
    }

    let findings = findings(&aggregate);
    if args.strict && !aggregate.is_clean() {
        reporter.failure(&format!("{findings} probe(s) need attention"));
        return Err(CliError::Strict { findings });
    }

    Ok(written)
}
