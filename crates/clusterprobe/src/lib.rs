//! Clusterprobe: concurrent diagnostic probes with compliance reports
//!
//! A host registers independent health-check probes, each tagged with a
//! category. The scheduler runs them sequentially or concurrently under a
//! per-probe timeout, isolates failures and panics, and collects exactly one
//! outcome per eligible probe. Read-only aggregate views feed renderers that
//! produce AsciiDoc, HTML, JSON or plain-text reports.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                   CLUSTERPROBE Architecture                     │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Probe      │    │ Scheduler  │    │ RunResult  │            │
//! │   │ Registry   │───►│ (timeout,  │───►│ (one       │            │
//! │   │            │    │  isolation)│    │  outcome   │            │
//! │   └────────────┘    └────────────┘    │  per probe)│            │
//! │                                       └─────┬──────┘            │
//! │                                             ▼                   │
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Report     │◄───│ Renderer   │◄───│ Aggregate  │            │
//! │   │ Writer     │    │ adoc/html/ │    │ (views)    │            │
//! │   │            │    │ json/text  │    │            │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use clusterprobe::prelude::*;
//!
//! let registry = ProbeRegistry::new()
//!     .with(FnProbe::new(
//!         ProbeInfo::new("api-reachable", "API server reachable", Category::ClusterConfig),
//!         |_ctx| Ok(Outcome::ok("API server answered")),
//!     ))?;
//!
//! let config = RunConfig::builder().sequential().progress(false).build();
//! let run = Scheduler::new(config).run(&registry)?;
//! let aggregate = Aggregate::new(&run);
//! assert!(aggregate.is_clean());
//!
//! let text = create_renderer(ReportFormat::Text, RenderOptions::default()).render(&aggregate)?;
//! assert!(text.contains("Result: clean"));
//! # Ok::<(), ClusterProbeError>(())
//! ```

#![warn(missing_docs)]

pub mod aggregate;
pub mod cancel;
pub mod category;
pub mod config;
pub mod outcome;
pub mod probe;
pub mod progress;
pub mod render;
pub mod report;
mod result;
pub mod run;
pub mod scheduler;
pub mod status;

pub use aggregate::{Aggregate, Entry, StatusCounts};
pub use cancel::CancellationToken;
pub use category::{Category, CategoryFilter};
pub use config::{ExecutionMode, RunConfig, RunConfigBuilder, DEFAULT_TIMEOUT_MS};
pub use outcome::{Outcome, Termination};
pub use probe::{FnProbe, Probe, ProbeContext, ProbeFailure, ProbeInfo, ProbeRegistry, RegisteredProbe};
pub use progress::{NoProgress, ProbeState, ProgressSink};
pub use render::{create_renderer, RenderOptions, Renderer, ReportFormat};
pub use report::ReportWriter;
pub use result::{ClusterProbeError, ClusterProbeResult};
pub use run::RunResult;
pub use scheduler::Scheduler;
pub use status::{Disposition, Status};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::aggregate::*;
    pub use super::cancel::*;
    pub use super::category::*;
    pub use super::config::*;
    pub use super::outcome::*;
    pub use super::probe::*;
    pub use super::progress::*;
    pub use super::render::{create_renderer, RenderOptions, Renderer, ReportFormat};
    pub use super::report::*;
    pub use super::result::*;
    pub use super::run::*;
    pub use super::scheduler::*;
    pub use super::status::*;
}
