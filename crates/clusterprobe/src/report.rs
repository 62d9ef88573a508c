//! Writing rendered reports to disk.

use crate::aggregate::Aggregate;
use crate::render::{Renderer, ReportFormat};
use crate::result::{ClusterProbeError, ClusterProbeResult};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::info;

/// Default report file stem
pub const DEFAULT_BASENAME: &str = "cluster-report";

/// Places one report file per run under a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportWriter {
    directory: PathBuf,
    basename: String,
    timestamp: bool,
}

impl ReportWriter {
    /// Writer into `directory`, timestamped file names
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            basename: DEFAULT_BASENAME.to_string(),
            timestamp: true,
        }
    }

    /// Set the file stem
    #[must_use]
    pub fn with_basename(mut self, basename: impl Into<String>) -> Self {
        self.basename = basename.into();
        self
    }

    /// Append `-YYYYMMDD-HHMMSS` to the file stem
    #[must_use]
    pub const fn with_timestamp(mut self, enabled: bool) -> Self {
        self.timestamp = enabled;
        self
    }

    /// Target directory
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// File name for a report produced at `at`
    #[must_use]
    pub fn file_name(&self, format: ReportFormat, at: DateTime<Utc>) -> String {
        if self.timestamp {
            format!(
                "{}-{}.{}",
                self.basename,
                at.format("%Y%m%d-%H%M%S"),
                format.extension()
            )
        } else {
            format!("{}.{}", self.basename, format.extension())
        }
    }

    /// Full path for a report produced at `at`
    #[must_use]
    pub fn path_for(&self, format: ReportFormat, at: DateTime<Utc>) -> PathBuf {
        self.directory.join(self.file_name(format, at))
    }

    /// Write already-rendered contents, creating parent directories
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an empty file stem, or an I/O error
    /// if the directory or file cannot be written.
    pub fn write(
        &self,
        format: ReportFormat,
        contents: &str,
        at: DateTime<Utc>,
    ) -> ClusterProbeResult<PathBuf> {
        if self.basename.trim().is_empty() {
            return Err(ClusterProbeError::config("report file name is empty"));
        }
        let path = self.path_for(format, at);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, contents)?;
        info!(path = %path.display(), format = format.as_str(), bytes = contents.len(), "report written");
        Ok(path)
    }

    /// Render and write a report; the timestamp is the run's start time
    ///
    /// # Errors
    ///
    /// Returns rendering or I/O errors.
    pub fn write_report(
        &self,
        renderer: &dyn Renderer,
        aggregate: &Aggregate<'_>,
    ) -> ClusterProbeResult<PathBuf> {
        let contents = renderer.render(aggregate)?;
        self.write(renderer.format(), &contents, aggregate.run().started_at())
    }
}
