//! Probe manifest: command-backed probes declared in YAML.
//!
//! ```yaml
//! probes:
//!   - id: nodes-ready
//!     name: All nodes Ready
//!     category: node            # any category alias
//!     command: [kubectl, wait, --for=condition=Ready, nodes, --all, --timeout=0]
//!     references: [https://kubernetes.io/docs/concepts/architecture/nodes/]
//!     on_failure:
//!       status: critical
//!       disposition: change-required
//!       message: "kubectl exited with {code}"
//!       recommendations: [Inspect NotReady nodes with `kubectl describe node`]
//!     exit_codes:
//!       2: { status: unknown, message: Cluster unreachable }
//! ```
//!
//! Exit code 0 maps to `on_success`, any other code to `on_failure`, unless
//! `exit_codes` names the code explicitly.

use crate::command_probe::CommandProbe;
use crate::error::{CliError, CliResult};
use clusterprobe::{Category, Disposition, Outcome, ProbeInfo, ProbeRegistry, Status};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Verdict a command exit code maps to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Verdict {
    /// Severity
    pub status: Status,
    /// Remediation intent; pending evaluation when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disposition: Option<Disposition>,
    /// Observation; `{code}` is replaced by the exit code
    #[serde(default)]
    pub message: String,
    /// Remediation suggestions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<String>,
}

impl Verdict {
    /// Create a verdict
    #[must_use]
    pub fn new(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            disposition: None,
            message: message.into(),
            recommendations: Vec::new(),
        }
    }

    fn default_success() -> Self {
        Self::new(Status::Ok, "Command succeeded")
    }

    fn default_failure() -> Self {
        Self::new(Status::Warning, "Command exited with status {code}")
    }

    /// Build the outcome for a given exit code
    #[must_use]
    pub fn outcome(&self, code: i32) -> Outcome {
        let message = self.message.replace("{code}", &code.to_string());
        let mut outcome = Outcome::new(self.status, message)
            .with_recommendations(self.recommendations.iter().cloned());
        if let Some(disposition) = self.disposition {
            outcome = outcome.with_disposition(disposition);
        }
        outcome
    }
}

/// Exit-code to verdict mapping of one command probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expectations {
    /// Verdict for exit code 0
    #[serde(default = "Verdict::default_success")]
    pub on_success: Verdict,
    /// Verdict for any other exit code
    #[serde(default = "Verdict::default_failure")]
    pub on_failure: Verdict,
    /// Per-code overrides
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub exit_codes: BTreeMap<i32, Verdict>,
}

impl Default for Expectations {
    fn default() -> Self {
        Self {
            on_success: Verdict::default_success(),
            on_failure: Verdict::default_failure(),
            exit_codes: BTreeMap::new(),
        }
    }
}

impl Expectations {
    /// Verdict for an exit code
    #[must_use]
    pub fn verdict_for(&self, code: i32) -> &Verdict {
        self.exit_codes.get(&code).unwrap_or(if code == 0 {
            &self.on_success
        } else {
            &self.on_failure
        })
    }
}

/// One probe entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeSpec {
    /// Stable id
    pub id: String,
    /// Display name; the id when absent
    #[serde(default)]
    pub name: String,
    /// What the probe checks
    #[serde(default)]
    pub description: String,
    /// Category name or alias
    pub category: String,
    /// Program and arguments
    pub command: Vec<String>,
    /// Documentation links
    #[serde(default)]
    pub references: Vec<String>,
    /// Exit-code mapping
    #[serde(flatten)]
    pub expectations: Expectations,
    /// Keys neither the entry nor its expectations claimed
    #[serde(flatten, skip_serializing)]
    unknown: BTreeMap<String, serde_yaml_ng::Value>,
}

impl ProbeSpec {
    fn check_fields(&self, origin: &Path) -> CliResult<()> {
        if self.unknown.is_empty() {
            return Ok(());
        }
        let keys: Vec<&str> = self.unknown.keys().map(String::as_str).collect();
        Err(CliError::manifest(
            origin,
            format!("probe '{}': unknown field(s) {}", self.id, keys.join(", ")),
        ))
    }

    fn to_probe(&self, origin: &Path) -> CliResult<CommandProbe> {
        let category = Category::resolve(&self.category).ok_or_else(|| {
            CliError::manifest(
                origin,
                format!("probe '{}': unknown category '{}'", self.id, self.category),
            )
        })?;

        let Some((program, args)) = self.command.split_first() else {
            return Err(CliError::manifest(
                origin,
                format!("probe '{}': command is empty", self.id),
            ));
        };
        if program.trim().is_empty() {
            return Err(CliError::manifest(
                origin,
                format!("probe '{}': command has no program", self.id),
            ));
        }

        let name = if self.name.trim().is_empty() {
            self.id.clone()
        } else {
            self.name.clone()
        };
        let mut info = ProbeInfo::new(&self.id, name, category).with_description(&self.description);
        for url in &self.references {
            info = info.with_reference(url);
        }

        Ok(CommandProbe::new(info, program, args.to_vec())
            .with_expectations(self.expectations.clone()))
    }
}

/// A parsed manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Declared probes, in run order
    #[serde(default)]
    pub probes: Vec<ProbeSpec>,
    #[serde(skip)]
    origin: PathBuf,
}

impl Manifest {
    /// Parse a YAML document; `origin` is only used in error messages
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Manifest`] on malformed YAML or a probe entry
    /// with a key it does not recognize.
    pub fn parse(yaml: &str, origin: impl Into<PathBuf>) -> CliResult<Self> {
        let origin = origin.into();
        let mut manifest: Self = serde_yaml_ng::from_str(yaml)
            .map_err(|e| CliError::manifest(&origin, e.to_string()))?;
        for spec in &manifest.probes {
            spec.check_fields(&origin)?;
        }
        manifest.origin = origin;
        Ok(manifest)
    }

    /// Load a manifest file
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Manifest`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> CliResult<Self> {
        let text =
            std::fs::read_to_string(path).map_err(|e| CliError::manifest(path, e.to_string()))?;
        Self::parse(&text, path)
    }

    /// Where the manifest came from
    #[must_use]
    pub fn origin(&self) -> &Path {
        &self.origin
    }

    /// Build a registry of command probes
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Manifest`] for an unknown category, an empty
    /// command, an empty id or a duplicate id.
    pub fn to_registry(&self) -> CliResult<ProbeRegistry> {
        let mut registry = ProbeRegistry::new();
        for spec in &self.probes {
            let probe = spec.to_probe(&self.origin)?;
            registry
                .register(probe)
                .map_err(|e| CliError::manifest(&self.origin, e.to_string()))?;
        }
        tracing::debug!(
            manifest = %self.origin.display(),
            probes = registry.len(),
            "manifest loaded"
        );
        Ok(registry)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
probes:
  - id: nodes-ready
    name: All nodes Ready
    description: Every node reports Ready
    category: node
    command: [kubectl, get, nodes]
    references: [https://kubernetes.io/docs/concepts/architecture/nodes/]
    on_failure:
      status: critical
      disposition: change-required
      message: "kubectl exited with {code}"
      recommendations: [Describe NotReady nodes]
    exit_codes:
      2: { status: unknown, message: Cluster unreachable }
  - id: dns
    category: Networking
    command: [nslookup, kubernetes.default]
"#;

    mod parse_tests {
        use super::*;

        #[test]
        fn test_parse_sample() {
            let manifest = Manifest::parse(SAMPLE, "probes.yaml").unwrap();
            assert_eq!(manifest.probes.len(), 2);
            assert_eq!(manifest.origin(), Path::new("probes.yaml"));

            let nodes = &manifest.probes[0];
            assert_eq!(nodes.command, vec!["kubectl", "get", "nodes"]);
            assert_eq!(nodes.expectations.on_failure.status, Status::Critical);
            assert_eq!(
                nodes.expectations.on_failure.disposition,
                Some(Disposition::ChangeRequired)
            );
            assert_eq!(nodes.expectations.exit_codes[&2].status, Status::Unknown);
        }

        #[test]
        fn test_defaults_apply() {
            let manifest = Manifest::parse(SAMPLE, "probes.yaml").unwrap();
            let dns = &manifest.probes[1];
            assert_eq!(dns.expectations, Expectations::default());
            assert!(dns.references.is_empty());
        }

        #[test]
        fn test_misspelled_key_is_rejected() {
            let yaml = "probes:\n  - id: quota\n    category: apps\n    command: [ls]\n    \
                        on_fail:\n      status: critical\n";
            let err = Manifest::parse(yaml, "probes.yaml").unwrap_err();
            assert!(matches!(err, CliError::Manifest { .. }));
            assert!(err.to_string().contains("probe 'quota': unknown field(s) on_fail"));
        }

        #[test]
        fn test_expectation_keys_are_not_unknown() {
            let manifest = Manifest::parse(SAMPLE, "probes.yaml").unwrap();
            assert!(manifest.probes.iter().all(|p| p.unknown.is_empty()));
        }

        #[test]
        fn test_empty_document_has_no_probes() {
            let manifest = Manifest::parse("probes: []", "empty.yaml").unwrap();
            assert!(manifest.probes.is_empty());
        }

        #[test]
        fn test_malformed_yaml_names_file() {
            let err = Manifest::parse("probes: [", "broken.yaml").unwrap_err();
            assert!(matches!(err, CliError::Manifest { .. }));
            assert!(err.to_string().contains("broken.yaml"));
        }

        #[test]
        fn test_missing_file() {
            let err = Manifest::load(Path::new("/nonexistent/probes.yaml")).unwrap_err();
            assert!(matches!(err, CliError::Manifest { .. }));
        }

        #[test]
        fn test_load_from_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("probes.yaml");
            std::fs::write(&path, SAMPLE).unwrap();
            let manifest = Manifest::load(&path).unwrap();
            assert_eq!(manifest.probes.len(), 2);
        }
    }

    mod registry_tests {
        use super::*;

        #[test]
        fn test_registry_resolves_aliases_and_names() {
            let registry = Manifest::parse(SAMPLE, "probes.yaml")
                .unwrap()
                .to_registry()
                .unwrap();
            let ids: Vec<_> = registry.iter().map(|p| p.info.id.clone()).collect();
            assert_eq!(ids, vec!["nodes-ready", "dns"]);

            let nodes = registry.get("nodes-ready").unwrap();
            assert_eq!(nodes.info.category, Category::Nodes);
            assert_eq!(nodes.info.references.len(), 1);

            let dns = registry.get("dns").unwrap();
            assert_eq!(dns.info.category, Category::Networking);
            assert_eq!(dns.info.name, "dns");
        }

        #[test]
        fn test_unknown_category_rejected() {
            let yaml = "probes:\n  - id: x\n    category: plumbing\n    command: [ls]\n";
            let err = Manifest::parse(yaml, "m.yaml").unwrap().to_registry().unwrap_err();
            assert!(err.to_string().contains("unknown category 'plumbing'"));
        }

        #[test]
        fn test_empty_command_rejected() {
            let yaml = "probes:\n  - id: x\n    category: nodes\n    command: []\n";
            let err = Manifest::parse(yaml, "m.yaml").unwrap().to_registry().unwrap_err();
            assert!(err.to_string().contains("command is empty"));
        }

        #[test]
        fn test_duplicate_id_rejected() {
            let yaml = "probes:\n  - id: x\n    category: nodes\n    command: [a]\n  - id: x\n    category: storage\n    command: [b]\n";
            let err = Manifest::parse(yaml, "m.yaml").unwrap().to_registry().unwrap_err();
            assert!(matches!(err, CliError::Manifest { .. }));
            assert!(err.to_string().contains("Duplicate probe id: x"));
        }
    }

    mod verdict_tests {
        use super::*;

        #[test]
        fn test_exit_code_selection() {
            let manifest = Manifest::parse(SAMPLE, "probes.yaml").unwrap();
            let expectations = &manifest.probes[0].expectations;
            assert_eq!(expectations.verdict_for(0).status, Status::Ok);
            assert_eq!(expectations.verdict_for(1).status, Status::Critical);
            assert_eq!(expectations.verdict_for(2).status, Status::Unknown);
        }

        #[test]
        fn test_outcome_substitutes_code() {
            let verdict = Verdict::default_failure();
            let outcome = verdict.outcome(7);
            assert_eq!(outcome.message, "Command exited with status 7");
            assert_eq!(outcome.status, Status::Warning);
            assert_eq!(outcome.disposition, Disposition::PendingEvaluation);
        }

        #[test]
        fn test_outcome_keeps_explicit_disposition() {
            let mut verdict = Verdict::new(Status::Warning, "advisory only");
            verdict.disposition = Some(Disposition::Advisory);
            verdict.recommendations.push("Consider it".to_string());
            let outcome = verdict.outcome(1);
            assert_eq!(outcome.disposition, Disposition::Advisory);
            assert_eq!(outcome.recommendations, vec!["Consider it"]);
        }
    }
}
