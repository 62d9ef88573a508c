//! Probe categories and the alias table that folds legacy names onto them.
//!
//! Category strings arrive from manifests, CLI flags and older report
//! tooling in many spellings ("Cluster Configuration", "net", "apps").
//! They are resolved exactly once, at filter or registration time, into the
//! closed [`Category`] enum; nothing downstream compares category strings.

use crate::result::{ClusterProbeError, ClusterProbeResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Operational domain a probe belongs to.
///
/// Declaration order is the order categories appear in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Control plane and cluster-wide configuration
    ClusterConfig,
    /// Node health and capacity
    Nodes,
    /// Networking, ingress and DNS
    Networking,
    /// Persistent storage and volumes
    Storage,
    /// RBAC, policies and secrets handling
    Security,
    /// Workloads running on the cluster
    Applications,
    /// Monitoring, logging and alerting stack
    Observability,
}

/// Legacy and alternate spellings, matched case-insensitively.
///
/// Canonical keys and display labels resolve through [`Category::ALL`] and
/// do not need to be listed here.
const CATEGORY_ALIASES: &[(&str, Category)] = &[
    ("cluster", Category::ClusterConfig),
    ("config", Category::ClusterConfig),
    ("configuration", Category::ClusterConfig),
    ("cluster configuration", Category::ClusterConfig),
    ("cluster-configuration", Category::ClusterConfig),
    ("control-plane", Category::ClusterConfig),
    ("control plane", Category::ClusterConfig),
    ("infrastructure", Category::Nodes),
    ("node", Category::Nodes),
    ("compute", Category::Nodes),
    ("network", Category::Networking),
    ("net", Category::Networking),
    ("network & connectivity", Category::Networking),
    ("connectivity", Category::Networking),
    ("ingress", Category::Networking),
    ("dns", Category::Networking),
    ("volumes", Category::Storage),
    ("persistence", Category::Storage),
    ("sec", Category::Security),
    ("rbac", Category::Security),
    ("security & compliance", Category::Security),
    ("compliance", Category::Security),
    ("apps", Category::Applications),
    ("application", Category::Applications),
    ("workloads", Category::Applications),
    ("workload", Category::Applications),
    ("monitoring", Category::Observability),
    ("logging", Category::Observability),
    ("monitoring & logging", Category::Observability),
    ("metrics", Category::Observability),
];

impl Category {
    /// Every category, in report order
    pub const ALL: [Self; 7] = [
        Self::ClusterConfig,
        Self::Nodes,
        Self::Networking,
        Self::Storage,
        Self::Security,
        Self::Applications,
        Self::Observability,
    ];

    /// Canonical machine key (matches the serde representation)
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::ClusterConfig => "cluster-config",
            Self::Nodes => "nodes",
            Self::Networking => "networking",
            Self::Storage => "storage",
            Self::Security => "security",
            Self::Applications => "applications",
            Self::Observability => "observability",
        }
    }

    /// Human-readable label used as a report section heading
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ClusterConfig => "Cluster Configuration",
            Self::Nodes => "Nodes",
            Self::Networking => "Networking",
            Self::Storage => "Storage",
            Self::Security => "Security",
            Self::Applications => "Applications",
            Self::Observability => "Observability",
        }
    }

    /// Resolve any known spelling to its canonical category
    #[must_use]
    pub fn resolve(name: &str) -> Option<Self> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        Self::ALL
            .into_iter()
            .find(|c| c.key() == needle || c.label().to_lowercase() == needle)
            .or_else(|| {
                CATEGORY_ALIASES
                    .iter()
                    .find(|(alias, _)| *alias == needle)
                    .map(|(_, category)| *category)
            })
    }

    /// The alias table, for `clusterprobe categories`
    #[must_use]
    pub fn aliases(self) -> Vec<&'static str> {
        CATEGORY_ALIASES
            .iter()
            .filter(|(_, c)| *c == self)
            .map(|(alias, _)| *alias)
            .collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = ClusterProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::resolve(s).ok_or_else(|| ClusterProbeError::UnknownCategory {
            name: s.to_string(),
        })
    }
}

/// Set of categories a run is restricted to. Empty means "everything".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryFilter {
    selected: BTreeSet<Category>,
}

impl CategoryFilter {
    /// Filter that accepts every category
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a filter from user-supplied names, resolving aliases.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterProbeError::UnknownCategory`] for a name with no mapping.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> ClusterProbeResult<Self> {
        let mut selected = BTreeSet::new();
        for name in names {
            let name = name.as_ref();
            if name.trim().is_empty() {
                continue;
            }
            selected.insert(name.parse::<Category>()?);
        }
        Ok(Self { selected })
    }

    /// Whether this filter lets everything through
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.selected.is_empty()
    }

    /// Check a category against the filter
    #[must_use]
    pub fn matches(&self, category: Category) -> bool {
        self.selected.is_empty() || self.selected.contains(&category)
    }

    /// Selected categories, in report order
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.selected.iter().copied()
    }
}
