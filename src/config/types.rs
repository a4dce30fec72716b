//! Configuration types for structure-diff.

use crate::diff::LinkProject;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default report file of the storage comparison.
pub const DEFAULT_STORAGE_REPORT: &str = "Storage_report.txt";

/// Default report file of the vault comparison.
pub const DEFAULT_VAULT_REPORT: &str = "Vault_report.txt";

/// Application configuration.
///
/// Every section has defaults, so an empty file (or no file) is valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Where reports and intermediate artifacts go
    pub output: OutputConfig,
    /// Storage comparator options
    pub storage: StorageConfig,
    /// Behavior flags
    pub behavior: BehaviorConfig,
}

impl AppConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Full path of the storage report.
    #[must_use]
    pub fn storage_report_path(&self) -> PathBuf {
        self.output.dir.join(&self.output.storage_report)
    }

    /// Full path of the vault report.
    #[must_use]
    pub fn vault_report_path(&self) -> PathBuf {
        self.output.dir.join(&self.output.vault_report)
    }
}

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Directory for reports and artifacts.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output.dir = dir.into();
        self
    }

    pub fn storage_report(mut self, name: impl Into<String>) -> Self {
        self.config.output.storage_report = name.into();
        self
    }

    pub fn vault_report(mut self, name: impl Into<String>) -> Self {
        self.config.output.vault_report = name.into();
        self
    }

    /// Toggle the default-branch filter.
    pub const fn default_branch_only(mut self, enabled: bool) -> Self {
        self.config.storage.default_branch_only = enabled;
        self
    }

    pub const fn link_project(mut self, link_project: LinkProject) -> Self {
        self.config.storage.link_project = link_project;
        self
    }

    /// Enable quiet mode.
    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.config.behavior.quiet = quiet;
        self
    }

    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

/// Output locations.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving `*_vs_*.json` artifacts and the reports
    pub dir: PathBuf,
    /// File name of the storage report
    pub storage_report: String,
    /// File name of the vault report
    pub vault_report: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            storage_report: DEFAULT_STORAGE_REPORT.to_string(),
            vault_report: DEFAULT_VAULT_REPORT.to_string(),
        }
    }
}

/// Storage comparator options.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct StorageConfig {
    /// Drop buckets and tables created on non-default development branches
    pub default_branch_only: bool,
    /// Which project id is used in links of removed resources
    pub link_project: LinkProject,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            default_branch_only: true,
            link_project: LinkProject::Source,
        }
    }
}

/// Behavior flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Suppress non-essential output
    pub quiet: bool,
}
