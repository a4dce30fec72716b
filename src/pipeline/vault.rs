//! Vault key comparison.

use super::{run_comparison, Comparison, ComparisonRun};
use crate::config::AppConfig;
use crate::diff::{KeyDiff, KeyDiffEngine};
use crate::error::Result;
use crate::normalize::{KeyNormalizer, Normalizer};
use crate::reports::{KeyPresenceRenderer, SectionRenderer};
use crate::snapshot::{ComparisonStructure, KeyDocument, Snapshot};
use std::path::{Path, PathBuf};

/// Vault variable names of each project.
#[derive(Debug, Clone, Copy, Default)]
pub struct VaultComparison {
    normalizer: KeyNormalizer,
    engine: KeyDiffEngine,
}

impl VaultComparison {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            normalizer: KeyNormalizer::new(),
            engine: KeyDiffEngine::new(),
        }
    }
}

impl Comparison for VaultComparison {
    type Document = KeyDocument;
    type Diff = KeyDiff;

    fn kind(&self) -> &'static str {
        "Vault"
    }

    fn report_path(&self, config: &AppConfig) -> PathBuf {
        config.vault_report_path()
    }

    fn section_heading(&self, source_unit: &str, destination_unit: &str) -> String {
        format!("Source project '{source_unit}' vs Destination project '{destination_unit}'")
    }

    fn diff(
        &self,
        source: &Snapshot<KeyDocument>,
        destination: &Snapshot<KeyDocument>,
    ) -> Result<KeyDiff> {
        let source = self.normalizer.normalize(&source.document)?;
        let destination = self.normalizer.normalize(&destination.document)?;
        Ok(self.engine.compare(&source, &destination))
    }

    fn has_changes(&self, diff: &KeyDiff) -> bool {
        !diff.is_unchanged()
    }

    fn render(
        &self,
        diff: &KeyDiff,
        source: &ComparisonStructure,
        destination: &ComparisonStructure,
    ) -> String {
        KeyPresenceRenderer::new(source.environment_name(), destination.environment_name())
            .render(diff)
    }
}

/// Compare the vault snapshots under `workdir` and write the vault report.
pub fn run_vault_comparison(workdir: &Path, config: &AppConfig) -> Result<ComparisonRun> {
    run_comparison(&VaultComparison::new(), workdir, config)
}
