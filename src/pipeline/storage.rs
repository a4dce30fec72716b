//! Storage structure comparison.

use super::{run_comparison, Comparison, ComparisonRun};
use crate::config::{AppConfig, StorageConfig};
use crate::diff::{ChangeEvent, StorageDiffEngine};
use crate::error::{ErrorContext, Result};
use crate::normalize::{Normalizer, StorageNormalizer};
use crate::reports::{SectionRenderer, StorageSectionRenderer};
use crate::model::StorageStructure;
use crate::snapshot::{ComparisonStructure, Snapshot, StorageDocument};
use std::path::{Path, PathBuf};

/// Buckets, tables and columns of each project.
#[derive(Debug, Clone, Default)]
pub struct StorageComparison {
    normalizer: StorageNormalizer,
    engine: StorageDiffEngine,
}

impl StorageComparison {
    #[must_use]
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            normalizer: StorageNormalizer::new().default_branch_only(config.default_branch_only),
            engine: StorageDiffEngine::new().link_project(config.link_project),
        }
    }

    /// Normalize one snapshot.
    ///
    /// Bare table arrays carry no project id; the unit id (the snapshot file
    /// stem) stands in for it so derived links still resolve.
    fn normalize(&self, snapshot: &Snapshot<StorageDocument>) -> Result<StorageStructure> {
        let mut structure = self.normalizer.normalize(&snapshot.document)?;
        if structure.project_id.is_none() {
            structure.project_id = Some(snapshot.unit_id.clone());
        }
        Ok(structure)
    }
}

impl Comparison for StorageComparison {
    type Document = StorageDocument;
    type Diff = Vec<ChangeEvent>;

    fn kind(&self) -> &'static str {
        "Storage"
    }

    fn report_path(&self, config: &AppConfig) -> PathBuf {
        config.storage_report_path()
    }

    fn section_heading(&self, source_unit: &str, destination_unit: &str) -> String {
        format!("Project '{source_unit}' vs Project '{destination_unit}'")
    }

    fn diff(
        &self,
        source: &Snapshot<StorageDocument>,
        destination: &Snapshot<StorageDocument>,
    ) -> Result<Vec<ChangeEvent>> {
        let source = self.normalize(source).context("normalizing source")?;
        let destination = self
            .normalize(destination)
            .context("normalizing destination")?;
        Ok(self.engine.compare(&source, &destination))
    }

    fn identical(&self, snapshot: &Snapshot<StorageDocument>) -> Result<Vec<ChangeEvent>> {
        self.normalize(snapshot).context("normalizing source")?;
        Ok(Vec::new())
    }

    fn has_changes(&self, diff: &Vec<ChangeEvent>) -> bool {
        !diff.is_empty()
    }

    fn render(
        &self,
        diff: &Vec<ChangeEvent>,
        _source: &ComparisonStructure,
        _destination: &ComparisonStructure,
    ) -> String {
        StorageSectionRenderer::new().render(diff)
    }
}

/// Compare the storage snapshots under `workdir` and write the storage report.
pub fn run_storage_comparison(workdir: &Path, config: &AppConfig) -> Result<ComparisonRun> {
    run_comparison(&StorageComparison::new(&config.storage), workdir, config)
}
