//! Pipeline orchestration for structure comparisons.
//!
//! One run is Loader → Normalizer → Diff → Renderer, executed once per unit
//! pair in source discovery order:
//!
//! 1. resolve the workdir (extracting archives), discover both origins and
//!    check that they hold the same units
//! 2. per unit: read both snapshots, normalize, compare, write the
//!    `{src}_vs_{dst}.json` artifact, read it back and render a section
//! 3. write the assembled report once
//!
//! A failure anywhere aborts the run; no partial report is written.

mod output;
mod storage;
mod vault;

pub use output::{ensure_output_dir, write_report};
pub use storage::{run_storage_comparison, StorageComparison};
pub use vault::{run_vault_comparison, VaultComparison};

use crate::config::AppConfig;
use crate::error::{ErrorContext, OptionContext, Result};
use crate::reports::{comparison_title, read_artifact, write_artifact, ReportDocument};
use crate::snapshot::{
    ensure_matching_units, load_structures, read_snapshot, resolve_workdir, ComparisonStructure,
    Snapshot,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Success: report written, or no encrypted secrets found
    pub const SUCCESS: i32 = 0;
    /// `scan-secrets` found encrypted values
    pub const SECRETS_FOUND: i32 = 1;
}

/// One comparator plugged into [`run_comparison`].
pub trait Comparison {
    /// Raw snapshot document.
    type Document: DeserializeOwned;
    /// Per-unit diff, persisted as the intermediate artifact.
    type Diff: Serialize + DeserializeOwned;

    /// Report title prefix, e.g. `Storage`.
    fn kind(&self) -> &'static str;

    /// Where the final report is written.
    fn report_path(&self, config: &AppConfig) -> PathBuf;

    /// Heading of one unit-pair section.
    fn section_heading(&self, source_unit: &str, destination_unit: &str) -> String;

    /// Normalize and compare two snapshots.
    fn diff(
        &self,
        source: &Snapshot<Self::Document>,
        destination: &Snapshot<Self::Document>,
    ) -> Result<Self::Diff>;

    /// Diff of two byte-identical snapshots.
    ///
    /// Overrides may skip the comparison but must still reject documents
    /// that [`Comparison::diff`] would reject.
    fn identical(&self, snapshot: &Snapshot<Self::Document>) -> Result<Self::Diff> {
        self.diff(snapshot, snapshot)
    }

    /// Whether a diff reports any change.
    fn has_changes(&self, diff: &Self::Diff) -> bool;

    /// Render one section body.
    fn render(
        &self,
        diff: &Self::Diff,
        source: &ComparisonStructure,
        destination: &ComparisonStructure,
    ) -> String;
}

/// Outcome of one comparison run.
#[derive(Debug, Clone)]
pub struct ComparisonRun {
    /// The written report
    pub report_path: PathBuf,
    /// Intermediate artifacts, one per unit pair
    pub artifacts: Vec<PathBuf>,
    /// Number of compared unit pairs
    pub units: usize,
    /// Unit pairs with at least one change
    pub changed_units: usize,
}

impl ComparisonRun {
    #[must_use]
    pub const fn has_changes(&self) -> bool {
        self.changed_units > 0
    }
}

/// Run `comparison` over the workdir (directory or archive).
pub fn run_comparison<C: Comparison>(
    comparison: &C,
    workdir: &Path,
    config: &AppConfig,
) -> Result<ComparisonRun> {
    tracing::info!(
        "{} comparison running, structure folder: '{}'",
        comparison.kind(),
        workdir.display()
    );
    let root = resolve_workdir(workdir)?;
    let (source, destination) = load_structures(&root)?;
    ensure_matching_units(&source, &destination)?;

    let output_dir = &config.output.dir;
    ensure_output_dir(output_dir)?;

    let mut document = ReportDocument::new(&comparison_title(
        comparison.kind(),
        source.environment_name(),
        destination.environment_name(),
    ));
    let mut run = ComparisonRun {
        report_path: comparison.report_path(config),
        artifacts: Vec::with_capacity(source.units.len()),
        units: 0,
        changed_units: 0,
    };

    for source_unit in &source.units {
        let unit_id = source_unit.unit_id.as_str();
        let destination_unit = destination
            .unit(unit_id)
            .with_context_none(|| format!("unit '{unit_id}' missing in destination"))?;
        tracing::info!(
            "Comparing project {} vs {}",
            source_unit.unit_id,
            destination_unit.unit_id
        );

        let source_snapshot: Snapshot<C::Document> = read_snapshot(source_unit)
            .with_context(|| format!("loading source unit '{unit_id}'"))?;
        let destination_snapshot: Snapshot<C::Document> = read_snapshot(destination_unit)
            .with_context(|| format!("loading destination unit '{unit_id}'"))?;

        let diff = if source_snapshot.same_content(&destination_snapshot) {
            tracing::debug!("Snapshots of '{}' are byte-identical", unit_id);
            comparison
                .identical(&source_snapshot)
                .with_context(|| format!("comparing unit '{unit_id}'"))?
        } else {
            comparison
                .diff(&source_snapshot, &destination_snapshot)
                .with_context(|| format!("comparing unit '{unit_id}'"))?
        };

        let artifact = write_artifact(
            output_dir,
            &source_unit.unit_id,
            &destination_unit.unit_id,
            &diff,
        )?;
        tracing::info!("Translating diff file {} to plain text", artifact.display());
        let restored: C::Diff = read_artifact(&artifact)?;

        if comparison.has_changes(&restored) {
            run.changed_units += 1;
        }
        document.push_section(
            &comparison.section_heading(&source_unit.unit_id, &destination_unit.unit_id),
            &comparison.render(&restored, &source, &destination),
        );
        run.artifacts.push(artifact);
        run.units += 1;
    }

    write_report(&run.report_path, &document.finish())?;
    Ok(run)
}
