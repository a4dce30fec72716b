//! Zip archive handling for workdirs delivered as a single artifact.

use crate::error::{ErrorContext, Result, StructureDiffError};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Whether `path` names a zip archive rather than a directory.
#[must_use]
pub fn is_archive(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("zip"))
}

/// Directory an archive is extracted to: a sibling named after the part of
/// the file name before its first dot (`structure.tar.zip` → `structure`).
#[must_use]
pub fn extraction_target(archive: &Path) -> PathBuf {
    let file_name = archive
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let stem = file_name.split('.').next().unwrap_or(file_name);
    archive.with_file_name(stem)
}

/// Extract `archive` next to itself and return the extracted directory.
///
/// Extraction is skipped when the target directory already exists. The
/// directory is left on disk after the run.
pub fn extract_archive(archive: &Path) -> Result<PathBuf> {
    let target = extraction_target(archive);
    if target.exists() {
        tracing::info!(
            "Archive {} already extracted to {}",
            archive.display(),
            target.display()
        );
        return Ok(target);
    }

    tracing::info!("Extracting {} to {}", archive.display(), target.display());
    let file = File::open(archive).map_err(|e| StructureDiffError::io(archive, e))?;
    let mut zip = zip::ZipArchive::new(file)
        .with_context(|| format!("opening archive {}", archive.display()))?;
    std::fs::create_dir_all(&target).map_err(|e| StructureDiffError::io(&target, e))?;
    zip.extract(&target)
        .with_context(|| format!("extracting {}", archive.display()))?;
    tracing::debug!("Extracted {} entries", zip.len());

    Ok(target)
}
