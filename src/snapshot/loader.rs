//! Workdir discovery: `<root>/<origin>/<environment>/<unit>.json`.

use super::archive::{extract_archive, is_archive};
use super::{ComparisonStructure, Origin, UnitFile, SNAPSHOT_EXTENSION};
use crate::error::{LoadErrorKind, Result, StructureDiffError};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Resolve the workdir argument to a directory holding the origin folders.
///
/// Archives are extracted first. A missing path is a [`LoadErrorKind::NotFound`];
/// any other file is a [`LoadErrorKind::UnexpectedShape`].
pub fn resolve_workdir(workdir: &Path) -> Result<PathBuf> {
    if !workdir.exists() {
        return Err(StructureDiffError::not_found(workdir));
    }
    if is_archive(workdir) {
        return extract_archive(workdir);
    }
    if !workdir.is_dir() {
        return Err(StructureDiffError::unexpected_shape(
            format!("resolving workdir {}", workdir.display()),
            "workdir is neither a directory nor a zip archive",
        ));
    }
    Ok(workdir.to_path_buf())
}

/// Walk the `source` and `destination` folders of `root`.
///
/// Entries are visited in file name order so discovery order is stable
/// across filesystems and archive round-trips.
pub fn load_structures(root: &Path) -> Result<(ComparisonStructure, ComparisonStructure)> {
    let source = load_origin(root, Origin::Source)?;
    let destination = load_origin(root, Origin::Destination)?;
    tracing::info!(
        "Discovered {} source unit(s) in '{}' and {} destination unit(s) in '{}'",
        source.units.len(),
        source.environment_name(),
        destination.units.len(),
        destination.environment_name()
    );
    Ok((source, destination))
}

/// Fail unless both structures hold exactly the same unit ids.
pub fn ensure_matching_units(
    source: &ComparisonStructure,
    destination: &ComparisonStructure,
) -> Result<()> {
    let source_ids = source.unit_ids();
    let destination_ids = destination.unit_ids();
    if source_ids == destination_ids {
        return Ok(());
    }

    let missing_in_source: Vec<String> = destination_ids
        .difference(&source_ids)
        .map(|s| (*s).to_string())
        .collect();
    let missing_in_destination: Vec<String> = source_ids
        .difference(&destination_ids)
        .map(|s| (*s).to_string())
        .collect();
    Err(StructureDiffError::unit_mismatch(
        missing_in_source,
        missing_in_destination,
    ))
}

fn load_origin(root: &Path, origin: Origin) -> Result<ComparisonStructure> {
    let mut structure = ComparisonStructure::new(origin);
    let origin_dir = root.join(origin.dir_name());
    if !origin_dir.is_dir() {
        return Err(StructureDiffError::unexpected_shape(
            format!("loading {}", root.display()),
            format!("no '{}' folder in workdir", origin.dir_name()),
        ));
    }

    let mut seen: BTreeSet<String> = BTreeSet::new();
    for env_dir in sorted_entries(&origin_dir)?.into_iter().filter(|p| p.is_dir()) {
        let env = file_name(&env_dir);
        match &structure.environment {
            None => structure.environment = Some(env.clone()),
            Some(first) => tracing::warn!(
                "Multiple environments under '{}': using '{}' as the environment name, \
                 units from '{}' are still compared",
                origin.dir_name(),
                first,
                env
            ),
        }

        for file in sorted_entries(&env_dir)? {
            if !is_snapshot_file(&file) {
                continue;
            }
            let unit_id = file
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string();
            if !seen.insert(unit_id.clone()) {
                return Err(StructureDiffError::load(
                    format!("loading {}", env_dir.display()),
                    LoadErrorKind::DuplicateUnit {
                        origin: origin.dir_name().to_string(),
                        unit: unit_id,
                    },
                ));
            }
            tracing::debug!("{} unit '{}' at {}", origin, unit_id, file.display());
            structure.units.push(UnitFile::new(unit_id, file));
        }
    }

    Ok(structure)
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| StructureDiffError::io(dir, e))?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| StructureDiffError::io(dir, e))?;
        paths.push(entry.path());
    }
    paths.sort();
    Ok(paths)
}

fn is_snapshot_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == SNAPSHOT_EXTENSION)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string()
}
