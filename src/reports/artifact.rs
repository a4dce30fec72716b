//! Intermediate per-unit-pair diff artifacts (`{source}_vs_{destination}.json`).
//!
//! Rendering always goes through the artifact: the diff is written, read
//! back, and only then rendered.

use crate::error::{ReportErrorKind, Result, StructureDiffError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

const INDENT: &[u8] = b"    ";

/// File name of the artifact for one unit pair.
#[must_use]
pub fn artifact_name(source_unit: &str, destination_unit: &str) -> String {
    format!("{source_unit}_vs_{destination_unit}.json")
}

/// Serialize `diff` as pretty JSON into `dir`, returning the written path.
pub fn write_artifact<T: Serialize + ?Sized>(
    dir: &Path,
    source_unit: &str,
    destination_unit: &str,
    diff: &T,
) -> Result<PathBuf> {
    let path = dir.join(artifact_name(source_unit, destination_unit));
    let bytes = to_pretty_json(diff).map_err(|e| {
        StructureDiffError::report(
            format!("serializing {}", path.display()),
            ReportErrorKind::Serialization(e.to_string()),
        )
    })?;
    std::fs::write(&path, bytes).map_err(|e| StructureDiffError::io(&path, e))?;
    tracing::debug!("Diff artifact written to {}", path.display());
    Ok(path)
}

/// Read an artifact written by [`write_artifact`].
pub fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = std::fs::read(path).map_err(|e| StructureDiffError::io(path, e))?;
    serde_json::from_slice(&bytes).map_err(|e| {
        StructureDiffError::report(
            format!("reading {}", path.display()),
            ReportErrorKind::Serialization(e.to_string()),
        )
    })
}

fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    Ok(out)
}
