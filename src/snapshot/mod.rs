//! Snapshot loading.
//!
//! A workdir (or a zip archive of one) holds one folder per origin, one
//! folder per environment inside it, and one JSON snapshot per unit:
//!
//! ```text
//! workdir/
//! ├── source/dev/<unit>.json
//! └── destination/prod/<unit>.json
//! ```
//!
//! Loading produces one [`ComparisonStructure`] per origin. Snapshot
//! documents themselves are read lazily, one unit pair at a time, with
//! [`read_snapshot`].

mod archive;
mod document;
mod loader;

pub use archive::{extract_archive, extraction_target, is_archive};
pub use document::{value_to_id, DevBranch, KeyDocument, ProjectStorage, StorageDocument};
pub use loader::{ensure_matching_units, load_structures, resolve_workdir};

use crate::error::{ErrorContext, Result, StructureDiffError};
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// File extension of snapshot documents.
pub const SNAPSHOT_EXTENSION: &str = "json";

/// Which side of the comparison a unit belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    Source,
    Destination,
}

impl Origin {
    /// Folder name of this origin inside a workdir.
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Destination => "destination",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// One comparable unit (a project snapshot file).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitFile {
    /// Stable id derived from the file stem
    pub unit_id: String,
    pub path: PathBuf,
}

impl UnitFile {
    #[must_use]
    pub fn new(unit_id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            unit_id: unit_id.into(),
            path: path.into(),
        }
    }
}

/// All units discovered under one origin.
#[derive(Debug, Clone)]
pub struct ComparisonStructure {
    pub origin: Origin,
    /// Name of the first environment folder seen under the origin
    pub environment: Option<String>,
    /// Units in discovery order
    pub units: Vec<UnitFile>,
}

impl ComparisonStructure {
    #[must_use]
    pub const fn new(origin: Origin) -> Self {
        Self {
            origin,
            environment: None,
            units: Vec::new(),
        }
    }

    /// Environment name, empty when no environment folder was found.
    #[must_use]
    pub fn environment_name(&self) -> &str {
        self.environment.as_deref().unwrap_or_default()
    }

    /// Set of unit ids in this structure.
    #[must_use]
    pub fn unit_ids(&self) -> BTreeSet<&str> {
        self.units.iter().map(|u| u.unit_id.as_str()).collect()
    }

    /// Look up a unit by id.
    #[must_use]
    pub fn unit(&self, unit_id: &str) -> Option<&UnitFile> {
        self.units.iter().find(|u| u.unit_id == unit_id)
    }
}

/// A parsed snapshot document together with a hash of its raw bytes.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    pub unit_id: String,
    pub document: T,
    /// xxh3 of the file content; equal hashes mean identical documents
    pub content_hash: u64,
}

impl<T> Snapshot<T> {
    /// Whether both snapshots were read from byte-identical files.
    #[must_use]
    pub const fn same_content(&self, other: &Self) -> bool {
        self.content_hash == other.content_hash
    }
}

/// Read and parse the snapshot document of `unit`.
pub fn read_snapshot<T: DeserializeOwned>(unit: &UnitFile) -> Result<Snapshot<T>> {
    let raw = read_file(&unit.path)?;
    let document = serde_json::from_slice(&raw)
        .with_context(|| format!("parsing snapshot {}", unit.path.display()))?;
    Ok(Snapshot {
        unit_id: unit.unit_id.clone(),
        document,
        content_hash: xxhash_rust::xxh3::xxh3_64(&raw),
    })
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| StructureDiffError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_snapshot_hashes_content() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let a = dir.path().join("a.json");
        let b = dir.path().join("b.json");
        std::fs::write(&a, r#"["X","Y"]"#).expect("write");
        std::fs::write(&b, r#"["X","Y"]"#).expect("write");

        let sa: Snapshot<KeyDocument> = read_snapshot(&UnitFile::new("a", &a)).expect("read a");
        let sb: Snapshot<KeyDocument> = read_snapshot(&UnitFile::new("b", &b)).expect("read b");
        assert_eq!(sa.document, vec!["X", "Y"]);
        assert!(sa.same_content(&sb));
    }

    #[test]
    fn test_read_snapshot_rejects_malformed_json() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("p1.json");
        std::fs::write(&path, "{oops").expect("write");

        let err = read_snapshot::<StorageDocument>(&UnitFile::new("p1", &path)).unwrap_err();
        match err {
            StructureDiffError::Load { context, .. } => {
                assert!(context.contains("p1.json"), "{context}");
            }
            other => panic!("Expected Load error, got {other}"),
        }
    }

    #[test]
    fn test_structure_lookup() {
        let mut structure = ComparisonStructure::new(Origin::Source);
        structure.units.push(UnitFile::new("p1", "/x/p1.json"));
        assert_eq!(structure.environment_name(), "");
        assert!(structure.unit("p1").is_some());
        assert!(structure.unit("p2").is_none());
        assert_eq!(Origin::Destination.to_string(), "destination");
    }
}
