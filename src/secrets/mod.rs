//! Secure-value scanning of exported configuration trees.
//!
//! Configuration JSON stores secrets under keys starting with `#`. Values
//! that still carry a platform encryption prefix were never moved to the
//! vault and cannot be migrated between projects; any other value is taken
//! to be a vault reference.
//!
//! Findings are collected into a [`SecretScan`] owned by the caller, one per
//! scan. Secret values themselves are never stored.

use crate::error::{Result, StructureDiffError};
use crate::snapshot::SNAPSHOT_EXTENSION;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Prefixes of values encrypted by the platform.
pub const ENCRYPTED_PREFIXES: &[&str] = &[
    "KBC::ComponentSecure::",
    "KBC::ProjectSecure::",
    "KBC::ConfigSecure::",
];

/// Marker prefix of secure keys.
pub const SECURE_KEY_PREFIX: char = '#';

/// How a secure value is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SecretKind {
    /// Encrypted in place; not portable
    Encrypted,
    /// Anything else, expected to resolve through the vault
    VaultReference,
}

impl SecretKind {
    /// Classify a secure value by its prefix.
    #[must_use]
    pub fn classify(value: &str) -> Self {
        if ENCRYPTED_PREFIXES.iter().any(|p| value.starts_with(p)) {
            Self::Encrypted
        } else {
            Self::VaultReference
        }
    }
}

/// One secure key found in a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecretFinding {
    pub file: PathBuf,
    /// JSON path of the key, e.g. `parameters.#token` or `rows[0].#password`
    pub key: String,
    pub kind: SecretKind,
}

/// A file that could not be scanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub file: PathBuf,
    pub reason: String,
}

/// Accumulator for one scan invocation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SecretScan {
    pub findings: Vec<SecretFinding>,
    pub skipped: Vec<SkippedFile>,
    pub files_scanned: usize,
}

impl SecretScan {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan one parsed JSON document.
    pub fn scan_value(&mut self, file: &Path, value: &Value) {
        self.files_scanned += 1;
        self.walk(file, value, "");
    }

    /// Read and scan one file. Unreadable or invalid files are recorded as skipped.
    pub fn scan_file(&mut self, file: &Path) {
        let parsed = std::fs::read(file)
            .map_err(|e| e.to_string())
            .and_then(|bytes| serde_json::from_slice::<Value>(&bytes).map_err(|e| e.to_string()));
        match parsed {
            Ok(value) => self.scan_value(file, &value),
            Err(reason) => {
                tracing::warn!("Invalid JSON or encoding: {} ({})", file.display(), reason);
                self.skipped.push(SkippedFile {
                    file: file.to_path_buf(),
                    reason,
                });
            }
        }
    }

    /// Findings whose value is still encrypted.
    pub fn encrypted(&self) -> impl Iterator<Item = &SecretFinding> {
        self.findings
            .iter()
            .filter(|f| f.kind == SecretKind::Encrypted)
    }

    #[must_use]
    pub fn has_encrypted(&self) -> bool {
        self.encrypted().next().is_some()
    }

    fn walk(&mut self, file: &Path, value: &Value, path: &str) {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    let child_path = if path.is_empty() {
                        key.clone()
                    } else {
                        format!("{path}.{key}")
                    };
                    if key.starts_with(SECURE_KEY_PREFIX) {
                        // Non-string secure values are rejected upstream; only strings are classified.
                        if let Value::String(secret) = child {
                            self.findings.push(SecretFinding {
                                file: file.to_path_buf(),
                                key: child_path.clone(),
                                kind: SecretKind::classify(secret),
                            });
                        }
                    }
                    self.walk(file, child, &child_path);
                }
            }
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    self.walk(file, item, &format!("{path}[{i}]"));
                }
            }
            _ => {}
        }
    }
}

/// Scan every `*.json` file below `dir`, in file name order.
pub fn scan_directory(dir: &Path) -> Result<SecretScan> {
    if !dir.is_dir() {
        return Err(StructureDiffError::not_found(dir));
    }
    tracing::info!("Checking JSON keys and values in {}", dir.display());

    let mut files = Vec::new();
    collect_json_files(dir, &mut files);
    files.sort();

    let mut scan = SecretScan::new();
    for file in &files {
        scan.scan_file(file);
    }
    tracing::debug!(
        "Scanned {} file(s), {} secure key(s), {} skipped",
        scan.files_scanned,
        scan.findings.len(),
        scan.skipped.len()
    );
    Ok(scan)
}

fn collect_json_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            tracing::warn!("Cannot read directory {}: {}", dir.display(), e);
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_json_files(&path, out);
        } else if path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == SNAPSHOT_EXTENSION)
        {
            out.push(path);
        }
    }
}
