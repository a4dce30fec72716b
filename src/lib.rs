//! **Structural diff of project storage and vault snapshots across environments.**
//!
//! `structure-diff` compares point-in-time JSON snapshots of a project's
//! storage layout (buckets, tables, columns) or of its vault variable names
//! between a *source* and a *destination* environment, and renders the
//! differences as a stable plain-text report. It is meant to run in CI/CD
//! before structures are promoted from one environment to the next.
//!
//! ## Core Concepts & Modules
//!
//! - **[`snapshot`]**: discovers `source/<env>/<unit>.json` and
//!   `destination/<env>/<unit>.json` in a workdir (or a zip archive of one)
//!   and reads snapshot documents.
//! - **[`normalize`]**: projects raw records onto allow-listed fields so
//!   volatile metadata never shows up as a difference.
//! - **[`diff`]**: the [`StorageDiffEngine`] and [`KeyDiffEngine`], both
//!   driven by one generic reconcile primitive.
//! - **[`reports`]**: section renderers, report assembly and the
//!   intermediate `{src}_vs_{dst}.json` artifacts.
//! - **[`pipeline`]**: runs Loader → Normalizer → Diff → Renderer for every
//!   unit pair and writes the report.
//! - **[`secrets`]**: scans exported configuration trees for secure values
//!   that were never moved to the vault.
//!
//! ## Getting Started
//!
//! ```no_run
//! use std::path::Path;
//! use structure_diff::{run_storage_comparison, AppConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::builder().output_dir("reports").build();
//!     let run = run_storage_comparison(Path::new("workdir.zip"), &config)?;
//!
//!     println!(
//!         "Compared {} project(s), {} changed; report at {}",
//!         run.units,
//!         run.changed_units,
//!         run.report_path.display()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ### Comparing two snapshots in memory
//!
//! ```no_run
//! use structure_diff::normalize::{Normalizer, StorageNormalizer};
//! use structure_diff::snapshot::StorageDocument;
//! use structure_diff::StorageDiffEngine;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source: StorageDocument = serde_json::from_str(&std::fs::read_to_string("dev.json")?)?;
//!     let destination: StorageDocument = serde_json::from_str(&std::fs::read_to_string("prod.json")?)?;
//!
//!     let normalizer = StorageNormalizer::new();
//!     let events = StorageDiffEngine::new().compare(
//!         &normalizer.normalize(&source)?,
//!         &normalizer.normalize(&destination)?,
//!     );
//!     for event in &events {
//!         println!("{} {}", event.kind(), event.resource_id().unwrap_or("-"));
//!     }
//!     Ok(())
//! }
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    // Doc completeness: # Errors / # Panics sections are not written per function
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    // `source`/`destination` pairs read clearly in context
    clippy::similar_names
)]

pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod reports;
pub mod secrets;
pub mod snapshot;

// Re-export main types for convenience
pub use config::{AppConfig, AppConfigBuilder, BehaviorConfig, OutputConfig, StorageConfig};
pub use config::{ConfigError, Validatable};
pub use diff::{ChangeEvent, KeyDiff, KeyDiffEngine, LinkProject, StorageDiffEngine};
pub use error::{ErrorContext, OptionContext, Result, StructureDiffError};
pub use model::{KeySet, NormalizedBucket, NormalizedTable, StorageStructure};
pub use normalize::{KeyNormalizer, Normalizer, StorageNormalizer};
pub use pipeline::{run_storage_comparison, run_vault_comparison, ComparisonRun};
pub use reports::{ReportDocument, SectionRenderer};
pub use secrets::{scan_directory, SecretScan};
pub use snapshot::{ComparisonStructure, Origin, UnitFile};
