//! Configuration module for structure-diff.
//!
//! This module provides:
//! - Type-safe configuration structures with defaults
//! - Validation of configuration values
//! - YAML config file loading and discovery
//!
//! # Configuration File
//!
//! Place a `.structure-diff.yaml` file in your project root or
//! `~/.config/structure-diff/`:
//!
//! ```yaml
//! output:
//!   dir: reports
//! storage:
//!   link_project: owner
//! ```

pub mod file;
mod types;
mod validation;

pub use types::{
    AppConfig, AppConfigBuilder, BehaviorConfig, OutputConfig, StorageConfig,
    DEFAULT_STORAGE_REPORT, DEFAULT_VAULT_REPORT,
};
pub use validation::{ConfigError, Validatable};

pub use file::{
    config_search_dirs, discover_config_file, generate_example_config, load_config_file,
    load_or_default, ConfigFileError, CONFIG_DIR_NAME, CONFIG_FILE_NAMES,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// Editors can use it to validate and complete `.structure-diff.yaml` files.
pub fn generate_json_schema() -> crate::error::Result<String> {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema).map_err(|e| {
        crate::error::StructureDiffError::report(
            "serializing config schema",
            crate::error::ReportErrorKind::Serialization(e.to_string()),
        )
    })
}
