//! Configuration validation.

use super::types::{AppConfig, BehaviorConfig, OutputConfig, StorageConfig};

/// Error type for configuration validation.
#[derive(Debug, Clone)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.output.validate());
        errors.extend(self.storage.validate());
        errors.extend(self.behavior.validate());
        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        for (field, name) in [
            ("output.storage_report", &self.storage_report),
            ("output.vault_report", &self.vault_report),
        ] {
            if let Some(message) = report_name_problem(name) {
                errors.push(ConfigError {
                    field: field.to_string(),
                    message,
                });
            }
        }

        if self.dir.as_os_str().is_empty() {
            errors.push(ConfigError {
                field: "output.dir".to_string(),
                message: "Output directory must not be empty".to_string(),
            });
        }
        errors
    }
}

impl Validatable for StorageConfig {
    fn validate(&self) -> Vec<ConfigError> {
        Vec::new()
    }
}

impl Validatable for BehaviorConfig {
    fn validate(&self) -> Vec<ConfigError> {
        Vec::new()
    }
}

/// Report names are bare file names; directories belong in `output.dir`.
fn report_name_problem(name: &str) -> Option<String> {
    if name.trim().is_empty() {
        Some("Report file name must not be empty".to_string())
    } else if name.contains(['/', '\\']) {
        Some(format!(
            "Report file name '{name}' must not contain path separators, use output.dir instead"
        ))
    } else {
        None
    }
}
