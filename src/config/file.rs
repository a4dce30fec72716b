//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::types::AppConfig;
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".structure-diff.yaml",
    ".structure-diff.yml",
    "structure-diff.yaml",
    "structure-diff.yml",
];

/// Directory under the user config dir.
pub const CONFIG_DIR_NAME: &str = "structure-diff";

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/structure-diff/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path.filter(|p| p.exists()) {
        return Some(path.to_path_buf());
    }

    config_search_dirs()
        .into_iter()
        .find_map(|dir| find_config_in_dir(&dir))
}

/// Directories searched for a config file, in discovery order.
#[must_use]
pub fn config_search_dirs() -> Vec<PathBuf> {
    [
        std::env::current_dir().ok(),
        find_git_root(),
        dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME)),
        dirs::home_dir(),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Find the git repository root by walking up the directory tree.
fn find_git_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let mut current = cwd.as_path();

    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    // An empty file is a valid, all-defaults config.
    if content.trim().is_empty() {
        return Ok(AppConfig::default());
    }
    Ok(serde_yaml::from_str(&content)?)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => (config, Some(path)),
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate a commented example config with all options.
#[must_use]
pub fn generate_example_config() -> String {
    r"# structure-diff configuration
# Place this file at .structure-diff.yaml in your project root
# or at ~/.config/structure-diff/structure-diff.yaml.

output:
  # Directory for *_vs_*.json diff artifacts and the reports
  dir: .
  storage_report: Storage_report.txt
  vault_report: Vault_report.txt

storage:
  # Ignore buckets and tables created on non-default development branches
  default_branch_only: true
  # Project id used in links of removed resources: source or owner
  link_project: source

behavior:
  # Suppress non-essential output
  quiet: false
"
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::LinkProject;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_dir() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(".structure-diff.yaml");
        std::fs::write(&config_path, "behavior:\n  quiet: true\n").unwrap();

        assert_eq!(find_config_in_dir(tmp.path()), Some(config_path));
    }

    #[test]
    fn test_search_dirs_include_git_root() {
        let dirs = config_search_dirs();
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(dirs.first(), Some(&cwd));
        if let Some(git_root) = find_git_root() {
            assert_eq!(dirs.get(1), Some(&git_root));
        }
    }

    #[test]
    fn test_find_config_in_dir_not_found() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(find_config_in_dir(tmp.path()), None);
    }

    #[test]
    fn test_load_config_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.yaml");
        let yaml = r"
output:
  dir: /tmp/reports
storage:
  default_branch_only: false
  link_project: owner
";
        std::fs::write(&config_path, yaml).unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.output.dir, PathBuf::from("/tmp/reports"));
        assert_eq!(config.output.storage_report, "Storage_report.txt");
        assert!(!config.storage.default_branch_only);
        assert_eq!(config.storage.link_project, LinkProject::Owner);
    }

    #[test]
    fn test_empty_file_is_default() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("empty.yaml");
        std::fs::write(&config_path, "\n").unwrap();
        assert!(load_config_file(&config_path).unwrap().storage.default_branch_only);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config_file(Path::new("/nonexistent/config.yaml"));
        assert!(matches!(result, Err(ConfigFileError::NotFound(_))));
    }

    #[test]
    fn test_broken_file_falls_back_to_default() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("broken.yaml");
        std::fs::write(&config_path, "storage: [unclosed").unwrap();

        let (config, loaded_from) = load_or_default(Some(&config_path));
        assert!(loaded_from.is_none());
        assert!(config.storage.default_branch_only);
    }

    #[test]
    fn test_example_config_parses() {
        let config: AppConfig = serde_yaml::from_str(&generate_example_config()).unwrap();
        assert_eq!(config.output.vault_report, "Vault_report.txt");
    }

    #[test]
    fn test_discover_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("custom-config.yaml");
        std::fs::write(&config_path, "behavior:\n  quiet: true\n").unwrap();

        assert_eq!(discover_config_file(Some(&config_path)), Some(config_path));
    }
}
