//! Comparison command handlers.
//!
//! Implement the `storage` and `vault` subcommands.

use crate::config::{AppConfig, Validatable};
use crate::pipeline::{exit_codes, run_storage_comparison, run_vault_comparison, ComparisonRun};
use anyhow::{bail, Result};
use std::path::Path;

/// Run the storage comparison, returning the desired exit code.
pub fn run_storage(workdir: &Path, config: &AppConfig) -> Result<i32> {
    check_config(config)?;
    let run = run_storage_comparison(workdir, config)?;
    summarize(&run, config.behavior.quiet);
    Ok(exit_codes::SUCCESS)
}

/// Run the vault comparison, returning the desired exit code.
pub fn run_vault(workdir: &Path, config: &AppConfig) -> Result<i32> {
    check_config(config)?;
    let run = run_vault_comparison(workdir, config)?;
    summarize(&run, config.behavior.quiet);
    Ok(exit_codes::SUCCESS)
}

fn check_config(config: &AppConfig) -> Result<()> {
    let errors = config.validate();
    if errors.is_empty() {
        return Ok(());
    }
    let details: Vec<String> = errors.iter().map(ToString::to_string).collect();
    bail!("Invalid configuration: {}", details.join("; "))
}

fn summarize(run: &ComparisonRun, quiet: bool) {
    if quiet {
        return;
    }
    tracing::info!(
        "Compared {} project(s), {} with changes, report: {}",
        run.units,
        run.changed_units,
        run.report_path.display()
    );
}
