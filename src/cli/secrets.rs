//! Secret scan command handler.
//!
//! Implements the `scan-secrets` subcommand.

use crate::pipeline::exit_codes;
use crate::secrets::{scan_directory, SecretScan};
use anyhow::Result;
use std::path::Path;

/// Scan `dir` and print the result, returning the desired exit code.
///
/// Encrypted values make the command fail; vault references are fine.
pub fn run_scan_secrets(dir: &Path, quiet: bool) -> Result<i32> {
    let scan = scan_directory(dir)?;
    print!("{}", render_scan(&scan, quiet));

    if scan.has_encrypted() {
        Ok(exit_codes::SECRETS_FOUND)
    } else {
        Ok(exit_codes::SUCCESS)
    }
}

/// Text printed for a finished scan.
#[must_use]
pub fn render_scan(scan: &SecretScan, quiet: bool) -> String {
    let mut out = String::new();
    if !quiet {
        for skipped in &scan.skipped {
            out.push_str(&format!("Invalid JSON or encoding: {}\n", skipped.file.display()));
        }
    }

    if scan.has_encrypted() {
        for finding in scan.encrypted() {
            out.push_str(&format!("{} -> {}\n", finding.file.display(), finding.key));
        }
        out.push_str("The configurations above contain a secure value not in the vault!\n");
    } else {
        out.push_str("No secure values found in the configurations - validation is ok\n");
    }
    out
}
