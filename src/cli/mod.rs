//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler implements the business logic for a specific CLI subcommand
//! and returns the exit code the process should end with.

mod compare;
mod secrets;

pub use compare::{run_storage, run_vault};
pub use secrets::{render_scan, run_scan_secrets};

// Re-export config types used by handlers
pub use crate::config::AppConfig;
