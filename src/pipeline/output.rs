//! Output handling for comparison reports.

use crate::error::{Result, StructureDiffError};
use std::path::Path;

/// Create the output directory if needed.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| StructureDiffError::io(dir, e))
}

/// Write the final report, replacing any previous one.
pub fn write_report(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).map_err(|e| StructureDiffError::io(path, e))?;
    tracing::info!("Report written to {}", path.display());
    Ok(())
}
