//! Report rendering for comparison results.
//!
//! A report is plain text:
//! - a title naming both environments, underlined with `=`
//! - one section per unit pair, underlined with `-`, holding a table
//!   rendered by a [`SectionRenderer`] (or a "no changes" sentinel)
//! - a closing rule
//!
//! Section bodies are rendered from the intermediate JSON artifact written
//! by [`write_artifact`], never directly from the in-memory diff.

mod artifact;
mod document;
mod presence;
mod storage;
mod table;

pub use artifact::{artifact_name, read_artifact, write_artifact};
pub use document::{comparison_title, ReportDocument, CLOSING_RULE_WIDTH};
pub use presence::{KeyPresenceRenderer, VAULT_UNCHANGED};
pub use storage::{StorageSectionRenderer, STORAGE_UNCHANGED};
pub use table::{display_width, TextTable};

/// Renders one unit pair's diff into a section body.
pub trait SectionRenderer {
    /// The diff shape this renderer accepts.
    type Diff: ?Sized;

    /// Render `diff`. The result ends with a newline.
    fn render(&self, diff: &Self::Diff) -> String;
}
