//! Key presence section renderer (vault comparison).

use super::table::TextTable;
use super::SectionRenderer;
use crate::diff::KeyDiff;

/// Line rendered when both sides hold the same keys.
pub const VAULT_UNCHANGED: &str = "Vault structure is the same - No changes detected";

const PRESENT: &str = "✓";
const ABSENT: &str = "✗";

/// Renders one row per distinct key with a presence glyph per environment.
#[derive(Debug, Clone)]
pub struct KeyPresenceRenderer {
    source_env: String,
    destination_env: String,
}

impl KeyPresenceRenderer {
    /// Column headers fall back to the origin names when an environment name is empty.
    #[must_use]
    pub fn new(source_env: &str, destination_env: &str) -> Self {
        let header = |env: &str, fallback: &str| {
            if env.is_empty() {
                fallback.to_string()
            } else {
                env.to_string()
            }
        };
        Self {
            source_env: header(source_env, "source"),
            destination_env: header(destination_env, "destination"),
        }
    }
}

impl SectionRenderer for KeyPresenceRenderer {
    type Diff = KeyDiff;

    fn render(&self, diff: &KeyDiff) -> String {
        if diff.is_unchanged() {
            return format!("{VAULT_UNCHANGED}\n");
        }

        let mut table = TextTable::new().with_headers([
            "KEY",
            self.source_env.as_str(),
            self.destination_env.as_str(),
        ]);
        for entry in &diff.entries {
            table.push_row([
                entry.key.as_str(),
                glyph(entry.presence.in_source()),
                glyph(entry.presence.in_destination()),
            ]);
        }
        table.render()
    }
}

const fn glyph(present: bool) -> &'static str {
    if present {
        PRESENT
    } else {
        ABSENT
    }
}
