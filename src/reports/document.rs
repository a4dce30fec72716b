//! Report document assembly.

use super::table::display_width;

/// Width of the closing rule.
pub const CLOSING_RULE_WIDTH: usize = 50;

/// One comparison report: a title, one section per unit pair, a closing rule.
///
/// Every heading is underlined with a rule as wide as the heading itself.
#[derive(Debug, Clone)]
pub struct ReportDocument {
    text: String,
    sections: usize,
}

impl ReportDocument {
    /// Start a report with an `=`-underlined title.
    #[must_use]
    pub fn new(title: &str) -> Self {
        let mut text = String::new();
        push_heading(&mut text, title, '=');
        Self { text, sections: 0 }
    }

    /// Append a `-`-underlined section followed by its rendered body.
    pub fn push_section(&mut self, heading: &str, body: &str) {
        self.text.push('\n');
        push_heading(&mut self.text, heading, '-');
        self.text.push_str(body);
        if !body.ends_with('\n') {
            self.text.push('\n');
        }
        self.sections += 1;
    }

    #[must_use]
    pub const fn section_count(&self) -> usize {
        self.sections
    }

    /// Close the report and return its text.
    #[must_use]
    pub fn finish(mut self) -> String {
        self.text.push('\n');
        self.text.push_str(&"-".repeat(CLOSING_RULE_WIDTH));
        self.text.push('\n');
        self.text
    }
}

fn push_heading(text: &mut String, heading: &str, rule: char) {
    text.push_str(heading);
    text.push('\n');
    text.extend(std::iter::repeat(rule).take(display_width(heading)));
    text.push('\n');
}

/// Report title naming both environments.
#[must_use]
pub fn comparison_title(kind: &str, source_env: &str, destination_env: &str) -> String {
    format!("{kind} Comparison Result ('{source_env}' vs '{destination_env}')")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_match_heading_width() {
        let mut doc = ReportDocument::new(&comparison_title("Storage", "dev", "prod"));
        doc.push_section("Project '1' vs Project '1'", "body line\n");
        doc.push_section("Project '22' vs Project '22'", "no trailing newline");
        assert_eq!(doc.section_count(), 2);

        let text = doc.finish();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Storage Comparison Result ('dev' vs 'prod')");
        assert_eq!(lines[1], "=".repeat(lines[0].len()));
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "Project '1' vs Project '1'");
        assert_eq!(lines[4], "-".repeat(lines[3].len()));
        assert_eq!(lines[5], "body line");
        assert_eq!(lines[7], "Project '22' vs Project '22'");
        assert_eq!(lines[8].len(), lines[7].len());
        assert_eq!(lines[9], "no trailing newline");
        assert_eq!(lines[10], "");
        assert_eq!(lines[11], "-".repeat(50));
        assert!(text.ends_with('\n'));
    }
}
