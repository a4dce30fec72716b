//! Aligned plain-text tables.

use unicode_width::UnicodeWidthStr;

/// Gap between columns.
const COLUMN_GAP: usize = 2;

/// A left-aligned text table measured in display columns.
///
/// `format!("{:<w$}")` pads by `char` count, which misaligns glyphs such as
/// `✓`; padding here uses the display width instead.
#[derive(Debug, Clone, Default)]
pub struct TextTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TextTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the header row, underlined with `-` when rendered.
    #[must_use]
    pub fn with_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers = headers.into_iter().map(Into::into).collect();
        self
    }

    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render the table. Every line ends with `\n`; trailing spaces are trimmed.
    #[must_use]
    pub fn render(&self) -> String {
        let widths = self.column_widths();
        let mut out = String::new();

        if !self.headers.is_empty() {
            push_line(&mut out, &self.headers, &widths);
            let total = widths.iter().sum::<usize>() + COLUMN_GAP * widths.len().saturating_sub(1);
            out.push_str(&"-".repeat(total));
            out.push('\n');
        }
        for row in &self.rows {
            push_line(&mut out, row, &widths);
        }
        out
    }

    fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = Vec::new();
        for row in std::iter::once(&self.headers).chain(&self.rows) {
            for (i, cell) in row.iter().enumerate() {
                let w = UnicodeWidthStr::width(cell.as_str());
                match widths.get_mut(i) {
                    Some(current) => *current = (*current).max(w),
                    None => widths.push(w),
                }
            }
        }
        widths
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            line.push_str(&" ".repeat(COLUMN_GAP));
        }
        line.push_str(cell);
        let pad = widths[i].saturating_sub(UnicodeWidthStr::width(cell.as_str()));
        line.push_str(&" ".repeat(pad));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Display width of `text` in terminal columns.
#[must_use]
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}
