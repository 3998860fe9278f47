//! Terminal output helpers
//!
//! Plain-text rendering for list tables, pagination footers, and status
//! lines. Nothing here buffers; every helper either returns a `String` or
//! prints directly.

use crate::models::Pagination;

/// Column-aligned text table
///
/// Cell widths are measured in characters, so multi-byte names line up.
pub struct TextTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TextTable {
    /// Create a table with the given column headers
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row; missing cells render empty
    pub fn add_row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    /// True when no rows have been added
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render the table with a dashed line under the headers
    pub fn render(&self) -> String {
        let widths = self.column_widths();
        let mut lines = Vec::with_capacity(self.rows.len() + 2);

        lines.push(Self::render_line(&self.headers, &widths));
        lines.push(
            widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("  "),
        );
        for row in &self.rows {
            lines.push(Self::render_line(row, &widths));
        }

        lines.join("\n")
    }

    fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (index, cell) in row.iter().enumerate().take(widths.len()) {
                widths[index] = widths[index].max(cell.chars().count());
            }
        }
        widths
    }

    fn render_line(cells: &[String], widths: &[usize]) -> String {
        let mut parts = Vec::with_capacity(widths.len());
        for (index, width) in widths.iter().enumerate() {
            let cell = cells.get(index).map(String::as_str).unwrap_or("");
            if index + 1 == widths.len() {
                // The last column carries no trailing padding
                parts.push(cell.to_string());
            } else {
                parts.push(format!("{:<width$}", cell, width = width));
            }
        }
        parts.join("  ")
    }
}

/// Shorten text to at most `max` characters, ending in "..." when cut
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// One-line pagination footer, e.g. "page 2 of 5 (42 total)"
pub fn page_footer(pagination: &Pagination) -> String {
    format!(
        "page {} of {} ({} total)",
        pagination.page, pagination.total_page, pagination.total_data
    )
}

/// Print a success line
pub fn success(message: &str) {
    println!("✅ {}", message);
}

/// Print a warning line
pub fn warn(message: &str) {
    println!("⚠️  {}", message);
}

/// Print an error line to stderr
pub fn error(message: &str) {
    eprintln!("❌ {}", message);
}
