use std::ops::Range;
use std::path::{Path, PathBuf};

use super::section;
use super::table::{self, Row, Table};

/// Immutable snapshot of a markdown document and where it is stored.
///
/// Every mutating operation returns a new `Document`; a missing section turns
/// the operation into a no-op that returns an identical copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    path: PathBuf,
    text: String,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// A document whose file does not exist yet.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self::new(path, String::new())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    /// True when the document holds nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    fn with_text(&self, text: String) -> Self {
        Self {
            path: self.path.clone(),
            text,
        }
    }

    pub fn has_section(&self, title: &str) -> bool {
        section::find_section(&self.text, title).is_some()
    }

    /// Raw body text of a section.
    pub fn section(&self, title: &str) -> Option<&str> {
        section::find_section(&self.text, title).map(|span| &self.text[span.body])
    }

    /// Titles of every `##` section, in order.
    pub fn section_titles(&self) -> Vec<String> {
        section::headings(&self.text)
    }

    /// The first table in a section; empty when the section or table is absent.
    pub fn read_table(&self, title: &str) -> Table {
        match self.section(title) {
            Some(body) => table::parse(body),
            None => {
                tracing::debug!(section = title, path = %self.path.display(), "section not found");
                Table::default()
            }
        }
    }

    pub fn replace_section(&self, title: &str, body: &str) -> Self {
        match section::replace_section(&self.text, title, body) {
            Some(text) => self.with_text(text),
            None => {
                tracing::debug!(section = title, path = %self.path.display(), "section not found, nothing written");
                self.clone()
            }
        }
    }

    /// Rewrite one table row in place; every other byte is kept.
    pub fn replace_row(&self, span: Range<usize>, row: &Row) -> Self {
        let mut text = self.text.clone();
        text.replace_range(span, &table::render_line(row));
        self.with_text(text)
    }

    /// Replace whatever the section holds with a freshly rendered table.
    pub fn write_table<S: AsRef<str>>(&self, title: &str, headers: &[S], rows: &[Row]) -> Self {
        let body = format!("\n{}\n", table::render(headers, rows));
        self.replace_section(title, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX: &str = "# State Index\n\n## Active States\n\n| Operation | State File |\n|------|------|\n| (none) | - |\n\n## Session History\n\nNothing yet.\n";

    fn doc(text: &str) -> Document {
        Document::new("state/_index.md", text)
    }

    #[test]
    fn test_replace_row_touches_one_line() {
        let original = doc(INDEX);
        let located = table::rows_in(original.text()).remove(0);
        let row = Row::new().with("Operation", "Audit").with("State File", "a.md");

        let updated = original.replace_row(located.span, &row);
        assert_eq!(
            updated.text(),
            INDEX.replace("| (none) | - |", "| Audit | a.md |")
        );
    }

    #[test]
    fn test_section_titles() {
        assert_eq!(doc(INDEX).section_titles(), vec!["Active States", "Session History"]);
    }

    #[test]
    fn test_read_table_from_section() {
        let table = doc(INDEX).read_table("Active States");
        assert_eq!(table.headers, vec!["Operation", "State File"]);
        assert_eq!(table.rows.len(), 1);
        assert!(table.rows[0].is_placeholder());
    }

    #[test]
    fn test_read_table_missing_section_is_empty() {
        assert!(doc(INDEX).read_table("Nope").is_empty());
        assert!(doc("").read_table("Active States").is_empty());
    }

    #[test]
    fn test_write_table_missing_section_is_identical() {
        let original = doc(INDEX);
        let row = Row::new().with("Operation", "Refactor");
        let written = original.write_table("Nope", &["Operation"], &[row]);
        assert_eq!(written, original);
    }

    #[test]
    fn test_write_table_replaces_section_contents() {
        let row = Row::new()
            .with("Session", "Session-20240101")
            .with("Date", "2024-01-01");
        let written = doc(INDEX).write_table("Session History", &["Session", "Date"], &[row]);
        assert_eq!(
            written.text(),
            "# State Index\n\n## Active States\n\n| Operation | State File |\n|------|------|\n| (none) | - |\n\n## Session History\n\n| Session | Date |\n|------|------|\n| Session-20240101 | 2024-01-01 |\n\n"
        );
        assert_eq!(written.path(), Path::new("state/_index.md"));
    }

    #[test]
    fn test_write_table_is_idempotent() {
        let row = Row::new().with("Operation", "Refactor").with("State File", "x.md");
        let headers = ["Operation", "State File"];
        let once = doc(INDEX).write_table("Active States", &headers, &[row.clone()]);
        let twice = once.write_table("Active States", &headers, &[row]);
        assert_eq!(once, twice);
    }
}
