//! Pipe-delimited table codec.
//!
//! Parsing never fails. A section without a table yields [`Table::default`],
//! and rows whose cell count differs from the header are dropped.

use std::ops::Range;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// First-column values that mark a table as "currently empty".
pub const PLACEHOLDERS: [&str; 2] = ["(none)", "(none yet)"];

/// Value rendered for a column a row does not carry.
pub const MISSING_CELL: &str = "-";

const SEPARATOR_CELL: &str = "------";

pub fn is_placeholder_value(value: &str) -> bool {
    PLACEHOLDERS.contains(&value)
}

/// One table row: column name to cell text, in column order.
///
/// Two rows are equal when they map the same columns to the same text,
/// whatever order the cells were set in.
#[derive(Debug, Clone, Default)]
pub struct Row {
    cells: Vec<(String, String)>,
}

impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        self.cells.len() == other.cells.len()
            && self
                .cells
                .iter()
                .all(|(column, value)| other.get(column) == Some(value.as_str()))
    }
}

impl Eq for Row {}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Row::set`].
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(column, value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Overwrite the cell for `column`, or append it if the row lacks one.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(name, _)| *name == column) {
            Some(cell) => cell.1 = value,
            None => self.cells.push((column, value)),
        }
    }

    /// Copy every cell of `other` over this row; columns `other` lacks are kept.
    pub fn merge_from(&mut self, other: &Row) {
        for (column, value) in &other.cells {
            self.set(column.clone(), value.clone());
        }
    }

    pub fn first(&self) -> Option<&str> {
        self.cells.first().map(|(_, value)| value.as_str())
    }

    /// A row is a placeholder when its first column holds a sentinel value.
    pub fn is_placeholder(&self) -> bool {
        self.first().is_some_and(is_placeholder_value)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (column, value) in iter {
            row.set(column, value);
        }
        row
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (column, value) in &self.cells {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// Header plus data rows of the first table in a section.
///
/// The separator row carries no data and is not kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    /// True when no table was found (zero columns).
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Rows that are not placeholders.
    pub fn records(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|row| !row.is_placeholder())
    }

    pub fn into_records(self) -> Vec<Row> {
        self.rows
            .into_iter()
            .filter(|row| !row.is_placeholder())
            .collect()
    }
}

/// A trimmed line that starts with `|` and has at least one more `|`.
pub fn is_table_line(line: &str) -> bool {
    line.strip_prefix('|').is_some_and(|rest| rest.contains('|'))
}

/// `|---|:--:|` style line: only dashes, colons, whitespace and pipes between
/// an opening and a closing pipe.
pub fn is_separator_line(line: &str) -> bool {
    let Some(inner) = line
        .strip_prefix('|')
        .and_then(|rest| rest.strip_suffix('|'))
    else {
        return false;
    };
    !inner.is_empty()
        && inner
            .chars()
            .all(|c| c.is_whitespace() || matches!(c, '-' | ':' | '|'))
}

/// Cells between the outer pipes, trimmed. Text after the last pipe is ignored.
pub fn split_cells(line: &str) -> Vec<String> {
    let parts: Vec<&str> = line.split('|').collect();
    if parts.len() < 2 {
        return Vec::new();
    }
    parts[1..parts.len() - 1]
        .iter()
        .map(|cell| cell.trim().to_string())
        .collect()
}

enum ScanState {
    Outside,
    AwaitingSeparator,
    InTable,
}

/// Parse the first table found in `text`.
///
/// Blank lines are skipped; the table ends at the first non-blank line that is
/// not pipe-delimited. A header never followed by a separator is not a table.
pub fn parse(text: &str) -> Table {
    let mut table = Table::default();
    let mut state = ScanState::Outside;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        match state {
            ScanState::Outside => {
                if is_table_line(line) {
                    table.headers = split_cells(line);
                    state = ScanState::AwaitingSeparator;
                }
            }
            ScanState::AwaitingSeparator => {
                if is_separator_line(line) {
                    state = ScanState::InTable;
                }
            }
            ScanState::InTable => {
                if !is_table_line(line) {
                    break;
                }
                let cells = split_cells(line);
                if cells.len() != table.headers.len() {
                    tracing::trace!(
                        expected = table.headers.len(),
                        found = cells.len(),
                        "dropping malformed table row"
                    );
                    continue;
                }
                table
                    .rows
                    .push(table.headers.iter().cloned().zip(cells).collect());
            }
        }
    }

    match state {
        ScanState::InTable => table,
        _ => Table::default(),
    }
}

/// A data row found somewhere in a larger text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedRow {
    /// Byte span of the row's line, without indentation or line ending.
    pub span: Range<usize>,
    pub row: Row,
}

/// Data rows of every table in `text`, in document order.
///
/// Unlike [`parse`], scanning goes on past the first table, and a blank line
/// ends a table so that consecutive tables keep their own headers. Malformed
/// rows are skipped.
pub fn rows_in(text: &str) -> Vec<LocatedRow> {
    let mut found = Vec::new();
    let mut headers: Vec<String> = Vec::new();
    let mut state = ScanState::Outside;
    let mut offset = 0;

    for raw in text.split_inclusive('\n') {
        let start = offset;
        offset += raw.len();

        let line = raw.trim();
        let indent = raw.len() - raw.trim_start().len();

        state = match state {
            _ if line.is_empty() => ScanState::Outside,
            ScanState::AwaitingSeparator if is_separator_line(line) => ScanState::InTable,
            ScanState::Outside | ScanState::AwaitingSeparator if is_table_line(line) => {
                headers = split_cells(line);
                ScanState::AwaitingSeparator
            }
            ScanState::InTable if is_table_line(line) => {
                let cells = split_cells(line);
                if cells.len() == headers.len() {
                    found.push(LocatedRow {
                        span: start + indent..start + indent + line.len(),
                        row: headers.iter().cloned().zip(cells).collect(),
                    });
                }
                ScanState::InTable
            }
            _ => ScanState::Outside,
        };
    }

    found
}

/// A single table line for `row`, cells in the row's column order.
pub fn render_line(row: &Row) -> String {
    let mut output = String::new();
    push_line(&mut output, row.iter().map(|(_, value)| cell_text(value)));
    output.pop();
    output
}

/// Render a table block, one `\n`-terminated line per row.
///
/// Placeholder rows in `rows` are skipped; when no real row remains a single
/// placeholder row is emitted.
pub fn render<S: AsRef<str>>(headers: &[S], rows: &[Row]) -> String {
    if headers.is_empty() {
        return String::new();
    }

    let mut output = String::new();
    push_line(&mut output, headers.iter().map(|h| cell_text(h.as_ref())));

    output.push('|');
    for _ in headers {
        output.push_str(SEPARATOR_CELL);
        output.push('|');
    }
    output.push('\n');

    let mut wrote_row = false;
    for row in rows.iter().filter(|row| !row.is_placeholder()) {
        push_line(
            &mut output,
            headers
                .iter()
                .map(|h| cell_text(row.get(h.as_ref()).unwrap_or(MISSING_CELL))),
        );
        wrote_row = true;
    }

    if !wrote_row {
        push_line(
            &mut output,
            (0..headers.len()).map(|i| {
                if i == 0 {
                    PLACEHOLDERS[0].to_string()
                } else {
                    MISSING_CELL.to_string()
                }
            }),
        );
    }

    output
}

fn push_line(output: &mut String, cells: impl Iterator<Item = String>) {
    output.push('|');
    for cell in cells {
        output.push(' ');
        output.push_str(&cell);
        output.push_str(" |");
    }
    output.push('\n');
}

/// Cell text with characters that would break the row shape replaced.
fn cell_text(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|c| match c {
            '|' => '/',
            '\n' | '\r' => ' ',
            other => other,
        })
        .collect()
}
