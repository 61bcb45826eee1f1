//! Scalar fields kept in two-column `| Field | Value |` tables.
//!
//! The first column is the key and the second the value, whatever the
//! headers are called. Keys written in bold (`**Commands Run**`) match their
//! plain name, and updates keep the bold formatting.

use super::document::Document;
use super::table::{self, Table};
use super::upsert::upsert;
use super::Row;
use crate::error::{LedgerError, Result};

pub const FIELD: &str = "Field";
pub const VALUE: &str = "Value";

/// Key cell without surrounding whitespace and emphasis markers.
pub fn normalize_key(cell: &str) -> &str {
    let cell = cell.trim();
    for marker in ["**", "__"] {
        if let Some(inner) = cell
            .strip_prefix(marker)
            .and_then(|rest| rest.strip_suffix(marker))
        {
            return inner.trim();
        }
    }
    cell
}

/// Key and value column names, or `None` when the table is not two columns
/// wide. A section without a table gets the default `Field`/`Value` pair.
fn columns(table: &Table) -> Option<(String, String)> {
    match table.headers.as_slice() {
        [] => Some((FIELD.to_string(), VALUE.to_string())),
        [key, value] => Some((key.clone(), value.clone())),
        _ => None,
    }
}

fn find_row<'a>(table: &'a Table, key_column: &str, field: &str) -> Option<&'a Row> {
    table
        .records()
        .find(|row| row.get(key_column).map(normalize_key) == Some(field))
}

/// Current value of `field`, if the section has it.
pub fn get(document: &Document, section: &str, field: &str) -> Option<String> {
    let table = document.read_table(section);
    let (key_column, value_column) = columns(&table)?;
    find_row(&table, &key_column, field)
        .and_then(|row| row.get(&value_column))
        .map(str::to_string)
}

/// Set `field` to `value`, appending the field when it is not there yet.
pub fn set(document: &Document, section: &str, field: &str, value: &str) -> Document {
    if !document.has_section(section) {
        tracing::debug!(section, field, "section not found, field not set");
        return document.clone();
    }

    let table = document.read_table(section);
    let Some((key_column, value_column)) = columns(&table) else {
        tracing::warn!(
            section,
            columns = table.headers.len(),
            "not a two-column table, field not set"
        );
        return document.clone();
    };

    let key_cell = find_row(&table, &key_column, field)
        .and_then(|row| row.get(&key_column))
        .unwrap_or(field)
        .to_string();

    let row = Row::new()
        .with(key_column.as_str(), key_cell)
        .with(value_column.as_str(), value);
    let rows = upsert(table.rows, row, &[key_column.as_str()]);
    document.write_table(section, &[key_column, value_column], &rows)
}

/// Add `delta` to a numeric field.
///
/// A missing field (or section) is left alone rather than created.
///
/// # Errors
/// Returns [`LedgerError::NotNumeric`] when the current value is not an integer.
pub fn increment(document: &Document, section: &str, field: &str, delta: i64) -> Result<Document> {
    let Some(current) = get(document, section, field) else {
        tracing::debug!(section, field, "counter not present, not incremented");
        return Ok(document.clone());
    };

    let value: i64 = current
        .trim()
        .parse()
        .map_err(|_| LedgerError::NotNumeric {
            section: section.to_string(),
            field: field.to_string(),
            value: current.clone(),
        })?;

    Ok(set(
        document,
        section,
        field,
        &value.saturating_add(delta).to_string(),
    ))
}

/// Set `field` only if it already exists.
pub fn reset(document: &Document, section: &str, field: &str, value: &str) -> Document {
    if get(document, section, field).is_none() {
        return document.clone();
    }
    set(document, section, field, value)
}

/// Value of the first `| field | value ... |` row anywhere in `text`.
pub fn lookup_anywhere(text: &str, field: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| table::is_table_line(line))
        .map(table::split_cells)
        .find(|cells| cells.len() >= 2 && normalize_key(&cells[0]) == field)
        .map(|cells| cells[1].clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX: &str = "# State Index\n\n## Current Session\n\n| Field | Value |\n|------|------|\n| Commands Run | 3 |\n| **Documents Touched** | 7 |\n| Focus | refactor |\n\n## Active States\n\n| Operation | State File | Status |\n|------|------|------|\n| (none) | - | - |\n";

    fn doc(text: &str) -> Document {
        Document::new("state/_index.md", text)
    }

    #[test]
    fn test_get_field() {
        let d = doc(INDEX);
        assert_eq!(get(&d, "Current Session", "Commands Run").as_deref(), Some("3"));
        assert_eq!(get(&d, "Current Session", "Documents Touched").as_deref(), Some("7"));
        assert_eq!(get(&d, "Current Session", "Missing"), None);
        assert_eq!(get(&d, "Missing", "Commands Run"), None);
    }

    #[test]
    fn test_get_ignores_wide_tables() {
        assert_eq!(get(&doc(INDEX), "Active States", "(none)"), None);
    }

    #[test]
    fn test_increment_changes_only_the_counter() {
        let updated = increment(&doc(INDEX), "Current Session", "Commands Run", 1).unwrap();
        assert_eq!(
            updated.text(),
            INDEX.replace("| Commands Run | 3 |", "| Commands Run | 4 |")
        );
    }

    #[test]
    fn test_increment_accumulates() {
        let mut d = doc(INDEX);
        for _ in 0..3 {
            d = increment(&d, "Current Session", "Commands Run", 2).unwrap();
        }
        assert_eq!(get(&d, "Current Session", "Commands Run").as_deref(), Some("9"));
    }

    #[test]
    fn test_increment_keeps_bold_key() {
        let updated = increment(&doc(INDEX), "Current Session", "Documents Touched", 1).unwrap();
        assert!(updated.text().contains("| **Documents Touched** | 8 |"));
    }

    #[test]
    fn test_increment_non_numeric_fails() {
        let err = increment(&doc(INDEX), "Current Session", "Focus", 1).unwrap_err();
        assert!(matches!(err, LedgerError::NotNumeric { ref value, .. } if value == "refactor"));
    }

    #[test]
    fn test_increment_missing_field_is_noop() {
        let d = doc(INDEX);
        assert_eq!(increment(&d, "Current Session", "Tasks Done", 1).unwrap(), d);
        assert_eq!(increment(&d, "Nope", "Commands Run", 1).unwrap(), d);
    }

    #[test]
    fn test_set_appends_new_field() {
        let updated = set(&doc(INDEX), "Current Session", "Branch", "main");
        assert!(updated.text().contains("| Focus | refactor |\n| Branch | main |\n"));
    }

    #[test]
    fn test_set_creates_table_in_empty_section() {
        let updated = set(&doc("## Current Session\n\n## Next\n"), "Current Session", "Commands Run", "0");
        assert_eq!(
            updated.text(),
            "## Current Session\n\n| Field | Value |\n|------|------|\n| Commands Run | 0 |\n\n## Next\n"
        );
    }

    #[test]
    fn test_set_refuses_wide_tables() {
        let d = doc(INDEX);
        assert_eq!(set(&d, "Active States", "Refactor", "x"), d);
    }

    #[test]
    fn test_reset_only_existing_fields() {
        let d = doc(INDEX);
        assert_eq!(reset(&d, "Current Session", "Tasks Done", "0"), d);
        let updated = reset(&d, "Current Session", "Commands Run", "0");
        assert_eq!(get(&updated, "Current Session", "Commands Run").as_deref(), Some("0"));
    }

    #[test]
    fn test_lookup_anywhere() {
        let text = "# Refactor\n\n| Field | Value |\n|---|---|\n| Status | in progress |\n| **Progress** | 3/5 |\n";
        assert_eq!(lookup_anywhere(text, "Status").as_deref(), Some("in progress"));
        assert_eq!(lookup_anywhere(text, "Progress").as_deref(), Some("3/5"));
        assert_eq!(lookup_anywhere(text, "Started"), None);
    }
}
