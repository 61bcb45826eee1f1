//! Merging a single row into a section's rows.

use super::document::Document;
use super::table::Row;

/// True when `row` shares a value with `candidate` in any identity column.
///
/// A column only counts when both rows carry it.
pub fn matches<S: AsRef<str>>(row: &Row, candidate: &Row, identity: &[S]) -> bool {
    identity.iter().any(|column| {
        let column = column.as_ref();
        match (row.get(column), candidate.get(column)) {
            (Some(existing), Some(incoming)) => existing == incoming,
            _ => false,
        }
    })
}

/// Merge `new_row` into `existing`.
///
/// Placeholders are dropped. The first row matching on any identity column
/// takes `new_row`'s cells in place; otherwise `new_row` is appended. An empty
/// identity list always appends.
pub fn upsert<S: AsRef<str>>(existing: Vec<Row>, new_row: Row, identity: &[S]) -> Vec<Row> {
    let mut rows: Vec<Row> = existing
        .into_iter()
        .filter(|row| !row.is_placeholder())
        .collect();

    match rows.iter_mut().find(|row| matches(row, &new_row, identity)) {
        Some(row) => row.merge_from(&new_row),
        None => rows.push(new_row),
    }

    rows
}

/// Read a section's table, upsert `new_row`, and render it back.
///
/// A missing section leaves the document unchanged.
pub fn upsert_into<H, I>(
    document: &Document,
    section: &str,
    headers: &[H],
    new_row: Row,
    identity: &[I],
) -> Document
where
    H: AsRef<str>,
    I: AsRef<str>,
{
    if !document.has_section(section) {
        tracing::debug!(section, "section not found, row not merged");
        return document.clone();
    }
    let rows = upsert(document.read_table(section).rows, new_row, identity);
    document.write_table(section, headers, &rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(operation: &str, file: &str, status: &str) -> Row {
        Row::new()
            .with("Operation", operation)
            .with("State File", file)
            .with("Status", status)
    }

    const IDENTITY: [&str; 2] = ["State File", "Operation"];

    #[test]
    fn test_upsert_replaces_placeholder() {
        let placeholder = Row::new().with("Operation", "(none)").with("State File", "-");
        let rows = upsert(vec![placeholder], state("Refactor", "r.md", "active"), &IDENTITY);
        assert_eq!(rows, vec![state("Refactor", "r.md", "active")]);
    }

    #[test]
    fn test_upsert_updates_match_in_place() {
        let existing = vec![
            state("Audit", "a.md", "active"),
            state("Refactor", "r.md", "active"),
            state("Deploy", "d.md", "active"),
        ];
        let rows = upsert(existing, state("Refactor", "r.md", "done"), &IDENTITY);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].get("Status"), Some("done"));
        assert_eq!(rows[2].get("Operation"), Some("Deploy"));
    }

    #[test]
    fn test_upsert_matches_on_any_identity_column() {
        let existing = vec![state("Refactor", "old.md", "active")];
        let rows = upsert(existing, state("Refactor", "new.md", "done"), &IDENTITY);
        assert_eq!(rows, vec![state("Refactor", "new.md", "done")]);
    }

    #[test]
    fn test_upsert_first_match_wins() {
        let existing = vec![state("Audit", "r.md", "a"), state("Refactor", "x.md", "b")];
        let rows = upsert(existing, state("Refactor", "r.md", "done"), &IDENTITY);
        assert_eq!(rows[0].get("Status"), Some("done"));
        assert_eq!(rows[1].get("Status"), Some("b"));
    }

    #[test]
    fn test_upsert_keeps_columns_absent_from_new_row() {
        let existing = vec![state("Refactor", "r.md", "active").with("Started", "2024-01-01")];
        let update = Row::new().with("State File", "r.md").with("Status", "done");
        let rows = upsert(existing, update, &IDENTITY);
        assert_eq!(rows[0].get("Started"), Some("2024-01-01"));
        assert_eq!(rows[0].get("Status"), Some("done"));
    }

    #[test]
    fn test_upsert_appends_unmatched() {
        let existing = vec![state("Audit", "a.md", "active")];
        let rows = upsert(existing, state("Refactor", "r.md", "active"), &IDENTITY);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get("Operation"), Some("Refactor"));
    }

    #[test]
    fn test_upsert_without_identity_appends() {
        let row = state("Refactor", "r.md", "active");
        let none: [&str; 0] = [];
        let rows = upsert(vec![row.clone()], row, &none);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_upsert_is_idempotent() {
        let existing = vec![state("Audit", "a.md", "active")];
        let row = state("Refactor", "r.md", "done");
        let once = upsert(existing, row.clone(), &IDENTITY);
        let twice = upsert(once.clone(), row, &IDENTITY);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_upsert_into_missing_section_is_noop() {
        let document = Document::new("ctx.md", "# Context\n");
        let updated = upsert_into(
            &document,
            "Active States",
            &["Operation", "State File", "Status"],
            state("Refactor", "r.md", "done"),
            &IDENTITY,
        );
        assert_eq!(updated, document);
    }
}
