use std::path::Path;

use ledger_core::markdown::table::{self, MISSING_CELL};
use ledger_core::{transact, Document, Result, Row};

use super::{file_name, is_inside_marker_dir, relative_display, HookContext};
use crate::models::HookEvent;

const STALE_MARKER: &str = "⚠️";
const MODIFIED_LABEL: &str = "Modified:";

pub(super) fn run(event: &HookEvent, ctx: &HookContext) -> Result<()> {
    if !event.tool().is_some_and(|tool| tool.writes_file()) {
        return Ok(());
    }
    let Some(file_path) = event.file_path() else {
        return Ok(());
    };

    let file = ctx.absolute(Path::new(file_path));
    if is_inside_marker_dir(&file, &ctx.config.marker_dir) {
        return Ok(());
    }
    let Some(root) = ctx.project_root(&file) else {
        return Ok(());
    };

    let relative = relative_display(&file, &root);
    let native = file
        .strip_prefix(&root)
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|_| relative.clone());
    let candidates = [native, relative, file_name(&file)];

    let timestamp = ctx.timestamp();
    transact(ctx.store, &ctx.config.registry_path(&root), |doc| {
        Ok(mark_stale(doc, &candidates, &timestamp))
    })?;

    Ok(())
}

/// Annotate the registry row whose second column names the edited file.
///
/// Candidates are tried in order, each against every table row in document
/// order, sub-tables under `###` headings included; only the first match is
/// annotated. Rows with a notes column (three or more cells) get a
/// `Modified: <timestamp>` note in the last cell; narrower rows get a warning
/// marker on the first cell. Only the matched line is rewritten.
pub fn mark_stale<S: AsRef<str>>(doc: &Document, candidates: &[S], timestamp: &str) -> Document {
    let rows = table::rows_in(doc.text());

    for candidate in candidates {
        let candidate = candidate.as_ref();
        if candidate.is_empty() {
            continue;
        }
        let Some(found) = rows.iter().find(|located| {
            !located.row.is_placeholder()
                && located.row.iter().nth(1).is_some_and(|(_, path)| path == candidate)
        }) else {
            continue;
        };

        let mut row = found.row.clone();
        if !annotate(&mut row, timestamp) {
            return doc.clone();
        }
        tracing::info!(file = candidate, "registry entry marked stale");
        return doc.replace_row(found.span.clone(), &row);
    }

    doc.clone()
}

/// Returns false when the row needs no change.
fn annotate(row: &mut Row, timestamp: &str) -> bool {
    let columns: Vec<String> = row.iter().map(|(column, _)| column.to_string()).collect();
    match columns.as_slice() {
        [.., notes_column] if columns.len() >= 3 => {
            let notes = row.get(notes_column).unwrap_or(MISSING_CELL);
            let stamped = stamp_notes(notes, timestamp);
            row.set(notes_column.clone(), stamped);
            true
        }
        [id_column, ..] => {
            let id = row.get(id_column).unwrap_or_default();
            if id.starts_with('⚠') {
                return false;
            }
            let marked = format!("{} {}", STALE_MARKER, id);
            row.set(id_column.clone(), marked);
            true
        }
        [] => false,
    }
}

/// Add or refresh the `Modified:` stamp in a notes cell.
fn stamp_notes(notes: &str, timestamp: &str) -> String {
    if let Some(pos) = notes.find(MODIFIED_LABEL) {
        let after = &notes[pos + MODIFIED_LABEL.len()..];
        let stamp_len = after
            .find(|c: char| !(c.is_ascii_digit() || matches!(c, '-' | ':' | ' ')))
            .unwrap_or(after.len());
        let stamp = &after[..stamp_len];
        let rest = &after[stamp.trim_end().len()..];
        return format!("{}{} {}{}", &notes[..pos], MODIFIED_LABEL, timestamp, rest);
    }

    if notes.is_empty() || notes == MISSING_CELL {
        format!("{} {}", MODIFIED_LABEL, timestamp)
    } else {
        format!("{}; {} {}", notes, MODIFIED_LABEL, timestamp)
    }
}
