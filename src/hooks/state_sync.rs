use std::path::Path;

use ledger_core::markdown::{fields, upsert};
use ledger_core::{transact, Result};

use super::{relative_display, HookContext};
use crate::config::LedgerConfig;
use crate::models::{ActiveStateEntry, HookEvent, ACTIVE_STATES};

/// A state file may be matched by either its path or its operation name.
const IDENTITY: [&str; 2] = ["State File", "Operation"];

const STATE_FIELDS: [&str; 3] = ["Status", "Progress", "Started"];

pub(super) fn run(event: &HookEvent, ctx: &HookContext) -> Result<()> {
    if !event.tool().is_some_and(|tool| tool.writes_file()) {
        return Ok(());
    }
    let Some(file_path) = event.file_path() else {
        return Ok(());
    };

    let file = ctx.absolute(Path::new(file_path));
    if !is_state_file(&file, ctx.config) {
        return Ok(());
    }
    let Some(root) = ctx.project_root(&file) else {
        return Ok(());
    };

    let state = ctx.store.load(&file)?;
    if state.is_blank() {
        tracing::debug!(file = %file.display(), "empty state file");
        return Ok(());
    }

    let [status, progress, started] = STATE_FIELDS.map(|field| {
        fields::lookup_anywhere(state.text(), field).unwrap_or_else(|| "-".to_string())
    });
    let entry = ActiveStateEntry {
        operation: operation_name(&file),
        state_file: relative_display(&file, &root),
        status,
        progress,
        started,
    };

    transact(ctx.store, &ctx.config.state_index_path(&root), |doc| {
        Ok(upsert::upsert_into(
            doc,
            ACTIVE_STATES.title,
            ACTIVE_STATES.headers,
            entry.clone().into(),
            &IDENTITY,
        ))
    })?;

    Ok(())
}

/// A markdown file directly inside `<marker>/<state_dir>/`, other than the
/// state index itself.
fn is_state_file(path: &Path, config: &LedgerConfig) -> bool {
    let Some(parent) = path.parent() else {
        return false;
    };
    let in_state_dir = parent.file_name().is_some_and(|n| n == config.state_dir.as_str())
        && parent
            .parent()
            .and_then(Path::file_name)
            .is_some_and(|n| n == config.marker_dir.as_str());
    let is_markdown = path.extension().is_some_and(|ext| ext == "md");
    let is_index = path.file_name() == config.state_index.file_name();

    in_state_dir && is_markdown && !is_index
}

/// Display name of the operation a state file tracks:
/// `refactor_state.md` becomes `Refactor`, `db_migration.md` `Db Migration`.
pub fn operation_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    title_case(&stem.replace("_state", "").replace('_', " "))
}

/// Uppercase the first letter of every word and lowercase the rest.
fn title_case(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                output.extend(c.to_uppercase());
            } else {
                output.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            output.push(c);
            at_word_start = true;
        }
    }
    output
}
