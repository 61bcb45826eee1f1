use std::path::Path;

use ledger_core::markdown::{fields, upsert};
use ledger_core::{transact, Result};

use super::{file_name, is_inside_marker_dir, relative_display, HookContext};
use crate::models::{
    CompletedEntry, HookEvent, Tool, COMPLETED_THIS_SESSION, CURRENT_SESSION, DOCUMENTS_TOUCHED,
};

/// One row per edited file, keyed by its path.
const IDENTITY: [&str; 1] = ["Files"];

pub(super) fn run(event: &HookEvent, ctx: &HookContext) -> Result<()> {
    let Some(tool) = event.tool().filter(Tool::writes_file) else {
        return Ok(());
    };
    let Some(file_path) = event.file_path() else {
        return Ok(());
    };

    let file = ctx.absolute(Path::new(file_path));
    if is_inside_marker_dir(&file, &ctx.config.marker_dir) {
        tracing::debug!(file = %file.display(), "ledger file, not tracked");
        return Ok(());
    }
    let Some(root) = ctx.project_root(&file) else {
        tracing::debug!(file = %file.display(), "no project root");
        return Ok(());
    };

    let action = match tool {
        Tool::Edit => "Modified",
        _ => "Created/Updated",
    };
    let entry = CompletedEntry {
        task: format!("{} {}", action, file_name(&file)),
        files: relative_display(&file, &root),
        notes: ctx.timestamp(),
    };

    transact(ctx.store, &ctx.config.active_context_path(&root), |doc| {
        Ok(upsert::upsert_into(
            doc,
            COMPLETED_THIS_SESSION.title,
            COMPLETED_THIS_SESSION.headers,
            entry.clone().into(),
            &IDENTITY,
        ))
    })?;

    transact(ctx.store, &ctx.config.state_index_path(&root), |doc| {
        fields::increment(doc, CURRENT_SESSION, DOCUMENTS_TOUCHED, 1)
    })?;

    Ok(())
}
