use chrono::NaiveDate;
use ledger_core::markdown::{fields, upsert};
use ledger_core::{transact, Result, Row};

use super::HookContext;
use crate::models::{
    HistoryEntry, HookEvent, COMMANDS_RUN, COMPLETED_THIS_SESSION, CURRENT_SESSION,
    DOCUMENTS_TOUCHED, SESSION_HISTORY,
};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_WIDTH: usize = "YYYY-MM-DD".len();

/// History rows are never merged; each archived session appends one.
const NO_IDENTITY: [&str; 0] = [];

/// Archive the previous session's completed work and reset the session.
///
/// Runs only when `Completed This Session` has real rows. The history row and
/// counter reset go to the state index; the completed table is then emptied.
pub(super) fn run(event: &HookEvent, ctx: &HookContext) -> Result<()> {
    let Some(root) = ctx.project_root(&ctx.event_dir(event)) else {
        tracing::debug!("no project root");
        return Ok(());
    };

    let context_path = ctx.config.active_context_path(&root);
    let tasks = ctx
        .store
        .load(&context_path)?
        .read_table(COMPLETED_THIS_SESSION.title)
        .into_records();
    if tasks.is_empty() {
        tracing::debug!("nothing completed in the previous session");
        return Ok(());
    }

    let date = tasks
        .first()
        .and_then(|task| task.get("Notes"))
        .and_then(find_date)
        .unwrap_or_else(|| ctx.date());
    let entry = HistoryEntry {
        session: format!("Session-{}", ctx.now.format("%Y%m%d")),
        date,
        focus: format!("{} items", tasks.len()),
        outcome: summarize(&tasks),
    };

    transact(ctx.store, &ctx.config.state_index_path(&root), |doc| {
        let doc = upsert::upsert_into(
            doc,
            SESSION_HISTORY.title,
            SESSION_HISTORY.headers,
            entry.clone().into(),
            &NO_IDENTITY,
        );
        let doc = fields::reset(&doc, CURRENT_SESSION, DOCUMENTS_TOUCHED, "0");
        Ok(fields::reset(&doc, CURRENT_SESSION, COMMANDS_RUN, "0"))
    })?;

    transact(ctx.store, &context_path, |doc| {
        Ok(doc.write_table(
            COMPLETED_THIS_SESSION.title,
            COMPLETED_THIS_SESSION.headers,
            &[],
        ))
    })?;

    tracing::info!(items = tasks.len(), "previous session archived");
    Ok(())
}

/// Short description of a session's completed rows, e.g. `2 files, 1 tasks`.
pub fn summarize(tasks: &[Row]) -> String {
    if tasks.is_empty() {
        return "No tasks completed".to_string();
    }

    let count = |needle: &str| {
        tasks
            .iter()
            .filter(|task| task.get("Task").is_some_and(|t| t.contains(needle)))
            .count()
    };

    let parts: Vec<String> = [
        (count("Created/Updated"), "files"),
        (count("Completed:"), "tasks"),
        (count("Modified"), "edits"),
    ]
    .into_iter()
    .filter(|(n, _)| *n > 0)
    .map(|(n, label)| format!("{} {}", n, label))
    .collect();

    if parts.is_empty() {
        "Session completed".to_string()
    } else {
        parts.join(", ")
    }
}

/// First `YYYY-MM-DD` date in `text`.
fn find_date(text: &str) -> Option<String> {
    text.char_indices()
        .filter(|(_, c)| c.is_ascii_digit())
        .filter_map(|(start, _)| text.get(start..start + DATE_WIDTH))
        .find_map(|candidate| NaiveDate::parse_from_str(candidate, DATE_FORMAT).ok())
        .map(|date| date.format(DATE_FORMAT).to_string())
}
