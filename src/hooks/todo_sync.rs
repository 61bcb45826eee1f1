use ledger_core::markdown::upsert;
use ledger_core::{transact, Document, Result, Row};

use super::HookContext;
use crate::models::{
    CompletedEntry, HookEvent, InProgressEntry, TodoItem, TodoStatus, Tool,
    COMPLETED_THIS_SESSION, IN_PROGRESS,
};

/// Prefixes of todos that describe file edits, already tracked per file.
const FILE_EDIT_PREFIXES: [&str; 2] = ["Modified", "Created"];

pub(super) fn run(event: &HookEvent, ctx: &HookContext) -> Result<()> {
    if event.tool() != Some(Tool::TodoWrite) {
        return Ok(());
    }
    let todos = event.todos();
    if todos.is_empty() {
        return Ok(());
    }

    let Some(root) = ctx.project_root(&ctx.event_dir(event)) else {
        tracing::debug!("no project root");
        return Ok(());
    };

    let in_progress: Vec<Row> = todos
        .iter()
        .filter(|todo| todo.status == TodoStatus::InProgress)
        .map(|todo| {
            InProgressEntry {
                task: todo.content.clone(),
                status: "In Progress".to_string(),
                notes: todo.active_form.clone().unwrap_or_else(|| "-".to_string()),
            }
            .into()
        })
        .collect();

    let timestamp = ctx.timestamp();
    let completed: Vec<CompletedEntry> = todos
        .iter()
        .filter(|todo| todo.status == TodoStatus::Completed)
        .filter(|todo| !is_file_edit(todo))
        .map(|todo| CompletedEntry {
            task: format!(
                "Completed: {}",
                truncate(&todo.content, ctx.config.task_label_width)
            ),
            files: "-".to_string(),
            notes: timestamp.clone(),
        })
        .collect();

    transact(ctx.store, &ctx.config.active_context_path(&root), |doc| {
        let mut doc = doc.write_table(IN_PROGRESS.title, IN_PROGRESS.headers, &in_progress);
        for entry in &completed {
            doc = record_completion(&doc, entry);
        }
        Ok(doc)
    })?;

    Ok(())
}

fn is_file_edit(todo: &TodoItem) -> bool {
    FILE_EDIT_PREFIXES
        .iter()
        .any(|prefix| todo.content.starts_with(prefix))
}

fn truncate(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

/// Add a completed todo unless it is already listed; the first completion
/// time is kept.
fn record_completion(doc: &Document, entry: &CompletedEntry) -> Document {
    let already_listed = doc
        .read_table(COMPLETED_THIS_SESSION.title)
        .records()
        .any(|row| row.get("Task") == Some(entry.task.as_str()));
    if already_listed {
        return doc.clone();
    }
    upsert::upsert_into(
        doc,
        COMPLETED_THIS_SESSION.title,
        COMPLETED_THIS_SESSION.headers,
        entry.clone().into(),
        &["Task"],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("héllo wörld", 5), "héllo");
        assert_eq!(truncate("short", 50), "short");
    }

    #[test]
    fn test_record_completion_keeps_first_time() {
        let doc = Document::new(
            "ctx.md",
            "## Completed This Session\n\n| Task | Files | Notes |\n|------|------|------|\n| Completed: Ship | - | 2024-01-01 09:00 |\n",
        );
        let entry = CompletedEntry {
            task: "Completed: Ship".to_string(),
            files: "-".to_string(),
            notes: "2024-01-01 12:00".to_string(),
        };
        assert_eq!(record_completion(&doc, &entry), doc);
    }
}
