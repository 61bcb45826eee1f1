//! Hook handlers: each turns one assistant event into ledger transactions.
//!
//! Handlers never fail on missing documents, sections or fields; those are
//! no-ops. Only storage failures and non-numeric counters come back as errors,
//! and the caller logs them without failing the host.

mod command_tracker;
mod registry;
mod session_history;
mod session_tracker;
mod state_sync;
mod todo_sync;

use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Local};
use clap::ValueEnum;
use ledger_core::{DocumentStore, Result};

use crate::config::LedgerConfig;
use crate::models::{HookEvent, Tool};

pub use registry::mark_stale;
pub use session_history::summarize;
pub use state_sync::operation_name;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HookKind {
    /// Record file writes in `Completed This Session` and count them.
    SessionTracker,
    /// Count slash-command (skill) invocations.
    CommandTracker,
    /// Mirror the todo list into `In Progress` and `Completed This Session`.
    TodoSync,
    /// Mirror operation state files into `Active States`.
    StateSync,
    /// Mark registry entries of edited files as stale.
    RegistryStaleness,
    /// Archive the previous session into `Session History`.
    SessionHistory,
}

impl HookKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SessionTracker => "session-tracker",
            Self::CommandTracker => "command-tracker",
            Self::TodoSync => "todo-sync",
            Self::StateSync => "state-sync",
            Self::RegistryStaleness => "registry-staleness",
            Self::SessionHistory => "session-history",
        }
    }
}

/// Everything a handler needs besides the event itself.
pub struct HookContext<'a> {
    pub config: &'a LedgerConfig,
    pub store: &'a dyn DocumentStore,
    pub now: DateTime<Local>,
    /// Process working directory, used when the event carries no `cwd`.
    pub cwd: PathBuf,
}

impl HookContext<'_> {
    pub fn timestamp(&self) -> String {
        self.now.format(&self.config.timestamp_format).to_string()
    }

    pub fn date(&self) -> String {
        self.now.format(&self.config.date_format).to_string()
    }

    /// `path` made absolute against the working directory.
    fn absolute(&self, path: &Path) -> PathBuf {
        self.cwd.join(path)
    }

    /// Working directory of the event, falling back to the process one.
    fn event_dir(&self, event: &HookEvent) -> PathBuf {
        match &event.cwd {
            Some(cwd) => self.absolute(cwd),
            None => self.cwd.clone(),
        }
    }

    fn project_root(&self, start: &Path) -> Option<PathBuf> {
        find_project_root(start, &self.config.marker_dir)
    }
}

/// Nearest ancestor of `start` (itself included) holding a `marker` directory.
pub fn find_project_root(start: &Path, marker: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(marker).is_dir())
        .map(Path::to_path_buf)
}

/// True when any component of `path` is the marker directory.
pub fn is_inside_marker_dir(path: &Path, marker: &str) -> bool {
    path.components()
        .any(|c| matches!(c, Component::Normal(name) if name == marker))
}

/// `path` relative to `root` with `/` separators, or just its file name when
/// it lies outside the root.
pub fn relative_display(path: &Path, root: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(relative) => relative.to_string_lossy().replace('\\', "/"),
        Err(_) => file_name(path),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Handlers interested in `event`, in the order they should run.
pub fn route(event: &HookEvent) -> Vec<HookKind> {
    if event.is_session_start() {
        return vec![HookKind::SessionHistory];
    }
    match event.tool() {
        Some(Tool::Write | Tool::Edit) => vec![
            HookKind::SessionTracker,
            HookKind::StateSync,
            HookKind::RegistryStaleness,
        ],
        Some(Tool::TodoWrite) => vec![HookKind::TodoSync],
        Some(Tool::Skill) => vec![HookKind::CommandTracker],
        Some(Tool::Other) | None => Vec::new(),
    }
}

pub fn run(kind: HookKind, event: &HookEvent, ctx: &HookContext) -> Result<()> {
    tracing::debug!(
        hook = kind.as_str(),
        tool = ?event.tool_name,
        session = ?event.session_id,
        "running hook"
    );
    match kind {
        HookKind::SessionTracker => session_tracker::run(event, ctx),
        HookKind::CommandTracker => command_tracker::run(event, ctx),
        HookKind::TodoSync => todo_sync::run(event, ctx),
        HookKind::StateSync => state_sync::run(event, ctx),
        HookKind::RegistryStaleness => registry::run(event, ctx),
        HookKind::SessionHistory => session_history::run(event, ctx),
    }
}

/// Run every routed handler, logging failures. Returns how many failed.
pub fn dispatch(event: &HookEvent, ctx: &HookContext) -> usize {
    let mut failures = 0;
    for kind in route(event) {
        if let Err(e) = run(kind, event, ctx) {
            tracing::warn!(hook = kind.as_str(), error = %e, "hook failed");
            failures += 1;
        }
    }
    failures
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(json: &str) -> HookEvent {
        HookEvent::parse(json).unwrap()
    }

    #[test]
    fn test_route_by_tool() {
        assert_eq!(
            route(&event(r#"{"tool_name": "Write"}"#)),
            vec![
                HookKind::SessionTracker,
                HookKind::StateSync,
                HookKind::RegistryStaleness
            ]
        );
        assert_eq!(route(&event(r#"{"tool_name": "TodoWrite"}"#)), vec![HookKind::TodoSync]);
        assert_eq!(route(&event(r#"{"tool_name": "Skill"}"#)), vec![HookKind::CommandTracker]);
        assert!(route(&event(r#"{"tool_name": "Bash"}"#)).is_empty());
        assert!(route(&event("{}")).is_empty());
    }

    #[test]
    fn test_route_session_start() {
        assert_eq!(
            route(&event(r#"{"hook_event_name": "SessionStart"}"#)),
            vec![HookKind::SessionHistory]
        );
    }

    #[test]
    fn test_find_project_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".claude")).unwrap();
        std::fs::create_dir_all(dir.path().join("src/deep")).unwrap();

        let root = find_project_root(&dir.path().join("src/deep/file.rs"), ".claude");
        assert_eq!(root.as_deref(), Some(dir.path()));
        assert_eq!(find_project_root(dir.path(), ".claude").as_deref(), Some(dir.path()));
        assert!(find_project_root(&dir.path().join("src"), ".nothing-here").is_none());
    }

    #[test]
    fn test_is_inside_marker_dir() {
        assert!(is_inside_marker_dir(Path::new("/p/.claude/state/x.md"), ".claude"));
        assert!(!is_inside_marker_dir(Path::new("/p/src/claude.rs"), ".claude"));
    }

    #[test]
    fn test_relative_display() {
        let root = Path::new("/p");
        assert_eq!(relative_display(Path::new("/p/src/x.py"), root), "src/x.py");
        assert_eq!(relative_display(Path::new("/elsewhere/y.py"), root), "y.py");
    }
}
