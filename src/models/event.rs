use std::path::PathBuf;

use serde::Deserialize;
use serde_json::Value;

/// Event name sent when a new session begins.
pub const SESSION_START: &str = "SessionStart";

/// Payload delivered to a hook on stdin.
///
/// Every field is optional; unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HookEvent {
    #[serde(default)]
    pub hook_event_name: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub cwd: Option<PathBuf>,
    #[serde(default)]
    pub tool_name: Option<String>,
    #[serde(default)]
    pub tool_input: Value,
}

/// Tools whose use the ledger reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Write,
    Edit,
    TodoWrite,
    Skill,
    Other,
}

impl Tool {
    pub fn from_name(name: &str) -> Self {
        match name {
            "Write" => Self::Write,
            "Edit" => Self::Edit,
            "TodoWrite" => Self::TodoWrite,
            "Skill" => Self::Skill,
            _ => Self::Other,
        }
    }

    pub fn writes_file(&self) -> bool {
        matches!(self, Self::Write | Self::Edit)
    }
}

impl HookEvent {
    /// Parse a payload. Blank input is an empty event.
    pub fn parse(input: &str) -> serde_json::Result<Self> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(input)
    }

    pub fn tool(&self) -> Option<Tool> {
        self.tool_name.as_deref().map(Tool::from_name)
    }

    pub fn is_session_start(&self) -> bool {
        self.hook_event_name.as_deref() == Some(SESSION_START)
    }

    fn input_str(&self, key: &str) -> Option<&str> {
        self.tool_input
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// `tool_input.file_path` of a file-writing tool.
    pub fn file_path(&self) -> Option<&str> {
        self.input_str("file_path")
    }

    /// `tool_input.skill` of a skill invocation.
    pub fn skill(&self) -> Option<&str> {
        self.input_str("skill")
    }

    /// `tool_input.todos`; entries that do not parse are skipped.
    pub fn todos(&self) -> Vec<TodoItem> {
        let Some(Value::Array(items)) = self.tool_input.get("todos") else {
            return Vec::new();
        };
        items
            .iter()
            .filter_map(|item| match serde_json::from_value(item.clone()) {
                Ok(todo) => Some(todo),
                Err(e) => {
                    tracing::debug!(error = %e, "skipping malformed todo");
                    None
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TodoItem {
    #[serde(default = "unknown_task")]
    pub content: String,
    #[serde(default)]
    pub status: TodoStatus,
    /// Present-tense phrasing shown while the todo is in progress.
    #[serde(rename = "activeForm", default)]
    pub active_form: Option<String>,
}

fn unknown_task() -> String {
    "Unknown task".to_string()
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    #[serde(other)]
    Unknown,
}
