use ledger_core::Row;

/// Title and column layout of a ledger table.
#[derive(Debug, Clone, Copy)]
pub struct SectionShape {
    pub title: &'static str,
    pub headers: &'static [&'static str],
}

pub const COMPLETED_THIS_SESSION: SectionShape = SectionShape {
    title: "Completed This Session",
    headers: &["Task", "Files", "Notes"],
};

pub const IN_PROGRESS: SectionShape = SectionShape {
    title: "In Progress",
    headers: &["Task", "Status", "Notes"],
};

pub const ACTIVE_STATES: SectionShape = SectionShape {
    title: "Active States",
    headers: &["Operation", "State File", "Status", "Progress", "Started"],
};

pub const SESSION_HISTORY: SectionShape = SectionShape {
    title: "Session History",
    headers: &["Session", "Date", "Focus", "Outcome"],
};

/// Key/value section with the session counters.
pub const CURRENT_SESSION: &str = "Current Session";
pub const COMMANDS_RUN: &str = "Commands Run";
pub const DOCUMENTS_TOUCHED: &str = "Documents Touched";

/// Work finished during the current session.
///
/// File edits carry the edited path in `files`; completed todos use `-`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedEntry {
    pub task: String,
    pub files: String,
    pub notes: String,
}

impl From<CompletedEntry> for Row {
    fn from(entry: CompletedEntry) -> Self {
        Row::new()
            .with("Task", entry.task)
            .with("Files", entry.files)
            .with("Notes", entry.notes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InProgressEntry {
    pub task: String,
    pub status: String,
    pub notes: String,
}

impl From<InProgressEntry> for Row {
    fn from(entry: InProgressEntry) -> Self {
        Row::new()
            .with("Task", entry.task)
            .with("Status", entry.status)
            .with("Notes", entry.notes)
    }
}

/// Progress of a long-running operation, mirrored from its state file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveStateEntry {
    pub operation: String,
    /// State file path relative to the project root.
    pub state_file: String,
    pub status: String,
    pub progress: String,
    pub started: String,
}

impl From<ActiveStateEntry> for Row {
    fn from(entry: ActiveStateEntry) -> Self {
        Row::new()
            .with("Operation", entry.operation)
            .with("State File", entry.state_file)
            .with("Status", entry.status)
            .with("Progress", entry.progress)
            .with("Started", entry.started)
    }
}

/// Summary of an archived session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub session: String,
    pub date: String,
    pub focus: String,
    pub outcome: String,
}

impl From<HistoryEntry> for Row {
    fn from(entry: HistoryEntry) -> Self {
        Row::new()
            .with("Session", entry.session)
            .with("Date", entry.date)
            .with("Focus", entry.focus)
            .with("Outcome", entry.outcome)
    }
}
