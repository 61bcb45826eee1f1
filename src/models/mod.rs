//! Domain models for the ledger.
//!
//! # Hook events
//!
//! - [`HookEvent`]: the JSON payload a hook receives on stdin.
//! - [`TodoItem`]: one entry of a task-list update.
//!
//! # Ledger tables
//!
//! Each known section has a fixed [`SectionShape`] and a typed entry that
//! converts into a table [`Row`](ledger_core::Row):
//!
//! - [`CompletedEntry`]: `Completed This Session`, work finished in the current session.
//! - [`InProgressEntry`]: `In Progress`, mirrors the in-flight todos.
//! - [`ActiveStateEntry`]: `Active States`, one row per long-running operation state file.
//! - [`HistoryEntry`]: `Session History`, one summary row per archived session.

mod entries;
mod event;

pub use entries::*;
pub use event::*;
