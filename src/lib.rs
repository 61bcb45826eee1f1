//! Markdown session ledger kept in sync with AI coding-assistant hook events.
//!
//! The table engine lives in [`ledger_core`]; this crate adds configuration,
//! the hook event model and the handlers that map events onto ledger
//! transactions.

pub mod config;
pub mod hooks;
pub mod models;

pub use ledger_core::{markdown, store, Document, LedgerError, Row, Table};
