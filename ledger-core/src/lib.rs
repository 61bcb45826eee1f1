//! Core engine for markdown ledger documents: sections, tables, row upserts,
//! key/value fields and the read-transform-write transaction around them.

pub mod error;
pub mod markdown;
pub mod store;

pub use error::{LedgerError, Result};
pub use markdown::{Document, Row, Table};
pub use store::{transact, DocumentStore, FsStore, MemoryStore, Outcome};
