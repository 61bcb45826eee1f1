//! Markdown documents as a small table store.
//!
//! - [`table`]: pipe-delimited table parse/render.
//! - [`section`]: `##` heading spans.
//! - [`Document`]: section-scoped table reads and writes.
//! - [`upsert`]: row merge with placeholder and identity rules.
//! - [`fields`]: two-column key/value tables (counters, status fields).

mod document;
pub mod fields;
pub mod section;
pub mod table;
pub mod upsert;

pub use document::Document;
pub use table::{Row, Table};
