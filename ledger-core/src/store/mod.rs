//! Loading and persisting documents.
//!
//! Transforms are pure functions over [`Document`]s; the store is the only
//! place that touches storage.

mod fs;
mod memory;

use std::path::Path;

pub use fs::FsStore;
pub use memory::MemoryStore;

use crate::error::{LedgerError, Result};
use crate::markdown::Document;

const MAX_ATTEMPTS: usize = 3;

pub trait DocumentStore {
    /// Load a document. A file that does not exist loads as an empty document.
    fn load(&self, path: &Path) -> Result<Document>;

    /// Persist a document in full, creating parent directories as needed.
    fn save(&self, document: &Document) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Unchanged,
    Written,
}

/// Run one read-transform-write cycle against `path`.
///
/// Nothing is written when the transform returns identical text. Before
/// saving, the document is read again; if it changed since the snapshot the
/// transform is re-applied to the new text, up to three attempts.
///
/// # Errors
/// Propagates store and transform errors, and returns
/// [`LedgerError::Conflict`] when every attempt saw a concurrent change.
pub fn transact<S, F>(store: &S, path: &Path, mut transform: F) -> Result<Outcome>
where
    S: DocumentStore + ?Sized,
    F: FnMut(&Document) -> Result<Document>,
{
    for attempt in 1..=MAX_ATTEMPTS {
        let snapshot = store.load(path)?;
        let updated = transform(&snapshot)?;

        if updated.text() == snapshot.text() {
            tracing::debug!(path = %path.display(), "no change");
            return Ok(Outcome::Unchanged);
        }

        let current = store.load(path)?;
        if current.text() != snapshot.text() {
            tracing::warn!(path = %path.display(), attempt, "document changed during transaction, retrying");
            continue;
        }

        store.save(&updated)?;
        tracing::info!(path = %path.display(), "document updated");
        return Ok(Outcome::Written);
    }

    Err(LedgerError::Conflict {
        path: path.to_path_buf(),
    })
}
