use std::path::PathBuf;

use thiserror::Error;

/// Failures a transaction surfaces to its caller.
///
/// Structural problems in a document (missing sections, missing tables,
/// malformed rows) are never errors; they degrade to empty results.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("field '{field}' in section '{section}' is not numeric: {value:?}")]
    NotNumeric {
        section: String,
        field: String,
        value: String,
    },

    #[error("I/O failure on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} changed on disk during the transaction", path.display())]
    Conflict { path: PathBuf },
}

impl LedgerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
