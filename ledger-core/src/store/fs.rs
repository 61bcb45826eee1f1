use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use super::DocumentStore;
use crate::error::{LedgerError, Result};
use crate::markdown::Document;

/// Documents on the local filesystem, UTF-8 encoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStore;

impl DocumentStore for FsStore {
    fn load(&self, path: &Path) -> Result<Document> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(Document::new(path, text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Document::empty(path)),
            Err(e) => Err(LedgerError::io(path, e)),
        }
    }

    fn save(&self, document: &Document) -> Result<()> {
        let path = document.path();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| LedgerError::io(parent, e))?;
        }
        fs::write(path, document.text()).map_err(|e| LedgerError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let doc = FsStore.load(&dir.path().join("absent.md")).unwrap();
        assert!(doc.is_blank());
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".claude/state/_index.md");

        FsStore.save(&Document::new(&path, "## Current Session\n")).unwrap();

        assert_eq!(FsStore.load(&path).unwrap().text(), "## Current Session\n");
    }

    #[test]
    fn test_directory_is_an_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = FsStore.load(dir.path()).unwrap_err();
        assert!(matches!(err, LedgerError::Io { .. }));
    }
}
