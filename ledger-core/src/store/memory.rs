use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::DocumentStore;
use crate::error::Result;
use crate::markdown::Document;

/// Documents held in memory, keyed by path. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: Arc<Mutex<HashMap<PathBuf, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<PathBuf>, text: impl Into<String>) {
        let mut documents = self.documents.lock().expect("document store lock poisoned");
        documents.insert(path.into(), text.into());
    }

    pub fn get(&self, path: &Path) -> Option<String> {
        let documents = self.documents.lock().expect("document store lock poisoned");
        documents.get(path).cloned()
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self, path: &Path) -> Result<Document> {
        Ok(match self.get(path) {
            Some(text) => Document::new(path, text),
            None => Document::empty(path),
        })
    }

    fn save(&self, document: &Document) -> Result<()> {
        self.insert(document.path(), document.text());
        Ok(())
    }
}
