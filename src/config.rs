use anyhow::{Context, Result};
use chrono::format::{Item, StrftimeItems};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "context-ledger";
const CONFIG_FILE: &str = "config.json";

const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";
const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Where the ledger documents live and how entries are stamped.
///
/// Document paths are relative to the marker directory of the project root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Directory whose presence marks a project root.
    pub marker_dir: String,
    /// Document holding `Completed This Session` and `In Progress`.
    pub active_context: PathBuf,
    /// Document holding `Current Session`, `Active States` and `Session History`.
    pub state_index: PathBuf,
    /// Document listing indexed source files.
    pub registry: PathBuf,
    /// Directory (under the marker) whose markdown files are operation states.
    pub state_dir: String,
    pub timestamp_format: String,
    pub date_format: String,
    /// Longest todo text copied into a completed-task label.
    pub task_label_width: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            marker_dir: ".claude".to_string(),
            active_context: PathBuf::from("memory/active_context.md"),
            state_index: PathBuf::from("state/_index.md"),
            registry: PathBuf::from("memory/_registry.md"),
            state_dir: "state".to_string(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            task_label_width: 50,
        }
    }
}

impl LedgerConfig {
    /// Load configuration from `path`, or from the user's config directory.
    /// Returns default config if the file doesn't exist or fails to parse.
    pub fn load(path: Option<&Path>) -> Self {
        let config = match Self::try_load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        };
        config.validated()
    }

    fn try_load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => get_config_path()?,
        };
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).context("Failed to read config file")?;

        let config = serde_json::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Replace unusable strftime patterns with the defaults.
    fn validated(mut self) -> Self {
        if !is_valid_format(&self.timestamp_format) {
            tracing::warn!(format = %self.timestamp_format, "invalid timestamp format, using default");
            self.timestamp_format = DEFAULT_TIMESTAMP_FORMAT.to_string();
        }
        if !is_valid_format(&self.date_format) {
            tracing::warn!(format = %self.date_format, "invalid date format, using default");
            self.date_format = DEFAULT_DATE_FORMAT.to_string();
        }
        self
    }

    pub fn marker_path(&self, root: &Path) -> PathBuf {
        root.join(&self.marker_dir)
    }

    pub fn active_context_path(&self, root: &Path) -> PathBuf {
        self.marker_path(root).join(&self.active_context)
    }

    pub fn state_index_path(&self, root: &Path) -> PathBuf {
        self.marker_path(root).join(&self.state_index)
    }

    pub fn registry_path(&self, root: &Path) -> PathBuf {
        self.marker_path(root).join(&self.registry)
    }
}

fn is_valid_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

fn get_config_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = LedgerConfig::load(Some(&dir.path().join("absent.json")));
        assert_eq!(config.marker_dir, ".claude");
        assert_eq!(config.task_label_width, 50);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"marker_dir": ".agent", "task_label_width": 20}"#).unwrap();

        let config = LedgerConfig::load(Some(&path));
        assert_eq!(config.marker_dir, ".agent");
        assert_eq!(config.task_label_width, 20);
        assert_eq!(config.state_index, PathBuf::from("state/_index.md"));
    }

    #[test]
    fn test_unparsable_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();

        assert_eq!(LedgerConfig::load(Some(&path)).marker_dir, ".claude");
    }

    #[test]
    fn test_invalid_format_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"timestamp_format": "%Q broken %"}"#).unwrap();

        assert_eq!(LedgerConfig::load(Some(&path)).timestamp_format, "%Y-%m-%d %H:%M");
    }

    #[test]
    fn test_document_paths() {
        let config = LedgerConfig::default();
        let root = Path::new("/work/project");
        assert_eq!(
            config.state_index_path(root),
            PathBuf::from("/work/project/.claude/state/_index.md")
        );
        assert_eq!(
            config.active_context_path(root),
            PathBuf::from("/work/project/.claude/memory/active_context.md")
        );
    }
}
