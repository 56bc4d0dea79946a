use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use tracing::{debug, warn};

/// Key-value persistence for UI preferences.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// Preferences kept in a flat TOML table on disk (`~/.chatbox/prefs.toml`).
///
/// Read and write failures are logged and otherwise ignored.
#[derive(Debug)]
pub struct FilePrefs {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FilePrefs {
    pub fn open(path: PathBuf) -> Self {
        let values = match fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "failed to parse prefs, starting empty");
                BTreeMap::new()
            }),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no prefs file");
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    fn save(&self) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!(path = %parent.display(), error = %e, "failed to create prefs dir");
                return;
            }
        }
        let content = match toml::to_string(&self.values) {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "failed to serialize prefs");
                return;
            }
        };
        if let Err(e) = fs::write(&self.path, content) {
            warn!(path = %self.path.display(), error = %e, "failed to write prefs");
        }
    }
}

impl PreferenceStore for FilePrefs {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        if self.values.get(key).map(String::as_str) == Some(value) {
            return;
        }
        self.values.insert(key.to_string(), value.to_string());
        self.save();
    }
}

/// In-memory store, never persisted.
#[derive(Debug, Default)]
pub struct MemoryPrefs {
    values: BTreeMap<String, String>,
}

impl PreferenceStore for MemoryPrefs {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_prefs_persist_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/prefs.toml");

        let mut prefs = FilePrefs::open(path.clone());
        assert!(prefs.get("theme").is_none());
        prefs.set("theme", "dark");

        let reopened = FilePrefs::open(path.clone());
        assert_eq!(reopened.get("theme").as_deref(), Some("dark"));
        assert!(fs::read_to_string(&path).unwrap().contains("theme = \"dark\""));
    }

    #[test]
    fn test_file_prefs_ignore_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        fs::write(&path, "theme = [[[").unwrap();

        let prefs = FilePrefs::open(path);
        assert!(prefs.get("theme").is_none());
    }

    #[test]
    fn test_memory_prefs() {
        let mut prefs = MemoryPrefs::default();
        prefs.set("theme", "light");
        assert_eq!(prefs.get("theme").as_deref(), Some("light"));
    }
}
