//! Client-local preference storage.
//!
//! Preferences are plain string values under string keys with no schema
//! versioning. Two keys are used by the site: the current language preference
//! and a legacy key kept from an older release of the language selector.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Key holding the preferred language code.
pub const LANGUAGE_KEY: &str = "site.language";

/// Key written by the previous language selector, still honoured on read.
pub const LEGACY_LANGUAGE_KEY: &str = "legacy:lang";

/// Simple string key/value store.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;

    /// Persist a value. Failures are the store's concern; callers never fail
    /// because a preference could not be saved.
    fn set(&mut self, key: &str, value: &str);
}

/// In-memory store, lost when the session ends.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    values: HashMap<String, String>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-seeded with one value.
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// Store backed by a JSON object file.
///
/// The file is read once when opened and rewritten on every `set`. A missing
/// or unreadable file starts an empty store.
#[derive(Debug)]
pub struct FilePreferences {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl FilePreferences {
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!("Ignoring malformed preferences file {}: {}", path.display(), e);
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };
        Self { path, values }
    }

    fn save(&self) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, json)
    }
}

impl PreferenceStore for FilePreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
        if let Err(e) = self.save() {
            warn!("Failed to save preferences to {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_preferences() {
        let mut prefs = MemoryPreferences::new().with(LEGACY_LANGUAGE_KEY, "de");
        assert_eq!(prefs.get(LEGACY_LANGUAGE_KEY).as_deref(), Some("de"));
        assert_eq!(prefs.get(LANGUAGE_KEY), None);

        prefs.set(LANGUAGE_KEY, "pt");
        prefs.set(LANGUAGE_KEY, "es");
        assert_eq!(prefs.get(LANGUAGE_KEY).as_deref(), Some("es"));
    }

    #[test]
    fn test_file_preferences_persist_across_opens() {
        let temp_dir = TempDir::new().expect("temp dir");
        let path = temp_dir.path().join("prefs.json");

        let mut prefs = FilePreferences::open(&path);
        assert_eq!(prefs.get(LANGUAGE_KEY), None);
        prefs.set(LANGUAGE_KEY, "pt");

        let reopened = FilePreferences::open(&path);
        assert_eq!(reopened.get(LANGUAGE_KEY).as_deref(), Some("pt"));
    }

    #[test]
    fn test_file_preferences_malformed_file_starts_empty() {
        let temp_dir = TempDir::new().expect("temp dir");
        let path = temp_dir.path().join("prefs.json");
        std::fs::write(&path, "not json").expect("write");

        let prefs = FilePreferences::open(&path);
        assert_eq!(prefs.get(LANGUAGE_KEY), None);
    }

    #[test]
    fn test_file_preferences_unwritable_path_is_not_fatal() {
        let temp_dir = TempDir::new().expect("temp dir");
        let path = temp_dir.path().join("missing-dir").join("prefs.json");

        let mut prefs = FilePreferences::open(&path);
        prefs.set(LANGUAGE_KEY, "de");
        // Value is still served from memory for this session
        assert_eq!(prefs.get(LANGUAGE_KEY).as_deref(), Some("de"));
    }
}
