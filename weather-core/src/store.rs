//! Local preference store holding the last successful weather payload.
//!
//! A private key/value namespace persisted as one JSON object per file.
//! Last write wins; nothing is versioned or expired.

use std::{
    collections::BTreeMap,
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing::warn;

use crate::error::StoreError;

/// Name of the preference namespace.
pub const PREFERENCE_NAME: &str = "WeatherAppPreference";

/// Key under which the serialized weather record is kept.
pub const WEATHER_RESPONSE_DATA: &str = "weather_response_data";

pub trait PreferenceStore: Send + Sync + Debug {
    fn put_string(&self, key: &str, value: &str) -> Result<(), StoreError>;

    fn get_string(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrite the cached weather payload.
    fn save(&self, payload: &str) -> Result<(), StoreError> {
        self.put_string(WEATHER_RESPONSE_DATA, payload)
    }

    /// Cached weather payload; empty values count as absent.
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self
            .get_string(WEATHER_RESPONSE_DATA)?
            .filter(|payload| !payload.is_empty()))
    }
}

/// Preference namespace backed by `<dir>/<namespace>.json`.
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FilePreferenceStore {
    pub fn new(dir: &Path, namespace: &str) -> Self {
        Self {
            path: dir.join(format!("{namespace}.json")),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        Ok(serde_json::from_str(&contents)?)
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn put_string(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut entries = match self.read_all() {
            Ok(entries) => entries,
            Err(StoreError::Serialize(err)) => {
                warn!(path = %self.path.display(), "discarding unreadable preference file: {err}");
                BTreeMap::new()
            }
            Err(err) => return Err(err),
        };
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Replace atomically.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(&entries)?)?;
        fs::rename(&tmp, &self.path)?;

        Ok(())
    }

    fn get_string(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(self.read_all()?.remove(key))
    }
}

/// In-memory preference namespace.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl PreferenceStore for MemoryPreferenceStore {
    fn put_string(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get_string(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(entries.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn save_then_load_returns_same_payload() {
        let dir = TempDir::new().unwrap();
        let store = FilePreferenceStore::new(dir.path(), PREFERENCE_NAME);

        let payload = r#"{"name":"Zürich","weather":[{"main":"Snow"}]}"#;
        store.save(payload).unwrap();

        assert_eq!(store.load().unwrap().as_deref(), Some(payload));
    }

    #[test]
    fn load_without_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FilePreferenceStore::new(dir.path(), PREFERENCE_NAME);

        assert_eq!(store.load().unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn last_write_wins() {
        let dir = TempDir::new().unwrap();
        let store = FilePreferenceStore::new(dir.path(), PREFERENCE_NAME);

        store.save("first").unwrap();
        store.save("second").unwrap();

        assert_eq!(store.load().unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn other_keys_survive_save() {
        let dir = TempDir::new().unwrap();
        let store = FilePreferenceStore::new(dir.path(), PREFERENCE_NAME);

        store.put_string("other", "kept").unwrap();
        store.save("payload").unwrap();

        assert_eq!(store.get_string("other").unwrap().as_deref(), Some("kept"));
    }

    #[test]
    fn persists_across_instances() {
        let dir = TempDir::new().unwrap();
        FilePreferenceStore::new(dir.path(), PREFERENCE_NAME).save("payload").unwrap();

        let reopened = FilePreferenceStore::new(dir.path(), PREFERENCE_NAME);
        assert_eq!(reopened.load().unwrap().as_deref(), Some("payload"));
    }

    #[test]
    fn creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FilePreferenceStore::new(&nested, PREFERENCE_NAME);

        store.save("payload").unwrap();
        assert!(nested.join("WeatherAppPreference.json").exists());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = FilePreferenceStore::new(dir.path(), PREFERENCE_NAME);
        fs::write(store.path(), "not json").unwrap();

        assert!(matches!(store.load(), Err(StoreError::Serialize(_))));
    }

    #[test]
    fn save_replaces_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let store = FilePreferenceStore::new(dir.path(), PREFERENCE_NAME);
        fs::write(store.path(), r#"{"weather_response_data": 42}"#).unwrap();

        store.save("fresh").unwrap();

        assert_eq!(store.load().unwrap().as_deref(), Some("fresh"));
    }

    #[test]
    fn save_replaces_truncated_file() {
        let dir = TempDir::new().unwrap();
        let store = FilePreferenceStore::new(dir.path(), PREFERENCE_NAME);
        fs::write(store.path(), r#"{"weather_response_da"#).unwrap();

        store.save("fresh").unwrap();
        store.save("fresher").unwrap();

        assert_eq!(store.load().unwrap().as_deref(), Some("fresher"));
    }

    #[test]
    fn empty_value_counts_as_absent() {
        let store = MemoryPreferenceStore::default();
        store.save("").unwrap();

        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryPreferenceStore::default();
        store.save("payload").unwrap();

        assert_eq!(store.load().unwrap().as_deref(), Some("payload"));
    }
}
