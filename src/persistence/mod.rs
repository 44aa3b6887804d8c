//! Key/value persistence for scores and settings
//!
//! Values are JSON strings under fixed keys. Backends:
//! - `MemoryStorage`: tests and ephemeral runs
//! - `FileStorage`: native, one JSON object on disk
//! - `LocalStorage`: browser `window.localStorage`
//! - `FallbackStorage`: a preferred backend with a memory fallback
//!
//! Reads that fail or hold garbage fall back to defaults; writes report errors
//! for the caller to log.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Minimal string key/value store
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Load and decode `key`, or fall back to `T::default()`
///
/// Missing keys are silent; unreadable or corrupt values log a warning.
pub fn load_or_default<T>(storage: &dyn Storage, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    match storage.get(key) {
        Ok(Some(json)) => match serde_json::from_str(&json) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Ignoring corrupt '{}' entry: {}", key, e);
                T::default()
            }
        },
        Ok(None) => T::default(),
        Err(e) => {
            log::warn!("Failed to read '{}': {:#}", key, e);
            T::default()
        }
    }
}

/// Encode `value` as JSON and store it under `key`
pub fn save_json<T: Serialize + ?Sized>(storage: &mut dyn Storage, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string(value).with_context(|| format!("failed to encode '{key}'"))?;
    storage.set(key, &json)
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// A preferred backend, or memory when it could not be opened
#[derive(Debug, Clone)]
pub enum FallbackStorage<S> {
    Primary(S),
    Memory(MemoryStorage),
}

impl<S: Storage> FallbackStorage<S> {
    pub fn new(primary: Option<S>) -> Self {
        match primary {
            Some(storage) => FallbackStorage::Primary(storage),
            None => {
                log::warn!("Persistent storage unavailable, scores will not survive a reload");
                FallbackStorage::Memory(MemoryStorage::new())
            }
        }
    }

    pub fn is_persistent(&self) -> bool {
        matches!(self, FallbackStorage::Primary(_))
    }
}

impl<S: Storage> Storage for FallbackStorage<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self {
            FallbackStorage::Primary(s) => s.get(key),
            FallbackStorage::Memory(s) => s.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match self {
            FallbackStorage::Primary(s) => s.set(key, value),
            FallbackStorage::Memory(s) => s.set(key, value),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::collections::BTreeMap;
    use std::fs;
    use std::path::{Path, PathBuf};

    use anyhow::{Context, Result};

    use super::Storage;

    /// A single JSON object file, rewritten on every `set`
    #[derive(Debug, Clone)]
    pub struct FileStorage {
        path: PathBuf,
        entries: BTreeMap<String, String>,
    }

    impl FileStorage {
        /// Open `path`, starting empty if it does not exist or cannot be parsed
        pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
            let path = path.into();
            let entries = match fs::read_to_string(&path) {
                Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                    log::warn!("Save file {} is corrupt, starting fresh: {}", path.display(), e);
                    BTreeMap::new()
                }),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
                Err(e) => {
                    return Err(e).with_context(|| format!("failed reading {}", path.display()));
                }
            };
            log::info!("Opened save file {} ({} keys)", path.display(), entries.len());
            Ok(Self { path, entries })
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn flush(&self) -> Result<()> {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed creating directory {}", parent.display()))?;
            }
            let bytes = serde_json::to_vec_pretty(&self.entries).context("failed to encode save file")?;
            // Write beside the target then rename so a crash never leaves half a file
            let tmp = self.path.with_extension("tmp");
            fs::write(&tmp, bytes).with_context(|| format!("failed writing {}", tmp.display()))?;
            fs::rename(&tmp, &self.path)
                .with_context(|| format!("failed replacing {}", self.path.display()))
        }
    }

    impl Storage for FileStorage {
        fn get(&self, key: &str) -> Result<Option<String>> {
            Ok(self.entries.get(key).cloned())
        }

        fn set(&mut self, key: &str, value: &str) -> Result<()> {
            self.entries.insert(key.to_owned(), value.to_owned());
            self.flush()
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::LocalStorage;

#[cfg(target_arch = "wasm32")]
mod web {
    use anyhow::{Result, anyhow};

    use super::Storage;

    /// `window.localStorage`
    pub struct LocalStorage {
        inner: web_sys::Storage,
    }

    impl LocalStorage {
        /// None when storage is unavailable (private mode, sandboxed iframe)
        pub fn open() -> Option<Self> {
            let inner = web_sys::window()?.local_storage().ok().flatten()?;
            Some(Self { inner })
        }
    }

    impl Storage for LocalStorage {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner
                .get_item(key)
                .map_err(|e| anyhow!("localStorage read of '{key}' failed: {e:?}"))
        }

        fn set(&mut self, key: &str, value: &str) -> Result<()> {
            self.inner
                .set_item(key, value)
                .map_err(|e| anyhow!("localStorage write of '{key}' failed: {e:?}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_loads_default() {
        let storage = MemoryStorage::new();
        let value: u64 = load_or_default(&storage, "bestScore");
        assert_eq!(value, 0);
    }

    #[test]
    fn test_corrupt_value_loads_default() {
        let mut storage = MemoryStorage::new();
        storage.set("bestScore", "not a number").unwrap();
        let value: u64 = load_or_default(&storage, "bestScore");
        assert_eq!(value, 0);
    }

    #[test]
    fn test_fallback_uses_memory_when_primary_missing() {
        let mut storage = FallbackStorage::<MemoryStorage>::new(None);
        assert!(!storage.is_persistent());
        save_json(&mut storage, "bestScore", &12u64).unwrap();
        let value: u64 = load_or_default(&storage, "bestScore");
        assert_eq!(value, 12);
    }

    #[test]
    fn test_fallback_prefers_primary() {
        let mut primary = MemoryStorage::new();
        primary.set("bestScore", "30").unwrap();
        let storage = FallbackStorage::new(Some(primary));
        assert!(storage.is_persistent());
        let value: u64 = load_or_default(&storage, "bestScore");
        assert_eq!(value, 30);
    }

    #[test]
    fn test_save_then_load() {
        let mut storage = MemoryStorage::new();
        save_json(&mut storage, "bestScore", &42u64).unwrap();
        assert_eq!(storage.get("bestScore").unwrap().as_deref(), Some("42"));
        let value: u64 = load_or_default(&storage, "bestScore");
        assert_eq!(value, 42);
    }

    #[test]
    fn test_file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("save.json");

        let mut storage = FileStorage::open(&path).unwrap();
        storage.set("bestScore", "17").unwrap();

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get("bestScore").unwrap().as_deref(), Some("17"));
    }

    #[test]
    fn test_file_storage_corrupt_file_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");
        std::fs::write(&path, "{{{").unwrap();

        let storage = FileStorage::open(&path).unwrap();
        assert_eq!(storage.get("leaderboard").unwrap(), None);
    }
}
