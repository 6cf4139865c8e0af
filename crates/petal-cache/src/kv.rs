//! Key-value slot stores.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{de::DeserializeOwned, Serialize};

use crate::CacheError;

/// A durable store of named text slots.
///
/// Every write replaces the whole slot. Implementations must be safe to share
/// behind an `Arc`, but callers never rely on cross-slot atomicity.
pub trait SlotStore: Send + Sync {
    /// Read a slot. Returns `None` if the key doesn't exist.
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Overwrite a slot.
    fn set(&self, key: &str, value: &str) -> Result<(), CacheError>;

    /// Delete a slot. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Check if a slot exists.
    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.get(key)?.is_some())
    }
}

/// Read a slot and deserialize it from JSON.
///
/// # Example
///
/// ```rust,ignore
/// let prefs: Option<Prefs> = get_json(&store, "prefs")?;
/// ```
pub fn get_json<T: DeserializeOwned>(
    store: &dyn SlotStore,
    key: &str,
) -> Result<Option<T>, CacheError> {
    match store.get(key)? {
        Some(text) => Ok(Some(serde_json::from_str(&text)?)),
        None => Ok(None),
    }
}

/// Serialize a value to JSON and write it to a slot.
pub fn set_json<T: Serialize>(store: &dyn SlotStore, key: &str, value: &T) -> Result<(), CacheError> {
    let text = serde_json::to_string(value)?;
    store.set(key, &text)
}

/// In-memory slot store.
///
/// Optionally enforces a per-slot byte quota, which makes it useful for
/// exercising write-failure paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that rejects writes larger than `limit` bytes.
    pub fn with_quota(limit: usize) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            quota: Some(limit),
        }
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.lock().map(|s| s.len()).unwrap_or(0)
    }

    /// Check if no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, CacheError> {
        self.slots
            .lock()
            .map_err(|e| CacheError::StoreError(e.to_string()))
    }
}

impl SlotStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        if let Some(limit) = self.quota {
            if value.len() > limit {
                return Err(CacheError::QuotaExceeded {
                    key: key.to_string(),
                    size: value.len(),
                    limit,
                });
            }
        }
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// File-backed slot store: one file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, CacheError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)
            .map_err(|e| CacheError::OpenError(format!("{}: {}", root.display(), e)))?;
        Ok(Self { root })
    }

    /// Directory holding the slot files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.root.join(format!("{name}.slot"))
    }
}

impl SlotStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let path = self.slot_path(key);
        match fs::read(&path) {
            Ok(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|_| CacheError::NotText(key.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        // Readers never observe a half-written slot.
        let path = self.slot_path(key);
        let tmp = path.with_extension("slot.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        tracing::trace!(key, bytes = value.len(), "slot written");
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        match fs::remove_file(self.slot_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Helper to build cache keys with namespacing.
///
/// # Example
///
/// ```rust,ignore
/// let key = cache_key!("product", id);
/// // Returns "product/42"
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push('/');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Prefs {
        theme: String,
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("cart").unwrap(), None);

        store.set("cart", "[]").unwrap();
        assert_eq!(store.get("cart").unwrap().as_deref(), Some("[]"));
        assert!(store.exists("cart").unwrap());

        store.delete("cart").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_memory_store_quota() {
        let store = MemoryStore::with_quota(4);
        assert!(store.set("k", "1234").is_ok());
        let err = store.set("k", "12345").unwrap_err();
        assert!(matches!(err, CacheError::QuotaExceeded { limit: 4, .. }));
        // Failed write leaves the previous value intact
        assert_eq!(store.get("k").unwrap().as_deref(), Some("1234"));
    }

    #[test]
    fn test_json_helpers() {
        let store = MemoryStore::new();
        let prefs = Prefs {
            theme: "rose".to_string(),
        };
        set_json(&store, "prefs", &prefs).unwrap();
        let loaded: Option<Prefs> = get_json(&store, "prefs").unwrap();
        assert_eq!(loaded, Some(prefs));
    }

    #[test]
    fn test_file_store_overwrites_slot() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        store.set("petal-cart", "first").unwrap();
        store.set("petal-cart", "second").unwrap();
        assert_eq!(store.get("petal-cart").unwrap().as_deref(), Some("second"));

        let reopened = FileStore::open(dir.path()).unwrap();
        assert_eq!(reopened.get("petal-cart").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_file_store_missing_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get("nope").unwrap(), None);
        assert!(store.delete("nope").is_ok());
    }

    #[test]
    fn test_file_store_rejects_binary() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        std::fs::write(dir.path().join("bin.slot"), [0xff, 0xfe]).unwrap();
        assert!(matches!(store.get("bin"), Err(CacheError::NotText(_))));
    }

    #[test]
    fn test_cache_key_macro() {
        assert_eq!(cache_key!("product", 42u64), "product/42");
        assert_eq!(cache_key!("products", "category", "nails"), "products/category/nails");
    }
}
