//! Storage adapters for the Valegate SDK

use std::collections::HashMap;
use std::sync::RwLock;

/// Storage keys
pub mod keys {
    pub const LICENSE_KEY: &str = concat!("valegate:", "license_key");
    pub const DEVICE_ID: &str = concat!("valegate:", "device_id");
}

/// Storage adapter trait for custom storage implementations
pub trait StorageAdapter: Send + Sync {
    /// Get a value by key
    fn get(&self, key: &str) -> Option<String>;

    /// Set a value by key
    fn set(&self, key: &str, value: &str);

    /// Remove a value by key
    fn remove(&self, key: &str);
}

/// In-memory storage adapter
///
/// Useful for testing or ephemeral storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    store: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create a new memory storage
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageAdapter for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.store.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut store) = self.store.write() {
            store.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut store) = self.store.write() {
            store.remove(key);
        }
    }
}

/// File-based storage adapter
///
/// Stores data in a JSON file in the app's data directory.
#[cfg(feature = "native-storage")]
pub struct FileStorage {
    path: std::path::PathBuf,
    cache: RwLock<HashMap<String, String>>,
}

#[cfg(feature = "native-storage")]
impl FileStorage {
    /// Create a new file storage for the given app name
    ///
    /// Data is stored in:
    /// - Linux: `~/.local/share/{app_name}/valegate.json`
    /// - macOS: `~/Library/Application Support/{app_name}/valegate.json`
    /// - Windows: `C:\Users\{User}\AppData\Roaming\{app_name}\valegate.json`
    pub fn new(app_name: &str) -> Option<Self> {
        let dirs = directories::ProjectDirs::from("", "", app_name)?;
        let data_dir = dirs.data_dir();

        // Create directory if it doesn't exist
        std::fs::create_dir_all(data_dir).ok()?;

        let path = data_dir.join("valegate.json");
        let cache = std::fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();

        Some(Self {
            path,
            cache: RwLock::new(cache),
        })
    }

    fn flush(&self) {
        if let Ok(cache) = self.cache.read()
            && let Ok(raw) = serde_json::to_string(&*cache)
        {
            let _ = std::fs::write(&self.path, raw);
        }
    }
}

#[cfg(feature = "native-storage")]
impl StorageAdapter for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.cache.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(key.to_string(), value.to_string());
        }
        self.flush();
    }

    fn remove(&self, key: &str) {
        if let Ok(mut cache) = self.cache.write() {
            cache.remove(key);
        }
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get(keys::LICENSE_KEY), None);
        storage.set(keys::LICENSE_KEY, "VG-AAAA-BBBB-CCCC");
        assert_eq!(
            storage.get(keys::LICENSE_KEY).as_deref(),
            Some("VG-AAAA-BBBB-CCCC")
        );
        storage.remove(keys::LICENSE_KEY);
        assert_eq!(storage.get(keys::LICENSE_KEY), None);
    }
}
