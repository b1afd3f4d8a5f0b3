//! Preference persistence.
//!
//! A narrow key-value port backs the UI preferences (currently the theme
//! flag). Native builds keep one file per key under the platform data
//! directory; wasm builds keep a process-wide in-memory map.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;

#[cfg(not(target_arch = "wasm32"))]
use std::{fs, path::PathBuf};

pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), String>;
    fn remove(&self, key: &str) -> Result<(), String>;
}

/// In-memory store, used on wasm and in tests.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().ok()?;
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        let mut entries = self.entries.lock().map_err(|e| e.to_string())?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        let mut entries = self.entries.lock().map_err(|e| e.to_string())?;
        entries.remove(key);
        Ok(())
    }
}

/// File-backed store: one file per sanitized key.
#[cfg(not(target_arch = "wasm32"))]
pub struct FileStore {
    dir: PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    pub fn new() -> Self {
        Self::in_dir(default_prefs_dir())
    }

    pub fn in_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(key)))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for FileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.key_path(key)).ok()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| format!("Failed to create preferences directory: {}", e))?;
        fs::write(self.key_path(key), value)
            .map_err(|e| format!("Failed to write preference: {}", e))
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(path).map_err(|e| format!("Failed to delete preference: {}", e))?;
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn default_prefs_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        return data_dir.join("kestrel").join("prefs");
    }
    PathBuf::from("cache").join("prefs")
}

/// Sanitize a preference key for filesystem use.
#[cfg(not(target_arch = "wasm32"))]
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(64)
        .collect()
}

#[cfg(not(target_arch = "wasm32"))]
static DEFAULT_STORE: Lazy<FileStore> = Lazy::new(FileStore::new);

#[cfg(target_arch = "wasm32")]
static DEFAULT_STORE: Lazy<MemoryStore> = Lazy::new(MemoryStore::default);

/// Process-wide store selected by target.
pub fn default_store() -> &'static dyn PreferenceStore {
    &*DEFAULT_STORE
}
