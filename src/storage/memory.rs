use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

use super::Storage;

/// In-process storage. Clones share the same map, so a test can keep a
/// handle and inspect what a session wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    blobs: Arc<Mutex<HashMap<String, String>>>,
    failing: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage whose every read and write fails.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Seed a blob directly.
    pub fn with_blob(key: &str, blob: &str) -> Self {
        let storage = Self::new();
        if let Ok(mut guard) = storage.blobs.lock() {
            guard.insert(key.to_string(), blob.to_string());
        }
        storage
    }

    fn check(&self) -> io::Result<()> {
        if self.failing {
            return Err(io::Error::other("storage is unavailable"));
        }
        Ok(())
    }

    fn guard(&self) -> io::Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.blobs
            .lock()
            .map_err(|_| io::Error::other("storage lock poisoned"))
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> io::Result<Option<String>> {
        self.check()?;
        Ok(self.guard()?.get(key).cloned())
    }

    fn save(&mut self, key: &str, blob: &str) -> io::Result<()> {
        self.check()?;
        self.guard()?.insert(key.to_string(), blob.to_string());
        Ok(())
    }
}
