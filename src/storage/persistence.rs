use chrono::Utc;
use tracing::{debug, warn};

use super::{SavedState, Storage};
use crate::error::PersistenceError;
use crate::state::EconomyState;

/// Key the state has always been stored under.
pub const DEFAULT_STORAGE_KEY: &str = "giftbox_app_data";

/// Loads and saves the economy as a single JSON blob.
#[derive(Debug)]
pub struct Persistence<S> {
    storage: S,
    key: String,
}

impl<S: Storage> Persistence<S> {
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Saved state, or None if nothing usable is stored.
    ///
    /// A blob that does not parse counts as absent. Only a failing storage
    /// backend is an error.
    pub fn load(&self) -> Result<Option<EconomyState>, PersistenceError> {
        let Some(blob) = self.storage.load(&self.key)? else {
            debug!(key = %self.key, "No saved state");
            return Ok(None);
        };
        match serde_json::from_str::<SavedState>(&blob) {
            Ok(saved) => Ok(Some(saved.into_state())),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Saved state is malformed, ignoring it");
                Ok(None)
            }
        }
    }

    /// Write the persistent part of `state` with a fresh `lastUpdated`.
    pub fn save(&mut self, state: &EconomyState) -> Result<(), PersistenceError> {
        let blob = serde_json::to_string(&SavedState::capture(state, Utc::now()))?;
        self.storage.save(&self.key, &blob)?;
        debug!(key = %self.key, bytes = blob.len(), "State saved");
        Ok(())
    }
}
