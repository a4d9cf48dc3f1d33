//! Database store wrapper.

use crate::error::{Error, Result};
use crate::models::*;
use chrono::{DateTime, Utc};
use native_db::*;
use skillforge_core::{AppState, EngineConfig};
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

// Static models for the database
static MODELS: LazyLock<std::result::Result<Models, String>> = LazyLock::new(|| {
    let mut models = Models::new();
    models.define::<StoredState>().map_err(|e| e.to_string())?;
    Ok(models)
});

fn models() -> Result<&'static Models> {
    MODELS.as_ref().map_err(|e| Error::Database(e.clone()))
}

/// Database store for the persisted application state.
pub struct Store {
    pub(crate) db: Database<'static>,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Builder::new()
            .create(models()?, path.as_ref())
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(Self { db })
    }

    /// Create an in-memory database.
    pub fn in_memory() -> Result<Self> {
        let db = Builder::new()
            .create_in_memory(models()?)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(Self { db })
    }

    /// Save the application state, replacing the previous snapshot.
    pub fn save_state(&self, state: &AppState) -> Result<()> {
        let payload = serde_json::to_string(state)?;
        let stored = StoredState::new(payload, Utc::now().timestamp_millis());
        let bytes = stored.payload.len();
        let rw = self.db.rw_transaction()?;
        rw.upsert(stored)?;
        rw.commit()?;
        debug!(bytes, trees = state.skills().len(), "state saved");
        Ok(())
    }

    /// Load the stored state; `None` when nothing has been saved yet.
    pub fn try_load_state(&self) -> Result<Option<AppState>> {
        let Some(stored) = self.load_row()? else {
            return Ok(None);
        };
        let document: serde_json::Value = serde_json::from_str(&stored.payload)?;
        let state = serde_json::from_value(unwrap_envelope(document))?;
        Ok(Some(state))
    }

    /// Load the stored state, falling back to the empty default.
    pub fn load_state(&self) -> AppState {
        match self.try_load_state() {
            Ok(Some(state)) => {
                info!(trees = state.skills().len(), "state restored");
                state
            }
            Ok(None) => {
                debug!("no stored state, starting fresh");
                AppState::default()
            }
            Err(e) => {
                warn!(error = %e, "stored state unreadable, starting fresh");
                AppState::default()
            }
        }
    }

    /// Load the stored state and attach `config` to it.
    pub fn load_state_with(&self, config: EngineConfig) -> AppState {
        let mut state = self.load_state();
        state.set_config(config);
        state
    }

    /// When the stored state was last written.
    pub fn saved_at(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self
            .load_row()?
            .and_then(|s| DateTime::from_timestamp_millis(s.saved_at)))
    }

    /// Clear all data.
    pub fn clear(&self) -> Result<()> {
        let rw = self.db.rw_transaction()?;
        if let Some(stored) = rw.get().primary::<StoredState>(STORAGE_KEY.to_string())? {
            rw.remove(stored)?;
        }
        rw.commit()?;
        Ok(())
    }

    fn load_row(&self) -> Result<Option<StoredState>> {
        let r = self.db.r_transaction()?;
        let stored: Option<StoredState> = r.get().primary(STORAGE_KEY.to_string())?;
        Ok(stored)
    }

    #[cfg(test)]
    fn put_raw(&self, payload: &str) -> Result<()> {
        let rw = self.db.rw_transaction()?;
        rw.upsert(StoredState::new(payload.to_string(), 0))?;
        rw.commit()?;
        Ok(())
    }
}

/// Accept both a bare state document and one wrapped as `{"state": .., "version": ..}`
fn unwrap_envelope(mut document: serde_json::Value) -> serde_json::Value {
    if document.get("state").is_some_and(serde_json::Value::is_object) {
        return document["state"].take();
    }
    document
}
