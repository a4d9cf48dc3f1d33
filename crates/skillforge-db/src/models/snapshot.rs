//! Application state snapshot model.

use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};

/// Key of the single state row.
pub const STORAGE_KEY: &str = "skillforge-storage";

/// Serialized application state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 1, version = 1)]
#[native_db]
pub struct StoredState {
    /// Always `STORAGE_KEY` - single row.
    #[primary_key]
    pub id: String,
    /// `AppState` as JSON.
    pub payload: String,
    /// Write time, milliseconds since the Unix epoch (UTC).
    pub saved_at: i64,
}

impl StoredState {
    pub fn new(payload: String, saved_at: i64) -> Self {
        Self {
            id: STORAGE_KEY.to_string(),
            payload,
            saved_at,
        }
    }
}
