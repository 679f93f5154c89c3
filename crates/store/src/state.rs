//! Gamification state persistence

use common::config::{DEFAULT_MAX_STATE_BYTES, DEFAULT_STORAGE_KEY};
use common::models::GamificationState;
use common::{Error, Result};
use tracing::{debug, error, warn};

use crate::kv::KvStore;

/// What happened to a save request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Written { bytes: usize },
    SkippedTooLarge { bytes: usize },
    Failed,
}

/// Loads and saves the single gamification blob.
///
/// Every failure is absorbed here: `load` falls back to a default state and
/// `save` gives up quietly.
pub struct StateStore<S> {
    store: S,
    key: String,
    max_bytes: usize,
}

impl<S: KvStore> StateStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            key: DEFAULT_STORAGE_KEY.to_string(),
            max_bytes: DEFAULT_MAX_STATE_BYTES,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Load the stored state, or a fresh default on any failure
    pub fn load(&self) -> GamificationState {
        match self.try_load() {
            Ok(Some(state)) => state,
            Ok(None) => {
                debug!("No stored gamification state under {}, using defaults", self.key);
                GamificationState::default()
            }
            Err(e) => {
                warn!("Invalid gamification state in store, using defaults: {}", e);
                GamificationState::default()
            }
        }
    }

    /// Load the stored state, surfacing read, parse and validation errors
    pub fn try_load(&self) -> Result<Option<GamificationState>> {
        let raw = self
            .store
            .get(&self.key)
            .map_err(|e| Error::Storage(e.to_string()))?;

        match raw {
            Some(raw) if !raw.is_empty() => parse_state(&raw).map(Some),
            _ => Ok(None),
        }
    }

    /// Persist `state`, skipping oversized blobs and swallowing write errors
    pub fn save(&self, state: &GamificationState) -> SaveOutcome {
        match self.try_save(state) {
            Ok(bytes) => SaveOutcome::Written { bytes },
            Err(Error::StateTooLarge { size, limit }) => {
                warn!(
                    "Gamification state too large: {:.2}MB (limit {:.2}MB), not saved",
                    size as f64 / 1024.0 / 1024.0,
                    limit as f64 / 1024.0 / 1024.0
                );
                SaveOutcome::SkippedTooLarge { bytes: size }
            }
            Err(e) => {
                error!("Error saving gamification state: {}", e);
                SaveOutcome::Failed
            }
        }
    }

    /// Persist `state`, returning the number of bytes written
    pub fn try_save(&self, state: &GamificationState) -> Result<usize> {
        let serialized = serde_json::to_string(state)?;
        let size = serialized.len();
        if size > self.max_bytes {
            return Err(Error::StateTooLarge {
                size,
                limit: self.max_bytes,
            });
        }

        self.store
            .set(&self.key, &serialized)
            .map_err(|e| Error::Storage(e.to_string()))?;
        Ok(size)
    }

    /// Remove the stored blob so the next load starts fresh
    pub fn clear(&self) -> Result<()> {
        self.store
            .remove(&self.key)
            .map_err(|e| Error::Storage(e.to_string()))
    }
}

/// Parse and structurally validate a stored blob
pub fn parse_state(raw: &str) -> Result<GamificationState> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    validate_shape(&value)?;
    Ok(serde_json::from_value(value)?)
}

/// Check required top-level fields and their types before decoding
fn validate_shape(value: &serde_json::Value) -> Result<()> {
    let obj = value
        .as_object()
        .ok_or_else(|| Error::InvalidState("root is not an object".to_string()))?;

    let require = |field: &str, ok: fn(&serde_json::Value) -> bool, expected: &str| {
        match obj.get(field) {
            Some(v) if ok(v) => Ok(()),
            Some(_) => Err(Error::InvalidState(format!("{} is not {}", field, expected))),
            None => Err(Error::InvalidState(format!("missing {}", field))),
        }
    };

    require("enabled", serde_json::Value::is_boolean, "a boolean")?;
    require("version", serde_json::Value::is_number, "a number")?;
    require("stats", serde_json::Value::is_object, "an object")?;
    require("achievements", serde_json::Value::is_array, "an array")?;
    require("streak", serde_json::Value::is_object, "an object")?;

    let stats = &obj["stats"];
    for field in [
        "totalWordsWritten",
        "totalTimeActiveMs",
        "totalDocsSaved",
        "totalXP",
        "level",
    ] {
        if !stats.get(field).is_some_and(serde_json::Value::is_number) {
            return Err(Error::InvalidState(format!(
                "stats.{} is missing or not a number",
                field
            )));
        }
    }
    if !stats
        .get("totalFormatsUsed")
        .is_some_and(serde_json::Value::is_object)
    {
        return Err(Error::InvalidState(
            "stats.totalFormatsUsed is missing or not an object".to_string(),
        ));
    }

    Ok(())
}
