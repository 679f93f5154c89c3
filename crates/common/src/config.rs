//! Application configuration

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};

/// Default key the gamification blob is stored under
pub const DEFAULT_STORAGE_KEY: &str = "scribe-quest-gamification";

/// Default ceiling for a serialized state blob (5 MiB)
pub const DEFAULT_MAX_STATE_BYTES: usize = 5 * 1024 * 1024;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Directory backing the file key-value store
    pub data_dir: PathBuf,
    pub storage_key: String,
    pub max_state_bytes: usize,
    /// Auto-dismiss delay for unlock toasts in seconds (0 = never)
    pub toast_ttl_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            data_dir: PathBuf::from("./data"),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            max_state_bytes: DEFAULT_MAX_STATE_BYTES,
            toast_ttl_secs: 3,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            storage_key: env::var("STORAGE_KEY").unwrap_or(defaults.storage_key),
            max_state_bytes: env::var("MAX_STATE_BYTES")
                .ok()
                .and_then(|b| b.parse().ok())
                .unwrap_or(defaults.max_state_bytes),
            toast_ttl_secs: env::var("TOAST_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.toast_ttl_secs),
        }
    }

    /// Reject values the store cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.storage_key.trim().is_empty() {
            return Err(Error::Config("STORAGE_KEY must not be empty".to_string()));
        }
        if self.max_state_bytes == 0 {
            return Err(Error::Config(
                "MAX_STATE_BYTES must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Toast auto-dismiss delay, `None` when disabled
    pub fn toast_ttl(&self) -> Option<Duration> {
        (self.toast_ttl_secs > 0).then(|| Duration::from_secs(self.toast_ttl_secs))
    }
}
