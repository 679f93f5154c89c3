//! Durable storage layer for Scribe Quest

use std::path::Path;

use tracing::info;

pub mod kv;
pub mod state;

pub use kv::{FileStore, KvStore, MemoryStore, StoreError};
pub use state::{SaveOutcome, StateStore};

/// Open the file-backed store rooted at `data_dir`
pub fn open_file_store(data_dir: impl AsRef<Path>) -> Result<FileStore, StoreError> {
    let data_dir = data_dir.as_ref();
    info!("Opening key-value store at {}", data_dir.display());
    let store = FileStore::open(data_dir)?;
    info!("Key-value store ready");
    Ok(store)
}
