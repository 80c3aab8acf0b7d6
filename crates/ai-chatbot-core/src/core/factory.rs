//! Store Factory
//!
//! Builds the configured storage backend and wraps it in a namespaced store.

use crate::core::config::{StorageConfig, StorageType};
use crate::storage::{DynStore, KeyValueBackend, MemoryBackend, Store};
use crate::types::error::Result;
use crate::log_info;

/// Create the store described by `config`
pub fn create_store(config: &StorageConfig) -> Result<DynStore> {
    log_info!("Creating store with storage type: {:?}", config.storage_type);

    let backend: Box<dyn KeyValueBackend> = match config.storage_type {
        StorageType::Memory => match config.quota_bytes {
            Some(quota) => Box::new(MemoryBackend::with_quota(quota)),
            None => Box::new(MemoryBackend::new()),
        },
        #[cfg(not(target_arch = "wasm32"))]
        StorageType::File => Box::new(crate::storage::FileBackend::open(&config.data_file, config.quota_bytes)?),
        #[cfg(target_arch = "wasm32")]
        StorageType::File => {
            return Err(crate::types::error::Error::config(
                "File storage is not available in the browser",
            ))
        }
    };

    Ok(Store::new(backend))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn memory_store_from_config() {
        let config = StorageConfig {
            storage_type: StorageType::Memory,
            ..StorageConfig::default()
        };
        let store = create_store(&config).unwrap();
        store.write(Some("u1"), "chats", &json!([]));
        assert_eq!(store.read(Some("u1"), "chats", json!(null)), json!([]));
    }

    #[test]
    fn file_store_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            storage_type: StorageType::File,
            data_file: dir.path().join("nested").join("store.json"),
            quota_bytes: None,
        };
        let store = create_store(&config).unwrap();
        store.write(Some("u1"), "chats", &json!([{"id": "c1"}]));
        assert!(config.data_file.exists());
    }
}
