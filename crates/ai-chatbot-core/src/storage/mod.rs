//! Storage layer for the chatbot
//!
//! This module provides the storage abstraction that lets the same namespacing
//! and migration logic run over different flat key-value backends (memory,
//! a JSON file, the browser's `localStorage`).

use std::sync::Arc;
use crate::types::error::StorageError;

/// Trait for flat, string-keyed, string-valued stores
///
/// Every call runs to completion synchronously. Implementations use interior
/// mutability so a backend can be shared behind an `Arc`.
pub trait KeyValueBackend: Send + Sync {
    /// Raw value under `key`, `None` if absent
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`; removing an absent key succeeds
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Every key currently present
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

impl<B: KeyValueBackend + ?Sized> KeyValueBackend for Box<B> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        (**self).keys()
    }
}

impl<B: KeyValueBackend + ?Sized> KeyValueBackend for Arc<B> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        (**self).keys()
    }
}

/// Key derivation (`user_<id>_<key>`, `temp_<key>`)
pub mod keys;

/// In-memory backend
pub mod memory;

/// JSON-file backend (native only)
#[cfg(not(target_arch = "wasm32"))]
pub mod file;

/// Namespaced store over a backend
pub mod store;

/// Single-user view of the store
pub mod user_space;

/// Migration of un-namespaced legacy records
pub mod migration;

/// Re-export main storage types
pub use keys::{chat_messages_key, derive_key, user_prefix};
pub use memory::MemoryBackend;
#[cfg(not(target_arch = "wasm32"))]
pub use file::FileBackend;
pub use store::{ReadOutcome, Store};
pub use user_space::UserSpace;
pub use migration::{migrate_legacy_data, MigrationOutcome, MigrationReport};

/// Store over a backend chosen at runtime
pub type DynStore = Store<Box<dyn KeyValueBackend>>;
