//! Namespaced Store - per-user isolation inside one flat key space
//!
//! Every operation here is best effort: serialization and backend failures
//! are logged and swallowed so that callers never see an error. The `try_*`
//! variants and [`ReadOutcome`] expose what happened for callers that care.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::storage::keys::{derive_key, user_prefix};
use crate::storage::user_space::UserSpace;
use crate::storage::KeyValueBackend;
use crate::types::error::StorageError;
use crate::types::UserId;
use crate::{log_debug, log_error, log_info, log_warn};

/// Result of reading a namespaced record
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome<T> {
    /// Record present and decoded
    Found(T),
    /// No record under the key
    Absent,
    /// Record present but not decodable as `T`
    Corrupted(String),
    /// Backend failed while reading
    Failed(String),
}

impl<T> ReadOutcome<T> {
    /// The decoded value, or `default` for every other outcome
    pub fn unwrap_or(self, default: T) -> T {
        match self {
            ReadOutcome::Found(value) => value,
            _ => default,
        }
    }

    /// The decoded value, if any
    pub fn found(self) -> Option<T> {
        match self {
            ReadOutcome::Found(value) => Some(value),
            _ => None,
        }
    }

    /// Whether a record is present (decodable or not)
    pub fn exists(&self) -> bool {
        matches!(self, ReadOutcome::Found(_) | ReadOutcome::Corrupted(_))
    }

    /// Whether the key holds nothing
    pub fn is_absent(&self) -> bool {
        matches!(self, ReadOutcome::Absent)
    }
}

/// Namespaced store over a flat key-value backend
///
/// Generic parameter B allows compile-time selection of the backend; use
/// [`crate::storage::DynStore`] to pick one at runtime.
#[derive(Debug)]
pub struct Store<B: KeyValueBackend> {
    backend: B,
}

impl<B: KeyValueBackend> Store<B> {
    /// Wrap a backend
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// The underlying flat backend (used for un-namespaced legacy keys)
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// View of the store bound to one user (or to the temporary namespace)
    pub fn user_space(&self, user_id: Option<UserId>) -> UserSpace<'_, B> {
        UserSpace::new(self, user_id)
    }

    /// Serialize `value` and store it under the user's `logical_key`.
    ///
    /// Failures are logged and swallowed.
    pub fn write<T: Serialize + ?Sized>(&self, user_id: Option<&str>, logical_key: &str, value: &T) {
        if let Err(e) = self.try_write(user_id, logical_key, value) {
            log_error!("Error saving user data under '{}': {}", logical_key, e);
        }
    }

    /// Like [`Store::write`] but reports the failure
    pub fn try_write<T: Serialize + ?Sized>(
        &self,
        user_id: Option<&str>,
        logical_key: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let key = derive_key(user_id, logical_key);
        let raw = serde_json::to_string(value)?;
        log_debug!("write {} ({} bytes)", key, raw.len());
        self.backend.set(&key, &raw)
    }

    /// Value under the user's `logical_key`, or `default` when absent or unreadable
    pub fn read<T: DeserializeOwned>(&self, user_id: Option<&str>, logical_key: &str, default: T) -> T {
        self.read_entry(user_id, logical_key).unwrap_or(default)
    }

    /// Value under the user's `logical_key`, telling absence from corruption
    pub fn read_entry<T: DeserializeOwned>(&self, user_id: Option<&str>, logical_key: &str) -> ReadOutcome<T> {
        let key = derive_key(user_id, logical_key);
        match self.backend.get(&key) {
            Ok(None) => ReadOutcome::Absent,
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => ReadOutcome::Found(value),
                Err(e) => {
                    log_error!("Error getting user data: '{}' is not valid: {}", key, e);
                    ReadOutcome::Corrupted(e.to_string())
                }
            },
            Err(e) => {
                log_error!("Error getting user data under '{}': {}", key, e);
                ReadOutcome::Failed(e.to_string())
            }
        }
    }

    /// Remove the user's `logical_key`; absence is not an error.
    ///
    /// Failures are logged and swallowed.
    pub fn delete(&self, user_id: Option<&str>, logical_key: &str) {
        if let Err(e) = self.try_delete(user_id, logical_key) {
            log_error!("Error removing user data under '{}': {}", logical_key, e);
        }
    }

    /// Like [`Store::delete`] but reports the failure
    pub fn try_delete(&self, user_id: Option<&str>, logical_key: &str) -> Result<(), StorageError> {
        self.backend.remove(&derive_key(user_id, logical_key))
    }

    /// Remove every key of `user_id`, leaving other users untouched.
    ///
    /// Returns the number of keys removed. Failures are logged; keys that
    /// could not be removed are skipped.
    pub fn clear_all(&self, user_id: &str) -> usize {
        if user_id.is_empty() {
            log_warn!("clear_all called without a user id, nothing removed");
            return 0;
        }
        let prefix = user_prefix(user_id);
        let keys = match self.backend.keys() {
            Ok(keys) => keys,
            Err(e) => {
                log_error!("Error clearing user data for {}: {}", user_id, e);
                return 0;
            }
        };

        let mut removed = 0;
        for key in keys.iter().filter(|key| key.starts_with(&prefix)) {
            match self.backend.remove(key) {
                Ok(()) => removed += 1,
                Err(e) => log_error!("Error removing '{}' while clearing {}: {}", key, user_id, e),
            }
        }
        log_info!("User data cleared for {} ({} keys)", user_id, removed);
        removed
    }
}
