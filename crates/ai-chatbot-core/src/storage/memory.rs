//! Simple in-memory backend using DashMap
//!
//! Holds raw strings exactly as the browser's `localStorage` would. An
//! optional byte quota reproduces "quota exceeded" failures.

use dashmap::DashMap;
use crate::storage::KeyValueBackend;
use crate::types::error::StorageError;

/// In-memory key-value backend
#[derive(Debug, Default)]
pub struct MemoryBackend {
    /// Map of storage key to raw value
    entries: DashMap<String, String>,

    /// Maximum total of key + value bytes, `None` for unlimited
    quota_bytes: Option<usize>,
}

impl MemoryBackend {
    /// Create an unlimited backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend that rejects writes beyond `quota_bytes`
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: DashMap::new(),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the backend holds no keys
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Bytes the map would hold after replacing `key` with `value`
pub(crate) fn bytes_after_set<'a>(
    entries: impl Iterator<Item = (&'a str, &'a str)>,
    key: &str,
    value: &str,
) -> usize {
    let others: usize = entries
        .filter(|(k, _)| *k != key)
        .map(|(k, v)| k.len() + v.len())
        .sum();
    others + key.len() + value.len()
}

impl KeyValueBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).map(|value| value.clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(limit) = self.quota_bytes {
            let snapshot: Vec<(String, String)> = self
                .entries
                .iter()
                .map(|entry| (entry.key().clone(), entry.value().clone()))
                .collect();
            let needed = bytes_after_set(
                snapshot.iter().map(|(k, v)| (k.as_str(), v.as_str())),
                key,
                value,
            );
            if needed > limit {
                return Err(StorageError::QuotaExceeded { needed, limit });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.entries.iter().map(|entry| entry.key().clone()).collect())
    }
}
