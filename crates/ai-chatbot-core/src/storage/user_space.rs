//! User Space - single-user view of the namespaced store

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::storage::store::{ReadOutcome, Store};
use crate::storage::KeyValueBackend;
use crate::types::error::StorageError;
use crate::types::UserId;

/// Represents a single user's slice of the store
///
/// Binds a user id (or none, meaning the temporary namespace) to a store so
/// callers only deal with logical keys.
pub struct UserSpace<'a, B: KeyValueBackend> {
    store: &'a Store<B>,
    user_id: Option<UserId>,
}

impl<'a, B: KeyValueBackend> UserSpace<'a, B> {
    /// Create a new view for `user_id`
    pub fn new(store: &'a Store<B>, user_id: Option<UserId>) -> Self {
        Self { store, user_id }
    }

    /// The user this view represents
    pub fn user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }

    fn id(&self) -> Option<&str> {
        self.user_id.as_ref().map(UserId::as_str)
    }

    /// The store this view writes through
    pub fn store(&self) -> &'a Store<B> {
        self.store
    }

    /// Best-effort write of `value` under `logical_key`
    pub fn write<T: Serialize + ?Sized>(&self, logical_key: &str, value: &T) {
        self.store.write(self.id(), logical_key, value)
    }

    /// Write reporting failures
    pub fn try_write<T: Serialize + ?Sized>(&self, logical_key: &str, value: &T) -> Result<(), StorageError> {
        self.store.try_write(self.id(), logical_key, value)
    }

    /// Value under `logical_key` or `default`
    pub fn read<T: DeserializeOwned>(&self, logical_key: &str, default: T) -> T {
        self.store.read(self.id(), logical_key, default)
    }

    /// Value under `logical_key` with the read outcome
    pub fn read_entry<T: DeserializeOwned>(&self, logical_key: &str) -> ReadOutcome<T> {
        self.store.read_entry(self.id(), logical_key)
    }

    /// Best-effort removal of `logical_key`
    pub fn delete(&self, logical_key: &str) {
        self.store.delete(self.id(), logical_key)
    }

    /// Remove every key of this user; no-op in the temporary namespace
    pub fn clear_all(&self) -> usize {
        match self.id() {
            Some(id) => self.store.clear_all(id),
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryBackend;
    use serde_json::json;

    #[test]
    fn spaces_are_isolated() {
        let store = Store::new(MemoryBackend::new());
        let alice = store.user_space(UserId::new("alice"));
        let bob = store.user_space(UserId::new("bob"));

        alice.write("chats", &json!(["a"]));
        assert_eq!(bob.read("chats", json!([])), json!([]));
        assert_eq!(alice.read("chats", json!([])), json!(["a"]));

        assert_eq!(alice.clear_all(), 1);
        assert!(alice.read_entry::<serde_json::Value>("chats").is_absent());
    }

    #[test]
    fn anonymous_space_uses_temp_keys() {
        let store = Store::new(MemoryBackend::new());
        let anon = store.user_space(None);
        anon.write("chats", &json!([]));
        assert!(store.backend().get("temp_chats").unwrap().is_some());
        assert_eq!(anon.clear_all(), 0);
    }
}
