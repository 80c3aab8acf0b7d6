//! One-shot migration of pre-namespacing records
//!
//! Older clients kept the conversation list under `chats` and each
//! conversation's messages under its bare id. The migration copies those into
//! the signed-in user's namespace and removes the legacy keys.
//!
//! There is no "migration done" marker: re-running is a no-op because the
//! legacy list is gone, or because the user already has a namespaced list.
//! Callers must not run it concurrently for the same user.

use serde::Serialize;
use serde_json::Value;

use crate::constants::{CHATS_KEY, LEGACY_CHATS_KEY};
use crate::storage::keys::chat_messages_key;
use crate::storage::store::{ReadOutcome, Store};
use crate::storage::KeyValueBackend;
use crate::types::error::StorageError;
use crate::types::chat::entry_id;
use crate::types::UserId;
use crate::{log_debug, log_error, log_info, log_warn};

/// How a migration run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationOutcome {
    /// No legacy conversation list present
    NothingToMigrate,
    /// The user already has a namespaced list; legacy data left alone
    AlreadyMigrated,
    /// Legacy list present but not a JSON array; nothing touched
    LegacyCorrupted,
    /// Store failed before anything was copied; nothing deleted
    Aborted,
    /// List copied, conversations processed, legacy list removed
    Completed,
}

/// A conversation whose messages could not be migrated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationFailure {
    /// Legacy conversation id
    pub conversation_id: String,
    /// What went wrong
    pub reason: String,
}

/// Summary of one migration run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// How the run ended
    pub outcome: MigrationOutcome,
    /// Entries in the legacy conversation list
    pub conversations: usize,
    /// Conversations whose messages were copied
    pub migrated_messages: usize,
    /// Conversations with no legacy message record
    pub missing_messages: usize,
    /// List entries without a usable id
    pub skipped_entries: usize,
    /// Per-conversation failures (migration continued past them)
    pub failures: Vec<ConversationFailure>,
    /// Whether the legacy list key was removed
    pub legacy_list_removed: bool,
}

impl MigrationReport {
    fn ended(outcome: MigrationOutcome) -> Self {
        Self {
            outcome,
            conversations: 0,
            migrated_messages: 0,
            missing_messages: 0,
            skipped_entries: 0,
            failures: Vec::new(),
            legacy_list_removed: false,
        }
    }
}

/// Move legacy records into `user_id`'s namespace
pub fn migrate_legacy_data<B: KeyValueBackend>(store: &Store<B>, user_id: &UserId) -> MigrationReport {
    let user = Some(user_id.as_str());

    // 1. legacy list
    let raw = match store.backend().get(LEGACY_CHATS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            log_debug!("No legacy data to migrate for {}", user_id);
            return MigrationReport::ended(MigrationOutcome::NothingToMigrate);
        }
        Err(e) => {
            log_error!("Error during migration: cannot read legacy list: {}", e);
            return MigrationReport::ended(MigrationOutcome::Aborted);
        }
    };
    let chats: Vec<Value> = match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Array(chats)) => chats,
        Ok(_) => {
            log_error!("Error during migration: legacy list is not an array");
            return MigrationReport::ended(MigrationOutcome::LegacyCorrupted);
        }
        Err(e) => {
            log_error!("Error during migration: legacy list is not valid JSON: {}", e);
            return MigrationReport::ended(MigrationOutcome::LegacyCorrupted);
        }
    };

    // 2. never overwrite newer per-user data
    match store.read_entry::<Value>(user, CHATS_KEY) {
        ReadOutcome::Absent => {}
        ReadOutcome::Failed(reason) => {
            log_error!("Error during migration: cannot inspect namespaced list: {}", reason);
            return MigrationReport::ended(MigrationOutcome::Aborted);
        }
        ReadOutcome::Found(_) | ReadOutcome::Corrupted(_) => {
            log_info!("User {} already has namespaced chats, skipping migration", user_id);
            return MigrationReport::ended(MigrationOutcome::AlreadyMigrated);
        }
    }

    // 3. copy the list
    if let Err(e) = store.try_write(user, CHATS_KEY, &chats) {
        log_error!("Error during migration: cannot write namespaced list: {}", e);
        return MigrationReport::ended(MigrationOutcome::Aborted);
    }

    let mut report = MigrationReport::ended(MigrationOutcome::Completed);
    report.conversations = chats.len();

    // 4. per-conversation messages; one failure must not stop the rest
    for chat in &chats {
        let Some(conversation_id) = entry_id(chat) else {
            log_warn!("Skipping legacy chat entry without an id");
            report.skipped_entries += 1;
            continue;
        };
        match migrate_conversation(store, user_id, &conversation_id) {
            Ok(true) => report.migrated_messages += 1,
            Ok(false) => report.missing_messages += 1,
            Err(e) => {
                log_error!("Error migrating conversation {}: {}", conversation_id, e);
                report.failures.push(ConversationFailure {
                    conversation_id,
                    reason: e.to_string(),
                });
            }
        }
    }

    // 5. drop the legacy list even if some conversations failed
    match store.backend().remove(LEGACY_CHATS_KEY) {
        Ok(()) => report.legacy_list_removed = true,
        Err(e) => log_error!("Error removing legacy list: {}", e),
    }

    log_info!(
        "Migration completed for user {}: {} conversations, {} with messages, {} failed",
        user_id,
        report.conversations,
        report.migrated_messages,
        report.failures.len()
    );
    report
}

/// Copy one conversation's messages. `Ok(false)` when there was nothing to copy.
fn migrate_conversation<B: KeyValueBackend>(
    store: &Store<B>,
    user_id: &UserId,
    conversation_id: &str,
) -> Result<bool, StorageError> {
    let Some(raw) = store.backend().get(conversation_id)? else {
        return Ok(false);
    };
    let messages: Value = serde_json::from_str(&raw)?;
    store.try_write(Some(user_id.as_str()), &chat_messages_key(conversation_id), &messages)?;
    store.backend().remove(conversation_id)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryBackend;
    use serde_json::json;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn legacy_store() -> Store<MemoryBackend> {
        let store = Store::new(MemoryBackend::new());
        store.backend().set("chats", r#"[{"id":"c1"}]"#).unwrap();
        store.backend().set("c1", r#"[{"type":"prompt","text":"hi"}]"#).unwrap();
        store
    }

    /// Fails writes to keys containing `poison`
    struct PoisonedBackend {
        inner: MemoryBackend,
        poison: &'static str,
    }

    impl KeyValueBackend for PoisonedBackend {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }
        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if key.contains(self.poison) {
                return Err(StorageError::QuotaExceeded { needed: 1, limit: 0 });
            }
            self.inner.set(key, value)
        }
        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key)
        }
        fn keys(&self) -> Result<Vec<String>, StorageError> {
            self.inner.keys()
        }
    }

    #[test]
    fn moves_legacy_records_into_namespace() {
        let store = legacy_store();
        let report = migrate_legacy_data(&store, &user("u1"));

        assert_eq!(report.outcome, MigrationOutcome::Completed);
        assert_eq!(report.migrated_messages, 1);
        assert!(report.legacy_list_removed);
        assert_eq!(store.read(Some("u1"), "chats", json!(null)), json!([{"id": "c1"}]));
        assert_eq!(
            store.read(Some("u1"), "chat_c1", json!(null)),
            json!([{"type": "prompt", "text": "hi"}])
        );
        assert_eq!(store.backend().get("chats").unwrap(), None);
        assert_eq!(store.backend().get("c1").unwrap(), None);
    }

    #[test]
    fn existing_namespaced_data_wins() {
        let store = legacy_store();
        store.write(Some("u1"), "chats", &json!([{"id": "newer"}]));

        let report = migrate_legacy_data(&store, &user("u1"));

        assert_eq!(report.outcome, MigrationOutcome::AlreadyMigrated);
        assert_eq!(store.read(Some("u1"), "chats", json!(null)), json!([{"id": "newer"}]));
        assert!(store.backend().get("chats").unwrap().is_some());
        assert!(store.backend().get("c1").unwrap().is_some());
    }

    #[test]
    fn empty_namespaced_list_still_counts_as_migrated() {
        let store = legacy_store();
        store.write(Some("u1"), "chats", &json!([]));
        assert_eq!(migrate_legacy_data(&store, &user("u1")).outcome, MigrationOutcome::AlreadyMigrated);
    }

    #[test]
    fn nothing_to_do_without_legacy_list() {
        let store = Store::new(MemoryBackend::new());
        let report = migrate_legacy_data(&store, &user("u1"));
        assert_eq!(report.outcome, MigrationOutcome::NothingToMigrate);
        assert!(store.backend().is_empty());
    }

    #[test]
    fn rerun_is_a_no_op() {
        let store = legacy_store();
        migrate_legacy_data(&store, &user("u1"));
        let second = migrate_legacy_data(&store, &user("u1"));
        assert_eq!(second.outcome, MigrationOutcome::NothingToMigrate);
        assert_eq!(store.backend().len(), 2);
    }

    #[test]
    fn conversation_without_messages_is_not_an_error() {
        let store = Store::new(MemoryBackend::new());
        store.backend().set("chats", r#"[{"id":"c1"},{"id":"c2"},{"displayId":"no id"}]"#).unwrap();
        store.backend().set("c2", "[]").unwrap();

        let report = migrate_legacy_data(&store, &user("u1"));

        assert_eq!(report.outcome, MigrationOutcome::Completed);
        assert_eq!(report.conversations, 3);
        assert_eq!(report.migrated_messages, 1);
        assert_eq!(report.missing_messages, 1);
        assert_eq!(report.skipped_entries, 1);
        assert!(store.read_entry::<Value>(Some("u1"), "chat_c1").is_absent());
        assert_eq!(store.read(Some("u1"), "chat_c2", json!(null)), json!([]));
    }

    #[test]
    fn one_failing_conversation_does_not_stop_the_rest() {
        let store = Store::new(PoisonedBackend { inner: MemoryBackend::new(), poison: "chat_c2" });
        store.backend().set("chats", r#"[{"id":"c1"},{"id":"c2"},{"id":"c3"}]"#).unwrap();
        for id in ["c1", "c2", "c3"] {
            store.backend().set(id, r#"[{"type":"prompt","text":"x"}]"#).unwrap();
        }

        let report = migrate_legacy_data(&store, &user("u1"));

        assert_eq!(report.outcome, MigrationOutcome::Completed);
        assert_eq!(report.migrated_messages, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].conversation_id, "c2");
        assert!(report.legacy_list_removed);
        assert_eq!(store.backend().get("chats").unwrap(), None);
        // failed conversation keeps its legacy record
        assert!(store.backend().get("c2").unwrap().is_some());
        assert!(store.read_entry::<Value>(Some("u1"), "chat_c3").found().is_some());
    }

    #[test]
    fn corrupt_legacy_message_record_is_a_per_conversation_failure() {
        let store = Store::new(MemoryBackend::new());
        store.backend().set("chats", r#"[{"id":"c1"},{"id":"c2"}]"#).unwrap();
        store.backend().set("c1", "{broken").unwrap();
        store.backend().set("c2", "[]").unwrap();

        let report = migrate_legacy_data(&store, &user("u1"));

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.migrated_messages, 1);
        assert!(report.legacy_list_removed);
    }

    #[test]
    fn corrupt_legacy_list_is_left_untouched() {
        let store = Store::new(MemoryBackend::new());
        store.backend().set("chats", "{\"id\":\"c1\"}").unwrap();

        let report = migrate_legacy_data(&store, &user("u1"));

        assert_eq!(report.outcome, MigrationOutcome::LegacyCorrupted);
        assert!(store.backend().get("chats").unwrap().is_some());
        assert!(store.read_entry::<Value>(Some("u1"), "chats").is_absent());
    }

    #[test]
    fn failed_list_copy_aborts_without_deleting() {
        let store = Store::new(PoisonedBackend { inner: MemoryBackend::new(), poison: "user_u1_chats" });
        store.backend().set("chats", r#"[{"id":"c1"}]"#).unwrap();
        store.backend().set("c1", "[]").unwrap();

        let report = migrate_legacy_data(&store, &user("u1"));

        assert_eq!(report.outcome, MigrationOutcome::Aborted);
        assert!(store.backend().get("chats").unwrap().is_some());
        assert!(store.backend().get("c1").unwrap().is_some());
    }

    #[test]
    fn numeric_legacy_ids_are_accepted() {
        let store = Store::new(MemoryBackend::new());
        store.backend().set("chats", r#"[{"id":42}]"#).unwrap();
        store.backend().set("42", "[]").unwrap();

        let report = migrate_legacy_data(&store, &user("u1"));

        assert_eq!(report.migrated_messages, 1);
        assert!(store.backend().get("user_u1_chat_42").unwrap().is_some());
    }
}
