//! Derivation of namespaced storage keys

use crate::constants::{CHAT_MESSAGES_PREFIX, KEY_DELIMITER, TEMP_PREFIX, USER_PREFIX};
use crate::log_warn;

/// Storage key for `logical_key` owned by `user_id`.
///
/// `user_<id>_<logical_key>` for a non-empty id, `temp_<logical_key>` otherwise.
/// The fallback keeps signed-out callers working; their data is simply not
/// scoped to anyone.
pub fn derive_key(user_id: Option<&str>, logical_key: &str) -> String {
    match user_id.filter(|id| !id.is_empty()) {
        Some(id) => format!("{USER_PREFIX}{id}{KEY_DELIMITER}{logical_key}"),
        None => {
            log_warn!("derive_key: no user id, using temporary namespace for '{}'", logical_key);
            format!("{TEMP_PREFIX}{logical_key}")
        }
    }
}

/// Prefix shared by every key of `user_id` (`user_<id>_`)
pub fn user_prefix(user_id: &str) -> String {
    format!("{USER_PREFIX}{user_id}{KEY_DELIMITER}")
}

/// Logical key holding the messages of one conversation (`chat_<id>`)
pub fn chat_messages_key(conversation_id: &str) -> String {
    format!("{CHAT_MESSAGES_PREFIX}{conversation_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_keys_follow_layout() {
        assert_eq!(derive_key(Some("u1"), "chats"), "user_u1_chats");
        assert_eq!(derive_key(Some("u1"), &chat_messages_key("c1")), "user_u1_chat_c1");
    }

    #[test]
    fn missing_user_falls_back_to_temp() {
        assert_eq!(derive_key(None, "chats"), "temp_chats");
        assert_eq!(derive_key(Some(""), "chats"), "temp_chats");
        assert!(!derive_key(None, "chats").contains("undefined"));
    }

    #[test]
    fn prefix_matches_derived_keys() {
        assert!(derive_key(Some("u1"), "chats").starts_with(&user_prefix("u1")));
        assert!(!derive_key(Some("u2"), "chats").starts_with(&user_prefix("u1")));
    }
}
