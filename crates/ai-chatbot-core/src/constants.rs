//! Global constants used throughout the chatbot codebase
//!
//! Key layout of the flat store:
//!
//! | Key pattern | Meaning |
//! |---|---|
//! | `user_<userId>_chats` | conversation list of a user |
//! | `user_<userId>_chat_<conversationId>` | messages of one conversation |
//! | `temp_<logicalKey>` | fallback when no user is signed in |
//! | `chats` | legacy conversation list |
//! | `<conversationId>` | legacy messages of one conversation |

/// Prefix of every namespaced key
pub const USER_PREFIX: &str = "user_";

/// Prefix of keys written while no user is signed in
pub const TEMP_PREFIX: &str = "temp_";

/// Separator between the user id and the logical key.
///
/// User ids must not contain it for key derivation to stay injective.
pub const KEY_DELIMITER: char = '_';

/// Logical key of the conversation list
pub const CHATS_KEY: &str = "chats";

/// Logical key prefix for the messages of a conversation (`chat_<id>`)
pub const CHAT_MESSAGES_PREFIX: &str = "chat_";

/// Un-namespaced key of the pre-migration conversation list
pub const LEGACY_CHATS_KEY: &str = "chats";

/// Default language-model API base URL
pub const DEFAULT_LLM_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Default language-model name
pub const DEFAULT_LLM_MODEL: &str = "gemini-pro";

/// Message shown when the model API fails without a readable message
pub const API_FAILURE_MESSAGE: &str = "API request failed";

/// Default maximum JSON request body accepted by the backend (10 MiB)
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;
