//! Chat history - a user's conversations on top of the namespaced store

use serde_json::Value;

use crate::constants::CHATS_KEY;
use crate::storage::keys::chat_messages_key;
use crate::storage::{KeyValueBackend, ReadOutcome, Store, UserSpace};
use crate::types::chat::entry_id;
use crate::types::{ChatSummary, Message, UserId};
use crate::{log_debug, log_error, log_info};

/// Conversation list and messages of one signed-in user
///
/// The stored list is edited as raw JSON entries so that migrated entries the
/// chat layer cannot show (no id, extra fields) survive every rewrite. Records
/// that are present but unreadable are never overwritten.
pub struct ChatHistory<'a, B: KeyValueBackend> {
    user_id: UserId,
    space: UserSpace<'a, B>,
}

impl<'a, B: KeyValueBackend> ChatHistory<'a, B> {
    /// History of `user_id` in `store`
    pub fn new(store: &'a Store<B>, user_id: UserId) -> Self {
        Self {
            space: store.user_space(Some(user_id.clone())),
            user_id,
        }
    }

    /// Owner of this history
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Raw stored list; `None` when the record exists but cannot be read
    fn stored_list(&self) -> Option<Vec<Value>> {
        match self.space.read_entry::<Vec<Value>>(CHATS_KEY) {
            ReadOutcome::Found(list) => Some(list),
            ReadOutcome::Absent => Some(Vec::new()),
            ReadOutcome::Corrupted(reason) | ReadOutcome::Failed(reason) => {
                log_error!("Chat list of {} is unreadable, leaving it untouched: {}", self.user_id, reason);
                None
            }
        }
    }

    /// Conversation list, newest first; empty when none or unreadable.
    /// Entries without an id are kept in storage but not listed.
    pub fn chats(&self) -> Vec<ChatSummary> {
        self.stored_list()
            .unwrap_or_default()
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<ChatSummary>(entry) {
                Ok(chat) if !chat.id.is_empty() => Some(chat),
                Ok(_) => None,
                Err(e) => {
                    log_debug!("Skipping unreadable chat entry: {}", e);
                    None
                }
            })
            .collect()
    }

    /// Start a conversation, optionally seeded with the user's first prompt.
    ///
    /// When the stored list is unreadable nothing is written and the chat only
    /// exists in the returned value.
    pub fn create_chat(&self, initial_message: Option<&str>) -> ChatSummary {
        let chat = ChatSummary::new(initial_message);

        let Some(mut list) = self.stored_list() else {
            return chat;
        };
        match serde_json::to_value(&chat) {
            Ok(entry) => list.insert(0, entry),
            Err(e) => {
                log_error!("Cannot encode chat {}: {}", chat.id, e);
                return chat;
            }
        }
        self.space.write(CHATS_KEY, &list);
        self.space.write(&chat_messages_key(&chat.id), &chat.messages);

        log_info!("Created chat {} for {}", chat.id, self.user_id());
        chat
    }

    /// Messages of `chat_id`; empty when none or unreadable
    pub fn messages(&self, chat_id: &str) -> Vec<Message> {
        self.space.read(&chat_messages_key(chat_id), Vec::new())
    }

    /// Replace the messages of `chat_id`
    pub fn save_messages(&self, chat_id: &str, messages: &[Message]) {
        self.space.write(&chat_messages_key(chat_id), messages)
    }

    /// Append one message and persist; returns the updated list.
    ///
    /// An unreadable message record is left as is; the message is returned
    /// but not stored.
    pub fn append_message(&self, chat_id: &str, message: Message) -> Vec<Message> {
        let mut messages = match self.space.read_entry::<Vec<Message>>(&chat_messages_key(chat_id)) {
            ReadOutcome::Found(messages) => messages,
            ReadOutcome::Absent => Vec::new(),
            ReadOutcome::Corrupted(reason) | ReadOutcome::Failed(reason) => {
                log_error!("Messages of chat {} are unreadable, not appending: {}", chat_id, reason);
                return vec![message];
            }
        };
        messages.push(message);
        self.save_messages(chat_id, &messages);
        messages
    }

    /// Remove a conversation and its messages; returns the remaining list.
    ///
    /// Nothing is removed while the stored list is unreadable.
    pub fn delete_chat(&self, chat_id: &str) -> Vec<ChatSummary> {
        let Some(mut list) = self.stored_list() else {
            return Vec::new();
        };
        list.retain(|entry| entry_id(entry).as_deref() != Some(chat_id));
        self.space.write(CHATS_KEY, &list);
        self.space.delete(&chat_messages_key(chat_id));
        self.chats()
    }

    /// Remove everything this user stored (sign-out cleanup)
    pub fn clear(&self) -> usize {
        self.space.clear_all()
    }
}
