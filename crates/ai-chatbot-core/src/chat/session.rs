//! Signed-in user session
//!
//! Mirrors what the chat screen does: on sign-in, migrate legacy data and load
//! the conversation list; afterwards select, create, delete and talk to chats.

use crate::chat::history::ChatHistory;
use crate::chat::identity::IdentityProvider;
use crate::chat::llm::LanguageModel;
use crate::storage::{migrate_legacy_data, KeyValueBackend, MigrationReport, Store};
use crate::types::{ChatSummary, Message, UserId};
use crate::{log_info, log_warn};

/// State of one signed-in user's chat screen
pub struct UserSession<'a, B: KeyValueBackend> {
    history: ChatHistory<'a, B>,
    chats: Vec<ChatSummary>,
    active_chat: Option<String>,
    messages: Vec<Message>,
    migration: MigrationReport,
}

impl<'a, B: KeyValueBackend> UserSession<'a, B> {
    /// Start a session for the identity's current user.
    ///
    /// Returns `None` while the identity is still loading or nobody is signed
    /// in. Legacy data is migrated before the conversation list is loaded.
    pub fn start(store: &'a Store<B>, identity: &impl IdentityProvider) -> Option<Self> {
        if !identity.is_loaded() {
            return None;
        }
        let user_id = identity.current_user()?;

        let migration = migrate_legacy_data(store, &user_id);
        log_info!("Session started for {} (migration: {:?})", user_id, migration.outcome);

        let history = ChatHistory::new(store, user_id);
        let chats = history.chats();
        let mut session = Self {
            history,
            chats,
            active_chat: None,
            messages: Vec::new(),
            migration,
        };
        if let Some(first) = session.chats.first().map(|chat| chat.id.clone()) {
            session.select_chat(&first);
        }
        Some(session)
    }

    /// Signed-in user
    pub fn user_id(&self) -> &UserId {
        self.history.user_id()
    }

    /// Result of the sign-in migration
    pub fn migration(&self) -> &MigrationReport {
        &self.migration
    }

    /// Conversation list, newest first
    pub fn chats(&self) -> &[ChatSummary] {
        &self.chats
    }

    /// Id of the conversation being shown
    pub fn active_chat(&self) -> Option<&str> {
        self.active_chat.as_deref()
    }

    /// Messages of the active conversation
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Underlying history
    pub fn history(&self) -> &ChatHistory<'a, B> {
        &self.history
    }

    /// Show `chat_id` and load its messages
    pub fn select_chat(&mut self, chat_id: &str) {
        self.messages = self.history.messages(chat_id);
        self.active_chat = Some(chat_id.to_string());
    }

    /// Create an empty conversation and make it active
    pub fn new_chat(&mut self) -> ChatSummary {
        self.start_chat(None)
    }

    fn start_chat(&mut self, initial_message: Option<&str>) -> ChatSummary {
        let chat = self.history.create_chat(initial_message);
        self.chats.insert(0, chat.clone());
        self.active_chat = Some(chat.id.clone());
        self.messages = chat.messages.clone();
        chat
    }

    /// Delete a conversation; if it was active, the first remaining one
    /// becomes active
    pub fn delete_chat(&mut self, chat_id: &str) {
        self.chats = self.history.delete_chat(chat_id);

        if self.active_chat.as_deref() == Some(chat_id) {
            match self.chats.first().map(|chat| chat.id.clone()) {
                Some(next) => self.select_chat(&next),
                None => {
                    self.active_chat = None;
                    self.messages.clear();
                }
            }
        }
    }

    /// Send `input` to the model in the active conversation.
    ///
    /// Blank input is ignored. Without an active conversation one is created
    /// with the prompt as its first message. Model failures are recorded as an
    /// `error` message. Returns the reply (or error) message appended.
    pub async fn send_message<M: LanguageModel>(&mut self, model: &M, input: &str) -> Option<Message> {
        let prompt = input.trim();
        if prompt.is_empty() {
            return None;
        }

        let chat_id = match self.active_chat.clone() {
            Some(id) => {
                self.messages = self.history.append_message(&id, Message::prompt(prompt));
                id
            }
            None => self.start_chat(Some(prompt)).id,
        };

        let reply = match model.generate(prompt).await {
            Ok(text) => Message::response(text),
            Err(e) => {
                log_warn!("Model request failed in chat {}: {}", chat_id, e);
                Message::error(e.to_string())
            }
        };

        let messages = self.history.append_message(&chat_id, reply.clone());
        if self.active_chat.as_deref() == Some(chat_id.as_str()) {
            self.messages = messages;
        }
        Some(reply)
    }

    /// End the session, optionally removing everything the user stored
    pub fn sign_out(self, clear_data: bool) -> usize {
        let removed = if clear_data { self.history.clear() } else { 0 };
        log_info!("Signed out {} ({} keys removed)", self.history.user_id(), removed);
        removed
    }
}
