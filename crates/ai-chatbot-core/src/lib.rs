//! # AI Chatbot Core
//!
//! Core types and logic for the AI chatbot: per-user namespaced storage over a
//! flat key-value store, migration of pre-namespacing records, the chat
//! history service and the language-model client.
//! This crate is designed to be WASM-compatible and contains minimal dependencies.

#![warn(missing_docs)]

/// Application configuration, logging and factories
pub mod core;

/// Type definitions for all data structures
pub mod types;

/// System constants
pub mod constants;

/// Storage layer: backends, key namespacing and migration
pub mod storage;

/// Chat history, sessions and the language-model client
pub mod chat;

// Re-export commonly used items
pub use types::{ChatSummary, Message, MessageKind, UserId};
pub use types::error::{Error, Result, StorageError, LlmError};
pub use storage::{KeyValueBackend, MemoryBackend, ReadOutcome, Store, UserSpace};

/// Crate version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
