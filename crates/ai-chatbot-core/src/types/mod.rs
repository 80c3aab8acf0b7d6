/// Type definitions for the chatbot
///
/// This module contains all type definitions organized by category.

/// System-wide error types
pub mod error;
/// User identifier
pub mod user;
/// Conversation and message records
pub mod chat;

// Re-export commonly used types for convenience
pub use user::UserId;
pub use chat::{ChatSummary, Message, MessageKind};
