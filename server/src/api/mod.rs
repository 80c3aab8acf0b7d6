//! HTTP API module for the chatbot backend

/// HTTP request handlers
pub mod handlers;

/// Router and server loop
pub mod server;

// Re-export commonly used items
pub use server::{create_router, serve};
