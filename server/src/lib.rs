//! # AI Chatbot Server
//!
//! Backend shell for the chatbot: health and diagnostics endpoints, CORS for
//! the frontend origin, and the database connection lifecycle.

#![warn(missing_docs)]

/// HTTP API handlers and routing
pub mod api;

/// Database connection lifecycle
pub mod db;

/// Startup errors
pub mod error;

/// Shared handler state
pub mod state;

pub use error::ServerError;
pub use state::AppState;
