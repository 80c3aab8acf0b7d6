//! Error types and handling for the chatbot
//!
//! This module defines the error taxonomy used throughout the system:
//! storage errors (serialization and backend failures), upstream language-model
//! errors and configuration errors. Storage and model errors are normally
//! caught at their boundary and turned into safe defaults; they only travel
//! further through the `try_*` APIs.

use thiserror::Error;

/// Main result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the chatbot
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage layer errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Language-model API errors
    #[error("Language model error: {0}")]
    Llm(#[from] LlmError),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors from std
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Storage-specific errors
#[derive(Error, Debug)]
pub enum StorageError {
    /// Value could not be converted to or from its stored JSON form
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Write rejected because the backend is full
    #[error("Quota exceeded: {needed} bytes needed, {limit} bytes allowed")]
    QuotaExceeded {
        /// Total bytes the store would hold after the write
        needed: usize,
        /// Configured byte limit
        limit: usize,
    },

    /// Backend refused or failed the operation (access denied, unavailable)
    #[error("Backend failure: {0}")]
    Backend(String),

    /// Disk I/O operation failed
    #[error("Disk I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Language-model API errors
#[derive(Error, Debug)]
pub enum LlmError {
    /// Transport failure (DNS, TLS, connection reset)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Non-success status, with the API's human-readable message
    #[error("{message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Message taken from the error payload
        message: String,
    },

    /// Body could not be parsed or held no generated text
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// No API key configured
    #[error("No API key configured for the language model")]
    MissingApiKey,
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        LlmError::Http(e.to_string())
    }
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

impl StorageError {
    /// Create a backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}
