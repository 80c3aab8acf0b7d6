//! Server startup errors

use thiserror::Error;

use crate::db::DatabaseError;

/// Errors that stop the server from starting or serving
#[derive(Error, Debug)]
pub enum ServerError {
    /// Frontend URL is not a valid CORS origin
    #[error("Invalid frontend origin: {0}")]
    InvalidOrigin(String),

    /// Listener could not be bound or the server loop failed
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Database required but unreachable
    #[error(transparent)]
    Database(#[from] DatabaseError),
}
