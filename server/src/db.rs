//! Database connection lifecycle
//!
//! The backend does not query the database yet; it only needs to know at
//! startup whether the configured server is reachable, report that state on
//! `/api/test`, and mark the connection closed on shutdown.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use ai_chatbot_core::core::config::DatabaseConfig;
use ai_chatbot_core::{log_info, log_warn};
use thiserror::Error;
use tokio::net::TcpStream;

/// Port used when the URI does not name one
pub const DEFAULT_DATABASE_PORT: u16 = 27017;

/// Database connection errors
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// No URI configured
    #[error("No database URI configured")]
    NotConfigured,

    /// URI could not be parsed into a host and port
    #[error("Invalid database URI: {0}")]
    InvalidUri(String),

    /// Host did not accept a connection
    #[error("Cannot reach database at {addr}: {reason}")]
    Unreachable {
        /// `host:port` that was tried
        addr: String,
        /// Underlying failure
        reason: String,
    },
}

/// Shared connection state
#[derive(Debug, Clone, Default)]
pub struct DatabaseHandle {
    connected: Arc<AtomicBool>,
    host: Option<String>,
}

impl DatabaseHandle {
    /// Handle for a server that never connected
    pub fn disconnected() -> Self {
        Self::default()
    }

    /// Probe the configured database.
    ///
    /// Succeeds when a TCP connection to the URI's host opens within the
    /// configured timeout.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let uri = config.uri.as_deref().ok_or(DatabaseError::NotConfigured)?;
        let addr = connect_address(uri)?;
        let timeout = Duration::from_millis(config.connect_timeout_ms);

        match tokio::time::timeout(timeout, TcpStream::connect(&addr)).await {
            Ok(Ok(_stream)) => {
                log_info!("Database connected: {}", addr);
                Ok(Self {
                    connected: Arc::new(AtomicBool::new(true)),
                    host: Some(addr),
                })
            }
            Ok(Err(e)) => Err(DatabaseError::Unreachable {
                addr,
                reason: e.to_string(),
            }),
            Err(_) => Err(DatabaseError::Unreachable {
                addr,
                reason: format!("timed out after {}ms", config.connect_timeout_ms),
            }),
        }
    }

    /// Whether the connection is open
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// `host:port` the handle connected to
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Mark the connection closed
    pub fn close(&self) {
        if self.connected.swap(false, Ordering::AcqRel) {
            log_warn!("Database connection closed");
        }
    }
}

/// `host:port` to connect to for a `mongodb://` style URI.
///
/// Credentials, database path and options are ignored. For a host list the
/// first host is used.
pub fn connect_address(uri: &str) -> Result<String, DatabaseError> {
    let (_, rest) = uri
        .split_once("://")
        .ok_or_else(|| DatabaseError::InvalidUri(uri.to_string()))?;
    let authority = rest.split(['/', '?']).next().unwrap_or_default();
    let hosts = authority.rsplit_once('@').map_or(authority, |(_, hosts)| hosts);
    let host = hosts.split(',').next().unwrap_or_default();

    if host.is_empty() {
        return Err(DatabaseError::InvalidUri(uri.to_string()));
    }

    match host.rsplit_once(':') {
        Some((name, port)) if !name.is_empty() && port.parse::<u16>().is_ok() => Ok(host.to_string()),
        Some(_) => Err(DatabaseError::InvalidUri(uri.to_string())),
        None => Ok(format!("{}:{}", host, DEFAULT_DATABASE_PORT)),
    }
}
