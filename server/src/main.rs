//! AI Chatbot backend server
use std::net::SocketAddr;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ai_chatbot_core::core::{Config, Environment};
use ai_chatbot_core::{log_error, log_info, log_warn};
use ai_chatbot_server::db::{DatabaseError, DatabaseHandle};
use ai_chatbot_server::{api, AppState};

/// AI chatbot backend
#[derive(Parser, Debug)]
#[command(name = "ai-chatbot-server", version, about)]
struct Args {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Address to listen on (overrides config and HTTP_ADDR)
    #[arg(long, value_name = "ADDR")]
    http_addr: Option<SocketAddr>,

    /// Port to listen on (overrides config, PORT and the port of --http-addr)
    #[arg(short, long)]
    port: Option<u16>,
}

impl Args {
    /// Command-line overrides go on top of file and environment
    fn apply(&self, config: &mut Config) {
        if let Some(addr) = self.http_addr {
            config.server.http_addr = addr;
        }
        if let Some(port) = self.port {
            config.server.http_addr.set_port(port);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    args.apply(&mut config);

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    log_info!("Starting AI Chatbot backend");

    let database = connect_database(&config).await?;
    let state = AppState::new(config, database.clone());

    let result = api::serve(state, shutdown_signal()).await;

    database.close();
    log_info!("Shutdown complete");
    result.map_err(Into::into)
}

/// Connect the database; only production refuses to start without it
async fn connect_database(config: &Config) -> Result<DatabaseHandle, DatabaseError> {
    match DatabaseHandle::connect(&config.database).await {
        Ok(handle) => Ok(handle),
        Err(e) if config.server.environment == Environment::Production => {
            log_error!("Database connection failed: {}", e);
            Err(e)
        }
        Err(e) => {
            log_error!("Database connection failed: {}", e);
            log_warn!("Development mode: continuing without a database");
            Ok(DatabaseHandle::disconnected())
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log_error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                log_error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => log_warn!("Received Ctrl+C, shutting down"),
        _ = terminate => log_warn!("Received SIGTERM, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_addr_and_port_flags_override_config() {
        let mut config = Config::default();
        Args::try_parse_from(["ai-chatbot-server", "--http-addr", "127.0.0.1:9000"])
            .unwrap()
            .apply(&mut config);
        assert_eq!(config.server.http_addr, "127.0.0.1:9000".parse::<SocketAddr>().unwrap());

        Args::try_parse_from(["ai-chatbot-server", "--http-addr", "127.0.0.1:9000", "-p", "7000"])
            .unwrap()
            .apply(&mut config);
        assert_eq!(config.server.http_addr, "127.0.0.1:7000".parse::<SocketAddr>().unwrap());

        assert!(Args::try_parse_from(["ai-chatbot-server", "--http-addr", "not-an-addr"]).is_err());
    }
}
