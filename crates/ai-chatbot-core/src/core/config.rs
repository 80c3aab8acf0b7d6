//! Configuration for the chatbot
//!
//! Every section has working defaults. Values are layered: defaults, then an
//! optional TOML file, then environment variables.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::constants::{DEFAULT_BODY_LIMIT_BYTES, DEFAULT_LLM_API_BASE, DEFAULT_LLM_MODEL};
use crate::types::error::{Error, Result};
use crate::{log_info, log_warn};

/// Deployment environment, mirrors the backend's `APP_ENV`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development: verbose errors, database optional
    Development,
    /// Production: generic errors, database required
    Production,
    /// Test runs
    Test,
}

impl Environment {
    /// Lowercase name as used in config files and responses
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            other => Err(Error::config(format!(
                "Invalid environment: {}. Valid options: development, production, test",
                other
            ))),
        }
    }
}

/// Available storage backend types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    /// In-memory storage, lost on exit
    Memory,
    /// JSON file at `storage.data_file`
    File,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend server configuration
    pub server: ServerConfig,

    /// Local conversation storage
    pub storage: StorageConfig,

    /// Language-model API
    pub llm: LlmConfig,

    /// Backend database connection
    pub database: DatabaseConfig,

    /// Identity provider secrets (reported, not used, by the backend)
    pub identity: IdentityConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP server bind address
    pub http_addr: SocketAddr,

    /// Origin allowed by CORS
    pub frontend_url: String,

    /// Deployment environment
    pub environment: Environment,

    /// Maximum accepted request body
    pub body_limit_bytes: usize,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage backend type
    pub storage_type: StorageType,

    /// File used by the file backend
    pub data_file: PathBuf,

    /// Optional byte quota, mimicking browser storage limits
    pub quota_bytes: Option<usize>,
}

/// Language-model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API base URL
    pub api_base: String,

    /// Model name used in `models/{model}:generateContent`
    pub model: String,

    /// API key (usually from `GOOGLE_AI_KEY`)
    pub api_key: Option<String>,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URI (`mongodb://host:port/db`), `None` to run without one
    pub uri: Option<String>,

    /// Connection attempt timeout in milliseconds
    pub connect_timeout_ms: u64,
}

/// Identity provider configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Provider secret key
    pub secret_key: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            frontend_url: "http://localhost:5173".to_string(),
            environment: Environment::Development,
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            storage_type: StorageType::File,
            data_file: PathBuf::from("./data/chatbot-store.json"),
            quota_bytes: None,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_LLM_API_BASE.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            api_key: None,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: None,
            connect_timeout_ms: 5_000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Defaults, then `path` (if any), then the process environment; validated
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut config = match path {
            Some(path) => load_config(path)?,
            None => Config::default(),
        };
        config.apply_env_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            let port: u16 = port
                .parse()
                .map_err(|e| Error::config(format!("Invalid PORT: {}", e)))?;
            self.server.http_addr.set_port(port);
        }

        if let Some(addr) = lookup("HTTP_ADDR") {
            self.server.http_addr = addr
                .parse()
                .map_err(|e| Error::config(format!("Invalid HTTP address: {}", e)))?;
        }

        if let Some(url) = lookup("FRONTEND_URL") {
            self.server.frontend_url = url;
        }

        // APP_ENV wins over NODE_ENV
        if let Some(env) = lookup("APP_ENV").or_else(|| lookup("NODE_ENV")) {
            self.server.environment = env.parse()?;
        }

        if let Some(uri) = lookup("MONGODB_URI") {
            self.database.uri = Some(uri).filter(|u| !u.is_empty());
        }

        if let Some(key) = lookup("GOOGLE_AI_KEY") {
            self.llm.api_key = Some(key).filter(|k| !k.is_empty());
        }

        if let Some(key) = lookup("CLERK_SECRET_KEY") {
            self.identity.secret_key = Some(key).filter(|k| !k.is_empty());
        }

        if let Some(path) = lookup("CHATBOT_DATA_FILE") {
            self.storage.data_file = PathBuf::from(path);
        }

        if let Some(level) = lookup("CHATBOT_LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => return Err(Error::config(format!("Invalid log level: {}", other))),
        }

        if self.server.body_limit_bytes == 0 {
            return Err(Error::config("Body limit must be greater than zero"));
        }

        if self.server.frontend_url.trim().is_empty() {
            return Err(Error::config("Frontend URL must not be empty"));
        }

        if !self.llm.api_base.starts_with("http://") && !self.llm.api_base.starts_with("https://") {
            return Err(Error::config(format!("Invalid language model API base: {}", self.llm.api_base)));
        }

        if self.llm.model.trim().is_empty() {
            return Err(Error::config("Language model name must not be empty"));
        }

        Ok(())
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &str) -> Result<Config> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| Error::config(format!("Failed to read config file {}: {}", path, e)))?;
    let config = toml::from_str(&contents)
        .map_err(|e| Error::config(format!("Failed to parse config file {}: {}", path, e)))?;
    log_info!("Loaded configuration from: {}", path);
    Ok(config)
}

/// Load configuration from file or use defaults
pub fn load_config_or_default(path: Option<&str>) -> Config {
    match Config::load(path) {
        Ok(config) => config,
        Err(e) => {
            log_warn!("{}. Using defaults.", e);
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.server.http_addr.port(), 5000);
        assert_eq!(config.server.body_limit_bytes, 10 * 1024 * 1024);
        assert_eq!(config.llm.model, "gemini-pro");
    }

    #[test]
    fn environment_overrides_apply() {
        let mut config = Config::default();
        config
            .apply_env_overrides(env(&[
                ("PORT", "8088"),
                ("FRONTEND_URL", "https://chat.example.com"),
                ("APP_ENV", "production"),
                ("GOOGLE_AI_KEY", "k"),
                ("MONGODB_URI", ""),
            ]))
            .unwrap();

        assert_eq!(config.server.http_addr.port(), 8088);
        assert_eq!(config.server.frontend_url, "https://chat.example.com");
        assert_eq!(config.server.environment, Environment::Production);
        assert_eq!(config.llm.api_key.as_deref(), Some("k"));
        assert_eq!(config.database.uri, None);
    }

    #[test]
    fn node_env_is_a_fallback_for_app_env() {
        let mut config = Config::default();
        config.apply_env_overrides(env(&[("NODE_ENV", "production")])).unwrap();
        assert_eq!(config.server.environment, Environment::Production);

        let mut config = Config::default();
        config
            .apply_env_overrides(env(&[("NODE_ENV", "production"), ("APP_ENV", "test")]))
            .unwrap();
        assert_eq!(config.server.environment, Environment::Test);
    }

    #[test]
    fn bad_overrides_are_config_errors() {
        let mut config = Config::default();
        assert!(matches!(config.apply_env_overrides(env(&[("PORT", "http")])), Err(Error::Config(_))));
        assert!(config.apply_env_overrides(env(&[("APP_ENV", "staging")])).is_err());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            frontend_url = "http://localhost:3000"

            [storage]
            storage_type = "memory"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.frontend_url, "http://localhost:3000");
        assert_eq!(config.server.http_addr.port(), 5000);
        assert_eq!(config.storage.storage_type, StorageType::Memory);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn invalid_log_level_is_rejected() {
        let mut config = Config::default();
        config.logging.level = "loud".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_is_an_error_but_default_fallback_works() {
        assert!(load_config("/definitely/not/here.toml").is_err());
        let config = load_config_or_default(Some("/definitely/not/here.toml"));
        assert_eq!(config.server.http_addr.port(), 5000);
    }
}
