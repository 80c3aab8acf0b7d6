//! Core application logic and configuration

/// Application configuration
pub mod config;

/// Cross-platform logging macros
pub mod logging;

/// Factory for configured stores
pub mod factory;

// Re-export commonly used items
pub use config::{Config, Environment, load_config_or_default};
pub use factory::create_store;
