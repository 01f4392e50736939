//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `MEMBERSHIP_TIERS` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use membership_tiers::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr().unwrap());
//! ```

mod error;
mod server;
mod storage;

pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};
pub use storage::{PostgresConfig, StorageBackend, StorageConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage backend selection and its PostgreSQL settings
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `MEMBERSHIP_TIERS` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `MEMBERSHIP_TIERS__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `MEMBERSHIP_TIERS__STORAGE__BACKEND=postgres` -> `storage.backend = postgres`
    /// - `MEMBERSHIP_TIERS__STORAGE__POSTGRES__URL=...` -> `storage.postgres.url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MEMBERSHIP_TIERS")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// The postgres settings are only checked when that backend is selected.
    /// Production deployments must use postgres.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.storage.validate(self.is_production())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 5] = [
        "MEMBERSHIP_TIERS__STORAGE__BACKEND",
        "MEMBERSHIP_TIERS__STORAGE__POSTGRES__URL",
        "MEMBERSHIP_TIERS__STORAGE__POSTGRES__RUN_MIGRATIONS",
        "MEMBERSHIP_TIERS__SERVER__PORT",
        "MEMBERSHIP_TIERS__SERVER__ENVIRONMENT",
    ];

    fn set_postgres_env() {
        env::set_var("MEMBERSHIP_TIERS__STORAGE__BACKEND", "postgres");
        env::set_var(
            "MEMBERSHIP_TIERS__STORAGE__POSTGRES__URL",
            "postgresql://test@localhost/test",
        );
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_defaults_without_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.server.port, 8080);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_postgres_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_postgres_env();
        env::set_var("MEMBERSHIP_TIERS__STORAGE__POSTGRES__RUN_MIGRATIONS", "false");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.storage.uses_postgres());
        assert_eq!(config.storage.postgres.url, "postgresql://test@localhost/test");
        assert!(!config.storage.postgres.run_migrations);
        assert_eq!(config.storage.postgres.max_connections, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_postgres_without_url_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("MEMBERSHIP_TIERS__STORAGE__BACKEND", "postgres");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("STORAGE__POSTGRES__URL"))
        );
    }

    #[test]
    fn test_memory_storage_rejected_in_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("MEMBERSHIP_TIERS__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
        assert_eq!(
            config.validate(),
            Err(ValidationError::MemoryStorageInProduction)
        );
    }

    #[test]
    fn test_custom_server_port() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("MEMBERSHIP_TIERS__SERVER__PORT", "3000");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
    }
}
