//! Application configuration module
//!
//! Configuration is loaded from environment variables using the `config` and
//! `dotenvy` crates. Variables carry the `VC_ATTENDANCE` prefix and nested
//! values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use vc_attendance::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Dropping sessions shorter than {}s", config.tracking.min_session_secs);
//! ```

mod database;
mod error;
mod ingest;
mod logging;
mod tracking;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use ingest::{FeedSource, IngestConfig};
pub use logging::{Environment, LoggingConfig};
pub use tracking::TrackingConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// PostgreSQL connection; without it sessions are kept in memory
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Session reconstruction tuning
    #[serde(default)]
    pub tracking: TrackingConfig,

    /// Gateway feed
    #[serde(default)]
    pub ingest: IngestConfig,

    /// Logging output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `VC_ATTENDANCE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `VC_ATTENDANCE__TRACKING__MIN_SESSION_SECS=120` -> `tracking.min_session_secs = 120`
    /// - `VC_ATTENDANCE__DATABASE__URL=...` -> `database.url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("VC_ATTENDANCE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(database) = &self.database {
            database.validate()?;
        }
        self.tracking.validate()?;
        self.ingest.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.logging.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "VC_ATTENDANCE__DATABASE__URL",
        "VC_ATTENDANCE__DATABASE__MAX_CONNECTIONS",
        "VC_ATTENDANCE__TRACKING__MIN_SESSION_SECS",
        "VC_ATTENDANCE__INGEST__SOURCE",
        "VC_ATTENDANCE__LOGGING__ENVIRONMENT",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_without_database() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert!(config.database.is_none());
        assert_eq!(config.tracking.min_session_secs, 120);
        assert_eq!(config.ingest.feed_source(), FeedSource::Stdin);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("VC_ATTENDANCE__DATABASE__URL", "postgresql://test@localhost/test");
        env::set_var("VC_ATTENDANCE__DATABASE__MAX_CONNECTIONS", "4");
        env::set_var("VC_ATTENDANCE__TRACKING__MIN_SESSION_SECS", "300");
        env::set_var("VC_ATTENDANCE__INGEST__SOURCE", "/tmp/feed.jsonl");
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        let database = config.database.as_ref().unwrap();
        assert_eq!(database.url.expose_secret(), "postgresql://test@localhost/test");
        assert_eq!(database.max_connections, 4);
        assert_eq!(config.tracking.min_session_secs, 300);
        assert!(matches!(config.ingest.feed_source(), FeedSource::File(_)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("VC_ATTENDANCE__LOGGING__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_validate_rejects_bad_database_url() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("VC_ATTENDANCE__DATABASE__URL", "sqlite://attendance.db");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidDatabaseUrl)
        ));
    }
}
