//! # Configuration Management for crudkit
//!
//! Centralized configuration for the database connection pool and for the
//! request pagination bounds shared by every resource store.
//!
//! ## Quick Start
//!
//! ### Programmatic Configuration
//! ```rust
//! use config::{DatabaseConfig, PaginationConfig};
//!
//! let db_config = DatabaseConfig::new(
//!     "localhost".to_string(), 5432, "myapp".to_string(),
//!     "postgres".to_string(), "password".to_string(),
//!     1, 10, 30, 600, 3600,
//! );
//!
//! let pagination = PaginationConfig::new(20, 100);
//! ```
//!
//! ### TOML File Configuration
//! ```toml
//! [database]
//! host = "localhost"
//! port = 5432
//! database = "myapp"
//! username = "postgres"
//! password = "password"
//! sslmode = "disable"
//! min_connections = 1
//! max_connections = 10
//! connection_timeout_seconds = 30
//! idle_timeout_seconds = 600
//! max_lifetime_seconds = 3600
//!
//! [pagination]
//! default_per_page = 20
//! max_per_page = 100
//! ```
//!
//! Load configuration:
//! ```rust,no_run
//! use config::AppConfig;
//!
//! // crudkit.toml, $CRUDKIT_CONFIG, or DB_* environment variables
//! let config = AppConfig::load()?;
//!
//! // Or load from custom path
//! let config = AppConfig::from_file("config/production.toml")?;
//! # Ok::<(), config::ConfigError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::{env, path::Path, str::FromStr};
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "./crudkit.toml";
const CONFIG_PATH_VAR: &str = "CRUDKIT_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Environment variable error: {0}")]
    Env(#[from] env::VarError),
    #[error("Dotenvy error: {0}")]
    Dotenvy(#[from] dotenvy::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    #[serde(default = "default_sslmode")]
    pub sslmode: String,
    pub min_connections: u32,
    pub max_connections: u32,
    pub connection_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
    pub max_lifetime_seconds: u64,
}

/// Bounds applied when parsing `page` / `per_page` request parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Page size used when the caller does not send `per_page`
    pub default_per_page: u32,
    /// Ceiling that larger `per_page` values are clamped to
    pub max_per_page: u32,
}

fn default_sslmode() -> String {
    "disable".to_string()
}

impl AppConfig {
    /// Load configuration from the TOML file named in the environment, the
    /// default config path, or the `DB_*` environment variables, in that order.
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env file is fine; a malformed one is not.
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e.into()),
        }

        if let Ok(config_path) = env::var(CONFIG_PATH_VAR) {
            Self::from_file(&config_path)
        } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::from_file(DEFAULT_CONFIG_PATH)
        } else {
            Self::from_env()
        }
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Build configuration from `DB_*` and `PAGINATION_*` environment variables,
    /// falling back to local-development defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] but reading from an arbitrary source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database = DatabaseConfig {
            host: text("DB_HOST", "localhost"),
            port: parse_var(&lookup, "DB_PORT", 5432)?,
            database: text("DB_NAME", "playground"),
            username: text("DB_USER", "postgres"),
            password: text("DB_PASSWORD", "postgres"),
            sslmode: text("DB_SSLMODE", "disable"),
            min_connections: parse_var(&lookup, "DB_MIN_CONNECTIONS", 1)?,
            max_connections: parse_var(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            connection_timeout_seconds: parse_var(&lookup, "DB_CONNECTION_TIMEOUT_SECONDS", 30)?,
            idle_timeout_seconds: parse_var(&lookup, "DB_IDLE_TIMEOUT_SECONDS", 600)?,
            max_lifetime_seconds: parse_var(&lookup, "DB_MAX_LIFETIME_SECONDS", 3600)?,
        };

        let defaults = PaginationConfig::default();
        let pagination = PaginationConfig {
            default_per_page: parse_var(
                &lookup,
                "PAGINATION_DEFAULT_PER_PAGE",
                defaults.default_per_page,
            )?,
            max_per_page: parse_var(&lookup, "PAGINATION_MAX_PER_PAGE", defaults.max_per_page)?,
        };

        let config = Self {
            database,
            pagination,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        self.database.validate()?;
        self.pagination.validate()
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| {
            ConfigError::Invalid(format!("{} must be a non-negative integer, got '{}'", key, raw))
        }),
        None => Ok(default),
    }
}

impl DatabaseConfig {
    /// Create a new database configuration
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        host: String,
        port: u16,
        database: String,
        username: String,
        password: String,
        min_connections: u32,
        max_connections: u32,
        connection_timeout_seconds: u64,
        idle_timeout_seconds: u64,
        max_lifetime_seconds: u64,
    ) -> Self {
        Self {
            host,
            port,
            database,
            username,
            password,
            sslmode: default_sslmode(),
            min_connections,
            max_connections,
            connection_timeout_seconds,
            idle_timeout_seconds,
            max_lifetime_seconds,
        }
    }

    /// Build connection string
    pub fn connection_string(&self) -> String {
        format!(
            "postgresql://{}:{}@{}:{}/{}?sslmode={}",
            self.username, self.password, self.host, self.port, self.database, self.sslmode
        )
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::Invalid(
                "Database host cannot be empty".to_string(),
            ));
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid(
                "Database port cannot be zero".to_string(),
            ));
        }
        if self.database.is_empty() {
            return Err(ConfigError::Invalid(
                "Database name cannot be empty".to_string(),
            ));
        }
        if self.username.is_empty() {
            return Err(ConfigError::Invalid(
                "Database username cannot be empty".to_string(),
            ));
        }
        if self.min_connections == 0 {
            return Err(ConfigError::Invalid(
                "Database min_connections must be greater than 0".to_string(),
            ));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "Database max_connections must be greater than 0".to_string(),
            ));
        }
        if self.min_connections > self.max_connections {
            return Err(ConfigError::Invalid(
                "Database min_connections cannot be greater than max_connections".to_string(),
            ));
        }
        if self.connection_timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "Database connection_timeout_seconds must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl PaginationConfig {
    /// Create a new pagination configuration
    pub fn new(default_per_page: u32, max_per_page: u32) -> Self {
        Self {
            default_per_page,
            max_per_page,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_per_page == 0 {
            return Err(ConfigError::Invalid(
                "Pagination default_per_page must be greater than 0".to_string(),
            ));
        }
        if self.max_per_page == 0 {
            return Err(ConfigError::Invalid(
                "Pagination max_per_page must be greater than 0".to_string(),
            ));
        }
        if self.default_per_page > self.max_per_page {
            return Err(ConfigError::Invalid(
                "Pagination default_per_page cannot be greater than max_per_page".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self::new(20, 100)
    }
}
