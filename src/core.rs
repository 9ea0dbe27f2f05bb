//! Core Crudkit functionality
//!
//! [`Crudkit`] owns the connection pool. Stores are handed a clone of it and
//! never reach for a global.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

use crate::errors::CrudkitError;
use crate::users::User;
use config::{AppConfig, DatabaseConfig, PaginationConfig};
use resource_store::{GenericStore, Resource};

/// Coordinator for the shared pool and the stores built on it
#[derive(Debug, Clone)]
pub struct Crudkit {
    pool: PgPool,
    pagination: PaginationConfig,
}

impl Crudkit {
    /// Connect with default pagination limits
    pub async fn new(config: DatabaseConfig) -> Result<Self, CrudkitError> {
        let pool = Self::connect(&config).await?;
        Ok(Self::from_pool(pool, PaginationConfig::default()))
    }

    /// Connect using a full application configuration
    pub async fn from_config(config: AppConfig) -> Result<Self, CrudkitError> {
        let pool = Self::connect(&config.database).await?;
        Ok(Self::from_pool(pool, config.pagination))
    }

    /// Wrap an existing pool, e.g. one a test harness created
    pub fn from_pool(pool: PgPool, pagination: PaginationConfig) -> Self {
        Self { pool, pagination }
    }

    async fn connect(config: &DatabaseConfig) -> Result<PgPool, CrudkitError> {
        debug_log!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            max_connections = config.max_connections,
            "connecting to database"
        );

        let mut pool_options = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds));

        // Set max lifetime if specified
        if config.max_lifetime_seconds > 0 {
            pool_options =
                pool_options.max_lifetime(Duration::from_secs(config.max_lifetime_seconds));
        }

        Ok(pool_options.connect(&config.connection_string()).await?)
    }

    /// Get database pool reference
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn pagination(&self) -> &PaginationConfig {
        &self.pagination
    }

    /// A store for any resource, sharing this pool
    pub fn store<T: Resource>(&self) -> Result<GenericStore<T>, CrudkitError> {
        Ok(GenericStore::new(self.pool.clone(), self.pagination)?)
    }

    pub fn users(&self) -> Result<GenericStore<User>, CrudkitError> {
        self.store::<User>()
    }

    /// Check database connection health
    pub async fn health_check(&self) -> Result<(), CrudkitError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    /// Wait for checked-out connections to return, then close the pool
    pub async fn close(&self) {
        tracing::info!("closing database pool");
        self.pool.close().await;
    }
}
