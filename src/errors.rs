//! Error types for the Crudkit crate

use config::ConfigError;
use resource_store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrudkitError {
    #[error("Database connection error: {0}")]
    DatabaseConnection(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Migration of table '{table}' failed: {source}")]
    Migration {
        table: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl CrudkitError {
    pub(crate) fn migration(table: &'static str, source: sqlx::Error) -> Self {
        CrudkitError::Migration { table, source }
    }

    /// HTTP status a transport layer should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            CrudkitError::Store(err) => err.status_code(),
            _ => 500,
        }
    }
}
