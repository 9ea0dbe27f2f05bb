//! Convenience re-exports for common Crudkit usage
//!
//! ```rust
//! use crudkit::prelude::*;
//! ```

pub use crate::core::Crudkit;
pub use crate::errors::CrudkitError;
pub use crate::users::{CreateUserInput, Role, UpdateUserInput, User};

pub use config::{AppConfig, DatabaseConfig, PaginationConfig};

pub use record_derive::Record;
pub use resource_store::prelude::*;

// Common external dependencies
pub use async_trait;
pub use sqlx;
pub use tokio;
pub use tokio_util::sync::CancellationToken;

// Commonly used sqlx types
pub use sqlx::{FromRow, PgPool};
