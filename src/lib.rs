//! # Crudkit
//!
//! A generic PostgreSQL data-access layer for CRUD resources: whitelisted
//! pagination, sorting and filtering, parameterised statements, typed row
//! mapping and a small domain error taxonomy.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use crudkit::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let crudkit = Crudkit::from_config(config).await?;
//!     crudkit.auto_migrate::<User>(false).await?;
//!
//!     let users = crudkit.users()?;
//!     let ctx = QueryContext::new();
//!
//!     let ann = users
//!         .create(
//!             &ctx,
//!             &CreateUserInput {
//!                 name: "Ann".to_string(),
//!                 email: "a@x.com".to_string(),
//!                 role: Role::User,
//!             },
//!         )
//!         .await?;
//!
//!     let params = ListParams::from_query_pairs([("role", "user"), ("sort", "-created_at")]);
//!     let page = users.list_params(&ctx, &params).await?;
//!     println!("{} of {} users, first id {}", page.items.len(), page.total, ann.id);
//!
//!     crudkit.close().await;
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

pub mod core;
pub mod errors;
pub mod migration;
pub mod prelude;
pub mod users;

// Re-export the main public types for convenience
pub use core::Crudkit;
pub use errors::CrudkitError;
pub use users::{CreateUserInput, Role, UpdateUserInput, User};

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, PaginationConfig};

// Re-export internal crates used by the derive output and public API
pub use record_derive::Record;
pub use resource_store;

// Re-export external dependencies used in public API
pub use async_trait;
pub use sqlx;
pub use tokio_util::sync::CancellationToken;
