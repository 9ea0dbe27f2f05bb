//! Resource Store - generic data access for CRUD resources
//!
//! This crate turns validated request parameters into parameterised SQL,
//! runs it against PostgreSQL with cancellation, maps rows into typed records
//! and classifies storage failures into a small set of domain errors.

/// Statement tracing; compiled out unless `debug-logging` is enabled
#[cfg(feature = "debug-logging")]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

pub mod classify;
pub mod errors;
pub mod executor;
pub mod generic_store;
pub mod params;
pub mod prelude;
pub mod query_builder;
pub mod traits;
pub mod validation;

pub use classify::{classify, into_store_error, is_unique_violation, Operation, UniqueConstraint};
pub use errors::{BuildError, ErrorKind, FieldError, StoreError};
pub use executor::{ExecError, Executor, QueryContext};
pub use generic_store::{GenericStore, ResourceSchema};
pub use params::{FilterSet, ListParams, ListQuery, Pagination, RawFilter, SortSpec};
pub use query_builder::{FilterOperator, Predicate, Query, SortField, SortOrder};
pub use traits::store_object::Listing;
pub use traits::*;
pub use validation::{Column, ColumnWhitelist, FieldKind, FilterField, FilterWhitelist, ValidationError};

pub use config::PaginationConfig;
