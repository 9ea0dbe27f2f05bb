//! Commonly used types for implementing and calling resource stores

pub use crate::classify::UniqueConstraint;
pub use crate::errors::{ErrorKind, FieldError, StoreError};
pub use crate::executor::QueryContext;
pub use crate::generic_store::GenericStore;
pub use crate::params::{FilterSet, ListParams, ListQuery, Pagination, RawFilter, SortSpec};
pub use crate::query_builder::SortOrder;
pub use crate::traits::store_object::Listing;
pub use crate::traits::{Record, Resource, StoreObject};
pub use crate::validation::{FieldKind, FilterField};

pub use async_trait::async_trait;
pub use serde_json::{json, Value};
pub use validator::Validate;
