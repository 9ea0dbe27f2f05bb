use crate::errors::StoreError;
use crate::executor::QueryContext;
use crate::params::{FilterSet, Pagination, SortSpec};
use async_trait::async_trait;
use serde::Serialize;
use std::fmt::Debug;

/// One page of a listing plus the total number of matching rows.
///
/// `total` comes from a separate statement and may drift from `items` under
/// concurrent writes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub pagination: Pagination,
}

impl<T> Listing<T> {
    pub fn total_pages(&self) -> i64 {
        self.pagination.total_pages(self.total)
    }
}

/// CRUD operations over one resource
#[async_trait]
pub trait StoreObject: Clone + Send + Sync + Debug {
    /// The record type this store returns
    type Model: Clone + Send + Sync + Debug + Serialize;

    /// The identifier type
    type Id: Clone + Send + Sync + Debug;

    type CreateInput: Send + Sync;

    type UpdateInput: Send + Sync;

    /// A page of records matching every filter, in `sort` order
    async fn list(
        &self,
        ctx: &QueryContext,
        pagination: &Pagination,
        sort: &SortSpec,
        filters: &FilterSet,
    ) -> Result<Listing<Self::Model>, StoreError>;

    /// The record with this id, or NotFound
    async fn get(&self, ctx: &QueryContext, id: &Self::Id) -> Result<Self::Model, StoreError>;

    /// Insert validated input and return the stored record
    async fn create(
        &self,
        ctx: &QueryContext,
        input: &Self::CreateInput,
    ) -> Result<Self::Model, StoreError>;

    /// Apply the attributes present in `input` and return the updated record
    async fn update(
        &self,
        ctx: &QueryContext,
        id: &Self::Id,
        input: &Self::UpdateInput,
    ) -> Result<Self::Model, StoreError>;

    /// Remove the record, or NotFound if it did not exist
    async fn delete(&self, ctx: &QueryContext, id: &Self::Id) -> Result<(), StoreError>;
}
