//! List/Get/Create/Update/Delete for every resource
//!
//! Each operation builds its statement through [`ResourceSchema`], runs it on
//! the executor, and sends any storage failure through the classifier once.
//!
//! [`ResourceSchema`]: super::schema::ResourceSchema

use super::core::GenericStore;
use crate::classify::Operation;
use crate::errors::StoreError;
use crate::executor::{ExecError, QueryContext};
use crate::params::{FilterSet, ListParams, ListQuery, Pagination, SortSpec};
use crate::traits::store_object::Listing;
use crate::traits::{Resource, StoreObject};
use async_trait::async_trait;
use validator::Validate;

#[async_trait]
impl<T> StoreObject for GenericStore<T>
where
    T: Resource,
{
    type Model = T;
    type Id = T::Id;
    type CreateInput = T::CreateInput;
    type UpdateInput = T::UpdateInput;

    async fn list(
        &self,
        ctx: &QueryContext,
        pagination: &Pagination,
        sort: &SortSpec,
        filters: &FilterSet,
    ) -> Result<Listing<T>, StoreError> {
        self.counted_list(ctx, pagination, sort, filters, |_| ()).await
    }

    async fn get(&self, ctx: &QueryContext, id: &T::Id) -> Result<T, StoreError> {
        let query = self.schema.get_query(id.clone().into());
        self.executor
            .fetch_one::<T>(ctx, &query)
            .await
            .map_err(|e| self.storage_error(e, Operation::Get))
    }

    async fn create(&self, ctx: &QueryContext, input: &T::CreateInput) -> Result<T, StoreError> {
        input.validate()?;

        let query = self.schema.insert_query(T::create_values(input))?;
        self.executor
            .fetch_one::<T>(ctx, &query)
            .await
            .map_err(|e| self.storage_error(e, Operation::Create))
    }

    async fn update(
        &self,
        ctx: &QueryContext,
        id: &T::Id,
        input: &T::UpdateInput,
    ) -> Result<T, StoreError> {
        input.validate()?;

        let values = T::update_values(input);
        if values.is_empty() && self.schema.touch_column().is_none() {
            // nothing to write; report the current state
            return self.get(ctx, id).await;
        }

        let query = self.schema.update_query(id.clone().into(), values)?;
        self.executor
            .fetch_one::<T>(ctx, &query)
            .await
            .map_err(|e| self.storage_error(e, Operation::Update))
    }

    async fn delete(&self, ctx: &QueryContext, id: &T::Id) -> Result<(), StoreError> {
        let query = self.schema.delete_query(id.clone().into())?;
        let removed = self
            .executor
            .execute(ctx, &query)
            .await
            .map_err(|e| self.storage_error(e, Operation::Delete))?;

        if removed == 0 {
            return Err(self.storage_error(ExecError::NoRows, Operation::Delete));
        }
        Ok(())
    }
}

impl<T: Resource> GenericStore<T> {
    /// List, calling `after_count` with the total once the count statement
    /// has succeeded and before the page statement starts
    pub(crate) async fn counted_list<F>(
        &self,
        ctx: &QueryContext,
        pagination: &Pagination,
        sort: &SortSpec,
        filters: &FilterSet,
        after_count: F,
    ) -> Result<Listing<T>, StoreError>
    where
        F: FnOnce(i64) + Send,
    {
        let count = self.schema.count_query(filters);
        let total = self
            .executor
            .fetch_count(ctx, &count)
            .await
            .map_err(|e| self.storage_error(e, Operation::List))?;
        after_count(total);

        // run() re-checks the context, so a cancellation here stops the page query
        let page = self.schema.page_query(pagination, sort, filters);
        let items = self
            .executor
            .fetch_all::<T>(ctx, &page)
            .await
            .map_err(|e| self.storage_error(e, Operation::List))?;

        Ok(Listing {
            items,
            total,
            pagination: *pagination,
        })
    }

    /// Parse raw listing parameters and run [`StoreObject::list`]
    pub async fn list_params(
        &self,
        ctx: &QueryContext,
        params: &ListParams,
    ) -> Result<Listing<T>, StoreError> {
        let ListQuery {
            pagination,
            sort,
            filters,
        } = self.parse_list_params(params)?;
        self.list(ctx, &pagination, &sort, &filters).await
    }
}
