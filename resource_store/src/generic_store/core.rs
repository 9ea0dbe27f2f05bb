use crate::classify::{into_store_error, Operation};
use crate::errors::StoreError;
use crate::executor::{ExecError, Executor};
use crate::generic_store::schema::ResourceSchema;
use crate::params::{FilterSet, ListParams, ListQuery, Pagination, SortSpec};
use crate::traits::Resource;
use config::PaginationConfig;
use sqlx::PgPool;
use std::marker::PhantomData;
use std::sync::Arc;

/// Store for any [`Resource`]; cheap to clone, every clone shares the pool
pub struct GenericStore<T: Resource> {
    pub(crate) executor: Executor,
    pub(crate) pagination: PaginationConfig,
    pub(crate) schema: Arc<ResourceSchema>,
    pub(crate) _phantom: PhantomData<fn() -> T>,
}

impl<T: Resource> Clone for GenericStore<T> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
            pagination: self.pagination,
            schema: Arc::clone(&self.schema),
            _phantom: PhantomData,
        }
    }
}

impl<T: Resource> std::fmt::Debug for GenericStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenericStore")
            .field("resource", &T::NAME)
            .field("table", &self.schema.table().as_str())
            .field("pagination", &self.pagination)
            .finish()
    }
}

impl<T: Resource> GenericStore<T> {
    /// Build a store over `pool`, validating the resource's declarations
    pub fn new(pool: PgPool, pagination: PaginationConfig) -> Result<Self, StoreError> {
        Ok(Self {
            executor: Executor::new(pool),
            pagination,
            schema: Arc::new(ResourceSchema::of::<T>()?),
            _phantom: PhantomData,
        })
    }

    pub fn pool(&self) -> &PgPool {
        self.executor.pool()
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    pub fn schema(&self) -> &ResourceSchema {
        &self.schema
    }

    pub fn pagination_config(&self) -> &PaginationConfig {
        &self.pagination
    }

    /// Run the pagination, sort and filter parsers with this store's
    /// whitelists and page-size limits
    pub fn parse_list_params(&self, params: &ListParams) -> Result<ListQuery, StoreError> {
        let pagination = Pagination::parse(
            params.page.as_deref(),
            params.per_page.as_deref(),
            &self.pagination,
        )?;
        let sort = SortSpec::parse(
            params.sort.as_deref(),
            self.schema.sortable(),
            self.schema.default_sort(),
        )?;
        let filters = FilterSet::parse(&params.filters, self.schema.filterable())?;

        Ok(ListQuery {
            pagination,
            sort,
            filters,
        })
    }

    pub(crate) fn storage_error(&self, err: ExecError, operation: Operation) -> StoreError {
        into_store_error(err, operation, T::NAME, T::UNIQUE)
    }
}
