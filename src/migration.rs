//! Table creation for resources

use crate::core::Crudkit;
use crate::errors::CrudkitError;
use resource_store::Resource;

impl Crudkit {
    /// Create the resource's table if it does not exist.
    /// If `recreate` is true, drops the existing table first.
    pub async fn auto_migrate<T: Resource>(&self, recreate: bool) -> Result<(), CrudkitError> {
        if recreate {
            let drop_sql = T::drop_table_sql();
            tracing::debug!(table = T::TABLE, sql = %drop_sql, "dropping table");
            sqlx::query(&drop_sql)
                .execute(self.pool())
                .await
                .map_err(|e| CrudkitError::migration(T::TABLE, e))?;
        }

        let create_sql = T::create_table_sql();
        tracing::debug!(table = T::TABLE, sql = %create_sql, "creating table");
        sqlx::query(&create_sql)
            .execute(self.pool())
            .await
            .map_err(|e| CrudkitError::migration(T::TABLE, e))?;

        Ok(())
    }
}
