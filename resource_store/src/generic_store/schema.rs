//! Resolved resource schema and the statements built from it

use crate::errors::StoreError;
use crate::params::{FilterSet, Pagination, SortSpec};
use crate::query_builder::{
    DeleteBuilder, InsertBuilder, Predicate, Query, SelectBuilder, SortField, UpdateBuilder,
};
use crate::traits::Resource;
use crate::validation::{
    Column, ColumnWhitelist, FilterWhitelist, ValidatedTableName, ValidationError,
};
use serde_json::Value;

/// A resource's declarations, validated once at store construction.
///
/// Every statement a store runs is produced here, without touching a pool.
#[derive(Debug, Clone)]
pub struct ResourceSchema {
    table: ValidatedTableName,
    columns: Vec<Column>,
    primary_key: Column,
    touch: Option<Column>,
    sortable: ColumnWhitelist,
    filterable: FilterWhitelist,
    default_sort: Vec<SortField>,
}

impl ResourceSchema {
    /// Validate every identifier `T` declares.
    ///
    /// An empty `DEFAULT_SORT` falls back to the primary key, ascending.
    pub fn of<T: Resource>() -> Result<Self, ValidationError> {
        let primary_key = Column::new(T::PRIMARY_KEY)?;

        let columns = T::COLUMNS
            .iter()
            .map(|name| Column::new(name))
            .collect::<Result<Vec<_>, _>>()?;

        let touch = T::TOUCH_COLUMN.map(Column::new).transpose()?;

        let mut default_sort = T::DEFAULT_SORT
            .iter()
            .map(|(name, order)| Column::new(name).map(|c| SortField::new(c, *order)))
            .collect::<Result<Vec<_>, _>>()?;
        if default_sort.is_empty() {
            default_sort.push(SortField::asc(primary_key.clone()));
        }

        Ok(Self {
            table: ValidatedTableName::new(T::TABLE)?,
            columns,
            primary_key,
            touch,
            sortable: ColumnWhitelist::from_pairs(T::SORTABLE)?,
            filterable: FilterWhitelist::new(T::FILTERABLE)?,
            default_sort,
        })
    }

    pub fn table(&self) -> &ValidatedTableName {
        &self.table
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn primary_key(&self) -> &Column {
        &self.primary_key
    }

    pub fn touch_column(&self) -> Option<&Column> {
        self.touch.as_ref()
    }

    pub fn sortable(&self) -> &ColumnWhitelist {
        &self.sortable
    }

    pub fn filterable(&self) -> &FilterWhitelist {
        &self.filterable
    }

    pub fn default_sort(&self) -> &[SortField] {
        &self.default_sort
    }

    fn by_id(&self, id: Value) -> Predicate {
        Predicate::eq(self.primary_key.clone(), id)
    }

    /// `SELECT COUNT(*) AS total` over the filtered rows
    pub fn count_query(&self, filters: &FilterSet) -> Query {
        SelectBuilder::new(self.table.clone())
            .count()
            .filters(filters.predicates().iter().cloned())
            .build()
    }

    /// One page of filtered, ordered rows
    pub fn page_query(&self, pagination: &Pagination, sort: &SortSpec, filters: &FilterSet) -> Query {
        SelectBuilder::new(self.table.clone())
            .columns(self.columns.iter().cloned())
            .filters(filters.predicates().iter().cloned())
            .sort(sort.fields().iter().cloned())
            .limit(pagination.limit())
            .offset(pagination.offset())
            .build()
    }

    pub fn get_query(&self, id: Value) -> Query {
        SelectBuilder::new(self.table.clone())
            .columns(self.columns.iter().cloned())
            .filter(self.by_id(id))
            .build()
    }

    /// INSERT returning every column, so generated fields come back in one round trip
    pub fn insert_query(&self, values: Vec<(&'static str, Value)>) -> Result<Query, StoreError> {
        let mut columns = Vec::with_capacity(values.len());
        let mut args = Vec::with_capacity(values.len());
        for (name, value) in values {
            columns.push(Column::new(name)?);
            args.push(value);
        }

        Ok(InsertBuilder::new(self.table.clone())
            .columns(columns)
            .values(args)
            .returning(self.columns.iter().cloned())
            .build()?)
    }

    /// UPDATE of the given assignments plus the touch column, returning every column
    pub fn update_query(
        &self,
        id: Value,
        values: Vec<(&'static str, Value)>,
    ) -> Result<Query, StoreError> {
        let mut builder = UpdateBuilder::new(self.table.clone());
        for (name, value) in values {
            builder = builder.set(Column::new(name)?, value);
        }
        if let Some(touch) = &self.touch {
            builder = builder.touch(touch.clone());
        }

        Ok(builder
            .filter(self.by_id(id))
            .returning(self.columns.iter().cloned())
            .build()?)
    }

    /// DELETE returning the primary key of the removed row
    pub fn delete_query(&self, id: Value) -> Result<Query, StoreError> {
        Ok(DeleteBuilder::new(self.table.clone())
            .filter(self.by_id(id))
            .returning([self.primary_key.clone()])
            .build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::UniqueConstraint;
    use crate::params::RawFilter;
    use crate::query_builder::SortOrder;
    use crate::traits::Record;
    use crate::validation::{FieldKind, FilterField};
    use config::PaginationConfig;
    use serde::Serialize;
    use serde_json::json;
    use validator::Validate;

    #[derive(Debug, Clone, Serialize, sqlx::FromRow)]
    struct Book {
        id: i64,
        title: String,
        pages: i32,
    }

    #[derive(Debug, Validate)]
    struct NewBook {
        title: String,
        pages: i32,
    }

    #[derive(Debug, Default, Validate)]
    struct BookChanges {
        title: Option<String>,
    }

    impl Record for Book {
        const TABLE: &'static str = "books";
        const PRIMARY_KEY: &'static str = "id";
        const COLUMNS: &'static [&'static str] = &["id", "title", "pages"];
    }

    impl Resource for Book {
        type Id = i64;
        type CreateInput = NewBook;
        type UpdateInput = BookChanges;

        const NAME: &'static str = "Book";
        const SORTABLE: &'static [(&'static str, &'static str)] =
            &[("id", "id"), ("title", "title"), ("length", "pages")];
        const FILTERABLE: &'static [FilterField] =
            &[FilterField::new("length", "pages", FieldKind::Integer)];
        const DEFAULT_SORT: &'static [(&'static str, SortOrder)] = &[];
        const UNIQUE: &'static [UniqueConstraint] = &[UniqueConstraint::new("title", "Title taken")];
        const TOUCH_COLUMN: Option<&'static str> = None;

        fn create_values(input: &NewBook) -> Vec<(&'static str, Value)> {
            vec![("title", json!(input.title)), ("pages", json!(input.pages))]
        }

        fn update_values(input: &BookChanges) -> Vec<(&'static str, Value)> {
            input
                .title
                .as_ref()
                .map(|t| ("title", json!(t)))
                .into_iter()
                .collect()
        }

        fn create_table_sql() -> String {
            "CREATE TABLE IF NOT EXISTS \"books\" (id BIGSERIAL PRIMARY KEY, title TEXT NOT NULL UNIQUE, pages INTEGER NOT NULL)".to_string()
        }
    }

    fn schema() -> ResourceSchema {
        ResourceSchema::of::<Book>().unwrap()
    }

    #[test]
    fn empty_default_sort_falls_back_to_primary_key() {
        let schema = schema();
        assert_eq!(schema.default_sort(), &[SortField::asc(Column::new("id").unwrap())]);
        assert!(schema.touch_column().is_none());
    }

    #[test]
    fn list_statements_share_filters_and_alias_columns() {
        let schema = schema();
        let pagination = Pagination::parse(Some("3"), Some("10"), &PaginationConfig::default()).unwrap();
        let sort = SortSpec::parse(Some("-length"), schema.sortable(), schema.default_sort()).unwrap();
        let filters =
            FilterSet::parse(&[RawFilter::new("length[gte]", "100")], schema.filterable()).unwrap();

        let count = schema.count_query(&filters);
        assert_eq!(
            count.sql(),
            r#"SELECT COUNT(*) AS total FROM "books" WHERE "pages" >= $1"#
        );
        assert_eq!(count.args(), &[json!(100)]);

        let page = schema.page_query(&pagination, &sort, &filters);
        assert_eq!(
            page.sql(),
            r#"SELECT "id", "title", "pages" FROM "books" WHERE "pages" >= $1 ORDER BY "pages" DESC LIMIT $2 OFFSET $3"#
        );
        assert_eq!(page.args(), &[json!(100), json!(10), json!(20)]);
    }

    #[test]
    fn insert_returns_every_column() {
        let query = schema()
            .insert_query(Book::create_values(&NewBook {
                title: "Dune".to_string(),
                pages: 412,
            }))
            .unwrap();
        assert_eq!(
            query.sql(),
            r#"INSERT INTO "books" ("title", "pages") VALUES ($1, $2) RETURNING "id", "title", "pages""#
        );
    }

    #[test]
    fn update_without_touch_column_sets_only_given_fields() {
        let query = schema()
            .update_query(
                json!(5),
                Book::update_values(&BookChanges {
                    title: Some("Emma".to_string()),
                }),
            )
            .unwrap();
        assert_eq!(
            query.sql(),
            r#"UPDATE "books" SET "title" = $1 WHERE "id" = $2 RETURNING "id", "title", "pages""#
        );
        assert_eq!(query.args(), &[json!("Emma"), json!(5)]);
    }

    #[test]
    fn empty_update_without_touch_column_cannot_build() {
        let err = schema()
            .update_query(json!(5), Book::update_values(&BookChanges::default()))
            .unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn delete_returns_primary_key() {
        let query = schema().delete_query(json!(9)).unwrap();
        assert_eq!(query.sql(), r#"DELETE FROM "books" WHERE "id" = $1 RETURNING "id""#);
    }

    #[test]
    fn get_selects_by_primary_key() {
        let query = schema().get_query(json!(9));
        assert_eq!(
            query.sql(),
            r#"SELECT "id", "title", "pages" FROM "books" WHERE "id" = $1"#
        );
    }

    #[test]
    fn drop_table_sql_is_quoted() {
        assert_eq!(Book::drop_table_sql(), r#"DROP TABLE IF EXISTS "books""#);
    }
}
