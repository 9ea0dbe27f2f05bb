//! SELECT statements, including the COUNT(*) variant used for listings

use crate::query_builder::filter::Predicate;
use crate::query_builder::ordering::SortField;
use crate::query_builder::sql_generation::SqlGenerator;
use crate::query_builder::{Arguments, Query};
use crate::validation::{Column, ValidatedTableName};

/// Alias of the projected column in count queries
pub const COUNT_ALIAS: &str = "total";

#[derive(Debug, Clone)]
pub struct SelectBuilder {
    table: ValidatedTableName,
    columns: Vec<Column>,
    count_only: bool,
    predicates: Vec<Predicate>,
    order_by: Vec<SortField>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl SelectBuilder {
    pub fn new(table: ValidatedTableName) -> Self {
        Self {
            table,
            columns: Vec::new(),
            count_only: false,
            predicates: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Projected columns; none means `*`
    pub fn columns(mut self, columns: impl IntoIterator<Item = Column>) -> Self {
        self.columns.extend(columns);
        self
    }

    /// Project `COUNT(*) AS total` instead of the columns. Ordering and
    /// pagination are ignored for count queries; predicates still apply.
    pub fn count(mut self) -> Self {
        self.count_only = true;
        self
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Add multiple predicates (combined with AND)
    pub fn filters(mut self, predicates: impl IntoIterator<Item = Predicate>) -> Self {
        self.predicates.extend(predicates);
        self
    }

    pub fn order_by(mut self, field: SortField) -> Self {
        self.order_by.push(field);
        self
    }

    pub fn sort(mut self, fields: impl IntoIterator<Item = SortField>) -> Self {
        self.order_by.extend(fields);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn build(&self) -> Query {
        let mut args = Arguments::default();

        let projection = if self.count_only {
            format!("COUNT(*) AS {}", COUNT_ALIAS)
        } else if self.columns.is_empty() {
            "*".to_string()
        } else {
            SqlGenerator::column_list(&self.columns)
        };

        let mut sql = format!("SELECT {} FROM {}", projection, self.table);
        sql.push_str(&SqlGenerator::build_where_clause(&self.predicates, &mut args));

        if !self.count_only {
            sql.push_str(&SqlGenerator::build_order_clause(&self.order_by));
            sql.push_str(&SqlGenerator::build_limit_clause(
                self.limit,
                self.offset,
                &mut args,
            ));
        }

        Query::new(sql, args)
    }
}
