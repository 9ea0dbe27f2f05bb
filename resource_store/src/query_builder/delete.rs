//! DELETE statements

use crate::errors::BuildError;
use crate::query_builder::filter::Predicate;
use crate::query_builder::sql_generation::SqlGenerator;
use crate::query_builder::{Arguments, Query};
use crate::validation::{Column, ValidatedTableName};

#[derive(Debug, Clone)]
pub struct DeleteBuilder {
    table: ValidatedTableName,
    predicates: Vec<Predicate>,
    returning: Vec<Column>,
}

impl DeleteBuilder {
    pub fn new(table: ValidatedTableName) -> Self {
        Self {
            table,
            predicates: Vec::new(),
            returning: Vec::new(),
        }
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Typically the primary key, so an empty result means nothing matched
    pub fn returning(mut self, columns: impl IntoIterator<Item = Column>) -> Self {
        self.returning.extend(columns);
        self
    }

    pub fn build(&self) -> Result<Query, BuildError> {
        if self.predicates.is_empty() {
            return Err(BuildError::Unfiltered {
                statement: "DELETE",
                table: self.table.as_str().to_string(),
            });
        }

        let mut args = Arguments::default();
        let mut sql = format!("DELETE FROM {}", self.table);
        sql.push_str(&SqlGenerator::build_where_clause(&self.predicates, &mut args));
        sql.push_str(&SqlGenerator::build_returning_clause(&self.returning));

        Ok(Query::new(sql, args))
    }
}
