//! INSERT statements with an optional RETURNING clause

use crate::errors::BuildError;
use crate::query_builder::sql_generation::SqlGenerator;
use crate::query_builder::{Arguments, Query};
use crate::validation::{Column, ValidatedTableName};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct InsertBuilder {
    table: ValidatedTableName,
    columns: Vec<Column>,
    values: Vec<Value>,
    returning: Vec<Column>,
}

impl InsertBuilder {
    pub fn new(table: ValidatedTableName) -> Self {
        Self {
            table,
            columns: Vec::new(),
            values: Vec::new(),
            returning: Vec::new(),
        }
    }

    pub fn columns(mut self, columns: impl IntoIterator<Item = Column>) -> Self {
        self.columns.extend(columns);
        self
    }

    /// The value tuple, positionally aligned with `columns`
    pub fn values(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        self.values.extend(values);
        self
    }

    pub fn returning(mut self, columns: impl IntoIterator<Item = Column>) -> Self {
        self.returning.extend(columns);
        self
    }

    pub fn build(&self) -> Result<Query, BuildError> {
        if self.columns.is_empty() {
            return Err(BuildError::NoColumns {
                statement: "INSERT",
                table: self.table.as_str().to_string(),
            });
        }
        if self.columns.len() != self.values.len() {
            return Err(BuildError::ArityMismatch {
                statement: "INSERT",
                table: self.table.as_str().to_string(),
                columns: self.columns.len(),
                values: self.values.len(),
            });
        }

        let mut args = Arguments::default();
        let placeholders = self
            .values
            .iter()
            .map(|value| args.push(value.clone()))
            .collect::<Vec<_>>()
            .join(", ");

        let mut sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            SqlGenerator::column_list(&self.columns),
            placeholders
        );
        sql.push_str(&SqlGenerator::build_returning_clause(&self.returning));

        Ok(Query::new(sql, args))
    }
}
