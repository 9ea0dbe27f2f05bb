//! UPDATE statements with a dynamic SET clause

use crate::errors::BuildError;
use crate::query_builder::filter::Predicate;
use crate::query_builder::sql_generation::SqlGenerator;
use crate::query_builder::{Arguments, Query};
use crate::validation::{Column, ValidatedTableName};
use serde_json::Value;

/// Right-hand side of one SET assignment
#[derive(Debug, Clone, PartialEq)]
pub enum Assignment {
    /// `column = $N`
    Value(Value),
    /// `column = NOW()`, no argument
    Now,
}

/// Builder for one UPDATE statement.
///
/// Every `set` consumes the builder and returns the next state, so one builder
/// is never shared between operations. Setting a column twice keeps the last
/// value at the position of the first assignment.
#[derive(Debug, Clone)]
pub struct UpdateBuilder {
    table: ValidatedTableName,
    assignments: Vec<(Column, Assignment)>,
    touch: Option<Column>,
    predicates: Vec<Predicate>,
    returning: Vec<Column>,
}

impl UpdateBuilder {
    pub fn new(table: ValidatedTableName) -> Self {
        Self {
            table,
            assignments: Vec::new(),
            touch: None,
            predicates: Vec::new(),
            returning: Vec::new(),
        }
    }

    pub fn set(self, column: Column, value: impl Into<Value>) -> Self {
        self.assign(column, Assignment::Value(value.into()))
    }

    pub fn set_now(self, column: Column) -> Self {
        self.assign(column, Assignment::Now)
    }

    /// Column refreshed with `NOW()` on every build, after all other assignments
    pub fn touch(mut self, column: Column) -> Self {
        self.touch = Some(column);
        self
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn returning(mut self, columns: impl IntoIterator<Item = Column>) -> Self {
        self.returning.extend(columns);
        self
    }

    /// Number of explicit assignments, not counting the touched column
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    fn assign(mut self, column: Column, assignment: Assignment) -> Self {
        match self.assignments.iter_mut().find(|(c, _)| *c == column) {
            Some(existing) => existing.1 = assignment,
            None => self.assignments.push((column, assignment)),
        }
        self
    }

    pub fn build(&self) -> Result<Query, BuildError> {
        if self.predicates.is_empty() {
            return Err(BuildError::Unfiltered {
                statement: "UPDATE",
                table: self.table.as_str().to_string(),
            });
        }

        let mut args = Arguments::default();
        let mut set_items: Vec<String> = self
            .assignments
            .iter()
            .filter(|(column, _)| Some(column) != self.touch.as_ref())
            .map(|(column, assignment)| match assignment {
                Assignment::Value(value) => format!("{} = {}", column, args.push(value.clone())),
                Assignment::Now => format!("{} = NOW()", column),
            })
            .collect();

        if let Some(column) = &self.touch {
            set_items.push(format!("{} = NOW()", column));
        }

        if set_items.is_empty() {
            return Err(BuildError::NoColumns {
                statement: "UPDATE",
                table: self.table.as_str().to_string(),
            });
        }

        let mut sql = format!("UPDATE {} SET {}", self.table, set_items.join(", "));
        sql.push_str(&SqlGenerator::build_where_clause(&self.predicates, &mut args));
        sql.push_str(&SqlGenerator::build_returning_clause(&self.returning));

        Ok(Query::new(sql, args))
    }
}
