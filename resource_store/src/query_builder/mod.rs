//! SQL statement builders
//!
//! Each builder assembles one statement shape and emits a [`Query`]: the
//! statement text plus its positional arguments. Placeholders (`$1`, `$2`, ...)
//! are numbered in the order values are appended, so callers never track
//! parameter positions themselves.

pub mod delete;
pub mod filter;
pub mod insert;
pub mod ordering;
pub mod select;
pub mod sql_generation;
pub mod update;


pub use delete::DeleteBuilder;
pub use filter::{FilterOperator, Predicate};
pub use insert::InsertBuilder;
pub use ordering::{SortField, SortOrder};
pub use select::SelectBuilder;
pub use update::{Assignment, UpdateBuilder};

use serde_json::Value;

/// A built statement and its ordered arguments.
///
/// Immutable once built; the number of arguments always equals the number of
/// distinct placeholders in `sql`.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    sql: String,
    args: Vec<Value>,
}

impl Query {
    pub(crate) fn new(sql: String, args: Arguments) -> Self {
        Self {
            sql,
            args: args.into_values(),
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.args)
    }
}

/// Positional argument accumulator shared by every clause of one statement
#[derive(Debug, Default)]
pub(crate) struct Arguments {
    values: Vec<Value>,
}

impl Arguments {
    /// Append a value and return the placeholder that refers to it
    pub(crate) fn push(&mut self, value: Value) -> String {
        self.values.push(value);
        format!("${}", self.values.len())
    }

    pub(crate) fn into_values(self) -> Vec<Value> {
        self.values
    }
}
