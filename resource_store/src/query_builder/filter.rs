//! Predicates for WHERE clauses

use crate::validation::Column;
use serde_json::Value;
use std::fmt;

/// Comparison operators a predicate can use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOperator {
    Eq,    // =
    Ne,    // !=
    Gt,    // >
    Gte,   // >=
    Lt,    // <
    Lte,   // <=
    Like,  // LIKE
    ILike, // ILIKE (case insensitive)
}

impl FilterOperator {
    pub fn to_sql(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "=",
            FilterOperator::Ne => "!=",
            FilterOperator::Gt => ">",
            FilterOperator::Gte => ">=",
            FilterOperator::Lt => "<",
            FilterOperator::Lte => "<=",
            FilterOperator::Like => "LIKE",
            FilterOperator::ILike => "ILIKE",
        }
    }

    /// Name used in the `field[op]=value` query-string form
    pub fn token(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "eq",
            FilterOperator::Ne => "ne",
            FilterOperator::Gt => "gt",
            FilterOperator::Gte => "gte",
            FilterOperator::Lt => "lt",
            FilterOperator::Lte => "lte",
            FilterOperator::Like => "like",
            FilterOperator::ILike => "ilike",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        let op = match token {
            "eq" => FilterOperator::Eq,
            "ne" => FilterOperator::Ne,
            "gt" => FilterOperator::Gt,
            "gte" => FilterOperator::Gte,
            "lt" => FilterOperator::Lt,
            "lte" => FilterOperator::Lte,
            "like" => FilterOperator::Like,
            "ilike" => FilterOperator::ILike,
            _ => return None,
        };
        Some(op)
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Single `column <op> value` condition; the value is always bound, never inlined
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: Column,
    pub operator: FilterOperator,
    pub value: Value,
}

impl Predicate {
    pub fn new(column: Column, operator: FilterOperator, value: Value) -> Self {
        Self {
            column,
            operator,
            value,
        }
    }

    pub fn eq(column: Column, value: impl Into<Value>) -> Self {
        Self::new(column, FilterOperator::Eq, value.into())
    }
}
