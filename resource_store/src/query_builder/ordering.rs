//! ORDER BY terms

use crate::validation::Column;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// One sort key; the first field of a sequence is the primary key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortField {
    pub column: Column,
    pub order: SortOrder,
}

impl SortField {
    pub fn new(column: Column, order: SortOrder) -> Self {
        Self { column, order }
    }

    pub fn asc(column: Column) -> Self {
        Self::new(column, SortOrder::Asc)
    }

    pub fn desc(column: Column) -> Self {
        Self::new(column, SortOrder::Desc)
    }
}
