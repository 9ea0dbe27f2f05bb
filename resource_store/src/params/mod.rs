//! Request parameter parsers
//!
//! Turn raw query-string input into validated pagination, sort and filter
//! structures. Every parser fails fast with a BadRequest [`StoreError`] before
//! any statement is built.
//!
//! [`StoreError`]: crate::errors::StoreError

pub mod filter;
pub mod pagination;
pub mod sort;

pub use filter::{FilterSet, RawFilter};
pub use pagination::Pagination;
pub use sort::SortSpec;

/// Query-string keys that are never treated as filters
pub const PAGE_KEY: &str = "page";
pub const PER_PAGE_KEY: &str = "per_page";
pub const SORT_KEY: &str = "sort";

/// Raw listing parameters split out of a query string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub page: Option<String>,
    pub per_page: Option<String>,
    pub sort: Option<String>,
    pub filters: Vec<RawFilter>,
}

impl ListParams {
    /// Split decoded query-string pairs into pagination, sort and filter input.
    /// A repeated `page`/`per_page`/`sort` key keeps its last value.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            match key.as_ref() {
                PAGE_KEY => params.page = Some(value.into()),
                PER_PAGE_KEY => params.per_page = Some(value.into()),
                SORT_KEY => params.sort = Some(value.into()),
                other => params.filters.push(RawFilter::new(other, value)),
            }
        }
        params
    }
}

/// Validated listing parameters, ready for a store's `list`
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub pagination: Pagination,
    pub sort: SortSpec,
    pub filters: FilterSet,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_pairs_are_split_by_key() {
        let params = ListParams::from_query_pairs(vec![
            ("page", "2"),
            ("sort", "-created_at"),
            ("role", "admin"),
            ("per_page", "50"),
            ("active", "true"),
        ]);
        assert_eq!(params.page.as_deref(), Some("2"));
        assert_eq!(params.per_page.as_deref(), Some("50"));
        assert_eq!(params.sort.as_deref(), Some("-created_at"));
        assert_eq!(
            params.filters,
            vec![RawFilter::new("role", "admin"), RawFilter::new("active", "true")]
        );
    }

    #[test]
    fn empty_query_yields_defaults() {
        let params = ListParams::from_query_pairs(Vec::<(String, String)>::new());
        assert_eq!(params, ListParams::default());
    }
}
