//! Sort expression parsing: `name,-created_at`

use crate::errors::StoreError;
use crate::query_builder::{SortField, SortOrder};
use crate::validation::ColumnWhitelist;

/// Ordered, non-empty sequence of sort keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    fields: Vec<SortField>,
}

impl SortSpec {
    /// Parse a comma-separated sort expression.
    ///
    /// Each token is a whitelisted field name, optionally prefixed with `-`
    /// (descending) or `+` (ascending, the default). Absent or blank input
    /// yields `default`.
    pub fn parse(
        raw: Option<&str>,
        whitelist: &ColumnWhitelist,
        default: &[SortField],
    ) -> Result<Self, StoreError> {
        let raw = raw.map(str::trim).unwrap_or_default();
        if raw.is_empty() {
            return Self::from_default(default);
        }

        let mut fields: Vec<SortField> = Vec::new();
        for token in raw.split(',').map(str::trim) {
            let (name, order) = match token.strip_prefix('-') {
                Some(rest) => (rest, SortOrder::Desc),
                None => (token.strip_prefix('+').unwrap_or(token), SortOrder::Asc),
            };

            if name.is_empty() {
                return Err(StoreError::bad_request("sort contains an empty field")
                    .with_field("sort", "empty field name"));
            }

            let column = whitelist.resolve(name).map_err(|_| {
                StoreError::bad_request(format!("cannot sort by '{}'", name))
                    .with_field(name, "field is not sortable")
            })?;

            if fields.iter().any(|f| &f.column == column) {
                return Err(StoreError::bad_request(format!(
                    "sort field '{}' given more than once",
                    name
                ))
                .with_field(name, "duplicate sort field"));
            }

            fields.push(SortField::new(column.clone(), order));
        }

        Ok(Self { fields })
    }

    fn from_default(default: &[SortField]) -> Result<Self, StoreError> {
        if default.is_empty() {
            return Err(StoreError::internal("no default sort order configured"));
        }
        Ok(Self {
            fields: default.to_vec(),
        })
    }

    pub fn fields(&self) -> &[SortField] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<SortField> {
        self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Column;

    fn whitelist() -> ColumnWhitelist {
        ColumnWhitelist::from_pairs(&[
            ("id", "id"),
            ("name", "name"),
            ("email", "email"),
            ("created_at", "created_at"),
        ])
        .unwrap()
    }

    fn default_order() -> Vec<SortField> {
        vec![SortField::asc(Column::new("id").unwrap())]
    }

    fn summary(sort: &SortSpec) -> Vec<(&str, SortOrder)> {
        sort.fields()
            .iter()
            .map(|f| (f.column.name(), f.order))
            .collect()
    }

    #[test]
    fn absent_or_blank_input_uses_default() {
        for raw in [None, Some(""), Some("   ")] {
            let sort = SortSpec::parse(raw, &whitelist(), &default_order()).unwrap();
            assert_eq!(summary(&sort), vec![("id", SortOrder::Asc)]);
        }
    }

    #[test]
    fn prefixes_select_direction_and_order_is_kept() {
        let sort = SortSpec::parse(Some("-created_at, name,+email"), &whitelist(), &default_order())
            .unwrap();
        assert_eq!(
            summary(&sort),
            vec![
                ("created_at", SortOrder::Desc),
                ("name", SortOrder::Asc),
                ("email", SortOrder::Asc),
            ]
        );
    }

    #[test]
    fn unknown_field_is_rejected_by_name() {
        let err = SortSpec::parse(Some("name,-password"), &whitelist(), &default_order()).unwrap_err();
        assert!(err.is_bad_request());
        assert!(err.message().contains("password"));
        assert_eq!(err.fields()[0].field, "password");
    }

    #[test]
    fn injection_in_field_name_is_rejected() {
        let err = SortSpec::parse(Some("id; DROP TABLE users"), &whitelist(), &default_order())
            .unwrap_err();
        assert!(err.is_bad_request());
    }

    #[test]
    fn duplicate_fields_are_rejected() {
        let err = SortSpec::parse(Some("name,-name"), &whitelist(), &default_order()).unwrap_err();
        assert!(err.is_bad_request());
        assert!(err.message().contains("more than once"));
    }

    #[test]
    fn empty_tokens_are_rejected() {
        for raw in ["name,,id", "-", "name,"] {
            let err = SortSpec::parse(Some(raw), &whitelist(), &default_order()).unwrap_err();
            assert!(err.is_bad_request(), "accepted {:?}", raw);
        }
    }

    #[test]
    fn missing_default_is_an_internal_error() {
        let err = SortSpec::parse(None, &whitelist(), &[]).unwrap_err();
        assert!(err.is_internal());
    }
}
