//! Filter parsing: `role=admin`, `age[gte]=18`

use crate::errors::StoreError;
use crate::query_builder::{FilterOperator, Predicate};
use crate::validation::FilterWhitelist;

/// One undecoded `key=value` filter pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFilter {
    pub key: String,
    pub value: String,
}

impl RawFilter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Split `field[op]` into its parts; a bare `field` means equality
    fn field_and_operator(&self) -> Result<(&str, FilterOperator), StoreError> {
        let Some(inner) = self.key.strip_suffix(']') else {
            return Ok((self.key.as_str(), FilterOperator::Eq));
        };

        let (field, token) = inner.split_once('[').ok_or_else(|| {
            StoreError::bad_request(format!("malformed filter '{}'", self.key))
                .with_field(self.key.as_str(), "expected field[operator]")
        })?;

        let operator = FilterOperator::from_token(token).ok_or_else(|| {
            StoreError::bad_request(format!("unsupported filter operator '{}'", token))
                .with_field(field, "unknown operator")
        })?;

        Ok((field, operator))
    }
}

/// Predicates combined with AND; empty means no filtering
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    predicates: Vec<Predicate>,
}

impl FilterSet {
    /// Resolve each raw filter through the filterable whitelist and validate
    /// its value against the field's declared kind.
    pub fn parse(raw: &[RawFilter], whitelist: &FilterWhitelist) -> Result<Self, StoreError> {
        let mut predicates = Vec::with_capacity(raw.len());

        for filter in raw {
            let (field, operator) = filter.field_and_operator()?;
            let target = whitelist.resolve(field)?;

            if !target.kind.default_operators().contains(&operator) {
                return Err(StoreError::bad_request(format!(
                    "operator '{}' is not supported for '{}'",
                    operator, field
                ))
                .with_field(field, "unsupported operator"));
            }

            let value = target.kind.parse_value(field, &filter.value)?;
            predicates.push(Predicate::new(target.column.clone(), operator, value));
        }

        Ok(Self { predicates })
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn into_predicates(self) -> Vec<Predicate> {
        self.predicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{FieldKind, FilterField};
    use serde_json::json;

    const ROLES: &[&str] = &["admin", "user", "mod"];

    fn whitelist() -> FilterWhitelist {
        FilterWhitelist::new(&[
            FilterField::new("role", "role", FieldKind::OneOf(ROLES)),
            FilterField::new("active", "active", FieldKind::Boolean),
            FilterField::new("name", "name", FieldKind::Text),
            FilterField::new("id", "id", FieldKind::Integer),
        ])
        .unwrap()
    }

    #[test]
    fn empty_input_matches_everything() {
        let set = FilterSet::parse(&[], &whitelist()).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn equality_filters_become_predicates() {
        let set = FilterSet::parse(
            &[RawFilter::new("role", "admin"), RawFilter::new("active", "false")],
            &whitelist(),
        )
        .unwrap();

        let predicates = set.predicates();
        assert_eq!(predicates.len(), 2);
        assert_eq!(predicates[0].column.name(), "role");
        assert_eq!(predicates[0].operator, FilterOperator::Eq);
        assert_eq!(predicates[0].value, json!("admin"));
        assert_eq!(predicates[1].value, json!(false));
    }

    #[test]
    fn bracket_operator_form() {
        let set = FilterSet::parse(
            &[RawFilter::new("id[gte]", "10"), RawFilter::new("name[ilike]", "%ann%")],
            &whitelist(),
        )
        .unwrap();
        assert_eq!(set.predicates()[0].operator, FilterOperator::Gte);
        assert_eq!(set.predicates()[0].value, json!(10));
        assert_eq!(set.predicates()[1].operator, FilterOperator::ILike);
    }

    #[test]
    fn fields_outside_filter_whitelist_are_rejected() {
        let err = FilterSet::parse(&[RawFilter::new("email", "a@x.com")], &whitelist()).unwrap_err();
        assert!(err.is_bad_request());
        assert!(err.message().contains("email"));
    }

    #[test]
    fn boolean_filter_rejects_other_literals() {
        let err = FilterSet::parse(&[RawFilter::new("active", "yes")], &whitelist()).unwrap_err();
        assert!(err.is_bad_request());
        assert_eq!(err.fields()[0].field, "active");
    }

    #[test]
    fn enum_filter_rejects_unknown_value() {
        let err = FilterSet::parse(&[RawFilter::new("role", "root")], &whitelist()).unwrap_err();
        assert!(err.is_bad_request());
    }

    #[test]
    fn operator_must_suit_the_field_kind() {
        let err = FilterSet::parse(&[RawFilter::new("active[gt]", "true")], &whitelist()).unwrap_err();
        assert!(err.message().contains("not supported"));
    }

    #[test]
    fn unknown_or_malformed_operators_are_rejected() {
        for key in ["role[between]", "role]", "role[eq"] {
            let err = FilterSet::parse(&[RawFilter::new(key, "admin")], &whitelist()).unwrap_err();
            assert!(err.is_bad_request(), "accepted {:?}", key);
        }
    }
}
