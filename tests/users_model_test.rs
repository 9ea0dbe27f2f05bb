//! Input validation and parameter parsing for the users resource, no database

use crudkit::prelude::*;
use crudkit::resource_store::{FilterOperator, ResourceSchema};

#[test]
fn test_create_input_rules() {
    let valid = CreateUserInput {
        name: "Ann".to_string(),
        email: "a@x.com".to_string(),
        role: Role::User,
    };
    assert!(valid.validate().is_ok());

    let too_long = CreateUserInput {
        name: "x".repeat(101),
        ..valid.clone()
    };
    let err: StoreError = too_long.validate().unwrap_err().into();
    assert_eq!(err.fields()[0].field, "name");
    assert_eq!(err.fields()[0].code, "length");
}

#[test]
fn test_update_input_validates_only_present_fields() {
    assert!(UpdateUserInput::default().validate().is_ok());

    let bad = UpdateUserInput {
        email: Some("nope".to_string()),
        ..Default::default()
    };
    let err: StoreError = bad.validate().unwrap_err().into();
    assert!(err.is_bad_request());
    assert_eq!(err.fields()[0].field, "email");
}

#[test]
fn test_create_input_requires_known_role() {
    let parsed: Result<CreateUserInput, _> =
        serde_json::from_value(json!({"name": "Ann", "email": "a@x.com", "role": "root"}));
    assert!(parsed.is_err());
}

#[test]
fn test_user_list_parameters() {
    let schema = ResourceSchema::of::<User>().unwrap();
    let params = ListParams::from_query_pairs([
        ("page", "2"),
        ("per_page", "10"),
        ("sort", "-created_at,name"),
        ("role", "admin"),
        ("active[ne]", "false"),
    ]);

    let sort = SortSpec::parse(params.sort.as_deref(), schema.sortable(), schema.default_sort()).unwrap();
    let filters = FilterSet::parse(&params.filters, schema.filterable()).unwrap();
    let pagination = Pagination::parse(
        params.page.as_deref(),
        params.per_page.as_deref(),
        &PaginationConfig::default(),
    )
    .unwrap();

    let query = schema.page_query(&pagination, &sort, &filters);
    assert_eq!(
        query.sql(),
        r#"SELECT "id", "name", "email", "role", "active", "created_at", "updated_at" FROM "users" WHERE "role" = $1 AND "active" != $2 ORDER BY "created_at" DESC, "name" ASC LIMIT $3 OFFSET $4"#
    );
    assert_eq!(query.args(), &[json!("admin"), json!(false), json!(10), json!(10)]);
    assert_eq!(filters.predicates()[1].operator, FilterOperator::Ne);
}

#[test]
fn test_user_filters_are_narrower_than_sorts() {
    let schema = ResourceSchema::of::<User>().unwrap();
    assert!(schema.sortable().contains("email"));

    let err = FilterSet::parse(&[RawFilter::new("email", "a@x.com")], schema.filterable()).unwrap_err();
    assert!(err.is_bad_request());

    let err = FilterSet::parse(&[RawFilter::new("role", "owner")], schema.filterable()).unwrap_err();
    assert!(err.message().contains("role"));
}

#[test]
fn test_default_user_order_is_id_ascending() {
    let schema = ResourceSchema::of::<User>().unwrap();
    let sort = SortSpec::parse(None, schema.sortable(), schema.default_sort()).unwrap();
    assert_eq!(sort.fields().len(), 1);
    assert_eq!(sort.fields()[0].column.name(), "id");
    assert_eq!(sort.fields()[0].order, SortOrder::Asc);
}
