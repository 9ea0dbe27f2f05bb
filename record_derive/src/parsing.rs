//! Parsing and validation of `#[record(...)]` attributes

use syn::{Data, DeriveInput, Error, Fields, LitStr, Result};

/// Everything the derive needs from the annotated struct
pub struct RecordDef {
    pub table: String,
    pub primary_key: String,
    pub columns: Vec<String>,
}

pub fn parse_record(input: &DeriveInput) -> Result<RecordDef> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new_spanned(
                    &input.ident,
                    "Record can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new_spanned(
                &input.ident,
                "Record can only be derived for structs",
            ))
        }
    };

    let mut table: Option<(String, proc_macro2::Span)> = None;
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("record")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                let lit: LitStr = meta.value()?.parse()?;
                table = Some((lit.value(), lit.span()));
                Ok(())
            } else {
                Err(meta.error("expected `table = \"...\"`"))
            }
        })?;
    }

    let (table, table_span) = table.ok_or_else(|| {
        Error::new_spanned(
            &input.ident,
            "missing #[record(table = \"...\")] on the struct",
        )
    })?;
    validate_identifier(&table)
        .map_err(|e| Error::new(table_span, format!("Invalid table name: {}", e)))?;

    let mut columns = Vec::with_capacity(fields.len());
    let mut primary_key: Option<String> = None;

    for field in fields {
        let Some(ident) = &field.ident else {
            continue;
        };
        let column = ident.to_string();
        let column = column.strip_prefix("r#").unwrap_or(&column).to_string();
        validate_identifier(&column)
            .map_err(|e| Error::new_spanned(ident, format!("Invalid column name: {}", e)))?;

        for attr in field.attrs.iter().filter(|a| a.path().is_ident("record")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("primary_key") {
                    if primary_key.is_some() {
                        return Err(meta.error("only one field can be the primary key"));
                    }
                    primary_key = Some(column.clone());
                    Ok(())
                } else {
                    Err(meta.error("expected `primary_key`"))
                }
            })?;
        }

        columns.push(column);
    }

    let primary_key = match primary_key {
        Some(pk) => pk,
        None if columns.iter().any(|c| c == "id") => "id".to_string(),
        None => {
            return Err(Error::new_spanned(
                &input.ident,
                "no `id` field; mark the primary key with #[record(primary_key)]",
            ))
        }
    };

    Ok(RecordDef {
        table,
        primary_key,
        columns,
    })
}

/// Same identifier rules as `resource_store::validation::validate_identifier`
fn validate_identifier(name: &str) -> std::result::Result<(), String> {
    let first_char = name
        .chars()
        .next()
        .ok_or_else(|| "name cannot be empty".to_string())?;

    if name.len() > 63 {
        return Err(format!(
            "'{}' is too long: {} characters (max 63)",
            name,
            name.len()
        ));
    }

    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(format!("'{}' must start with a letter or underscore", name));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!(
            "'{}' contains invalid characters: only alphanumeric characters and underscores are allowed",
            name
        ));
    }

    if is_reserved_keyword(name) {
        return Err(format!("'{}' is a reserved SQL keyword", name));
    }

    Ok(())
}

fn is_reserved_keyword(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "ALL", "ALTER", "AND", "AS", "ASC", "BETWEEN", "BY", "CASE", "CHECK", "COLUMN",
        "CONSTRAINT", "CREATE", "DEFAULT", "DELETE", "DESC", "DISTINCT", "DROP", "ELSE",
        "END", "EXISTS", "FALSE", "FOREIGN", "FROM", "FULL", "GROUP", "HAVING", "IN",
        "INDEX", "INNER", "INSERT", "JOIN", "KEY", "LEFT", "LIKE", "LIMIT", "NOT", "NULL",
        "OFFSET", "ON", "OR", "ORDER", "OUTER", "PRIMARY", "REFERENCES", "RETURNING",
        "RIGHT", "SELECT", "SET", "TABLE", "THEN", "TO", "TRUE", "UNION", "UNIQUE",
        "UPDATE", "USING", "VALUES", "WHEN", "WHERE",
    ];
    RESERVED.contains(&name.to_ascii_uppercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn collects_columns_in_order_with_default_primary_key() {
        let input: DeriveInput = parse_quote! {
            #[record(table = "users")]
            struct User { id: i64, name: String, email: String }
        };
        let record = parse_record(&input).unwrap();
        assert_eq!(record.table, "users");
        assert_eq!(record.primary_key, "id");
        assert_eq!(record.columns, vec!["id", "name", "email"]);
    }

    #[test]
    fn explicit_primary_key_wins() {
        let input: DeriveInput = parse_quote! {
            #[record(table = "accounts")]
            struct Account { #[record(primary_key)] account_no: i64, owner: String }
        };
        assert_eq!(parse_record(&input).unwrap().primary_key, "account_no");
    }

    #[test]
    fn rejects_missing_table() {
        let input: DeriveInput = parse_quote! { struct User { id: i64 } };
        assert!(parse_record(&input).is_err());
    }

    #[test]
    fn rejects_reserved_table_name() {
        let input: DeriveInput = parse_quote! {
            #[record(table = "select")]
            struct Bad { id: i64 }
        };
        assert!(parse_record(&input).is_err());
    }

    #[test]
    fn rejects_missing_primary_key() {
        let input: DeriveInput = parse_quote! {
            #[record(table = "logs")]
            struct Log { line: String }
        };
        assert!(parse_record(&input).is_err());
    }

    #[test]
    fn rejects_two_primary_keys() {
        let input: DeriveInput = parse_quote! {
            #[record(table = "pairs")]
            struct Pair { #[record(primary_key)] a: i64, #[record(primary_key)] b: i64 }
        };
        assert!(parse_record(&input).is_err());
    }
}
