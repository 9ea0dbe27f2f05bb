//! Identifier validation and column whitelists
//!
//! No caller-supplied identifier is ever embedded into SQL directly. Request
//! field names are looked up in a [`ColumnWhitelist`] (sorting) or a
//! [`FilterWhitelist`] (filtering), and only the [`Column`] they resolve to is
//! rendered. Values always travel as positional arguments.

use crate::errors::StoreError;
use crate::query_builder::filter::FilterOperator;
use serde_json::Value;
use std::fmt;

/// Validation errors for database identifiers
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Name contains invalid characters (only alphanumeric and underscore allowed)
    InvalidCharacters(String),
    /// Name is too long (PostgreSQL limit is 63 characters)
    TooLong {
        name: String,
        length: usize,
        max_length: usize,
    },
    /// Name is empty
    Empty,
    /// Name starts with invalid character (must start with letter or underscore)
    InvalidStartCharacter(String),
    /// Name is a reserved SQL keyword
    ReservedKeyword(String),
    /// The same external field name was registered twice
    DuplicateField(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidCharacters(name) => {
                write!(f, "Invalid characters in name '{}': only alphanumeric characters and underscores are allowed", name)
            }
            ValidationError::TooLong {
                name,
                length,
                max_length,
            } => {
                write!(
                    f,
                    "Name '{}' is too long: {} characters (max {})",
                    name, length, max_length
                )
            }
            ValidationError::Empty => {
                write!(f, "Name cannot be empty")
            }
            ValidationError::InvalidStartCharacter(name) => {
                write!(f, "Name '{}' must start with a letter or underscore", name)
            }
            ValidationError::ReservedKeyword(name) => {
                write!(f, "Name '{}' is a reserved SQL keyword", name)
            }
            ValidationError::DuplicateField(name) => {
                write!(f, "Field '{}' is registered more than once", name)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// An invalid identifier in a resource declaration is a programming error
impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        StoreError::internal("invalid resource definition").with_source(err)
    }
}

/// PostgreSQL identifier length limit
const MAX_IDENTIFIER_LENGTH: usize = 63;

/// Keywords that may not be used as table or column names
const RESERVED_KEYWORDS: &[&str] = &[
    "ALL", "ALTER", "AND", "AS", "ASC", "BETWEEN", "BY", "CASE", "CHECK", "COLUMN",
    "CONSTRAINT", "CREATE", "DEFAULT", "DELETE", "DESC", "DISTINCT", "DROP", "ELSE",
    "END", "EXISTS", "FALSE", "FOREIGN", "FROM", "FULL", "GROUP", "HAVING", "IN",
    "INDEX", "INNER", "INSERT", "JOIN", "KEY", "LEFT", "LIKE", "LIMIT", "NOT", "NULL",
    "OFFSET", "ON", "OR", "ORDER", "OUTER", "PRIMARY", "REFERENCES", "RETURNING",
    "RIGHT", "SELECT", "SET", "TABLE", "THEN", "TO", "TRUE", "UNION", "UNIQUE",
    "UPDATE", "USING", "VALUES", "WHEN", "WHERE",
];

/// Check a table or column name against PostgreSQL's unquoted identifier rules
pub fn validate_identifier(name: &str) -> Result<(), ValidationError> {
    let first_char = name.chars().next().ok_or(ValidationError::Empty)?;

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(ValidationError::TooLong {
            name: name.to_string(),
            length: name.len(),
            max_length: MAX_IDENTIFIER_LENGTH,
        });
    }

    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(ValidationError::InvalidStartCharacter(name.to_string()));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ValidationError::InvalidCharacters(name.to_string()));
    }

    if RESERVED_KEYWORDS.contains(&name.to_ascii_uppercase().as_str()) {
        return Err(ValidationError::ReservedKeyword(name.to_string()));
    }

    Ok(())
}

/// A validated table or column identifier, rendered double-quoted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Column(String);

impl Column {
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        validate_identifier(name)?;
        Ok(Self(name.to_string()))
    }

    /// The bare identifier, e.g. `created_at`
    pub fn name(&self) -> &str {
        &self.0
    }

    /// The identifier as it appears in SQL, e.g. `"created_at"`
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0)
    }
}

/// A validated table name that is safe to use in SQL queries
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidatedTableName(String);

impl ValidatedTableName {
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        validate_identifier(name)?;
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ValidatedTableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0)
    }
}

/// Closed mapping from externally exposed field names to storage columns.
#[derive(Debug, Clone, Default)]
pub struct ColumnWhitelist {
    entries: Vec<(String, Column)>,
}

impl ColumnWhitelist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a whitelist from `(field, column)` pairs
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Result<Self, ValidationError> {
        pairs
            .iter()
            .try_fold(Self::new(), |list, (field, column)| list.allow(field, column))
    }

    /// Expose `field` as an alias for storage column `column`
    pub fn allow(mut self, field: &str, column: &str) -> Result<Self, ValidationError> {
        if self.contains(field) {
            return Err(ValidationError::DuplicateField(field.to_string()));
        }
        self.entries.push((field.to_string(), Column::new(column)?));
        Ok(self)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == field)
    }

    /// Resolve a requested field name, rejecting anything not whitelisted.
    pub fn resolve(&self, field: &str) -> Result<&Column, StoreError> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, column)| column)
            .ok_or_else(|| {
                StoreError::bad_request(format!("unknown field '{}'", field))
                    .with_field(field, "field is not allowed here")
            })
    }

    /// Externally visible field names, in registration order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Declared value type of a filterable field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    /// Only `true` / `false`
    Boolean,
    /// One of a closed set of strings
    OneOf(&'static [&'static str]),
}

impl FieldKind {
    /// Convert a raw query-string value into a typed argument
    pub fn parse_value(&self, field: &str, raw: &str) -> Result<Value, StoreError> {
        let invalid = |expected: String| {
            StoreError::bad_request(format!("invalid value for filter '{}'", field))
                .with_field(field, expected)
        };

        match self {
            FieldKind::Text => Ok(Value::String(raw.to_string())),
            FieldKind::Integer => raw
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| invalid("must be an integer".to_string())),
            FieldKind::Boolean => match raw {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(invalid("must be true or false".to_string())),
            },
            FieldKind::OneOf(allowed) => {
                if allowed.contains(&raw) {
                    Ok(Value::String(raw.to_string()))
                } else {
                    Err(invalid(format!("must be one of: {}", allowed.join(", "))))
                }
            }
        }
    }

    /// Operators that make sense for this kind of value
    pub fn default_operators(&self) -> &'static [FilterOperator] {
        match self {
            FieldKind::Boolean | FieldKind::OneOf(_) => &[FilterOperator::Eq, FilterOperator::Ne],
            FieldKind::Integer => &[
                FilterOperator::Eq,
                FilterOperator::Ne,
                FilterOperator::Gt,
                FilterOperator::Gte,
                FilterOperator::Lt,
                FilterOperator::Lte,
            ],
            FieldKind::Text => &[
                FilterOperator::Eq,
                FilterOperator::Ne,
                FilterOperator::Like,
                FilterOperator::ILike,
            ],
        }
    }
}

/// Static declaration of one filterable field, as supplied by a resource
#[derive(Debug, Clone, Copy)]
pub struct FilterField {
    pub field: &'static str,
    pub column: &'static str,
    pub kind: FieldKind,
}

impl FilterField {
    pub const fn new(field: &'static str, column: &'static str, kind: FieldKind) -> Self {
        Self {
            field,
            column,
            kind,
        }
    }
}

/// A resolved filterable field
#[derive(Debug, Clone)]
pub struct FilterTarget {
    pub column: Column,
    pub kind: FieldKind,
}

/// Whitelist of filterable fields; distinct from the sortable whitelist.
#[derive(Debug, Clone, Default)]
pub struct FilterWhitelist {
    entries: Vec<(String, FilterTarget)>,
}

impl FilterWhitelist {
    pub fn new(fields: &[FilterField]) -> Result<Self, ValidationError> {
        let mut entries: Vec<(String, FilterTarget)> = Vec::with_capacity(fields.len());
        for declared in fields {
            if entries.iter().any(|(name, _)| name == declared.field) {
                return Err(ValidationError::DuplicateField(declared.field.to_string()));
            }
            entries.push((
                declared.field.to_string(),
                FilterTarget {
                    column: Column::new(declared.column)?,
                    kind: declared.kind,
                },
            ));
        }
        Ok(Self { entries })
    }

    pub fn resolve(&self, field: &str) -> Result<&FilterTarget, StoreError> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, target)| target)
            .ok_or_else(|| {
                StoreError::bad_request(format!("filtering by '{}' is not allowed", field))
                    .with_field(field, "field is not filterable")
            })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
