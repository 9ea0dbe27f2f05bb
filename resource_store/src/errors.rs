//! Domain error types
//!
//! Every failure that leaves a store is a [`StoreError`] of one of four kinds.
//! Storage-level failures are produced by the executor as [`ExecError`] and
//! turned into a `StoreError` by [`crate::classify`].
//!
//! [`ExecError`]: crate::executor::ExecError

use serde::Serialize;
use std::fmt;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Closed classification of failures, independent of the storage engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or invalid caller input; never reaches storage
    BadRequest,
    /// The targeted row does not exist
    NotFound,
    /// A uniqueness (or similar) constraint rejected the write
    Conflict,
    /// Any other storage or infrastructure failure
    Internal,
}

impl ErrorKind {
    /// HTTP status code the transport layer should use for this kind
    pub fn status_code(self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::Internal => 500,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "bad_request",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field-level error attached to a [`StoreError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    pub code: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            field: field.into(),
            code: "invalid".to_string(),
            message,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }
}

/// Error returned by every store operation and request parser.
///
/// `Display` renders only `message`, which is always safe to show a caller.
/// For `Internal` errors the underlying cause is kept in `source` for logs.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct StoreError {
    kind: ErrorKind,
    message: String,
    fields: Vec<FieldError>,
    #[source]
    source: Option<BoxError>,
}

impl StoreError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            fields: Vec::new(),
            source: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    /// `resource` is the human name of the entity, e.g. `"User"`.
    pub fn not_found(resource: &str) -> Self {
        Self::new(ErrorKind::NotFound, format!("{} not found", resource))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Attach a field-level detail
    pub fn with_field(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.fields.push(FieldError::new(field, message));
        self
    }

    /// Keep the underlying cause for logging; it is never part of `message`.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        self.source = Some(source.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.fields
    }

    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn is_bad_request(&self) -> bool {
        self.kind == ErrorKind::BadRequest
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }

    pub fn is_conflict(&self) -> bool {
        self.kind == ErrorKind::Conflict
    }

    pub fn is_internal(&self) -> bool {
        self.kind == ErrorKind::Internal
    }
}

impl From<validator::ValidationErrors> for StoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = Vec::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Validation failed for field '{field}'"));
                fields.push(FieldError::new(field.to_string(), message).with_code(error.code.to_string()));
            }
        }
        // field_errors() is a HashMap; keep the detail order stable for callers
        fields.sort_by(|a, b| a.field.cmp(&b.field));

        let mut err = StoreError::bad_request("Validation failed");
        err.fields = fields;
        err
    }
}

/// Programming-invariant failures detected while assembling a statement
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("{statement} on {table}: {columns} columns but {values} values")]
    ArityMismatch {
        statement: &'static str,
        table: String,
        columns: usize,
        values: usize,
    },

    #[error("{statement} on {table}: no columns given")]
    NoColumns {
        statement: &'static str,
        table: String,
    },

    #[error("{statement} on {table}: refusing to run without a WHERE clause")]
    Unfiltered {
        statement: &'static str,
        table: String,
    },
}

impl From<BuildError> for StoreError {
    fn from(err: BuildError) -> Self {
        StoreError::internal("failed to build statement").with_source(err)
    }
}
