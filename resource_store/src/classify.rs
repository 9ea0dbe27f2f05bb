//! Storage failure classification
//!
//! Every store operation funnels its [`ExecError`] through [`into_store_error`]
//! exactly once. Internal failures are logged here with their cause; callers
//! only ever see the safe message.

use crate::errors::{ErrorKind, StoreError};
use crate::executor::ExecError;
use std::fmt;

/// SQLSTATE for `unique_violation`
const UNIQUE_VIOLATION: &str = "23505";

/// The store operation a failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Get => "get",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }

    /// Operations that must hit exactly one existing row
    pub fn targets_single_row(self) -> bool {
        matches!(self, Operation::Get | Operation::Update | Operation::Delete)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A uniqueness constraint a resource declares, with its caller-facing wording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniqueConstraint {
    pub field: &'static str,
    pub message: &'static str,
    pub detail: &'static str,
}

impl UniqueConstraint {
    pub const fn new(field: &'static str, message: &'static str) -> Self {
        Self {
            field,
            message,
            detail: "already exists",
        }
    }
}

/// Whether the failure is a uniqueness-constraint violation
pub fn is_unique_violation(err: &ExecError) -> bool {
    match err {
        ExecError::Database { code, message, .. } => {
            if code.as_deref() == Some(UNIQUE_VIOLATION) {
                return true;
            }
            let lowered = message.to_lowercase();
            lowered.contains("unique") || lowered.contains("duplicate")
        }
        _ => false,
    }
}

/// Map a raw execution failure to its domain kind
pub fn classify(err: &ExecError, operation: Operation) -> ErrorKind {
    match err {
        ExecError::NoRows if operation.targets_single_row() => ErrorKind::NotFound,
        err if is_unique_violation(err) => ErrorKind::Conflict,
        _ => ErrorKind::Internal,
    }
}

/// Find which declared constraint a violation belongs to
fn attribute_conflict<'a>(
    err: &ExecError,
    constraints: &'a [UniqueConstraint],
) -> Option<&'a UniqueConstraint> {
    if let ExecError::Database {
        constraint,
        message,
        ..
    } = err
    {
        let haystack = constraint.as_deref().unwrap_or(message.as_str());
        if let Some(found) = constraints.iter().find(|c| haystack.contains(c.field)) {
            return Some(found);
        }
    }
    match constraints {
        [only] => Some(only),
        _ => None,
    }
}

/// Turn an execution failure into the error a store returns.
///
/// `resource` is the human name of the entity (`"User"`); `constraints` are
/// its declared unique columns, used to attribute conflicts to a field.
pub fn into_store_error(
    err: ExecError,
    operation: Operation,
    resource: &str,
    constraints: &[UniqueConstraint],
) -> StoreError {
    match classify(&err, operation) {
        ErrorKind::NotFound => StoreError::not_found(resource),
        ErrorKind::Conflict => match attribute_conflict(&err, constraints) {
            Some(unique) => {
                StoreError::conflict(unique.message).with_field(unique.field, unique.detail)
            }
            None => StoreError::conflict(format!("{} already exists", resource)),
        },
        ErrorKind::BadRequest | ErrorKind::Internal => {
            let message = format!("{} {} failed", resource, operation);
            if err.is_cancelled() {
                tracing::warn!(%operation, resource, error = %err, "store operation interrupted");
            } else {
                tracing::error!(%operation, resource, error = %err, "store operation failed");
            }
            StoreError::internal(message).with_source(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    const USER_UNIQUE: &[UniqueConstraint] = &[UniqueConstraint::new("email", "Email already in use")];

    fn duplicate_email() -> ExecError {
        ExecError::Database {
            code: Some("23505".to_string()),
            constraint: Some("users_email_key".to_string()),
            message: "duplicate key value violates unique constraint \"users_email_key\"".to_string(),
        }
    }

    #[test]
    fn no_rows_is_not_found_for_single_row_operations() {
        for op in [Operation::Get, Operation::Update, Operation::Delete] {
            assert_eq!(classify(&ExecError::NoRows, op), ErrorKind::NotFound);
        }
        assert_eq!(classify(&ExecError::NoRows, Operation::List), ErrorKind::Internal);
    }

    #[test]
    fn unique_violation_by_code_or_message() {
        assert!(is_unique_violation(&duplicate_email()));
        assert!(is_unique_violation(&ExecError::Database {
            code: None,
            constraint: None,
            message: "UNIQUE constraint failed: users.email".to_string(),
        }));
        assert!(!is_unique_violation(&ExecError::Database {
            code: Some("23502".to_string()),
            constraint: None,
            message: "null value in column \"name\" violates not-null constraint".to_string(),
        }));
    }

    #[test]
    fn conflict_is_attributed_to_the_declared_field() {
        let err = into_store_error(duplicate_email(), Operation::Create, "User", USER_UNIQUE);
        assert!(err.is_conflict());
        assert_eq!(err.message(), "Email already in use");
        assert_eq!(err.fields()[0].field, "email");
        assert_eq!(err.fields()[0].message, "already exists");
    }

    #[test]
    fn unattributed_conflict_uses_generic_message() {
        let err = into_store_error(duplicate_email(), Operation::Update, "User", &[]);
        assert!(err.is_conflict());
        assert_eq!(err.message(), "User already exists");
        assert!(err.fields().is_empty());
    }

    #[test]
    fn not_found_names_the_resource() {
        let err = into_store_error(ExecError::NoRows, Operation::Delete, "User", USER_UNIQUE);
        assert!(err.is_not_found());
        assert_eq!(err.message(), "User not found");
    }

    #[test]
    fn internal_failures_hide_driver_text() {
        let raw = ExecError::Database {
            code: Some("42P01".to_string()),
            constraint: None,
            message: "relation \"users\" does not exist".to_string(),
        };
        let err = into_store_error(raw, Operation::List, "User", USER_UNIQUE);
        assert!(err.is_internal());
        assert_eq!(err.to_string(), "User list failed");
        assert!(!err.message().contains("relation"));
        assert!(err.source().is_some());
    }

    #[test]
    fn cancellation_is_internal() {
        let err = into_store_error(ExecError::Cancelled, Operation::Get, "User", USER_UNIQUE);
        assert!(err.is_internal());
        let err = into_store_error(ExecError::TimedOut, Operation::Create, "User", USER_UNIQUE);
        assert!(err.is_internal());
    }
}
