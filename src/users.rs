//! The `users` resource
//!
//! Declares the record, its inputs and its whitelists; all storage behavior
//! comes from [`GenericStore`](resource_store::GenericStore).

use chrono::{DateTime, Utc};
use record_derive::Record;
use resource_store::query_builder::SortOrder;
use resource_store::validation::{FieldKind, FilterField};
use resource_store::{Resource, UniqueConstraint};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use validator::Validate;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
    Mod,
}

impl Role {
    /// Every accepted spelling, as stored
    pub const ALL: &'static [&'static str] = &["admin", "user", "mod"];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
            Role::Mod => "mod",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            "mod" => Ok(Role::Mod),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = UnknownRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A row of the `users` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Record)]
#[record(table = "users")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserInput {
    #[validate(length(min = 2, max = 100, message = "must be between 2 and 100 characters"))]
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    pub role: Role,
}

/// Partial update; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateUserInput {
    #[validate(length(min = 2, max = 100, message = "must be between 2 and 100 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    pub role: Option<Role>,
    pub active: Option<bool>,
}

impl Resource for User {
    type Id = i64;
    type CreateInput = CreateUserInput;
    type UpdateInput = UpdateUserInput;

    const NAME: &'static str = "User";

    const SORTABLE: &'static [(&'static str, &'static str)] = &[
        ("id", "id"),
        ("name", "name"),
        ("email", "email"),
        ("created_at", "created_at"),
    ];

    const FILTERABLE: &'static [FilterField] = &[
        FilterField::new("role", "role", FieldKind::OneOf(Role::ALL)),
        FilterField::new("active", "active", FieldKind::Boolean),
    ];

    const DEFAULT_SORT: &'static [(&'static str, SortOrder)] = &[("id", SortOrder::Asc)];

    const UNIQUE: &'static [UniqueConstraint] =
        &[UniqueConstraint::new("email", "Email already in use")];

    fn create_values(input: &CreateUserInput) -> Vec<(&'static str, Value)> {
        vec![
            ("name", json!(input.name)),
            ("email", json!(input.email)),
            ("role", json!(input.role.as_str())),
        ]
    }

    fn update_values(input: &UpdateUserInput) -> Vec<(&'static str, Value)> {
        let mut values = Vec::new();
        if let Some(name) = &input.name {
            values.push(("name", json!(name)));
        }
        if let Some(email) = &input.email {
            values.push(("email", json!(email)));
        }
        if let Some(role) = input.role {
            values.push(("role", json!(role.as_str())));
        }
        if let Some(active) = input.active {
            values.push(("active", json!(active)));
        }
        values
    }

    fn create_table_sql() -> String {
        r#"CREATE TABLE IF NOT EXISTS "users" (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    role TEXT NOT NULL DEFAULT 'user',
    active BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)"#
        .to_string()
    }
}
