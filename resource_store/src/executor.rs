//! Statement execution with cancellation
//!
//! [`Executor`] runs built [`Query`] values against a PostgreSQL pool. Every
//! call races the statement against the caller's [`QueryContext`]: if the
//! context is cancelled or its deadline passes first, the call resolves to
//! [`ExecError::Cancelled`] or [`ExecError::TimedOut`] and the in-flight
//! future is dropped.

use crate::query_builder::Query;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Storage-level failure, before classification
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("no rows returned")]
    NoRows,

    #[error("operation cancelled")]
    Cancelled,

    #[error("operation deadline exceeded")]
    TimedOut,

    #[error("database error ({}): {message}", .code.as_deref().unwrap_or("unknown"))]
    Database {
        code: Option<String>,
        constraint: Option<String>,
        message: String,
    },

    #[error(transparent)]
    Driver(sqlx::Error),
}

impl ExecError {
    pub fn is_no_rows(&self) -> bool {
        matches!(self, ExecError::NoRows)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ExecError::Cancelled | ExecError::TimedOut)
    }
}

impl From<sqlx::Error> for ExecError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ExecError::NoRows,
            sqlx::Error::Database(db) => ExecError::Database {
                code: db.code().map(|c| c.into_owned()),
                constraint: db.constraint().map(str::to_owned),
                message: db.message().to_owned(),
            },
            other => ExecError::Driver(other),
        }
    }
}

/// Cancellation signal and optional deadline for one store call
#[derive(Debug, Clone, Default)]
pub struct QueryContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl QueryContext {
    /// A context that is never cancelled and has no deadline
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind to an existing token, typically a child of a request-scoped one
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Fail fast if the context is already done
    pub fn check(&self) -> Result<(), ExecError> {
        if self.is_cancelled() {
            return Err(ExecError::Cancelled);
        }
        if self.is_expired() {
            return Err(ExecError::TimedOut);
        }
        Ok(())
    }

    /// Drive `fut` to completion unless the context finishes first
    pub async fn run<F, T>(&self, fut: F) -> Result<T, ExecError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        self.check()?;

        let guarded = async {
            match self.deadline {
                Some(deadline) => match tokio::time::timeout_at(deadline, fut).await {
                    Ok(result) => result.map_err(ExecError::from),
                    Err(_) => Err(ExecError::TimedOut),
                },
                None => fut.await.map_err(ExecError::from),
            }
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(ExecError::Cancelled),
            result = guarded => result,
        }
    }
}

/// Bind a JSON argument with the closest native PostgreSQL type
macro_rules! bind_value {
    ($query:expr, $value:expr) => {
        match $value {
            Value::String(s) => $query.bind(s.clone()),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    $query.bind(i)
                } else if let Some(f) = n.as_f64() {
                    $query.bind(f)
                } else {
                    $query.bind(n.to_string())
                }
            }
            Value::Bool(b) => $query.bind(*b),
            Value::Null => $query.bind(Option::<String>::None),
            other => $query.bind(sqlx::types::Json(other.clone())),
        }
    };
}

/// Runs built statements on a shared connection pool
#[derive(Debug, Clone)]
pub struct Executor {
    pool: PgPool,
}

impl Executor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// All rows produced by `query`
    pub async fn fetch_all<R>(&self, ctx: &QueryContext, query: &Query) -> Result<Vec<R>, ExecError>
    where
        R: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        debug_log!(sql = query.sql(), args = query.args().len(), "fetch_all");
        let mut statement = sqlx::query_as::<_, R>(query.sql());
        for arg in query.args() {
            statement = bind_value!(statement, arg);
        }
        ctx.run(statement.fetch_all(&self.pool)).await
    }

    /// Exactly one row; zero rows is [`ExecError::NoRows`]
    pub async fn fetch_one<R>(&self, ctx: &QueryContext, query: &Query) -> Result<R, ExecError>
    where
        R: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        debug_log!(sql = query.sql(), args = query.args().len(), "fetch_one");
        let mut statement = sqlx::query_as::<_, R>(query.sql());
        for arg in query.args() {
            statement = bind_value!(statement, arg);
        }
        ctx.run(statement.fetch_one(&self.pool)).await
    }

    /// First column of the single row, e.g. `COUNT(*) AS total`
    pub async fn fetch_count(&self, ctx: &QueryContext, query: &Query) -> Result<i64, ExecError> {
        debug_log!(sql = query.sql(), args = query.args().len(), "fetch_count");
        let mut statement = sqlx::query_scalar::<_, i64>(query.sql());
        for arg in query.args() {
            statement = bind_value!(statement, arg);
        }
        ctx.run(statement.fetch_one(&self.pool)).await
    }

    /// Run a statement for its side effect and return the affected row count
    pub async fn execute(&self, ctx: &QueryContext, query: &Query) -> Result<u64, ExecError> {
        debug_log!(sql = query.sql(), args = query.args().len(), "execute");
        let mut statement = sqlx::query(query.sql());
        for arg in query.args() {
            statement = bind_value!(statement, arg);
        }
        ctx.run(statement.execute(&self.pool))
            .await
            .map(|done| done.rows_affected())
    }

    /// Run raw DDL or maintenance SQL that takes no arguments
    pub async fn execute_raw(&self, ctx: &QueryContext, sql: &str) -> Result<u64, ExecError> {
        debug_log!(sql, "execute_raw");
        ctx.run(sqlx::query(sql).execute(&self.pool))
            .await
            .map(|done| done.rows_affected())
    }
}
