//! Repository Module
//!
//! Free functions over `SqlitePool` (or a transaction connection) per table.
//! Lookups are generic over [`sqlx::SqliteExecutor`] so they work both on the
//! pool and inside `&mut *tx`.

pub mod cash_closing;
pub mod client;
pub mod company_config;
pub mod conduce;
pub mod delivery_order;
pub mod expense;
pub mod invoice;
pub mod opening_balance;
pub mod report;
pub mod sale;
pub mod sequence;
pub mod tax_config;

use shared::error::{AppError, ErrorCode};
use sqlx::{Sqlite, SqlitePool, Transaction};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {1}")]
    NotFound(ErrorCode, String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Business rule violation carrying its error code
    #[error("{1}")]
    Rule(ErrorCode, String),
}

impl RepoError {
    pub fn not_found(code: ErrorCode, msg: impl Into<String>) -> Self {
        Self::NotFound(code, msg.into())
    }
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepoError::Duplicate(db.message().to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl From<AppError> for RepoError {
    fn from(err: AppError) -> Self {
        match err.code.http_status() {
            http::StatusCode::NOT_FOUND => RepoError::NotFound(err.code, err.message),
            _ => RepoError::Rule(err.code, err.message),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(code, msg) => AppError::with_message(code, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Database(msg) => AppError::database(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Rule(code, msg) => AppError::with_message(code, msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Open a write transaction with `BEGIN IMMEDIATE`
///
/// The write lock is taken before the first read, so concurrent writers wait
/// on `busy_timeout`. A deferred transaction that reads first fails with
/// `SQLITE_BUSY` when it upgrades after another writer committed.
pub async fn begin_write(pool: &SqlitePool) -> RepoResult<Transaction<'static, Sqlite>> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}

/// `[start, end)` millis filter shared by the list queries
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeRange {
    pub start: i64,
    pub end: i64,
}

impl TimeRange {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }
}
