//! Database access layer.
//!
//! Every SQL engine is wrapped behind [`Database`], which accepts SQL written
//! with `?` placeholders and returns a [`RowSet`] regardless of the driver
//! that produced it.

pub mod dialect;
pub mod postgres;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    config::{DatabaseBackend, DatabaseConfig},
    error::{AppError, AppResult},
};

pub use dialect::{contains_pattern, Dialect};

/// One result row, keyed by column name
pub type Record = serde_json::Map<String, Value>;

/// Query parameter. Every variant carries its SQL type so NULLs bind as typed NULLs.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Int(Option<i64>),
    Float(Option<f64>),
    Text(Option<String>),
    Timestamp(DateTime<Utc>),
    Json(Option<Value>),
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(Some(v))
    }
}

impl From<Option<i64>> for SqlValue {
    fn from(v: Option<i64>) -> Self {
        SqlValue::Int(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Float(Some(v))
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(Some(v.to_string()))
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(Some(v))
    }
}

impl From<Option<String>> for SqlValue {
    fn from(v: Option<String>) -> Self {
        SqlValue::Text(v)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(v: DateTime<Utc>) -> Self {
        SqlValue::Timestamp(v)
    }
}

/// Timestamps stored as text use a fixed-width UTC form so they sort lexically.
pub fn timestamp_text(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Normalized result of a statement: returned rows plus affected-row count
#[derive(Debug, Clone, Default)]
pub struct RowSet {
    pub rows: Vec<Record>,
    pub affected: u64,
}

impl RowSet {
    pub fn first(&self) -> Option<&Record> {
        self.rows.first()
    }

    /// Deserialize the first row, if any
    pub fn first_as<T: DeserializeOwned>(&self) -> AppResult<Option<T>> {
        self.rows
            .first()
            .map(|r| decode_record(r.clone()))
            .transpose()
    }

    pub fn into_typed<T: DeserializeOwned>(self) -> AppResult<Vec<T>> {
        self.rows.into_iter().map(decode_record).collect()
    }

    /// Integer value of `column` in the first row (e.g. `COUNT(*) AS total`)
    pub fn scalar_i64(&self, column: &str) -> i64 {
        self.first()
            .and_then(|r| r.get(column))
            .and_then(|v| v.as_i64().or_else(|| v.as_str().and_then(|s| s.parse().ok())))
            .unwrap_or(0)
    }
}

fn decode_record<T: DeserializeOwned>(record: Record) -> AppResult<T> {
    serde_json::from_value(Value::Object(record))
        .map_err(|e| AppError::Internal(format!("Failed to decode row: {}", e)))
}

/// Polymorphic database access, one implementation per SQL engine.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Database: Send + Sync {
    fn dialect(&self) -> Dialect;

    /// Run one statement written with `?` placeholders
    async fn query(&self, sql: &str, params: &[SqlValue]) -> AppResult<RowSet>;

    /// Start a transaction; dropping it without commit rolls back
    async fn begin(&self) -> AppResult<Box<dyn DbTransaction>>;

    /// Apply the embedded schema migrations for this engine
    async fn migrate(&self) -> AppResult<()>;

    async fn ping(&self) -> AppResult<()> {
        self.query("SELECT 1 AS ok", &[]).await.map(|_| ())
    }

    /// Pagination clause and its ordered parameters for this engine
    fn paginate(&self, limit: i64, offset: i64) -> (&'static str, Vec<SqlValue>) {
        self.dialect().paginate(limit, offset)
    }
}

#[async_trait]
pub trait DbTransaction: Send {
    fn dialect(&self) -> Dialect;

    async fn query(&mut self, sql: &str, params: &[SqlValue]) -> AppResult<RowSet>;

    async fn commit(self: Box<Self>) -> AppResult<()>;
}

/// Where a unit of work runs: directly on the pool, or inside a transaction.
pub enum Connection {
    Pool(Arc<dyn Database>),
    Transaction(Box<dyn DbTransaction>),
}

impl Connection {
    pub fn dialect(&self) -> Dialect {
        match self {
            Connection::Pool(db) => db.dialect(),
            Connection::Transaction(tx) => tx.dialect(),
        }
    }

    pub fn is_transaction(&self) -> bool {
        matches!(self, Connection::Transaction(_))
    }

    pub async fn query(&mut self, sql: &str, params: &[SqlValue]) -> AppResult<RowSet> {
        match self {
            Connection::Pool(db) => db.query(sql, params).await,
            Connection::Transaction(tx) => tx.query(sql, params).await,
        }
    }

    pub fn paginate(&self, limit: i64, offset: i64) -> (&'static str, Vec<SqlValue>) {
        self.dialect().paginate(limit, offset)
    }

    /// Commit when transactional; a no-op on the pool
    pub async fn finish(self) -> AppResult<()> {
        match self {
            Connection::Pool(_) => Ok(()),
            Connection::Transaction(tx) => tx.commit().await,
        }
    }
}

/// Connect to the configured engine
pub async fn connect(config: &DatabaseConfig) -> AppResult<Arc<dyn Database>> {
    let db: Arc<dyn Database> = match config.backend {
        DatabaseBackend::Postgres => Arc::new(postgres::PostgresDatabase::connect(config).await?),
        DatabaseBackend::Sqlite => Arc::new(sqlite::SqliteDatabase::connect(config).await?),
    };
    tracing::info!("Connected to {} database", db.dialect());
    Ok(db)
}
