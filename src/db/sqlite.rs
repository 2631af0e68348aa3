//! SQLite backend

use std::str::FromStr;

use async_trait::async_trait;
use serde_json::{json, Value};
use sqlx::{
    query::Query,
    sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePoolOptions, SqliteQueryResult, SqliteRow},
    Column, Either, Pool, Row, Sqlite, Transaction, TypeInfo, ValueRef,
};
use tokio_stream::{Stream, StreamExt};

use super::{Database, DbTransaction, Dialect, Record, RowSet, SqlValue};
use crate::{
    config::DatabaseConfig,
    error::{AppError, AppResult},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    pool: Pool<Sqlite>,
}

impl SqliteDatabase {
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);

        // An in-memory database lives as long as its single connection does.
        let pool = if config.url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(config.max_connections)
                .min_connections(config.min_connections)
                .connect_with(options)
                .await?
        };

        Ok(Self { pool })
    }
}

fn build<'q>(sql: &'q str, params: &[SqlValue]) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    params
        .iter()
        .fold(sqlx::query(sql), |query, param| match param {
            SqlValue::Int(v) => query.bind(*v),
            SqlValue::Float(v) => query.bind(*v),
            SqlValue::Text(v) => query.bind(v.clone()),
            SqlValue::Timestamp(v) => query.bind(super::timestamp_text(v)),
            SqlValue::Json(v) => query.bind(v.as_ref().map(|v| v.to_string())),
        })
}

async fn collect<S>(mut stream: S) -> AppResult<RowSet>
where
    S: Stream<Item = Result<Either<SqliteQueryResult, SqliteRow>, sqlx::Error>> + Unpin,
{
    let mut set = RowSet::default();
    while let Some(item) = stream.next().await {
        match item? {
            Either::Left(result) => set.affected += result.rows_affected(),
            Either::Right(row) => set.rows.push(row_to_record(&row)?),
        }
    }
    Ok(set)
}

/// SQLite is dynamically typed, so decoding follows the storage class of each value.
fn row_to_record(row: &SqliteRow) -> Result<Record, sqlx::Error> {
    let mut record = Record::new();

    for column in row.columns() {
        let idx = column.ordinal();
        let storage = {
            let raw = row.try_get_raw(idx)?;
            if raw.is_null() {
                None
            } else {
                Some(raw.type_info().name().to_string())
            }
        };

        let value = match storage.as_deref() {
            None => Value::Null,
            Some("INTEGER") => json!(row.try_get::<i64, _>(idx)?),
            Some("REAL") => json!(row.try_get::<f64, _>(idx)?),
            Some("BLOB") => json!(String::from_utf8_lossy(&row.try_get::<Vec<u8>, _>(idx)?)),
            Some(_) => json!(row.try_get::<String, _>(idx)?),
        };
        record.insert(column.name().to_string(), value);
    }

    Ok(record)
}

#[async_trait]
impl Database for SqliteDatabase {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    // fetch_many yields the rows and the affected count in one pass
    #[allow(deprecated)]
    async fn query(&self, sql: &str, params: &[SqlValue]) -> AppResult<RowSet> {
        let sql = Dialect::Sqlite.translate(sql);
        tracing::trace!(sql = %sql, "sqlite query");
        collect(build(&sql, params).fetch_many(&self.pool)).await
    }

    async fn begin(&self) -> AppResult<Box<dyn DbTransaction>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(SqliteTransaction { tx }))
    }

    async fn migrate(&self) -> AppResult<()> {
        sqlx::migrate!("./migrations/sqlite")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("Migration failed: {}", e)))
    }
}

pub struct SqliteTransaction {
    tx: Transaction<'static, Sqlite>,
}

#[async_trait]
impl DbTransaction for SqliteTransaction {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    // fetch_many yields the rows and the affected count in one pass
    #[allow(deprecated)]
    async fn query(&mut self, sql: &str, params: &[SqlValue]) -> AppResult<RowSet> {
        let sql = Dialect::Sqlite.translate(sql);
        collect(build(&sql, params).fetch_many(&mut *self.tx)).await
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
