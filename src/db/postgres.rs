//! PostgreSQL backend

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::{prelude::ToPrimitive, Decimal};
use serde_json::{json, Value};
use sqlx::{
    postgres::{PgArguments, PgPoolOptions, PgQueryResult, PgRow},
    query::Query,
    Column, Either, Pool, Postgres, Row, Transaction, TypeInfo, ValueRef,
};
use tokio_stream::{Stream, StreamExt};

use super::{Database, DbTransaction, Dialect, Record, RowSet, SqlValue};
use crate::{config::DatabaseConfig, error::AppResult};

#[derive(Clone)]
pub struct PostgresDatabase {
    pool: Pool<Postgres>,
}

impl PostgresDatabase {
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect(&config.url)
            .await?;

        Ok(Self { pool })
    }
}

fn build<'q>(sql: &'q str, params: &[SqlValue]) -> Query<'q, Postgres, PgArguments> {
    params
        .iter()
        .fold(sqlx::query(sql), |query, param| match param {
            SqlValue::Int(v) => query.bind(*v),
            SqlValue::Float(v) => query.bind(*v),
            SqlValue::Text(v) => query.bind(v.clone()),
            SqlValue::Timestamp(v) => query.bind(*v),
            SqlValue::Json(v) => query.bind(v.clone()),
        })
}

async fn collect<S>(mut stream: S) -> AppResult<RowSet>
where
    S: Stream<Item = Result<Either<PgQueryResult, PgRow>, sqlx::Error>> + Unpin,
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

fn row_to_record(row: &PgRow) -> Result<Record, sqlx::Error> {
    let mut record = Record::new();

    for column in row.columns() {
        let idx = column.ordinal();
        if row.try_get_raw(idx)?.is_null() {
            record.insert(column.name().to_string(), Value::Null);
            continue;
        }

        let value = match column.type_info().name() {
            "INT2" => json!(row.try_get::<i16, _>(idx)?),
            "INT4" => json!(row.try_get::<i32, _>(idx)?),
            "INT8" => json!(row.try_get::<i64, _>(idx)?),
            "FLOAT4" => json!(row.try_get::<f32, _>(idx)?),
            "FLOAT8" => json!(row.try_get::<f64, _>(idx)?),
            "NUMERIC" => json!(row.try_get::<Decimal, _>(idx)?.to_f64()),
            "BOOL" => json!(row.try_get::<bool, _>(idx)?),
            "TIMESTAMPTZ" => json!(super::timestamp_text(&row.try_get::<DateTime<Utc>, _>(idx)?)),
            "TIMESTAMP" => {
                json!(super::timestamp_text(&row.try_get::<NaiveDateTime, _>(idx)?.and_utc()))
            }
            "JSON" | "JSONB" => row.try_get::<Value, _>(idx)?,
            _ => json!(row.try_get::<String, _>(idx)?),
        };
        record.insert(column.name().to_string(), value);
    }

    Ok(record)
}

#[async_trait]
impl Database for PostgresDatabase {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    // fetch_many yields the rows and the affected count in one pass
    #[allow(deprecated)]
    async fn query(&self, sql: &str, params: &[SqlValue]) -> AppResult<RowSet> {
        let sql = Dialect::Postgres.translate(sql);
        tracing::trace!(sql = %sql, "postgres query");
        collect(build(&sql, params).fetch_many(&self.pool)).await
    }

    async fn begin(&self) -> AppResult<Box<dyn DbTransaction>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PostgresTransaction { tx }))
    }

    async fn migrate(&self) -> AppResult<()> {
        sqlx::migrate!("./migrations/postgres")
            .run(&self.pool)
            .await
            .map_err(|e| crate::error::AppError::Internal(format!("Migration failed: {}", e)))
    }
}

pub struct PostgresTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl DbTransaction for PostgresTransaction {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    // fetch_many yields the rows and the affected count in one pass
    #[allow(deprecated)]
    async fn query(&mut self, sql: &str, params: &[SqlValue]) -> AppResult<RowSet> {
        let sql = Dialect::Postgres.translate(sql);
        collect(build(&sql, params).fetch_many(&mut *self.tx)).await
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
