//! SQLite backend over `sqlx`.

use crate::client::SqlClient;
use crate::error::{AdapterError, AdapterResult};
use crate::row::Row;
use crate::sql::Dialect;
use crate::value::Scalar;
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteConnectOptions, SqlitePool, SqliteRow};
use sqlx::{Column, Row as _, TypeInfo, ValueRef};
use std::str::FromStr;

/// [`SqlClient`] over a caller-owned SQLite pool.
///
/// Cloning is cheap; clones share the pool.
#[derive(Debug, Clone)]
pub struct SqliteClient {
    pool: SqlitePool,
}

impl SqliteClient {
    /// Wrap an existing pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to `url` (e.g. `sqlite://app.db`) with foreign keys enforced.
    pub async fn connect(url: &str) -> AdapterResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePool::connect_with(options).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn bind<'q>(sql: &'q str, params: &[Scalar]) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        let mut query = sqlx::query(sql);
        for param in params {
            query = match param {
                Scalar::Null => query.bind(None::<String>),
                Scalar::Bool(b) => query.bind(*b),
                Scalar::Int(i) => query.bind(*i),
                Scalar::Real(f) => query.bind(*f),
                Scalar::Text(s) => query.bind(s.clone()),
            };
        }
        query
    }

    /// Convert a SQLite row by the storage class of each value.
    fn convert_row(row: &SqliteRow) -> AdapterResult<Row> {
        let mut out = Row::new();
        for (idx, column) in row.columns().iter().enumerate() {
            let name = column.name();
            let raw = row.try_get_raw(idx)?;
            let value = if raw.is_null() {
                Scalar::Null
            } else {
                let type_name = raw.type_info().name().to_string();
                match type_name.as_str() {
                    "INTEGER" | "INT8" => Scalar::Int(row.try_get::<i64, _>(idx)?),
                    "BOOLEAN" => Scalar::Bool(row.try_get::<bool, _>(idx)?),
                    "REAL" | "NUMERIC" => Scalar::Real(row.try_get::<f64, _>(idx)?),
                    "TEXT" | "DATE" | "TIME" | "DATETIME" => {
                        Scalar::Text(row.try_get::<String, _>(idx)?)
                    }
                    other => {
                        return Err(AdapterError::decode(
                            name,
                            format!("unsupported SQLite type {other}"),
                        ));
                    }
                }
            };
            out.insert(name, value);
        }
        Ok(out)
    }
}

impl From<SqlitePool> for SqliteClient {
    fn from(pool: SqlitePool) -> Self {
        Self::new(pool)
    }
}

impl SqlClient for SqliteClient {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    async fn all(&self, sql: &str, params: &[Scalar]) -> AdapterResult<Vec<Row>> {
        let rows = Self::bind(sql, params).fetch_all(&self.pool).await?;
        rows.iter().map(Self::convert_row).collect()
    }

    async fn first(&self, sql: &str, params: &[Scalar]) -> AdapterResult<Option<Row>> {
        let row = Self::bind(sql, params).fetch_optional(&self.pool).await?;
        row.as_ref().map(Self::convert_row).transpose()
    }

    async fn run(&self, sql: &str, params: &[Scalar]) -> AdapterResult<u64> {
        let result = Self::bind(sql, params).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
