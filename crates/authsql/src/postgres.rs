//! PostgreSQL backend over `tokio-postgres`.
//!
//! `Scalar` binds adapt to the parameter type Postgres inferred for each
//! placeholder, so an `Int` can land in an `int4` column and ISO text in a
//! `timestamptz` one. A bind that cannot be encoded for its parameter type is
//! rejected with an error rather than sent as mismatched bytes. Rows decode back
//! into `Scalar`; timestamps and UUIDs come back as text.

use crate::client::SqlClient;
use crate::error::{AdapterError, AdapterResult};
use crate::row::Row;
use crate::sql::Dialect;
use crate::value::{Scalar, format_datetime};
use bytes::BytesMut;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::error::Error;
use tokio_postgres::types::{IsNull, ToSql, Type, WrongType};

type BoxError = Box<dyn Error + Sync + Send>;

impl ToSql for Scalar {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        match self {
            Scalar::Null => Ok(IsNull::Yes),
            Scalar::Bool(b) => match *ty {
                Type::BOOL => b.to_sql(ty, out),
                _ if is_text(ty) => b.to_string().as_str().to_sql(ty, out),
                _ => Err(wrong_type(ty)),
            },
            Scalar::Int(i) => match *ty {
                Type::INT2 => i16::try_from(*i)?.to_sql(ty, out),
                Type::INT4 => i32::try_from(*i)?.to_sql(ty, out),
                Type::INT8 => i.to_sql(ty, out),
                Type::BOOL => (*i != 0).to_sql(ty, out),
                Type::FLOAT4 => (*i as f32).to_sql(ty, out),
                Type::FLOAT8 => (*i as f64).to_sql(ty, out),
                _ if is_text(ty) => i.to_string().as_str().to_sql(ty, out),
                _ => Err(wrong_type(ty)),
            },
            Scalar::Real(f) => match *ty {
                Type::FLOAT4 => (*f as f32).to_sql(ty, out),
                Type::FLOAT8 => f.to_sql(ty, out),
                _ if is_text(ty) => f.to_string().as_str().to_sql(ty, out),
                _ => Err(wrong_type(ty)),
            },
            Scalar::Text(s) => match *ty {
                Type::TIMESTAMPTZ => DateTime::parse_from_rfc3339(s)?
                    .with_timezone(&Utc)
                    .to_sql(ty, out),
                Type::TIMESTAMP => DateTime::parse_from_rfc3339(s)?.naive_utc().to_sql(ty, out),
                Type::DATE => NaiveDate::parse_from_str(s, "%Y-%m-%d")?.to_sql(ty, out),
                Type::UUID => uuid::Uuid::parse_str(s)?.to_sql(ty, out),
                Type::INT2 => s.trim().parse::<i16>()?.to_sql(ty, out),
                Type::INT4 => s.trim().parse::<i32>()?.to_sql(ty, out),
                Type::INT8 => s.trim().parse::<i64>()?.to_sql(ty, out),
                Type::FLOAT4 => s.trim().parse::<f32>()?.to_sql(ty, out),
                Type::FLOAT8 => s.trim().parse::<f64>()?.to_sql(ty, out),
                Type::BOOL => s.trim().parse::<bool>()?.to_sql(ty, out),
                _ if is_text(ty) => s.as_str().to_sql(ty, out),
                _ => Err(wrong_type(ty)),
            },
        }
    }

    // Per-variant checks happen in `to_sql`, which rejects what it cannot encode.
    fn accepts(_ty: &Type) -> bool {
        true
    }

    tokio_postgres::types::to_sql_checked!();
}

fn wrong_type(ty: &Type) -> BoxError {
    Box::new(WrongType::new::<Scalar>(ty.clone()))
}

fn is_text(ty: &Type) -> bool {
    *ty == Type::TEXT || *ty == Type::VARCHAR || *ty == Type::BPCHAR || *ty == Type::NAME
}

fn params_ref(params: &[Scalar]) -> Vec<&(dyn ToSql + Sync)> {
    params.iter().map(|p| p as &(dyn ToSql + Sync)).collect()
}

/// How a result column is read back into a [`Scalar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Bool,
    Int2,
    Int4,
    Int8,
    Float4,
    Float8,
    Text,
    Timestamptz,
    Timestamp,
    Date,
    Uuid,
}

impl ColumnKind {
    fn of(ty: &Type) -> Result<Self, BoxError> {
        let kind = match *ty {
            Type::BOOL => Self::Bool,
            Type::INT2 => Self::Int2,
            Type::INT4 => Self::Int4,
            Type::INT8 => Self::Int8,
            Type::FLOAT4 => Self::Float4,
            Type::FLOAT8 => Self::Float8,
            Type::TIMESTAMPTZ => Self::Timestamptz,
            Type::TIMESTAMP => Self::Timestamp,
            Type::DATE => Self::Date,
            Type::UUID => Self::Uuid,
            _ if is_text(ty) => Self::Text,
            _ => return Err(format!("unsupported Postgres type {ty}").into()),
        };
        Ok(kind)
    }
}

fn timestamp_text(v: NaiveDateTime) -> Scalar {
    Scalar::Text(format_datetime(&v.and_utc()))
}

fn date_text(v: NaiveDate) -> Scalar {
    Scalar::Text(v.format("%Y-%m-%d").to_string())
}

fn convert_row(row: &tokio_postgres::Row) -> AdapterResult<Row> {
    let mut out = Row::new();
    for (idx, column) in row.columns().iter().enumerate() {
        let name = column.name();
        let value = ColumnKind::of(column.type_())
            .and_then(|kind| decode_column(row, idx, kind))
            .map_err(|e| AdapterError::decode(name, e.to_string()))?;
        out.insert(name, value);
    }
    Ok(out)
}

fn decode_column(row: &tokio_postgres::Row, idx: usize, kind: ColumnKind) -> Result<Scalar, BoxError> {
    fn opt<T>(v: Option<T>, f: impl FnOnce(T) -> Scalar) -> Scalar {
        v.map_or(Scalar::Null, f)
    }

    let value = match kind {
        ColumnKind::Bool => opt(row.try_get::<_, Option<bool>>(idx)?, Scalar::Bool),
        ColumnKind::Int2 => opt(row.try_get::<_, Option<i16>>(idx)?, |v| Scalar::Int(v.into())),
        ColumnKind::Int4 => opt(row.try_get::<_, Option<i32>>(idx)?, |v| Scalar::Int(v.into())),
        ColumnKind::Int8 => opt(row.try_get::<_, Option<i64>>(idx)?, Scalar::Int),
        ColumnKind::Float4 => opt(row.try_get::<_, Option<f32>>(idx)?, |v| Scalar::Real(v.into())),
        ColumnKind::Float8 => opt(row.try_get::<_, Option<f64>>(idx)?, Scalar::Real),
        ColumnKind::Text => opt(row.try_get::<_, Option<String>>(idx)?, Scalar::Text),
        ColumnKind::Timestamptz => opt(row.try_get::<_, Option<DateTime<Utc>>>(idx)?, |v| {
            Scalar::Text(format_datetime(&v))
        }),
        ColumnKind::Timestamp => opt(row.try_get::<_, Option<NaiveDateTime>>(idx)?, timestamp_text),
        ColumnKind::Date => opt(row.try_get::<_, Option<NaiveDate>>(idx)?, date_text),
        ColumnKind::Uuid => opt(row.try_get::<_, Option<uuid::Uuid>>(idx)?, |v| {
            Scalar::Text(v.to_string())
        }),
    };
    Ok(value)
}

impl SqlClient for tokio_postgres::Client {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    async fn all(&self, sql: &str, params: &[Scalar]) -> AdapterResult<Vec<Row>> {
        let rows = tokio_postgres::Client::query(self, sql, &params_ref(params)).await?;
        rows.iter().map(convert_row).collect()
    }

    async fn first(&self, sql: &str, params: &[Scalar]) -> AdapterResult<Option<Row>> {
        let rows = tokio_postgres::Client::query(self, sql, &params_ref(params)).await?;
        rows.first().map(convert_row).transpose()
    }

    async fn run(&self, sql: &str, params: &[Scalar]) -> AdapterResult<u64> {
        Ok(tokio_postgres::Client::execute(self, sql, &params_ref(params)).await?)
    }
}

impl SqlClient for tokio_postgres::Transaction<'_> {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    async fn all(&self, sql: &str, params: &[Scalar]) -> AdapterResult<Vec<Row>> {
        let rows = tokio_postgres::Transaction::query(self, sql, &params_ref(params)).await?;
        rows.iter().map(convert_row).collect()
    }

    async fn run(&self, sql: &str, params: &[Scalar]) -> AdapterResult<u64> {
        Ok(tokio_postgres::Transaction::execute(self, sql, &params_ref(params)).await?)
    }
}
