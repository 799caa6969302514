//! Backend contract for executing adapter statements.

use crate::error::AdapterResult;
use crate::row::Row;
use crate::sql::Dialect;
use crate::value::Scalar;

/// A SQL-executing handle the adapter borrows per call.
///
/// Implementations prepare `sql`, bind `params` positionally, execute once and
/// report either the rows or the affected-row count. The backend must accept
/// `RETURNING` clauses. Pooling, retries and cancellation belong to the
/// implementation or its caller, never to the adapter.
pub trait SqlClient: Send + Sync {
    /// Placeholder and quoting style this backend understands.
    fn dialect(&self) -> Dialect;

    /// Execute and return every row.
    fn all(
        &self,
        sql: &str,
        params: &[Scalar],
    ) -> impl std::future::Future<Output = AdapterResult<Vec<Row>>> + Send;

    /// Execute and return the **first** row, if any.
    ///
    /// The default implementation calls [`SqlClient::all`] and keeps the first row.
    fn first(
        &self,
        sql: &str,
        params: &[Scalar],
    ) -> impl std::future::Future<Output = AdapterResult<Option<Row>>> + Send {
        async move { Ok(self.all(sql, params).await?.into_iter().next()) }
    }

    /// Execute and return the backend's changed-row count.
    fn run(
        &self,
        sql: &str,
        params: &[Scalar],
    ) -> impl std::future::Future<Output = AdapterResult<u64>> + Send;
}

impl<C: SqlClient> SqlClient for &C {
    fn dialect(&self) -> Dialect {
        (**self).dialect()
    }

    fn all(
        &self,
        sql: &str,
        params: &[Scalar],
    ) -> impl std::future::Future<Output = AdapterResult<Vec<Row>>> + Send {
        (**self).all(sql, params)
    }

    fn first(
        &self,
        sql: &str,
        params: &[Scalar],
    ) -> impl std::future::Future<Output = AdapterResult<Option<Row>>> + Send {
        (**self).first(sql, params)
    }

    fn run(
        &self,
        sql: &str,
        params: &[Scalar],
    ) -> impl std::future::Future<Output = AdapterResult<u64>> + Send {
        (**self).run(sql, params)
    }
}
