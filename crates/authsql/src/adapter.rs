//! The model/query adapter.
//!
//! ```ignore
//! use authsql::{Adapter, Predicate, SqliteClient};
//!
//! let client = SqliteClient::connect("sqlite://app.db").await?;
//! let adapter = Adapter::new(&client);
//!
//! let user = adapter
//!     .find_one("user", &[Predicate::eq("email", "ada@example.com")], &[])
//!     .await?;
//! ```

use crate::client::SqlClient;
use crate::condition::Predicate;
use crate::config::AdapterConfig;
use crate::error::{AdapterError, AdapterResult};
use crate::model::ModelName;
use crate::monitor::SqlLogger;
use crate::row::{Row, normalize_row};
use crate::sql::Sql;
use crate::statement::{self, Data, Operation, SortBy};

/// Translates model requests into SQL against a borrowed [`SqlClient`].
///
/// Every call builds its statement from scratch and makes exactly one round
/// trip; the adapter holds no state besides its configuration.
pub struct Adapter<'c, C: SqlClient> {
    client: &'c C,
    config: AdapterConfig,
    logger: SqlLogger,
}

impl<'c, C: SqlClient> Adapter<'c, C> {
    pub fn new(client: &'c C) -> Self {
        Self::with_config(client, AdapterConfig::default())
    }

    pub fn with_config(client: &'c C, config: AdapterConfig) -> Self {
        let logger = SqlLogger::new(&config);
        Self {
            client,
            config,
            logger,
        }
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Insert one record and return it.
    ///
    /// Fails with [`AdapterError::NotCreated`] when `RETURNING` yields no row.
    pub async fn create(&self, model: &str, data: &Data, select: &[&str]) -> AdapterResult<Row> {
        let model = ModelName::new(model)?;
        let sql = statement::create(&model, data, select)?;
        match self.first(Operation::Create, &model, sql).await? {
            Some(row) => self.normalize(&model, row),
            None => Err(AdapterError::NotCreated {
                model: model.as_str().to_string(),
            }),
        }
    }

    /// Fetch the first matching record, if any.
    pub async fn find_one(
        &self,
        model: &str,
        predicates: &[Predicate],
        select: &[&str],
    ) -> AdapterResult<Option<Row>> {
        let model = ModelName::new(model)?;
        let sql = statement::find_one(&model, predicates, select)?;
        let row = self.first(Operation::FindOne, &model, sql).await?;
        row.map(|row| self.normalize(&model, row)).transpose()
    }

    /// Fetch up to `limit` matching records.
    pub async fn find_many(
        &self,
        model: &str,
        predicates: &[Predicate],
        limit: u64,
        sort_by: Option<&SortBy>,
        offset: Option<u64>,
    ) -> AdapterResult<Vec<Row>> {
        let model = ModelName::new(model)?;
        let sql = statement::find_many(&model, predicates, limit, sort_by, offset)?;
        let rows = self.all(Operation::FindMany, &model, sql).await?;
        rows.into_iter().map(|row| self.normalize(&model, row)).collect()
    }

    /// Update matching records and return the first updated row, if any.
    pub async fn update(
        &self,
        model: &str,
        predicates: &[Predicate],
        update: &Data,
    ) -> AdapterResult<Option<Row>> {
        let model = ModelName::new(model)?;
        let sql = statement::update(&model, predicates, update)?;
        let row = self.first(Operation::Update, &model, sql).await?;
        row.map(|row| self.normalize(&model, row)).transpose()
    }

    /// Update matching records and return the backend's changed-row count.
    pub async fn update_many(
        &self,
        model: &str,
        predicates: &[Predicate],
        update: &Data,
    ) -> AdapterResult<u64> {
        let model = ModelName::new(model)?;
        let sql = statement::update_many(&model, predicates, update)?;
        self.run(Operation::UpdateMany, &model, sql).await
    }

    /// Delete matching records. The number removed is not reported.
    pub async fn delete(&self, model: &str, predicates: &[Predicate]) -> AdapterResult<()> {
        let model = ModelName::new(model)?;
        let sql = statement::delete(&model, predicates)?;
        self.run(Operation::Delete, &model, sql).await?;
        Ok(())
    }

    /// Delete matching records and return how many top-level rows matched.
    ///
    /// The count comes from the `RETURNING *` rows, so rows removed by cascades
    /// in other tables are not included.
    pub async fn delete_many(&self, model: &str, predicates: &[Predicate]) -> AdapterResult<u64> {
        let model = ModelName::new(model)?;
        let sql = statement::delete_many(&model, predicates)?;
        let rows = self.all(Operation::DeleteMany, &model, sql).await?;
        Ok(rows.len() as u64)
    }

    /// Count matching records.
    ///
    /// Fails with [`AdapterError::CountMissing`] if the backend returns no row.
    pub async fn count(&self, model: &str, predicates: &[Predicate]) -> AdapterResult<u64> {
        let model = ModelName::new(model)?;
        let sql = statement::count(&model, predicates)?;
        let row = self.first(Operation::Count, &model, sql).await?;
        let count = row.as_ref().and_then(|r| r.get_i64("count"));
        match count {
            Some(n) => u64::try_from(n).map_err(|_| AdapterError::decode("count", format!("negative count {n}"))),
            None => Err(AdapterError::CountMissing {
                model: model.as_str().to_string(),
            }),
        }
    }

    fn normalize(&self, model: &ModelName, row: Row) -> AdapterResult<Row> {
        let mut row = normalize_row(model, row);
        for transform in self.config.transforms() {
            transform.apply(model, &mut row)?;
        }
        Ok(row)
    }

    fn render(&self, op: Operation, model: &ModelName, sql: &Sql) -> String {
        let text = sql.to_sql(self.client.dialect());
        self.logger.statement(op, model, &text, sql.params().len());
        text
    }

    fn observe<T>(&self, op: Operation, model: &ModelName, result: AdapterResult<T>) -> AdapterResult<T> {
        if let Err(err) = &result {
            self.logger.failure(op, model, err);
        }
        result
    }

    async fn first(&self, op: Operation, model: &ModelName, sql: Sql) -> AdapterResult<Option<Row>> {
        let text = self.render(op, model, &sql);
        let result = self.client.first(&text, sql.params()).await;
        self.observe(op, model, result)
    }

    async fn all(&self, op: Operation, model: &ModelName, sql: Sql) -> AdapterResult<Vec<Row>> {
        let text = self.render(op, model, &sql);
        let result = self.client.all(&text, sql.params()).await;
        self.observe(op, model, result)
    }

    async fn run(&self, op: Operation, model: &ModelName, sql: Sql) -> AdapterResult<u64> {
        let text = self.render(op, model, &sql);
        let result = self.client.run(&text, sql.params()).await;
        self.observe(op, model, result)
    }
}

#[cfg(test)]
mod tests;
