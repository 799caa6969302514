//! Statement assembly for the adapter operations.
//!
//! Each builder is pure: it takes the normalized [`ModelName`] and the request
//! pieces and returns a [`Sql`] fragment holding the statement text and its
//! binds. Nothing here touches a backend.

use crate::condition::{Predicate, push_where};
use crate::error::{AdapterError, AdapterResult};
use crate::ident::Ident;
use crate::model::ModelName;
use crate::sql::Sql;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Write payload: column name to value. Keys and binds share one iteration order.
pub type Data = BTreeMap<String, Value>;

/// The adapter operation a statement was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    FindOne,
    FindMany,
    Update,
    UpdateMany,
    Delete,
    DeleteMany,
    Count,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::FindOne => "findOne",
            Operation::FindMany => "findMany",
            Operation::Update => "update",
            Operation::UpdateMany => "updateMany",
            Operation::Delete => "delete",
            Operation::DeleteMany => "deleteMany",
            Operation::Count => "count",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// A single sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortBy {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortBy {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Append the projection: listed fields (with `id` mapped to the key) or `*`.
fn push_select(sql: &mut Sql, model: &ModelName, select: &[&str]) -> AdapterResult<()> {
    if select.is_empty() {
        sql.push("*");
        return Ok(());
    }
    let columns = select
        .iter()
        .map(|f| model.column(f))
        .collect::<AdapterResult<Vec<Ident>>>()?;
    sql.push_ident_list(&columns);
    Ok(())
}

fn push_set(sql: &mut Sql, update: &Data) -> AdapterResult<()> {
    if update.is_empty() {
        return Err(AdapterError::validation("UPDATE requires at least one column"));
    }
    sql.push(" SET ");
    for (i, (key, value)) in update.iter().enumerate() {
        if i > 0 {
            sql.push(", ");
        }
        sql.push_ident(&Ident::parse(key)?).push(" = ").push_bind(value.clone());
    }
    Ok(())
}

/// `INSERT INTO M (k, ...) VALUES (?, ...) RETURNING <select>`
pub fn create(model: &ModelName, data: &Data, select: &[&str]) -> AdapterResult<Sql> {
    let mut sql = Sql::new("INSERT INTO ");
    sql.push_ident(model.table());
    if data.is_empty() {
        sql.push(" DEFAULT VALUES");
    } else {
        let columns = data
            .keys()
            .map(|k| Ident::parse(k))
            .collect::<AdapterResult<Vec<Ident>>>()?;
        sql.push(" (").push_ident_list(&columns).push(") VALUES (");
        sql.push_bind_list(data.values().cloned());
        sql.push(")");
    }
    sql.push(" RETURNING ");
    push_select(&mut sql, model, select)?;
    Ok(sql)
}

/// `SELECT <select> FROM M [WHERE ...] LIMIT 1`
pub fn find_one(model: &ModelName, predicates: &[Predicate], select: &[&str]) -> AdapterResult<Sql> {
    let mut sql = Sql::new("SELECT ");
    push_select(&mut sql, model, select)?;
    sql.push(" FROM ").push_ident(model.table());
    push_where(&mut sql, model, predicates)?;
    sql.push(" LIMIT 1");
    Ok(sql)
}

/// `SELECT * FROM M [WHERE ...] [ORDER BY f dir] LIMIT n [OFFSET m]`
///
/// `limit` and `offset` are integers and are written as literals.
pub fn find_many(
    model: &ModelName,
    predicates: &[Predicate],
    limit: u64,
    sort_by: Option<&SortBy>,
    offset: Option<u64>,
) -> AdapterResult<Sql> {
    let mut sql = Sql::new("SELECT * FROM ");
    sql.push_ident(model.table());
    push_where(&mut sql, model, predicates)?;
    if let Some(sort) = sort_by {
        sql.push(" ORDER BY ")
            .push_ident(&model.column(&sort.field)?)
            .push(" ")
            .push(sort.direction.as_sql());
    }
    sql.push(&format!(" LIMIT {limit}"));
    if let Some(offset) = offset {
        sql.push(&format!(" OFFSET {offset}"));
    }
    Ok(sql)
}

/// `UPDATE M SET c = ?, ... [WHERE ...] RETURNING *`; SET binds precede WHERE binds.
pub fn update(model: &ModelName, predicates: &[Predicate], update: &Data) -> AdapterResult<Sql> {
    let mut sql = update_many(model, predicates, update)?;
    sql.push(" RETURNING *");
    Ok(sql)
}

/// `UPDATE M SET c = ?, ... [WHERE ...]`
pub fn update_many(model: &ModelName, predicates: &[Predicate], update: &Data) -> AdapterResult<Sql> {
    let mut sql = Sql::new("UPDATE ");
    sql.push_ident(model.table());
    push_set(&mut sql, update)?;
    push_where(&mut sql, model, predicates)?;
    Ok(sql)
}

/// `DELETE FROM M [WHERE ...]`
pub fn delete(model: &ModelName, predicates: &[Predicate]) -> AdapterResult<Sql> {
    let mut sql = Sql::new("DELETE FROM ");
    sql.push_ident(model.table());
    push_where(&mut sql, model, predicates)?;
    Ok(sql)
}

/// `DELETE FROM M [WHERE ...] RETURNING *`
pub fn delete_many(model: &ModelName, predicates: &[Predicate]) -> AdapterResult<Sql> {
    let mut sql = delete(model, predicates)?;
    sql.push(" RETURNING *");
    Ok(sql)
}

/// `SELECT COUNT(*) AS count FROM M [WHERE ...]`
pub fn count(model: &ModelName, predicates: &[Predicate]) -> AdapterResult<Sql> {
    let mut sql = Sql::new("SELECT COUNT(*) AS count FROM ");
    sql.push_ident(model.table());
    push_where(&mut sql, model, predicates)?;
    Ok(sql)
}
