//! Filter predicates and the WHERE-clause compiler.
//!
//! A [`Predicate`] pairs a field with an [`Operator`] (which owns its value) and
//! the [`Connector`] that joins it to everything before it. [`compile_where`]
//! folds a predicate list left to right without adding parentheses:
//! `[a, or b, c]` renders as `a = ? or b = ? and c = ?`.

use crate::error::AdapterResult;
use crate::model::ModelName;
use crate::sql::Sql;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Filter operator together with its operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    /// `field = ?`
    Eq(Value),
    /// `field <> ?`
    Ne(Value),
    /// `field < ?`
    Lt(Value),
    /// `field <= ?`
    Lte(Value),
    /// `field > ?`
    Gt(Value),
    /// `field >= ?`
    Gte(Value),
    /// `field in (?, ...)`; empty list matches nothing
    In(Vec<Value>),
    /// `field not in (?, ...)`; empty list matches everything
    NotIn(Vec<Value>),
    /// `field like ?` bound as `%value%`
    Contains(String),
    /// `field like ?` bound as `value%`
    StartsWith(String),
    /// `field like ?` bound as `%value`
    EndsWith(String),
}

impl Operator {
    /// Lower-case operator name as used by the input contract.
    pub fn name(&self) -> &'static str {
        match self {
            Operator::Eq(_) => "eq",
            Operator::Ne(_) => "ne",
            Operator::Lt(_) => "lt",
            Operator::Lte(_) => "lte",
            Operator::Gt(_) => "gt",
            Operator::Gte(_) => "gte",
            Operator::In(_) => "in",
            Operator::NotIn(_) => "not_in",
            Operator::Contains(_) => "contains",
            Operator::StartsWith(_) => "starts_with",
            Operator::EndsWith(_) => "ends_with",
        }
    }
}

/// Logical operator joining a predicate to the clause accumulated before it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connector {
    #[default]
    And,
    Or,
}

impl Connector {
    pub fn as_sql(self) -> &'static str {
        match self {
            Connector::And => "and",
            Connector::Or => "or",
        }
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A single filter condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub field: String,
    pub operator: Operator,
    pub connector: Connector,
}

impl Predicate {
    /// Create a predicate joined with `and`.
    pub fn new(field: impl Into<String>, operator: Operator) -> Self {
        Self {
            field: field.into(),
            operator,
            connector: Connector::And,
        }
    }

    /// Set the connector to the previous predicate.
    pub fn connector(mut self, connector: Connector) -> Self {
        self.connector = connector;
        self
    }

    /// Shorthand for `.connector(Connector::Or)`.
    pub fn or(self) -> Self {
        self.connector(Connector::Or)
    }

    // ==================== Convenience constructors ====================

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Eq(value.into()))
    }

    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Ne(value.into()))
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Lt(value.into()))
    }

    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Lte(value.into()))
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Gt(value.into()))
    }

    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, Operator::Gte(value.into()))
    }

    pub fn in_list<V: Into<Value>>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Self::new(field, Operator::In(values.into_iter().map(Into::into).collect()))
    }

    pub fn not_in<V: Into<Value>>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Self::new(field, Operator::NotIn(values.into_iter().map(Into::into).collect()))
    }

    pub fn contains(field: impl Into<String>, needle: impl Into<String>) -> Self {
        Self::new(field, Operator::Contains(needle.into()))
    }

    pub fn starts_with(field: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::new(field, Operator::StartsWith(prefix.into()))
    }

    pub fn ends_with(field: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self::new(field, Operator::EndsWith(suffix.into()))
    }

    /// Render this predicate alone into `sql`, resolving `id` against `model`.
    fn append_to_sql(&self, model: &ModelName, sql: &mut Sql) -> AdapterResult<()> {
        let column = model.column(&self.field)?;

        let (op, value) = match &self.operator {
            Operator::Eq(v) => ("=", v),
            Operator::Ne(v) => ("<>", v),
            Operator::Lt(v) => ("<", v),
            Operator::Lte(v) => ("<=", v),
            Operator::Gt(v) => (">", v),
            Operator::Gte(v) => (">=", v),
            Operator::In(vals) | Operator::NotIn(vals) => {
                let negated = matches!(self.operator, Operator::NotIn(_));
                if vals.is_empty() {
                    // Nothing is in an empty list.
                    sql.push_bool(negated);
                    return Ok(());
                }
                sql.push_ident(&column);
                sql.push(if negated { " not in (" } else { " in (" });
                sql.push_bind_list(vals.iter().cloned());
                sql.push(")");
                return Ok(());
            }
            Operator::Contains(s) => {
                sql.push_ident(&column).push(" like ").push_bind(format!("%{s}%"));
                return Ok(());
            }
            Operator::StartsWith(s) => {
                sql.push_ident(&column).push(" like ").push_bind(format!("{s}%"));
                return Ok(());
            }
            Operator::EndsWith(s) => {
                sql.push_ident(&column).push(" like ").push_bind(format!("%{s}"));
                return Ok(());
            }
        };

        sql.push_ident(&column).push(" ").push(op).push(" ").push_bind(value.clone());
        Ok(())
    }
}

/// Compile predicates into a clause (without the `WHERE` keyword).
///
/// Returns an empty fragment for an empty list. The first predicate's connector
/// is ignored; every later one joins against the running clause.
pub fn compile_where(model: &ModelName, predicates: &[Predicate]) -> AdapterResult<Sql> {
    let mut sql = Sql::empty();
    for (i, predicate) in predicates.iter().enumerate() {
        if i > 0 {
            sql.push(" ").push(predicate.connector.as_sql()).push(" ");
        }
        predicate.append_to_sql(model, &mut sql)?;
    }
    Ok(sql)
}

/// Append ` WHERE <clause>` to `sql` when there are predicates.
pub(crate) fn push_where(sql: &mut Sql, model: &ModelName, predicates: &[Predicate]) -> AdapterResult<()> {
    let clause = compile_where(model, predicates)?;
    if clause.is_empty() {
        return Ok(());
    }
    sql.push(" WHERE ").push_sql(clause);
    Ok(())
}
