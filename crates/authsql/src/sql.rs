//! Parameter-safe SQL fragment builder.
//!
//! [`Sql`] keeps three kinds of pieces apart: trusted SQL text, validated
//! identifiers and bound values. Values only ever become placeholders; the
//! placeholder style and identifier quoting are chosen when the fragment is
//! rendered for a [`Dialect`].
//!
//! ```ignore
//! let mut q = Sql::new("SELECT * FROM ");
//! q.push_ident(&Ident::parse("User")?).push(" WHERE email = ").push_bind("a@b.com");
//! assert_eq!(q.to_sql(Dialect::Sqlite), "SELECT * FROM User WHERE email = ?");
//! assert_eq!(q.to_sql(Dialect::Postgres), r#"SELECT * FROM "User" WHERE email = $1"#);
//! ```

use crate::ident::Ident;
use crate::value::{Scalar, Value};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// SQL dialect spoken by a backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// `?` placeholders, bare identifiers.
    #[default]
    Sqlite,
    /// `$1, $2, ...` placeholders, double-quoted identifiers.
    Postgres,
}

#[derive(Debug, Clone, PartialEq)]
enum SqlPart {
    Raw(String),
    Ident(Ident),
    Bool(bool),
    Param,
}

/// A SQL fragment with its bound parameters, in placeholder order.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use]
pub struct Sql {
    parts: Vec<SqlPart>,
    params: Vec<Scalar>,
}

impl Sql {
    /// Create a new builder with an initial SQL fragment.
    pub fn new(initial_sql: impl Into<String>) -> Self {
        let initial_sql = initial_sql.into();
        let mut sql = Self::default();
        sql.push(&initial_sql);
        sql
    }

    /// Create an empty builder.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append trusted SQL text (keywords, operators, literals the adapter controls).
    pub fn push(&mut self, sql: &str) -> &mut Self {
        if sql.is_empty() {
            return self;
        }

        match self.parts.last_mut() {
            Some(SqlPart::Raw(last)) => last.push_str(sql),
            _ => self.parts.push(SqlPart::Raw(sql.to_string())),
        }
        self
    }

    /// Append a validated identifier.
    pub fn push_ident(&mut self, ident: &Ident) -> &mut Self {
        self.parts.push(SqlPart::Ident(ident.clone()));
        self
    }

    /// Append identifiers separated by `, `.
    pub fn push_ident_list<'a>(&mut self, idents: impl IntoIterator<Item = &'a Ident>) -> &mut Self {
        for (i, ident) in idents.into_iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.push_ident(ident);
        }
        self
    }

    /// Append a placeholder and bind the serialized value.
    pub fn push_bind(&mut self, value: impl Into<Value>) -> &mut Self {
        self.push_bind_scalar(value.into().serialize())
    }

    pub(crate) fn push_bind_scalar(&mut self, value: Scalar) -> &mut Self {
        self.parts.push(SqlPart::Param);
        self.params.push(value);
        self
    }

    /// Append a constant truth value: `1`/`0` for SQLite, `TRUE`/`FALSE` for PostgreSQL.
    pub fn push_bool(&mut self, value: bool) -> &mut Self {
        self.parts.push(SqlPart::Bool(value));
        self
    }

    /// Append placeholders separated by `, ` and bind every value.
    pub fn push_bind_list<I, V>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        for (i, v) in values.into_iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.push_bind(v);
        }
        self
    }

    /// Append another fragment, carrying its parameters over in order.
    pub fn push_sql(&mut self, other: Sql) -> &mut Self {
        for part in other.parts {
            match part {
                SqlPart::Raw(s) => {
                    self.push(&s);
                }
                part => self.parts.push(part),
            }
        }
        self.params.extend(other.params);
        self
    }

    /// Whether the fragment renders to an empty string.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Bound parameters in placeholder order.
    pub fn params(&self) -> &[Scalar] {
        &self.params
    }

    pub fn into_params(self) -> Vec<Scalar> {
        self.params
    }

    /// Render the final SQL string for a dialect.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        let mut out = String::new();
        let mut idx = 0usize;
        for part in &self.parts {
            match part {
                SqlPart::Raw(s) => out.push_str(s),
                SqlPart::Ident(ident) => ident.write_sql(dialect, &mut out),
                SqlPart::Bool(b) => out.push_str(match (dialect, *b) {
                    (Dialect::Sqlite, true) => "1",
                    (Dialect::Sqlite, false) => "0",
                    (Dialect::Postgres, true) => "TRUE",
                    (Dialect::Postgres, false) => "FALSE",
                }),
                SqlPart::Param => {
                    idx += 1;
                    match dialect {
                        Dialect::Sqlite => out.push('?'),
                        Dialect::Postgres => {
                            let _ = write!(out, "${idx}");
                        }
                    }
                }
            }
        }
        out
    }
}
