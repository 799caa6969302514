//! Safe SQL identifier handling.
//!
//! Table and column names cannot be bound as parameters, so they are spliced into
//! the SQL text. [`Ident`] is the only way such a name enters a statement: it is
//! validated against `[A-Za-z_][A-Za-z0-9_]*` on construction and rendered per
//! [`Dialect`] (bare for SQLite, double-quoted for PostgreSQL so mixed case survives).
//!
//! # Example
//! ```ignore
//! use authsql::{Dialect, Ident};
//!
//! let t = Ident::parse("User")?;
//! assert_eq!(t.to_sql(Dialect::Sqlite), "User");
//! assert_eq!(t.to_sql(Dialect::Postgres), r#""User""#);
//! # Ok::<(), authsql::AdapterError>(())
//! ```

use crate::error::{AdapterError, AdapterResult};
use crate::sql::Dialect;
use std::fmt;

/// A validated SQL identifier (table or column name).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident(String);

impl Ident {
    /// Parse and validate an identifier.
    pub fn parse(s: &str) -> AdapterResult<Self> {
        let mut chars = s.chars();
        let Some(first) = chars.next() else {
            return Err(AdapterError::InvalidIdentifier(
                "identifier cannot be empty".to_string(),
            ));
        };
        if !(first == '_' || first.is_ascii_alphabetic()) {
            return Err(AdapterError::InvalidIdentifier(format!(
                "invalid start character '{first}' in '{s}'"
            )));
        }
        if let Some(c) = chars.find(|c| !(*c == '_' || c.is_ascii_alphanumeric())) {
            return Err(AdapterError::InvalidIdentifier(format!(
                "invalid character '{c}' in '{s}'"
            )));
        }
        Ok(Self(s.to_string()))
    }

    /// The raw identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render the identifier as SQL for the given dialect.
    pub fn to_sql(&self, dialect: Dialect) -> String {
        let mut out = String::with_capacity(self.0.len() + 2);
        self.write_sql(dialect, &mut out);
        out
    }

    pub(crate) fn write_sql(&self, dialect: Dialect, out: &mut String) {
        match dialect {
            Dialect::Sqlite => out.push_str(&self.0),
            // Validation rules out '"', so no escaping is needed.
            Dialect::Postgres => {
                out.push('"');
                out.push_str(&self.0);
                out.push('"');
            }
        }
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ident_simple() {
        let ident = Ident::parse("users").unwrap();
        assert_eq!(ident.to_sql(Dialect::Sqlite), "users");
    }

    #[test]
    fn ident_quoted_for_postgres() {
        let ident = Ident::parse("emailVerified").unwrap();
        assert_eq!(ident.to_sql(Dialect::Postgres), r#""emailVerified""#);
    }

    #[test]
    fn ident_with_underscore_and_digits() {
        let ident = Ident::parse("_col_2").unwrap();
        assert_eq!(ident.as_str(), "_col_2");
    }

    #[test]
    fn ident_rejects_empty() {
        assert!(Ident::parse("").is_err());
    }

    #[test]
    fn ident_rejects_start_digit() {
        assert!(Ident::parse("1table").is_err());
    }

    #[test]
    fn ident_rejects_space() {
        assert!(Ident::parse("my table").is_err());
    }

    #[test]
    fn ident_rejects_injection() {
        assert!(Ident::parse("users; drop table users; --").is_err());
        assert!(Ident::parse(r#"a"b"#).is_err());
        assert!(Ident::parse("schema.table").is_err());
    }
}
