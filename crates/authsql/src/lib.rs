//! # authsql
//!
//! A model/query adapter that turns ORM-style requests (model, selection,
//! filters, sort, pagination, payload) into parameterized SQL, runs them on a
//! caller-owned backend and hands back rows shaped the way the caller expects.
//!
//! ## Conventions
//!
//! - **Tables are capitalized**: model `"user"` lives in table `User`.
//! - **Keys are derived**: `User`'s key column is `userId`; callers say `id`,
//!   which is rewritten in filters, selections and sort keys.
//! - **Rows gain `id`**: every returned row carrying the key column also carries
//!   an `id` copy of it.
//! - **Values are always bound**: only validated identifiers and the integer
//!   `LIMIT`/`OFFSET` are spliced into SQL text. Date-times bind as ISO-8601 text.
//!
//! ## Example
//!
//! ```ignore
//! use authsql::{Adapter, AdapterConfig, CoerceBool, Data, Predicate, SortBy, SqliteClient};
//!
//! let client = SqliteClient::connect("sqlite://app.db").await?;
//! let adapter = Adapter::with_config(
//!     &client,
//!     AdapterConfig::new().transform(CoerceBool::new(["emailVerified", "banned"])),
//! );
//!
//! let mut data = Data::new();
//! data.insert("userId".into(), "u_1".into());
//! data.insert("email".into(), "ada@example.com".into());
//! let user = adapter.create("user", &data, &[]).await?;
//!
//! let members = adapter
//!     .find_many(
//!         "member",
//!         &[Predicate::eq("organizationId", "org_1")],
//!         50,
//!         Some(&SortBy::desc("createdAt")),
//!         None,
//!     )
//!     .await?;
//! ```

pub mod adapter;
pub mod client;
pub mod condition;
pub mod config;
pub mod error;
pub mod ident;
pub mod input;
pub mod model;
mod monitor;
pub mod row;
pub mod sql;
pub mod statement;
pub mod transform;
pub mod value;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use adapter::Adapter;
pub use client::SqlClient;
pub use condition::{Connector, Operator, Predicate, compile_where};
pub use config::AdapterConfig;
pub use error::{AdapterError, AdapterResult};
pub use ident::Ident;
pub use input::{WhereInput, parse_where};
pub use model::{ModelName, normalize_model_name, primary_key_for};
pub use row::{Row, normalize_row};
pub use sql::{Dialect, Sql};
pub use statement::{Data, Operation, SortBy, SortDirection};
pub use transform::{CoerceBool, RowTransform};
pub use value::{Scalar, Value};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteClient;
