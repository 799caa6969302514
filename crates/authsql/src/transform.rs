//! Post-processing applied to every row the adapter returns.
//!
//! Transforms run in the order they were added to the
//! [`AdapterConfig`](crate::AdapterConfig), after the primary key has been
//! mirrored into `id`.
//!
//! ```ignore
//! let config = AdapterConfig::new()
//!     .transform(CoerceBool::new(["emailVerified", "banned"]))
//!     .transform(|model: &ModelName, row: &mut Row| -> AdapterResult<()> {
//!         if model.as_str() == "User" {
//!             row.insert("kind", Scalar::Text("person".into()));
//!         }
//!         Ok(())
//!     });
//! ```

use crate::error::{AdapterError, AdapterResult};
use crate::model::ModelName;
use crate::row::Row;
use crate::value::Scalar;
use std::collections::BTreeSet;

/// A single row post-processing step.
pub trait RowTransform: Send + Sync {
    fn apply(&self, model: &ModelName, row: &mut Row) -> AdapterResult<()>;
}

impl<F> RowTransform for F
where
    F: Fn(&ModelName, &mut Row) -> AdapterResult<()> + Send + Sync,
{
    fn apply(&self, model: &ModelName, row: &mut Row) -> AdapterResult<()> {
        self(model, row)
    }
}

/// Turn integer `0`/`1` columns back into booleans.
///
/// Backends without a boolean type hand booleans back as numbers. Any other
/// integer in a listed column is a decode error.
#[derive(Debug, Clone)]
pub struct CoerceBool {
    columns: BTreeSet<String>,
    model: Option<String>,
}

impl CoerceBool {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            model: None,
        }
    }

    /// Only apply to rows of this model (matched after normalization).
    pub fn for_model(mut self, model: &str) -> Self {
        self.model = Some(crate::model::normalize_model_name(model));
        self
    }
}

impl RowTransform for CoerceBool {
    fn apply(&self, model: &ModelName, row: &mut Row) -> AdapterResult<()> {
        if self.model.as_deref().is_some_and(|m| m != model.as_str()) {
            return Ok(());
        }
        for column in &self.columns {
            let Some(value) = row.get_mut(column) else {
                continue;
            };
            match *value {
                Scalar::Int(0) => *value = Scalar::Bool(false),
                Scalar::Int(1) => *value = Scalar::Bool(true),
                Scalar::Int(other) => {
                    return Err(AdapterError::decode(
                        column.as_str(),
                        format!("expected 0 or 1 for boolean column, got {other}"),
                    ));
                }
                _ => {}
            }
        }
        Ok(())
    }
}
