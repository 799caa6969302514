//! Result rows and primary-key normalization.

use crate::model::{ID_FIELD, ModelName};
use crate::value::Scalar;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A result row: column name to scalar value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    columns: BTreeMap<String, Scalar>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a column, returning the previous value if any.
    pub fn insert(&mut self, column: impl Into<String>, value: Scalar) -> Option<Scalar> {
        self.columns.insert(column.into(), value)
    }

    pub fn get(&self, column: &str) -> Option<&Scalar> {
        self.columns.get(column)
    }

    pub fn get_mut(&mut self, column: &str) -> Option<&mut Scalar> {
        self.columns.get_mut(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    pub fn get_i64(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(Scalar::as_i64)
    }

    pub fn get_str(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Scalar::as_str)
    }

    pub fn get_bool(&self, column: &str) -> Option<bool> {
        self.get(column).and_then(Scalar::as_bool)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Scalar)> {
        self.columns.iter()
    }

    pub fn into_inner(self) -> BTreeMap<String, Scalar> {
        self.columns
    }
}

impl<K: Into<String>> FromIterator<(K, Scalar)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, Scalar)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl From<BTreeMap<String, Scalar>> for Row {
    fn from(columns: BTreeMap<String, Scalar>) -> Self {
        Self { columns }
    }
}

/// Mirror the primary-key column into `id`.
///
/// A present key column is mirrored even when it holds `NULL`; a row without
/// the key column is left untouched. The key column itself stays in the row.
pub fn normalize_row(model: &ModelName, mut row: Row) -> Row {
    if let Some(pk) = row.get(model.primary_key().as_str()).cloned() {
        row.insert(ID_FIELD, pk);
    }
    row
}
