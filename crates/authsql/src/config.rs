//! Adapter configuration.
//!
//! Logging options deserialize from an application config file; row transforms
//! are attached in code with [`AdapterConfig::transform`].

use crate::transform::RowTransform;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

/// Configuration for [`Adapter`](crate::Adapter).
///
/// The plain fields deserialize with `serde` so the adapter can be configured from
/// an application config file; row transforms are added in code.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Log statements at INFO instead of DEBUG.
    pub debug_logs: bool,
    /// Truncate logged SQL (in bytes, on a char boundary). `None` logs it whole.
    pub max_sql_length: Option<usize>,
    #[serde(skip)]
    transforms: Vec<Arc<dyn RowTransform>>,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            debug_logs: false,
            max_sql_length: Some(200),
            transforms: Vec::new(),
        }
    }
}

impl fmt::Debug for AdapterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterConfig")
            .field("debug_logs", &self.debug_logs)
            .field("max_sql_length", &self.max_sql_length)
            .field("transforms", &self.transforms.len())
            .finish()
    }
}

impl AdapterConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise statement logs to INFO.
    pub fn debug_logs(mut self, enabled: bool) -> Self {
        self.debug_logs = enabled;
        self
    }

    /// Set maximum SQL length to log.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation in logs.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    /// Append a row transform; transforms run in insertion order.
    pub fn transform(mut self, transform: impl RowTransform + 'static) -> Self {
        self.transforms.push(Arc::new(transform));
        self
    }

    pub fn transforms(&self) -> &[Arc<dyn RowTransform>] {
        &self.transforms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::CoerceBool;

    #[test]
    fn defaults() {
        let config = AdapterConfig::new();
        assert!(!config.debug_logs);
        assert_eq!(config.max_sql_length, Some(200));
        assert!(config.transforms().is_empty());
    }

    #[test]
    fn deserializes_plain_fields() {
        let config: AdapterConfig =
            serde_json::from_str(r#"{"debug_logs": true, "max_sql_length": null}"#).unwrap();
        assert!(config.debug_logs);
        assert_eq!(config.max_sql_length, None);

        let config: AdapterConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.max_sql_length, Some(200));
    }

    #[test]
    fn transforms_keep_order() {
        let config = AdapterConfig::new()
            .transform(CoerceBool::new(["a"]))
            .transform(CoerceBool::new(["b"]));
        assert_eq!(config.transforms().len(), 2);
        assert!(format!("{config:?}").contains("transforms: 2"));
    }
}
