//! Statement logging through `tracing`.
//!
//! One event per executed statement on target `authsql.sql`, emitted before the
//! backend call. Bind values are never logged, only their count.
//! Enable via the crate feature `tracing` (on by default).

use crate::config::AdapterConfig;
use crate::error::AdapterError;
use crate::model::ModelName;
use crate::statement::Operation;

/// Truncate `sql` to at most `max` bytes without splitting a character.
pub(crate) fn truncate_sql_bytes(sql: &str, max: usize) -> &str {
    if sql.len() <= max {
        return sql;
    }
    let mut end = max;
    while !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

#[derive(Debug, Clone)]
pub(crate) struct SqlLogger {
    verbose: bool,
    max_sql_length: Option<usize>,
}

impl SqlLogger {
    pub(crate) fn new(config: &AdapterConfig) -> Self {
        Self {
            verbose: config.debug_logs,
            max_sql_length: config.max_sql_length,
        }
    }

    fn truncate_sql(&self, sql: &str) -> String {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }

    #[cfg(feature = "tracing")]
    pub(crate) fn statement(&self, op: Operation, model: &ModelName, sql: &str, param_count: usize) {
        let sql = self.truncate_sql(sql);
        let operation = op.as_str();
        let model = model.as_str();
        if self.verbose {
            tracing::info!(target: "authsql.sql", operation, model, param_count, sql = %sql);
        } else {
            tracing::debug!(target: "authsql.sql", operation, model, param_count, sql = %sql);
        }
    }

    #[cfg(not(feature = "tracing"))]
    pub(crate) fn statement(&self, op: Operation, model: &ModelName, sql: &str, param_count: usize) {
        let _ = (self.verbose, op, model, self.truncate_sql(sql), param_count);
    }

    #[cfg(feature = "tracing")]
    pub(crate) fn failure(&self, op: Operation, model: &ModelName, err: &AdapterError) {
        tracing::warn!(
            target: "authsql.sql",
            operation = op.as_str(),
            model = model.as_str(),
            error = %err,
            "statement failed"
        );
    }

    #[cfg(not(feature = "tracing"))]
    pub(crate) fn failure(&self, op: Operation, model: &ModelName, err: &AdapterError) {
        let _ = (op, model, err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_sql_bytes("SELECT", 10), "SELECT");
        assert_eq!(truncate_sql_bytes("SELECT", 3), "SEL");
        // 'é' is two bytes; cutting inside it backs off.
        assert_eq!(truncate_sql_bytes("é", 1), "");
    }

    #[test]
    fn logger_truncates_long_sql() {
        let logger = SqlLogger::new(&AdapterConfig::new().max_sql_length(6));
        assert_eq!(logger.truncate_sql("SELECT * FROM User"), "SELECT...");

        let logger = SqlLogger::new(&AdapterConfig::new().no_truncate());
        assert_eq!(logger.truncate_sql("SELECT * FROM User"), "SELECT * FROM User");
    }
}
