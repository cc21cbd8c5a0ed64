//! Executing rendered queries.
//!
//! [`Executor`] is the contract between rendered [`Query`] values and a database
//! driver: run a statement, run an insert and return the generated key, or fetch rows
//! and map each one. [`SqliteClient`] implements it over `rusqlite` (feature `sqlite`).

mod config;
mod row;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use config::ExecConfig;
pub use row::{FromRow, Row, RowIndex};
#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteClient, SqliteTransaction};

use std::time::Duration;

use crate::error::{SqlError, SqlResult};
use crate::query::Query;

/// Runs queries against a database.
pub trait Executor {
    /// Execute a statement and return the number of affected rows.
    fn execute(&self, query: &Query) -> SqlResult<u64>;

    /// Execute an insert and return the generated row key.
    fn execute_returning_key(&self, query: &Query) -> SqlResult<i64>;

    /// Execute a query and materialize every row.
    fn query_rows(&self, query: &Query) -> SqlResult<Vec<Row>>;

    /// Execute a query and map each row.
    fn query_map<R>(
        &self,
        query: &Query,
        mut mapper: impl FnMut(&Row) -> SqlResult<R>,
    ) -> SqlResult<Vec<R>> {
        self.query_rows(query)?.iter().map(|row| mapper(row)).collect()
    }

    /// Execute a query and map the first row, if any.
    fn query_opt_map<R>(
        &self,
        query: &Query,
        mut mapper: impl FnMut(&Row) -> SqlResult<R>,
    ) -> SqlResult<Option<R>> {
        self.query_rows(query)?.first().map(|row| mapper(row)).transpose()
    }

    /// Execute a query and map the first row; `SqlError::NotFound` when there is none.
    fn query_one_map<R>(
        &self,
        query: &Query,
        mapper: impl FnMut(&Row) -> SqlResult<R>,
    ) -> SqlResult<R> {
        self.query_opt_map(query, mapper)?
            .ok_or_else(|| SqlError::not_found(format!("no rows returned by: {}", query.sql)))
    }
}

pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

/// Emit the per-statement events on `sqlweave::sql`.
pub(crate) fn log_statement(config: &ExecConfig, query: &Query, elapsed: Duration, rows: u64) {
    if !config.logging_enabled {
        return;
    }
    let sql = match config.max_sql_length {
        Some(max) if query.sql.len() > max => format!("{}...", truncate_sql_bytes(&query.sql, max)),
        _ => query.sql.clone(),
    };
    match config.slow_query_threshold {
        Some(threshold) if elapsed > threshold => tracing::warn!(
            target: "sqlweave::sql",
            param_count = query.args.len(),
            rows,
            elapsed_ms = elapsed.as_millis() as u64,
            threshold_ms = threshold.as_millis() as u64,
            sql = %sql,
            "slow query"
        ),
        _ => tracing::debug!(
            target: "sqlweave::sql",
            param_count = query.args.len(),
            rows,
            elapsed_us = elapsed.as_micros() as u64,
            sql = %sql,
        ),
    }
}
