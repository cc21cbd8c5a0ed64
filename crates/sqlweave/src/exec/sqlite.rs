//! SQLite executor over `rusqlite`.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use rusqlite::types::{ToSqlOutput, Value as SqliteValue, ValueRef};
use rusqlite::{Connection, ToSql, params_from_iter};

use crate::error::{SqlError, SqlResult};
use crate::exec::{ExecConfig, Executor, Row, log_statement};
use crate::query::Query;
use crate::value::Value;

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let out = match self {
            Value::Null => ToSqlOutput::Owned(SqliteValue::Null),
            Value::Bool(v) => ToSqlOutput::Owned(SqliteValue::Integer(i64::from(*v))),
            Value::Int(v) => ToSqlOutput::Owned(SqliteValue::Integer(i64::from(*v))),
            Value::Long(v) => ToSqlOutput::Owned(SqliteValue::Integer(*v)),
            Value::Float(v) => ToSqlOutput::Owned(SqliteValue::Real(f64::from(*v))),
            Value::Double(v) => ToSqlOutput::Owned(SqliteValue::Real(*v)),
            Value::Decimal(v) => ToSqlOutput::Owned(SqliteValue::Text(v.to_string())),
            Value::Text(v) => ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes())),
            Value::Blob(v) => ToSqlOutput::Borrowed(ValueRef::Blob(v.as_slice())),
        };
        Ok(out)
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(v) => Value::Long(v),
            ValueRef::Real(v) => Value::Double(v),
            ValueRef::Text(v) => Value::Text(String::from_utf8_lossy(v).into_owned()),
            ValueRef::Blob(v) => Value::Blob(v.to_vec()),
        }
    }
}

fn run_execute(conn: &Connection, config: &ExecConfig, query: &Query) -> SqlResult<u64> {
    let start = Instant::now();
    let affected = conn
        .execute(&query.sql, params_from_iter(query.args.iter()))
        .map_err(SqlError::from_db_error)?;
    let affected = affected as u64;
    log_statement(config, query, start.elapsed(), affected);
    Ok(affected)
}

fn run_query(conn: &Connection, config: &ExecConfig, query: &Query) -> SqlResult<Vec<Row>> {
    let start = Instant::now();
    let mut stmt = conn.prepare(&query.sql).map_err(SqlError::from_db_error)?;
    let columns: Arc<[String]> = stmt
        .column_names()
        .into_iter()
        .map(String::from)
        .collect();

    let mut rows = stmt
        .query(params_from_iter(query.args.iter()))
        .map_err(SqlError::from_db_error)?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let values = (0..columns.len())
            .map(|i| row.get_ref(i).map(Value::from))
            .collect::<Result<Vec<_>, _>>()?;
        out.push(Row::new(Arc::clone(&columns), values));
    }
    log_statement(config, query, start.elapsed(), out.len() as u64);
    Ok(out)
}

/// A blocking SQLite client.
///
/// `rusqlite::Connection` is not `Sync`; confine a client to one thread at a time.
#[derive(Debug)]
pub struct SqliteClient {
    conn: Connection,
    config: ExecConfig,
}

impl SqliteClient {
    pub fn open_in_memory() -> SqlResult<Self> {
        Ok(Self::from_connection(Connection::open_in_memory()?))
    }

    pub fn open(path: impl AsRef<Path>) -> SqlResult<Self> {
        Ok(Self::from_connection(Connection::open(path)?))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            config: ExecConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ExecConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ExecConfig {
        &self.config
    }

    /// The underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Run several `;`-separated statements without arguments.
    pub fn execute_batch(&self, sql: &str) -> SqlResult<()> {
        self.conn.execute_batch(sql).map_err(SqlError::from_db_error)
    }

    /// Run `f` inside a transaction: commit on `Ok`, roll back on `Err`.
    pub fn transaction<R>(
        &mut self,
        f: impl FnOnce(&SqliteTransaction<'_>) -> SqlResult<R>,
    ) -> SqlResult<R> {
        let tx = SqliteTransaction {
            tx: self.conn.transaction()?,
            config: &self.config,
        };
        match f(&tx) {
            Ok(value) => {
                tx.tx.commit()?;
                Ok(value)
            }
            Err(err) => {
                tracing::debug!(target: "sqlweave::sql", error = %err, "rolling back transaction");
                tx.tx.rollback()?;
                Err(err)
            }
        }
    }
}

impl Executor for SqliteClient {
    fn execute(&self, query: &Query) -> SqlResult<u64> {
        run_execute(&self.conn, &self.config, query)
    }

    fn execute_returning_key(&self, query: &Query) -> SqlResult<i64> {
        run_execute(&self.conn, &self.config, query)?;
        Ok(self.conn.last_insert_rowid())
    }

    fn query_rows(&self, query: &Query) -> SqlResult<Vec<Row>> {
        run_query(&self.conn, &self.config, query)
    }
}

/// An open transaction; usable anywhere an [`Executor`] is expected.
#[derive(Debug)]
pub struct SqliteTransaction<'a> {
    tx: rusqlite::Transaction<'a>,
    config: &'a ExecConfig,
}

impl Executor for SqliteTransaction<'_> {
    fn execute(&self, query: &Query) -> SqlResult<u64> {
        run_execute(&self.tx, self.config, query)
    }

    fn execute_returning_key(&self, query: &Query) -> SqlResult<i64> {
        run_execute(&self.tx, self.config, query)?;
        Ok(self.tx.last_insert_rowid())
    }

    fn query_rows(&self, query: &Query) -> SqlResult<Vec<Row>> {
        run_query(&self.tx, self.config, query)
    }
}
