//! Pre-write checks.
//!
//! A filter collects `SELECT EXISTS` queries to run before an INSERT or UPDATE is
//! persisted: uniqueness of a value, existence of a referenced row, or any custom
//! select. The first check that fails aborts the write with
//! [`SqlError::FilterRejected`], which callers can tell apart from database errors
//! via [`SqlError::is_filter_rejection`].
//!
//! ```ignore
//! let id = qb::insert(&spells.table)
//!     .insert(|a| {
//!         a.set(&spells.name, "Fireball");
//!     })
//!     .filter(|f| {
//!         f.unique(&spells.name, "Fireball");
//!     })?
//!     .persist(&client)?;
//! ```

use crate::error::{SqlError, SqlResult};
use crate::exec::Executor;
use crate::qb::{Select, SqlQb};
use crate::query::Query;
use crate::schema::{AnyColumn, Column, Table};
use crate::value::{Bind, ColumnValue, Value};

const DEFAULT_UNIQUE_MESSAGE: &str = "Record already exists";
const DEFAULT_EXISTS_MESSAGE: &str = "Referenced record doesn't exist";

/// Outcome of running filter checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterResult {
    pub ok: bool,
    pub err: Option<String>,
    pub field: Option<String>,
}

impl FilterResult {
    pub fn passed() -> Self {
        Self {
            ok: true,
            err: None,
            field: None,
        }
    }

    pub fn rejected(message: impl Into<String>, field: Option<String>) -> Self {
        Self {
            ok: false,
            err: Some(message.into()),
            field,
        }
    }

    /// `Err(SqlError::FilterRejected)` when the checks did not pass.
    pub fn into_result(self) -> SqlResult<()> {
        if self.ok {
            return Ok(());
        }
        Err(SqlError::FilterRejected {
            field: self.field,
            message: self.err.unwrap_or_default(),
        })
    }
}

/// One rendered `SELECT EXISTS` check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCheck {
    query: Query,
    /// Reject when a row exists (uniqueness) rather than when none does (reference).
    reject_if_exists: bool,
    message: String,
    field: Option<String>,
}

impl FilterCheck {
    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn rejects_if_exists(&self) -> bool {
        self.reject_if_exists
    }

    pub fn execute(&self, exec: &impl Executor) -> SqlResult<FilterResult> {
        let exists = exec.query_one_map(&self.query, |row| row.get::<bool>(0))?;
        if exists == self.reject_if_exists {
            Ok(FilterResult::rejected(&self.message, self.field.clone()))
        } else {
            Ok(FilterResult::passed())
        }
    }
}

/// Run checks in order and stop at the first failure.
pub fn evaluate(checks: &[FilterCheck], exec: &impl Executor) -> SqlResult<FilterResult> {
    for check in checks {
        let result = check.execute(exec)?;
        if !result.ok {
            tracing::warn!(
                target: "sqlweave::filter",
                field = result.field.as_deref().unwrap_or("-"),
                message = result.err.as_deref().unwrap_or("-"),
                "filter check rejected write"
            );
            return Ok(result);
        }
    }
    Ok(FilterResult::passed())
}

pub(crate) fn run_checks(checks: &[FilterCheck], exec: &impl Executor) -> SqlResult<()> {
    evaluate(checks, exec)?.into_result()
}

/// Shared state of insert and update filters.
#[derive(Debug)]
struct Checks {
    table: Table,
    checks: Vec<FilterCheck>,
    error: Option<SqlError>,
}

impl Checks {
    fn new(table: &Table) -> Self {
        Self {
            table: table.clone(),
            checks: Vec::new(),
            error: None,
        }
    }

    fn add(
        &mut self,
        select: SqlResult<Select>,
        reject_if_exists: bool,
        message: &str,
        field: Option<&str>,
    ) {
        match select.and_then(|s| s.exists().sql_args()) {
            Ok(query) => self.checks.push(FilterCheck {
                query,
                reject_if_exists,
                message: message.to_string(),
                field: field.map(str::to_string),
            }),
            Err(err) => {
                self.error.get_or_insert(err);
            }
        }
    }

    fn unique(&mut self, column: &AnyColumn, value: Value, exclude: Option<(AnyColumn, Value)>) {
        let select = Select::new(&self.table).where_(|w| {
            w.eq_value(column, value);
            if let Some((primary_key, id)) = exclude {
                w.neq_value(&primary_key, id);
            }
        });
        self.add(select, true, DEFAULT_UNIQUE_MESSAGE, Some(column.key()));
    }

    fn exists(&mut self, column: &AnyColumn, foreign: &Table, foreign_column: &AnyColumn, value: Value) {
        let select = Select::new(foreign).where_(|w| {
            w.eq_value(foreign_column, value);
        });
        self.add(select, false, DEFAULT_EXISTS_MESSAGE, Some(column.key()));
    }

    fn predicate(&mut self, message: &str, block: impl FnOnce(Select) -> SqlResult<Select>) {
        let select = block(Select::new(&self.table));
        self.add(select, true, message, None);
    }

    fn message(&mut self, message: &str) {
        if let Some(last) = self.checks.last_mut() {
            last.message = message.to_string();
        }
    }

    fn finish(self) -> SqlResult<Vec<FilterCheck>> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.checks),
        }
    }
}

/// Checks declared for an INSERT.
#[derive(Debug)]
pub struct InsertFilter {
    inner: Checks,
}

impl InsertFilter {
    pub fn new(table: &Table) -> Self {
        Self {
            inner: Checks::new(table),
        }
    }

    /// Reject when a row with `column = value` already exists.
    pub fn unique<T: ColumnValue>(&mut self, column: &Column<T>, value: impl Bind<T>) -> &mut Self {
        self.inner.unique(column.as_any(), value.bind(), None);
        self
    }

    /// `unique`, skipped for `None`.
    pub fn unique_opt<T: ColumnValue>(&mut self, column: &Column<T>, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.inner.unique(column.as_any(), value.into(), None);
        }
        self
    }

    /// Reject unless `foreign` has a row with `foreign_column = value`.
    pub fn exists<T: ColumnValue>(
        &mut self,
        column: &Column<T>,
        foreign: &Table,
        foreign_column: &Column<T>,
        value: impl Bind<T>,
    ) -> &mut Self {
        self.inner
            .exists(column.as_any(), foreign, foreign_column.as_any(), value.bind());
        self
    }

    /// `exists`, skipped for `None`.
    pub fn exists_opt<T: ColumnValue>(
        &mut self,
        column: &Column<T>,
        foreign: &Table,
        foreign_column: &Column<T>,
        value: Option<T>,
    ) -> &mut Self {
        if let Some(value) = value {
            self.inner
                .exists(column.as_any(), foreign, foreign_column.as_any(), value.into());
        }
        self
    }

    /// Reject when the select built by `block` finds a row.
    pub fn predicate(&mut self, message: &str, block: impl FnOnce(Select) -> SqlResult<Select>) -> &mut Self {
        self.inner.predicate(message, block);
        self
    }

    /// Override the message of the most recently added check.
    pub fn message(&mut self, message: &str) -> &mut Self {
        self.inner.message(message);
        self
    }

    pub fn into_checks(self) -> SqlResult<Vec<FilterCheck>> {
        self.inner.finish()
    }
}

/// Checks declared for an UPDATE of one row.
#[derive(Debug)]
pub struct UpdateFilter {
    inner: Checks,
}

impl UpdateFilter {
    pub fn new(table: &Table) -> Self {
        Self {
            inner: Checks::new(table),
        }
    }

    fn unique_excluding(&mut self, id: Value, column: &AnyColumn, value: Value) {
        match self.inner.table.primary_key() {
            Ok(primary_key) => {
                let primary_key = primary_key.clone();
                self.inner.unique(column, value, Some((primary_key, id)));
            }
            Err(err) => {
                self.inner.error.get_or_insert(err);
            }
        }
    }

    /// Reject when another row (primary key other than `id`) has `column = value`.
    ///
    /// Requires the table to declare a primary key.
    pub fn unique<T: ColumnValue>(
        &mut self,
        id: impl Into<Value>,
        column: &Column<T>,
        value: impl Bind<T>,
    ) -> &mut Self {
        self.unique_excluding(id.into(), column.as_any(), value.bind());
        self
    }

    /// `unique`, skipped for `None`.
    pub fn unique_opt<T: ColumnValue>(
        &mut self,
        id: impl Into<Value>,
        column: &Column<T>,
        value: Option<T>,
    ) -> &mut Self {
        if let Some(value) = value {
            self.unique_excluding(id.into(), column.as_any(), value.into());
        }
        self
    }

    /// Reject unless `foreign` has a row with `foreign_column = value`.
    pub fn exists<T: ColumnValue>(
        &mut self,
        column: &Column<T>,
        foreign: &Table,
        foreign_column: &Column<T>,
        value: impl Bind<T>,
    ) -> &mut Self {
        self.inner
            .exists(column.as_any(), foreign, foreign_column.as_any(), value.bind());
        self
    }

    /// `exists`, skipped for `None`.
    pub fn exists_opt<T: ColumnValue>(
        &mut self,
        column: &Column<T>,
        foreign: &Table,
        foreign_column: &Column<T>,
        value: Option<T>,
    ) -> &mut Self {
        if let Some(value) = value {
            self.inner
                .exists(column.as_any(), foreign, foreign_column.as_any(), value.into());
        }
        self
    }

    /// Reject when the select built by `block` finds a row.
    pub fn predicate(&mut self, message: &str, block: impl FnOnce(Select) -> SqlResult<Select>) -> &mut Self {
        self.inner.predicate(message, block);
        self
    }

    /// Override the message of the most recently added check.
    pub fn message(&mut self, message: &str) -> &mut Self {
        self.inner.message(message);
        self
    }

    pub fn into_checks(self) -> SqlResult<Vec<FilterCheck>> {
        self.inner.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spells() -> (Table, Column<i32>, Column<String>) {
        let mut table = Table::new("spells");
        let id = table.integer("id");
        let name = table.text("name");
        table.set_primary_key(&id).unwrap();
        (table, id, name)
    }

    #[test]
    fn unique_renders_exists_select() {
        let (table, _, name) = spells();
        let mut filter = InsertFilter::new(&table);
        filter.unique(&name, "Fireball");
        let checks = filter.into_checks().unwrap();

        assert_eq!(checks.len(), 1);
        assert_eq!(
            checks[0].query().sql,
            "SELECT EXISTS (SELECT 1 FROM spells s WHERE s.name = ?)"
        );
        assert_eq!(checks[0].query().args, vec![Value::from("Fireball")]);
        assert!(checks[0].rejects_if_exists());
        assert_eq!(checks[0].field(), Some("name"));
    }

    #[test]
    fn update_unique_excludes_own_row() {
        let (table, _, name) = spells();
        let mut filter = UpdateFilter::new(&table);
        filter.unique(7, &name, "Fireball").message("name taken");
        let checks = filter.into_checks().unwrap();

        assert_eq!(
            checks[0].query().sql,
            "SELECT EXISTS (SELECT 1 FROM spells s WHERE s.name = ? AND s.id <> ?)"
        );
        assert_eq!(
            checks[0].query().args,
            vec![Value::from("Fireball"), Value::Int(7)]
        );
        assert_eq!(checks[0].message(), "name taken");
    }

    #[test]
    fn update_unique_requires_primary_key() {
        let mut table = Table::new("tags");
        let label = table.text("label");
        let mut filter = UpdateFilter::new(&table);
        filter.unique(1, &label, "x");

        let err = filter.into_checks().unwrap_err();
        assert!(matches!(err, SqlError::MissingPrimaryKey { .. }));
    }

    #[test]
    fn optional_checks_skip_none() {
        let (table, _, name) = spells();
        let mut filter = InsertFilter::new(&table);
        filter.unique_opt(&name, None);
        assert!(filter.into_checks().unwrap().is_empty());
    }

    #[test]
    fn rejected_result_maps_to_filter_error() {
        let err = FilterResult::rejected("Record already exists", Some("name".into()))
            .into_result()
            .unwrap_err();
        assert!(err.is_filter_rejection());
        assert!(FilterResult::passed().into_result().is_ok());
    }
}
