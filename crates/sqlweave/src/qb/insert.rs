//! INSERT query builder.

use crate::error::{SqlError, SqlResult};
use crate::exec::Executor;
use crate::expr::{Assignment, InsertValues, Statement};
use crate::filter::{FilterCheck, InsertFilter, run_checks};
use crate::qb::traits::SqlQb;
use crate::schema::{AsColumn, Column, Table};
use crate::value::{Bind, ColumnValue, Value};

/// Column assignments collected by an `insert`/`update` block.
///
/// Assigning the same column twice keeps the last value.
#[derive(Debug, Clone, Default)]
pub struct Assignments {
    entries: Vec<Assignment>,
}

impl Assignments {
    pub fn new() -> Self {
        Self::default()
    }

    fn put(&mut self, column: &dyn AsColumn, value: Value) {
        let column = column.as_column();
        match self.entries.iter_mut().find(|a| &a.column == column) {
            Some(existing) => existing.value = value,
            None => self.entries.push(Assignment {
                column: column.clone(),
                value,
            }),
        }
    }

    /// column = value
    pub fn set<T: ColumnValue>(&mut self, column: &Column<T>, value: impl Bind<T>) -> &mut Self {
        self.put(column, value.bind());
        self
    }

    /// column = value, or a null assignment for `None`.
    pub fn set_opt<T: ColumnValue>(&mut self, column: &Column<T>, value: Option<T>) -> &mut Self {
        self.put(column, value.into());
        self
    }

    /// Explicit null assignment.
    pub fn set_null(&mut self, column: &dyn AsColumn) -> &mut Self {
        self.put(column, Value::Null);
        self
    }

    /// Untyped assignment.
    pub fn set_value(&mut self, column: &dyn AsColumn, value: impl Into<Value>) -> &mut Self {
        self.put(column, value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn merge(&mut self, other: Assignments) {
        for assignment in other.entries {
            self.put(&assignment.column, assignment.value);
        }
    }

    pub(crate) fn entries(&self) -> &[Assignment] {
        &self.entries
    }

    /// Pair each assignment with its column's declaration position in `table`.
    pub(crate) fn positioned(&self, table: &Table) -> SqlResult<Vec<(usize, &Assignment)>> {
        self.entries
            .iter()
            .map(|a| {
                table
                    .position(&a.column)
                    .map(|position| (position, a))
                    .ok_or_else(|| {
                        SqlError::validation(format!(
                            "Column '{}' does not belong to table '{}'",
                            a.column.key(),
                            table.name()
                        ))
                    })
            })
            .collect()
    }
}

/// INSERT query builder.
///
/// Null assignments are dropped; the remaining columns render in declaration order.
#[derive(Clone, Debug)]
pub struct Insert {
    table: Table,
    assignments: Assignments,
    filters: Vec<FilterCheck>,
}

impl Insert {
    pub fn new(table: &Table) -> Self {
        Self {
            table: table.clone(),
            assignments: Assignments::new(),
            filters: Vec::new(),
        }
    }

    /// Add assignments.
    pub fn insert(mut self, block: impl FnOnce(&mut Assignments)) -> Self {
        let mut assignments = Assignments::new();
        block(&mut assignments);
        self.assignments.merge(assignments);
        self
    }

    /// Declare checks to run before `persist` writes the row.
    pub fn filter(mut self, block: impl FnOnce(&mut InsertFilter)) -> SqlResult<Self> {
        let mut filter = InsertFilter::new(&self.table);
        block(&mut filter);
        self.filters.extend(filter.into_checks()?);
        Ok(self)
    }

    pub fn filters(&self) -> &[FilterCheck] {
        &self.filters
    }

    /// Run the filters, then insert and return the generated key.
    pub fn persist(&self, exec: &impl Executor) -> SqlResult<i64> {
        let query = self.sql_args()?;
        run_checks(&self.filters, exec)?;
        exec.execute_returning_key(&query)
    }
}

impl SqlQb for Insert {
    fn table(&self) -> &Table {
        &self.table
    }

    fn statement(&self) -> SqlResult<Statement> {
        let mut assignments: Vec<(usize, &Assignment)> = self
            .assignments
            .positioned(&self.table)?
            .into_iter()
            .filter(|(_, a)| !a.value.is_null())
            .collect();
        if assignments.is_empty() {
            return Err(SqlError::EmptyInsert);
        }
        assignments.sort_by_key(|(position, _)| *position);

        Ok(Statement::Insert(InsertValues {
            table: self.table.info().clone(),
            assignments: assignments.into_iter().map(|(_, a)| a.clone()).collect(),
        }))
    }
}
