//! UPDATE query builder.

use crate::error::{SqlError, SqlResult};
use crate::exec::Executor;
use crate::expr::{Predicate, SetAssignments, Statement, UpdateStatement};
use crate::filter::{FilterCheck, UpdateFilter, run_checks};
use crate::qb::insert::Assignments;
use crate::qb::traits::SqlQb;
use crate::qb::where_clause::Where;
use crate::schema::Table;
use crate::value::Value;

/// UPDATE query builder.
///
/// Assignments render in call order. A null assignment renders
/// `col = COALESCE(?, col)` and keeps the stored value.
#[derive(Clone, Debug)]
pub struct Update {
    table: Table,
    assignments: Assignments,
    condition: Option<Predicate>,
    filters: Vec<FilterCheck>,
}

impl Update {
    pub fn new(table: &Table) -> Self {
        Self {
            table: table.clone(),
            assignments: Assignments::new(),
            condition: None,
            filters: Vec::new(),
        }
    }

    /// Add SET assignments.
    pub fn update(mut self, block: impl FnOnce(&mut Assignments)) -> Self {
        let mut assignments = Assignments::new();
        block(&mut assignments);
        self.assignments.merge(assignments);
        self
    }

    /// Add SET assignments and restrict to the row whose primary key is `id`.
    pub fn update_primary(
        self,
        id: impl Into<Value>,
        block: impl FnOnce(&mut Assignments),
    ) -> SqlResult<Self> {
        let primary_key = self.table.primary_key()?.clone();
        let id = id.into();
        self.update(block).where_(|w| {
            w.eq_value(&primary_key, id);
        })
    }

    /// Set the WHERE clause, replacing any previous one.
    pub fn where_(mut self, block: impl FnOnce(&mut Where)) -> SqlResult<Self> {
        self.condition = Where::build(block)?;
        Ok(self)
    }

    /// Declare checks to run before `persist` writes.
    pub fn filter(mut self, block: impl FnOnce(&mut UpdateFilter)) -> SqlResult<Self> {
        let mut filter = UpdateFilter::new(&self.table);
        block(&mut filter);
        self.filters.extend(filter.into_checks()?);
        Ok(self)
    }

    pub fn filters(&self) -> &[FilterCheck] {
        &self.filters
    }

    /// Run the filters, then update and return the number of affected rows.
    pub fn persist(&self, exec: &impl Executor) -> SqlResult<u64> {
        let query = self.sql_args()?;
        run_checks(&self.filters, exec)?;
        exec.execute(&query)
    }
}

impl SqlQb for Update {
    fn table(&self) -> &Table {
        &self.table
    }

    fn statement(&self) -> SqlResult<Statement> {
        if self.assignments.is_empty() {
            return Err(SqlError::EmptyUpdate);
        }
        self.assignments.positioned(&self.table)?;
        Ok(Statement::Update(UpdateStatement {
            table: self.table.info().clone(),
            set: SetAssignments {
                assignments: self.assignments.entries().to_vec(),
            },
            condition: self.condition.clone(),
        }))
    }
}
