//! DELETE query builder.

use crate::error::SqlResult;
use crate::exec::Executor;
use crate::expr::{DeleteStatement, Predicate, Statement};
use crate::qb::traits::SqlQb;
use crate::qb::where_clause::Where;
use crate::schema::Table;
use crate::value::Value;

/// DELETE query builder. Without a WHERE clause every row is deleted.
#[derive(Clone, Debug)]
pub struct Delete {
    table: Table,
    condition: Option<Predicate>,
}

impl Delete {
    pub fn new(table: &Table) -> Self {
        Self {
            table: table.clone(),
            condition: None,
        }
    }

    /// Set the WHERE clause, replacing any previous one.
    pub fn delete_where(mut self, block: impl FnOnce(&mut Where)) -> SqlResult<Self> {
        self.condition = Where::build(block)?;
        Ok(self)
    }

    /// Delete the row whose primary key is `id`.
    pub fn delete_primary(self, id: impl Into<Value>) -> SqlResult<Self> {
        let primary_key = self.table.primary_key()?.clone();
        let id = id.into();
        self.delete_where(|w| {
            w.eq_value(&primary_key, id);
        })
    }

    /// Delete and return the number of affected rows.
    pub fn persist(&self, exec: &impl Executor) -> SqlResult<u64> {
        self.execute(exec)
    }
}

impl SqlQb for Delete {
    fn table(&self) -> &Table {
        &self.table
    }

    fn statement(&self) -> SqlResult<Statement> {
        Ok(Statement::Delete(DeleteStatement {
            table: self.table.info().clone(),
            condition: self.condition.clone(),
        }))
    }
}
