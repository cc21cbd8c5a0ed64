//! SELECT query builder.

use crate::error::{SqlError, SqlResult};
use crate::exec::{Executor, FromRow, Row};
use crate::expr::{Limit, Offset, Order, OrderBy, Predicate, SelectClause, SelectStatement, Statement, TableJoin};
use crate::qb::join::{Join, JoinContext};
use crate::qb::traits::SqlQb;
use crate::qb::where_clause::Where;
use crate::schema::{AnyColumn, AsColumn, Table};
use crate::value::Value;

/// SELECT query builder.
///
/// Columns render as `alias.col`, the table as `name alias`. The projection defaults
/// to `SELECT 1`; `select`/`select_all`, `count` and `exists` switch it and the last
/// call wins.
#[derive(Clone, Debug)]
pub struct Select {
    table: Table,
    clause: SelectClause,
    /// Columns accumulated by `select` / `select_all`
    columns: Vec<AnyColumn>,
    joins: Vec<TableJoin>,
    /// Created by the first `join` call
    join_context: Option<JoinContext>,
    condition: Option<Predicate>,
    order_by: Vec<OrderBy>,
    limit: Option<Limit>,
    offset: Option<Offset>,
}

impl Select {
    pub fn new(table: &Table) -> Self {
        Self {
            table: table.clone(),
            clause: SelectClause::One,
            columns: Vec::new(),
            joins: Vec::new(),
            join_context: None,
            condition: None,
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    // ==================== Projection ====================

    /// Append columns to the projection. An empty list is an error.
    pub fn select(mut self, columns: &[&dyn AsColumn]) -> SqlResult<Self> {
        if columns.is_empty() {
            return Err(SqlError::validation("select columns can not be empty"));
        }
        self.columns
            .extend(columns.iter().map(|c| c.as_column().clone()));
        self.clause = SelectClause::Columns(self.columns.clone());
        Ok(self)
    }

    /// Select every declared column except `except`, in declaration order.
    pub fn select_all(self, except: &[&dyn AsColumn]) -> SqlResult<Self> {
        let columns: Vec<AnyColumn> = self
            .table
            .columns()
            .iter()
            .filter(|c| !except.iter().any(|e| e.as_column() == *c))
            .cloned()
            .collect();
        let refs: Vec<&dyn AsColumn> = columns.iter().map(|c| c as &dyn AsColumn).collect();
        self.select(&refs)
    }

    /// Select one row by primary key. No columns means all columns.
    pub fn select_primary(self, id: impl Into<Value>, columns: &[&dyn AsColumn]) -> SqlResult<Self> {
        let primary_key = self.table.primary_key()?.clone();
        let select = if columns.is_empty() {
            self.select_all(&[])?
        } else {
            self.select(columns)?
        };
        let id = id.into();
        select.where_(|w| {
            w.eq_value(&primary_key, id);
        })
    }

    /// `SELECT COUNT(*)`
    ///
    /// Replaces the column list only. Joins, WHERE, ORDER BY and LIMIT/OFFSET
    /// still render, so a paginated builder counts at most one page.
    pub fn count(mut self) -> Self {
        self.clause = SelectClause::Count;
        self
    }

    /// `SELECT EXISTS (SELECT 1 ...)`
    ///
    /// The inner select is this whole builder: its WHERE, joins, ORDER BY and
    /// LIMIT/OFFSET all render inside the parentheses.
    pub fn exists(mut self) -> Self {
        self.clause = SelectClause::Exists;
        self
    }

    // ==================== WHERE / JOIN ====================

    /// Set the WHERE clause, replacing any previous one.
    ///
    /// Errors recorded in the block (such as an empty strict IN list) surface here.
    pub fn where_(mut self, block: impl FnOnce(&mut Where)) -> SqlResult<Self> {
        self.condition = Where::build(block)?;
        Ok(self)
    }

    /// Add one join. The block must declare exactly one pairing.
    pub fn join(mut self, block: impl for<'j> FnOnce(&mut Join<'j>)) -> SqlResult<Self> {
        let context = self.join_context.get_or_insert_with(JoinContext::new);
        let mut join = Join::new(self.table.info(), context);
        block(&mut join);
        let join = join.build()?;
        self.joins.push(join);
        Ok(self)
    }

    /// The join context, once a join has been added.
    pub fn join_context(&self) -> Option<&JoinContext> {
        self.join_context.as_ref()
    }

    // ==================== ORDER BY ====================

    pub fn order_by(mut self, column: &dyn AsColumn, order: Order) -> Self {
        self.order_by.push(OrderBy {
            column: column.as_column().clone(),
            order,
        });
        self
    }

    pub fn order_by_asc(self, column: &dyn AsColumn) -> Self {
        self.order_by(column, Order::Asc)
    }

    pub fn order_by_desc(self, column: &dyn AsColumn) -> Self {
        self.order_by(column, Order::Desc)
    }

    // ==================== Pagination ====================

    /// LIMIT n, n > 0
    pub fn limit(mut self, n: i64) -> SqlResult<Self> {
        if n <= 0 {
            return Err(SqlError::validation("Limit must be greater than 0"));
        }
        self.limit = Some(Limit(n));
        Ok(self)
    }

    /// OFFSET n, n >= 0
    pub fn offset(mut self, n: i64) -> SqlResult<Self> {
        if n < 0 {
            return Err(SqlError::validation(
                "Offset must be greater than or equal to 0",
            ));
        }
        self.offset = Some(Offset(n));
        Ok(self)
    }

    /// LIMIT size OFFSET (page - 1) * size, pages starting at 1.
    pub fn paginate(mut self, page: i64, size: i64) -> SqlResult<Self> {
        if page <= 0 {
            return Err(SqlError::validation("Page must be greater than 0"));
        }
        if size <= 0 {
            return Err(SqlError::validation("Page size must be greater than 0"));
        }
        let offset = (page - 1)
            .checked_mul(size)
            .ok_or_else(|| SqlError::validation("Page offset overflows"))?;
        self.limit = Some(Limit(size));
        self.offset = Some(Offset(offset));
        Ok(self)
    }

    // ==================== Execution ====================

    /// Fetch all rows, mapping each one.
    pub fn fetch_all<R>(
        &self,
        exec: &impl Executor,
        mapper: impl FnMut(&Row) -> SqlResult<R>,
    ) -> SqlResult<Vec<R>> {
        exec.query_map(&self.sql_args()?, mapper)
    }

    /// Fetch all rows as `T`.
    pub fn fetch_all_as<T: FromRow>(&self, exec: &impl Executor) -> SqlResult<Vec<T>> {
        self.fetch_all(exec, T::from_row)
    }

    /// Fetch the first row, if any.
    pub fn fetch_opt<R>(
        &self,
        exec: &impl Executor,
        mapper: impl FnMut(&Row) -> SqlResult<R>,
    ) -> SqlResult<Option<R>> {
        exec.query_opt_map(&self.sql_args()?, mapper)
    }

    /// Fetch the first row; `SqlError::NotFound` when there is none.
    pub fn fetch_one<R>(
        &self,
        exec: &impl Executor,
        mapper: impl FnMut(&Row) -> SqlResult<R>,
    ) -> SqlResult<R> {
        exec.query_one_map(&self.sql_args()?, mapper)
    }

    /// Run this select as `SELECT COUNT(*)`.
    pub fn fetch_count(&self, exec: &impl Executor) -> SqlResult<i64> {
        let query = self.clone().count().sql_args()?;
        exec.query_one_map(&query, |row| row.get::<i64>(0))
    }

    /// Run this select as `SELECT EXISTS (...)`.
    pub fn fetch_exists(&self, exec: &impl Executor) -> SqlResult<bool> {
        let query = self.clone().exists().sql_args()?;
        exec.query_one_map(&query, |row| row.get::<bool>(0))
    }
}

impl SqlQb for Select {
    fn table(&self) -> &Table {
        &self.table
    }

    fn statement(&self) -> SqlResult<Statement> {
        Ok(Statement::Select(SelectStatement {
            table: self.table.info().clone(),
            clause: self.clause.clone(),
            joins: self.joins.clone(),
            condition: self.condition.clone(),
            order_by: self.order_by.clone(),
            limit: self.limit,
            offset: self.offset,
        }))
    }

    fn uses_table_alias(&self) -> bool {
        true
    }
}
