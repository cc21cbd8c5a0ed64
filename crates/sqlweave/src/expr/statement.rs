use std::sync::Arc;

use crate::expr::{Predicate, SqlFragment};
use crate::render::Renderer;
use crate::schema::{AnyColumn, TableInfo};
use crate::value::Value;

/// The projection of a SELECT. Kinds are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectClause {
    /// `SELECT 1`
    #[default]
    One,
    Columns(Vec<AnyColumn>),
    /// `SELECT COUNT(*)`
    Count,
    /// `SELECT EXISTS (SELECT 1 ...)`
    Exists,
}

impl SelectClause {
    pub fn render(&self, renderer: &dyn Renderer, use_table_alias: bool) -> SqlFragment {
        renderer.select_clause(self, use_table_alias)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinKind {
    Left,
    Right,
    Inner,
    Outer,
    Full,
}

impl JoinKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinKind::Left => "LEFT",
            JoinKind::Right => "RIGHT",
            JoinKind::Inner => "INNER",
            JoinKind::Outer => "OUTER",
            JoinKind::Full => "FULL",
        }
    }
}

/// `left = right`, each side qualified by its own table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinCondition {
    pub left: AnyColumn,
    pub right: AnyColumn,
}

/// `<KIND> JOIN <table> <alias> ON <condition>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableJoin {
    pub table: Arc<TableInfo>,
    /// Alias resolved through the select's join context.
    pub alias: Option<String>,
    pub kind: JoinKind,
    pub condition: JoinCondition,
}

impl TableJoin {
    pub fn render(&self, renderer: &dyn Renderer, use_table_alias: bool) -> SqlFragment {
        renderer.join(self, use_table_alias)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

impl Order {
    pub fn as_str(&self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: AnyColumn,
    pub order: Order,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offset(pub i64);

/// A column/value pair for INSERT and UPDATE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub column: AnyColumn,
    pub value: Value,
}

/// `INSERT INTO t (cols) VALUES (?, ...)`. Null assignments never reach this node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertValues {
    pub table: Arc<TableInfo>,
    pub assignments: Vec<Assignment>,
}

/// The SET list of an UPDATE. A `Value::Null` keeps the column's prior value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetAssignments {
    pub assignments: Vec<Assignment>,
}

impl SetAssignments {
    pub fn render(&self, renderer: &dyn Renderer, use_table_alias: bool) -> SqlFragment {
        renderer.set(self, use_table_alias)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectStatement {
    pub table: Arc<TableInfo>,
    pub clause: SelectClause,
    pub joins: Vec<TableJoin>,
    pub condition: Option<Predicate>,
    pub order_by: Vec<OrderBy>,
    pub limit: Option<Limit>,
    pub offset: Option<Offset>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStatement {
    pub table: Arc<TableInfo>,
    pub set: SetAssignments,
    pub condition: Option<Predicate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteStatement {
    pub table: Arc<TableInfo>,
    pub condition: Option<Predicate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTable {
    pub table: Arc<TableInfo>,
    pub columns: Vec<AnyColumn>,
    pub primary_key: Option<AnyColumn>,
}

/// Root of an expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Insert(InsertValues),
    Select(SelectStatement),
    Update(UpdateStatement),
    Delete(DeleteStatement),
    CreateTable(CreateTable),
}

impl Statement {
    pub fn render(&self, renderer: &dyn Renderer, use_table_alias: bool) -> SqlFragment {
        match self {
            Statement::Insert(expr) => renderer.insert(expr, use_table_alias),
            Statement::Select(expr) => renderer.select(expr, use_table_alias),
            Statement::Update(expr) => renderer.update(expr, use_table_alias),
            Statement::Delete(expr) => renderer.delete(expr, use_table_alias),
            Statement::CreateTable(expr) => renderer.create_table(expr),
        }
    }
}
