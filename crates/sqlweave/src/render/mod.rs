//! Renderers turn expression trees into SQL text plus ordered arguments.
//!
//! [`Renderer`] has one method per node kind. Composite nodes are rendered by the
//! dialect calling back into each child's `render`, so argument order always follows
//! the order in which the dialect emits text.

mod sqlite;

pub use sqlite::SqliteDialect;

use std::fmt::Debug;

use crate::expr::{
    Between, CompareOp, Comparison, CreateTable, DeleteStatement, Exists, Group, InList,
    InsertValues, Limit, Logical, Offset, OrderBy, SelectClause, SelectStatement, SetAssignments,
    SqlFragment, TableJoin, UpdateStatement,
};
use crate::schema::{AnyColumn, ColumnType, TableInfo};

/// A SQL dialect.
///
/// `use_table_alias` is threaded through every call: SELECT renders `alias.col` and
/// `name alias`, while INSERT/UPDATE/DELETE target one table and render bare names.
pub trait Renderer: Send + Sync + Debug {
    /// `alias.key` or `key`.
    fn column_ref(&self, column: &AnyColumn, use_table_alias: bool) -> String;

    /// `name alias` or `name`. `alias` overrides the table's own alias.
    fn table_ref(&self, table: &TableInfo, alias: Option<&str>, use_table_alias: bool) -> String;

    /// Operator token for a comparison.
    fn compare_op(&self, op: CompareOp) -> &'static str;

    /// Native storage type for a column type tag.
    fn column_type(&self, column_type: ColumnType) -> &'static str;

    fn insert(&self, expr: &InsertValues, use_table_alias: bool) -> SqlFragment;

    fn select(&self, expr: &SelectStatement, use_table_alias: bool) -> SqlFragment;

    fn select_clause(&self, expr: &SelectClause, use_table_alias: bool) -> SqlFragment;

    fn comparison(&self, expr: &Comparison, use_table_alias: bool) -> SqlFragment;

    fn logical(&self, expr: &Logical, use_table_alias: bool) -> SqlFragment;

    fn in_list(&self, expr: &InList, use_table_alias: bool) -> SqlFragment;

    fn between(&self, expr: &Between, use_table_alias: bool) -> SqlFragment;

    fn exists(&self, expr: &Exists, use_table_alias: bool) -> SqlFragment;

    fn group(&self, expr: &Group, use_table_alias: bool) -> SqlFragment;

    fn join(&self, expr: &TableJoin, use_table_alias: bool) -> SqlFragment;

    fn order_by(&self, expr: &[OrderBy], use_table_alias: bool) -> SqlFragment;

    fn limit(&self, expr: &Limit) -> SqlFragment;

    fn offset(&self, expr: &Offset) -> SqlFragment;

    fn update(&self, expr: &UpdateStatement, use_table_alias: bool) -> SqlFragment;

    fn set(&self, expr: &SetAssignments, use_table_alias: bool) -> SqlFragment;

    fn delete(&self, expr: &DeleteStatement, use_table_alias: bool) -> SqlFragment;

    fn create_table(&self, expr: &CreateTable) -> SqlFragment;
}
