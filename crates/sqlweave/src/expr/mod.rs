//! Expression tree.
//!
//! A closed set of immutable node types. Nodes never produce SQL themselves: each
//! node's `render` dispatches to the matching [`Renderer`](crate::render::Renderer)
//! method, so a new dialect only has to implement that trait.

mod predicate;
mod statement;

pub use predicate::{Between, CompareOp, Comparison, Exists, Group, InList, Logical, LogicalOp, Predicate};
pub use statement::{
    Assignment, CreateTable, DeleteStatement, InsertValues, JoinCondition, JoinKind, Limit, Offset,
    Order, OrderBy, SelectClause, SelectStatement, SetAssignments, Statement, TableJoin,
    UpdateStatement,
};

use crate::value::Value;

/// A partial render result: SQL text plus the arguments for its `?` markers, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlFragment {
    pub sql: String,
    pub args: Vec<Value>,
}

impl SqlFragment {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(sql: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            args,
        }
    }

    /// Append raw SQL text.
    pub fn push_str(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql);
        self
    }

    /// Append another fragment, keeping argument order aligned with the text.
    pub fn push(&mut self, other: SqlFragment) -> &mut Self {
        self.sql.push_str(&other.sql);
        self.args.extend(other.args);
        self
    }
}
