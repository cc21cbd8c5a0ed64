//! JOIN resolution.
//!
//! Each [`Join`] block takes exactly one `left <kind> right` pairing. Which side is
//! the newly joined table is decided against the select's home table and the
//! [`JoinContext`] shared by every join of that select:
//!
//! 1. left column on the home table: the right table is joined;
//! 2. right column on the home table: the left table is joined;
//! 3. otherwise the side not yet registered in the context is joined, and when both
//!    or neither are registered the right side wins.
//!
//! The `ON` clause always qualifies each column with its own table's alias, so a
//! chained join can reference a table aliased by an earlier join.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{SqlError, SqlResult};
use crate::expr::{JoinCondition, JoinKind, TableJoin};
use crate::schema::{AnyColumn, AsColumn, TableInfo};

/// Aliases of the tables joined so far by one select.
#[derive(Debug, Clone, Default)]
pub struct JoinContext {
    aliases: HashMap<String, String>,
}

impl JoinContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `table` once and return its alias.
    pub fn add_table(&mut self, table: &TableInfo) -> &str {
        self.aliases
            .entry(table.name().to_string())
            .or_insert_with(|| table.alias().to_string())
    }

    pub fn table_alias(&self, table_name: &str) -> Option<&str> {
        self.aliases.get(table_name).map(String::as_str)
    }

    pub fn contains(&self, table_name: &str) -> bool {
        self.aliases.contains_key(table_name)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

/// One join block.
#[derive(Debug)]
pub struct Join<'a> {
    home: &'a TableInfo,
    context: &'a mut JoinContext,
    pairing: Option<(JoinKind, AnyColumn, AnyColumn)>,
    error: Option<SqlError>,
}

impl<'a> Join<'a> {
    pub fn new(home: &'a TableInfo, context: &'a mut JoinContext) -> Self {
        Self {
            home,
            context,
            pairing: None,
            error: None,
        }
    }

    fn pair(&mut self, kind: JoinKind, left: &dyn AsColumn, right: &dyn AsColumn) -> &mut Self {
        if self.pairing.is_some() {
            self.error.get_or_insert_with(|| {
                SqlError::validation("a join block accepts exactly one join condition")
            });
        } else {
            self.pairing = Some((
                kind,
                left.as_column().clone(),
                right.as_column().clone(),
            ));
        }
        self
    }

    /// LEFT JOIN ... ON left = right
    pub fn left(&mut self, left: &dyn AsColumn, right: &dyn AsColumn) -> &mut Self {
        self.pair(JoinKind::Left, left, right)
    }

    /// RIGHT JOIN ... ON left = right
    pub fn right(&mut self, left: &dyn AsColumn, right: &dyn AsColumn) -> &mut Self {
        self.pair(JoinKind::Right, left, right)
    }

    /// INNER JOIN ... ON left = right
    pub fn inner(&mut self, left: &dyn AsColumn, right: &dyn AsColumn) -> &mut Self {
        self.pair(JoinKind::Inner, left, right)
    }

    /// OUTER JOIN ... ON left = right
    pub fn outer(&mut self, left: &dyn AsColumn, right: &dyn AsColumn) -> &mut Self {
        self.pair(JoinKind::Outer, left, right)
    }

    /// FULL JOIN ... ON left = right
    pub fn full(&mut self, left: &dyn AsColumn, right: &dyn AsColumn) -> &mut Self {
        self.pair(JoinKind::Full, left, right)
    }

    fn joined_table(&self, left: &AnyColumn, right: &AnyColumn) -> Arc<TableInfo> {
        let home = self.home.name();
        let side = if left.table_name() == home {
            right
        } else if right.table_name() == home {
            left
        } else if !self.context.contains(left.table_name()) && self.context.contains(right.table_name()) {
            left
        } else {
            right
        };
        Arc::clone(side.table())
    }

    /// Resolve the joined table, register its alias, and produce the node.
    pub fn build(mut self) -> SqlResult<TableJoin> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        let (kind, left, right) = self.pairing.take().ok_or(SqlError::MissingJoinCondition)?;
        let table = self.joined_table(&left, &right);
        let alias = self.context.add_table(&table).to_string();
        Ok(TableJoin {
            table,
            alias: Some(alias),
            kind,
            condition: JoinCondition { left, right },
        })
    }
}
