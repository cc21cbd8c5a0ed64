//! The rendered, immutable output of every builder.

use std::fmt;

use serde::Serialize;

use crate::expr::SqlFragment;
use crate::value::Value;

/// SQL text with `?` placeholders and one argument per placeholder, in order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Query {
    pub sql: String,
    pub args: Vec<Value>,
}

impl Query {
    pub fn new(sql: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            args,
        }
    }

    /// Number of `?` markers outside single-quoted string literals.
    pub fn placeholder_count(&self) -> usize {
        let mut in_literal = false;
        let mut count = 0;
        for ch in self.sql.chars() {
            match ch {
                '\'' => in_literal = !in_literal,
                '?' if !in_literal => count += 1,
                _ => {}
            }
        }
        count
    }
}

impl From<SqlFragment> for Query {
    fn from(fragment: SqlFragment) -> Self {
        Self {
            sql: fragment.sql,
            args: fragment.args,
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -- {} arg(s)", self.sql, self.args.len())
    }
}
