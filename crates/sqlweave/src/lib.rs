//! # sqlweave
//!
//! A typed SQL expression builder.
//!
//! ## Features
//!
//! - **Typed schema**: tables own `Column<T>` declarations; binding a wrong value type
//!   to a column is a compile error
//! - **Expression tree**: builders assemble immutable nodes, a dialect renders them
//! - **Parameterized output**: every builder renders to a [`Query`] of SQL text plus
//!   ordered arguments, one per `?`
//! - **Optional filters**: `nullable` blocks skip predicates whose value is `None`
//! - **Fail fast**: invalid builder usage is reported at the offending call
//! - **Pre-write checks**: uniqueness and reference checks run before INSERT/UPDATE
//! - **SQLite executor**: blocking client over `rusqlite` (feature `sqlite`, default)
//!
//! ## Query Builder (qb)
//!
//! ```ignore
//! use sqlweave::{qb, SqlQb, Table};
//!
//! let mut wizards = Table::new("wizards");
//! let id = wizards.integer("id");
//! let name = wizards.text("name");
//! let level = wizards.integer("level");
//! wizards.set_primary_key(&id)?;
//!
//! let query = qb::select(&wizards)
//!     .select(&[&name, &level])?
//!     .where_(|w| {
//!         w.gte(&level, 10);
//!         w.nullable(|n| {
//!             n.like_contains(&name, search.as_deref());
//!         });
//!     })?
//!     .sql_args()?;
//! // SELECT w.name, w.level FROM wizards w WHERE w.level >= ? ...
//! ```

pub mod error;
pub mod exec;
pub mod expr;
pub mod filter;
pub mod qb;
pub mod query;
pub mod render;
pub mod schema;
pub mod value;

pub use error::{SqlError, SqlResult};
pub use exec::{ExecConfig, Executor, FromRow, Row, RowIndex};
pub use expr::{JoinKind, Order, SqlFragment, Statement};
pub use filter::{FilterCheck, FilterResult, InsertFilter, UpdateFilter};
pub use query::Query;
pub use render::{Renderer, SqliteDialect};
pub use schema::{AnyColumn, AsColumn, Column, ColumnType, Table, TableBuilder, TableInfo};
pub use value::{Bind, ColumnValue, FromValue, Value};

// Re-export qb module for easy access
pub use qb::{
    Assignments, Delete, Insert, Join, JoinContext, NullableWhere, Select, SqlQb, Update, Where,
    delete, insert, select, update,
};

#[cfg(feature = "sqlite")]
pub use exec::{SqliteClient, SqliteTransaction};

/// Re-export rusqlite for callers that need the raw connection.
#[cfg(feature = "sqlite")]
pub use rusqlite;
