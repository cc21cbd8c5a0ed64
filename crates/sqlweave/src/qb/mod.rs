//! Query builders.
//!
//! Builders accumulate state through consuming, chainable calls, assemble an
//! expression tree and render it with the table's dialect. Preconditions are
//! checked at the call that violates them; the ones that need the whole builder
//! (an INSERT or UPDATE with nothing to set) are checked by `sql_args`.
//!
//! # Usage
//!
//! ```ignore
//! use sqlweave::qb;
//! use sqlweave::SqlQb;
//!
//! // SELECT
//! let query = qb::select(&wizards.table)
//!     .select(&[&wizards.name, &wizards.level])?
//!     .where_(|w| {
//!         w.gte(&wizards.level, 10);
//!     })?
//!     .order_by_desc(&wizards.level)
//!     .paginate(2, 10)?
//!     .sql_args()?;
//!
//! // INSERT
//! let id = qb::insert(&wizards.table)
//!     .insert(|a| {
//!         a.set(&wizards.name, "Merlin");
//!         a.set(&wizards.level, 99);
//!     })
//!     .persist(&client)?;
//!
//! // UPDATE
//! qb::update(&wizards.table)
//!     .update_primary(id, |a| {
//!         a.set(&wizards.level, 100);
//!     })?
//!     .persist(&client)?;
//!
//! // DELETE
//! qb::delete(&wizards.table).delete_primary(id)?.persist(&client)?;
//! ```

mod delete;
mod insert;
mod join;
mod select;
mod traits;
mod update;
mod where_clause;

pub use delete::Delete;
pub use insert::{Assignments, Insert};
pub use join::{Join, JoinContext};
pub use select::Select;
pub use traits::SqlQb;
pub use update::Update;
pub use where_clause::{NullableWhere, Where};

use crate::schema::Table;

/// Create a SELECT query builder for the given table.
pub fn select(table: &Table) -> Select {
    Select::new(table)
}

/// Create an INSERT query builder for the given table.
pub fn insert(table: &Table) -> Insert {
    Insert::new(table)
}

/// Create an UPDATE query builder for the given table.
pub fn update(table: &Table) -> Update {
    Update::new(table)
}

/// Create a DELETE query builder for the given table.
pub fn delete(table: &Table) -> Delete {
    Delete::new(table)
}

#[cfg(test)]
mod tests;
