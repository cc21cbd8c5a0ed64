//! Schema model: tables and the typed columns they own.
//!
//! A [`Table`] is declared once and shared; each [`Column`] keeps a handle to its
//! table's [`TableInfo`] so expression nodes can resolve names and aliases without
//! borrowing the table itself.
//!
//! ```ignore
//! use sqlweave::Table;
//!
//! let mut wizards = Table::new("wizards");
//! let id = wizards.integer("id");
//! let name = wizards.text("name");
//! wizards.set_primary_key(&id)?;
//!
//! assert_eq!(wizards.alias(), "w");
//! ```

mod column;
mod table;

pub use column::{AnyColumn, AsColumn, Column, ColumnType};
pub use table::{Table, TableBuilder, TableInfo};
