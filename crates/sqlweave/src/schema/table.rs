use std::fmt;
use std::sync::Arc;

use crate::error::{SqlError, SqlResult};
use crate::expr::{CreateTable, Statement};
use crate::query::Query;
use crate::render::{Renderer, SqliteDialect};
use crate::schema::{AnyColumn, AsColumn, Column, ColumnType};
use crate::value::ColumnValue;

/// Shared identity of a table: name, alias and column prefix policy.
///
/// Columns hold this behind an `Arc` so they can resolve their table's
/// name and alias without owning the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    name: String,
    alias: String,
    prefix_columns: bool,
}

impl TableInfo {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configured alias, or the first letter of each `_`-separated word of the name.
    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn prefix_columns(&self) -> bool {
        self.prefix_columns
    }
}

/// `wizard_spells` -> `ws`
fn derive_alias(name: &str) -> String {
    name.split('_')
        .filter_map(|word| word.chars().next())
        .collect()
}

/// A table declaration: ordered columns, optional primary key and the dialect
/// used to render statements against it.
#[derive(Clone)]
pub struct Table {
    info: Arc<TableInfo>,
    columns: Vec<AnyColumn>,
    primary_key: Option<usize>,
    dialect: Arc<dyn Renderer>,
}

impl Table {
    /// Declare a table with a derived alias, no column prefixing and the SQLite dialect.
    pub fn new(name: impl Into<String>) -> Self {
        Self::builder(name).build()
    }

    pub fn builder(name: impl Into<String>) -> TableBuilder {
        TableBuilder {
            name: name.into(),
            alias: None,
            prefix_columns: false,
            dialect: None,
        }
    }

    pub fn name(&self) -> &str {
        self.info.name()
    }

    pub fn alias(&self) -> &str {
        self.info.alias()
    }

    pub fn info(&self) -> &Arc<TableInfo> {
        &self.info
    }

    pub fn dialect(&self) -> &dyn Renderer {
        self.dialect.as_ref()
    }

    /// All columns in declaration order.
    pub fn columns(&self) -> &[AnyColumn] {
        &self.columns
    }

    /// Declaration index of `column`, if it belongs to this table.
    pub fn position(&self, column: &dyn AsColumn) -> Option<usize> {
        let column = column.as_column();
        self.columns.iter().position(|c| c == column)
    }

    fn register(&mut self, key: &str, column_type: ColumnType) -> AnyColumn {
        let key = if self.info.prefix_columns {
            format!("{}_{}", self.info.name, key)
        } else {
            key.to_string()
        };
        let column = AnyColumn::new(key, column_type, Arc::clone(&self.info));
        self.columns.push(column.clone());
        column
    }

    /// Register a column whose type tag is inferred from `T`.
    pub fn column<T: ColumnValue>(&mut self, key: &str) -> Column<T> {
        Column::from_any(self.register(key, T::COLUMN_TYPE))
    }

    /// Register a column from a runtime type name such as `"TEXT"` or `"DATE_TIMESTAMP"`.
    pub fn declare(&mut self, key: &str, type_name: &str) -> SqlResult<AnyColumn> {
        let column_type: ColumnType = type_name.parse()?;
        Ok(self.register(key, column_type))
    }

    pub fn text(&mut self, key: &str) -> Column<String> {
        self.column(key)
    }

    pub fn integer(&mut self, key: &str) -> Column<i32> {
        self.column(key)
    }

    pub fn long(&mut self, key: &str) -> Column<i64> {
        self.column(key)
    }

    pub fn float(&mut self, key: &str) -> Column<f32> {
        self.column(key)
    }

    pub fn double(&mut self, key: &str) -> Column<f64> {
        self.column(key)
    }

    pub fn decimal(&mut self, key: &str) -> Column<rust_decimal::Decimal> {
        self.column(key)
    }

    pub fn boolean(&mut self, key: &str) -> Column<bool> {
        self.column(key)
    }

    /// Epoch-millisecond column carried as `i64`.
    pub fn timestamp(&mut self, key: &str) -> Column<i64> {
        Column::from_any(self.register(key, ColumnType::DateTimestamp))
    }

    /// ISO-8601 text date column carried as `String`.
    pub fn date_text(&mut self, key: &str) -> Column<String> {
        Column::from_any(self.register(key, ColumnType::DateText))
    }

    /// Designate the primary key. A table has at most one.
    pub fn set_primary_key(&mut self, column: &dyn AsColumn) -> SqlResult<()> {
        let index = self.position(column).ok_or_else(|| {
            SqlError::validation(format!(
                "column '{}' does not belong to table '{}'",
                column.as_column().key(),
                self.name()
            ))
        })?;
        match self.primary_key {
            Some(existing) if existing != index => Err(SqlError::validation(format!(
                "table '{}' already has primary key '{}'",
                self.name(),
                self.columns[existing].key()
            ))),
            _ => {
                self.primary_key = Some(index);
                Ok(())
            }
        }
    }

    /// The designated primary key. Never falls back to the first column.
    pub fn primary_key(&self) -> SqlResult<&AnyColumn> {
        self.primary_key
            .and_then(|index| self.columns.get(index))
            .ok_or_else(|| SqlError::missing_primary_key(self.name()))
    }

    /// `CREATE TABLE IF NOT EXISTS` for this declaration.
    pub fn create_table(&self) -> Query {
        let statement = Statement::CreateTable(CreateTable {
            table: Arc::clone(&self.info),
            columns: self.columns.clone(),
            primary_key: self.primary_key().ok().cloned(),
        });
        Query::from(statement.render(self.dialect(), false))
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("name", &self.info.name)
            .field("alias", &self.info.alias)
            .field("columns", &self.columns)
            .field("primary_key", &self.primary_key)
            .finish()
    }
}

/// Builder for [`Table`] configuration.
#[derive(Debug)]
pub struct TableBuilder {
    name: String,
    alias: Option<String>,
    prefix_columns: bool,
    dialect: Option<Arc<dyn Renderer>>,
}

impl TableBuilder {
    /// Override the derived alias.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Physically prefix every column name with `tablename_`.
    pub fn prefix_columns(mut self, enabled: bool) -> Self {
        self.prefix_columns = enabled;
        self
    }

    pub fn dialect(mut self, dialect: Arc<dyn Renderer>) -> Self {
        self.dialect = Some(dialect);
        self
    }

    pub fn build(self) -> Table {
        let alias = self.alias.unwrap_or_else(|| derive_alias(&self.name));
        Table {
            info: Arc::new(TableInfo {
                name: self.name,
                alias,
                prefix_columns: self.prefix_columns,
            }),
            columns: Vec::new(),
            primary_key: None,
            dialect: self
                .dialect
                .unwrap_or_else(|| Arc::new(SqliteDialect::default())),
        }
    }
}
