use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::SqlError;
use crate::schema::TableInfo;
use crate::value::ColumnValue;

/// Semantic type tag recorded on every column.
///
/// The tag only drives native type mapping (`CREATE TABLE`); expression nodes carry
/// values untyped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    String,
    Int,
    Long,
    Float,
    Double,
    Decimal,
    Boolean,
    /// Dates stored as ISO-8601 text.
    DateText,
    /// Dates stored as epoch milliseconds.
    DateTimestamp,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::String => "STRING",
            ColumnType::Int => "INT",
            ColumnType::Long => "LONG",
            ColumnType::Float => "FLOAT",
            ColumnType::Double => "DOUBLE",
            ColumnType::Decimal => "DECIMAL",
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::DateText => "DATE_TEXT",
            ColumnType::DateTimestamp => "DATE_TIMESTAMP",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses tag names as well as the common SQL spellings (`TEXT`, `BIGINT`, `REAL`, ...).
impl FromStr for ColumnType {
    type Err = SqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ty = match s.trim().to_ascii_uppercase().as_str() {
            "STRING" | "TEXT" | "VARCHAR" | "CHAR" => ColumnType::String,
            "INT" | "INTEGER" | "SMALLINT" => ColumnType::Int,
            "LONG" | "BIGINT" => ColumnType::Long,
            "FLOAT" | "REAL" => ColumnType::Float,
            "DOUBLE" | "DOUBLE PRECISION" => ColumnType::Double,
            "DECIMAL" | "NUMERIC" => ColumnType::Decimal,
            "BOOLEAN" | "BOOL" => ColumnType::Boolean,
            "DATE_TEXT" | "DATE" | "DATETIME" => ColumnType::DateText,
            "DATE_TIMESTAMP" | "TIMESTAMP" => ColumnType::DateTimestamp,
            _ => return Err(SqlError::UnsupportedType(s.to_string())),
        };
        Ok(ty)
    }
}

/// An untyped column reference as stored in expression nodes.
///
/// Two columns are equal when they share the owning table name and physical key.
#[derive(Clone)]
pub struct AnyColumn {
    key: String,
    column_type: ColumnType,
    table: Arc<TableInfo>,
}

impl AnyColumn {
    pub(crate) fn new(key: String, column_type: ColumnType, table: Arc<TableInfo>) -> Self {
        Self {
            key,
            column_type,
            table,
        }
    }

    /// Physical column name (already prefixed when the table prefixes columns).
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn table(&self) -> &Arc<TableInfo> {
        &self.table
    }

    pub fn table_name(&self) -> &str {
        self.table.name()
    }

    pub fn table_alias(&self) -> &str {
        self.table.alias()
    }
}

impl fmt::Debug for AnyColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}: {}", self.table.name(), self.key, self.column_type)
    }
}

impl PartialEq for AnyColumn {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.table.name() == other.table.name()
    }
}

impl Eq for AnyColumn {}

impl Hash for AnyColumn {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.table.name().hash(state);
        self.key.hash(state);
    }
}

/// A column whose values are `T`.
pub struct Column<T> {
    inner: AnyColumn,
    _marker: PhantomData<fn() -> T>,
}

impl<T: ColumnValue> Column<T> {
    pub(crate) fn from_any(inner: AnyColumn) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        self.inner.key()
    }

    pub fn as_any(&self) -> &AnyColumn {
        &self.inner
    }

    pub fn into_any(self) -> AnyColumn {
        self.inner
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(f)
    }
}

impl<T> PartialEq for Column<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> Eq for Column<T> {}

/// Anything that can be referenced as a column in a column list.
///
/// Lets heterogeneous typed columns share one slice: `&[&id, &name, &level]`.
pub trait AsColumn {
    fn as_column(&self) -> &AnyColumn;
}

impl AsColumn for AnyColumn {
    fn as_column(&self) -> &AnyColumn {
        self
    }
}

impl<T> AsColumn for Column<T> {
    fn as_column(&self) -> &AnyColumn {
        &self.inner
    }
}

impl<T> From<Column<T>> for AnyColumn {
    fn from(column: Column<T>) -> Self {
        column.inner
    }
}
