//! Materialized result rows.

use std::sync::Arc;

use crate::error::{SqlError, SqlResult};
use crate::value::{FromValue, Value};

/// One result row. Column names are shared by every row of a result set.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    pub fn new(columns: Arc<[String]>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw value at a column ordinal or name.
    pub fn value(&self, idx: impl RowIndex) -> SqlResult<&Value> {
        idx.position(self)
            .and_then(|i| self.values.get(i))
            .ok_or_else(|| SqlError::decode(idx.describe(), "no such column"))
    }

    /// Typed value at a column ordinal or name.
    pub fn get<T: FromValue>(&self, idx: impl RowIndex) -> SqlResult<T> {
        let value = self.value(&idx)?;
        T::from_value(value).map_err(|message| SqlError::decode(idx.describe(), message))
    }
}

/// Column lookup by ordinal (`usize`) or name (`&str`).
///
/// Names match exactly first, then ASCII case-insensitively.
pub trait RowIndex {
    fn position(&self, row: &Row) -> Option<usize>;

    fn describe(&self) -> String;
}

impl RowIndex for usize {
    fn position(&self, row: &Row) -> Option<usize> {
        (*self < row.values.len()).then_some(*self)
    }

    fn describe(&self) -> String {
        format!("#{self}")
    }
}

impl RowIndex for str {
    fn position(&self, row: &Row) -> Option<usize> {
        row.columns
            .iter()
            .position(|c| c == self)
            .or_else(|| row.columns.iter().position(|c| c.eq_ignore_ascii_case(self)))
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

impl<T: RowIndex + ?Sized> RowIndex for &T {
    fn position(&self, row: &Row) -> Option<usize> {
        (**self).position(row)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Map a row to a value.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> SqlResult<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> Row {
        let columns: Arc<[String]> = vec!["id".to_string(), "Name".to_string()].into();
        Row::new(columns, vec![Value::Long(7), Value::Text("Merlin".into())])
    }

    #[test]
    fn get_by_ordinal_and_name() {
        let row = row();
        assert_eq!(row.get::<i64>(0).unwrap(), 7);
        assert_eq!(row.get::<i32>("id").unwrap(), 7);
        assert_eq!(row.get::<String>("name").unwrap(), "Merlin");
    }

    #[test]
    fn missing_column_is_decode_error() {
        let row = row();
        let err = row.get::<i64>("level").unwrap_err();
        assert!(matches!(err, SqlError::Decode { ref column, .. } if column == "level"));
        assert!(row.get::<i64>(5).is_err());
    }

    #[test]
    fn type_mismatch_is_decode_error() {
        let err = row().get::<i64>("name").unwrap_err();
        assert!(matches!(err, SqlError::Decode { .. }));
    }
}
