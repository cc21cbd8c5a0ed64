//! Error types for sqlweave

use thiserror::Error;

/// Result type alias for sqlweave operations
pub type SqlResult<T> = Result<T, SqlError>;

/// Errors raised while declaring schemas, building queries, or executing them.
#[derive(Debug, Error)]
pub enum SqlError {
    /// Invalid builder usage (empty column list, bad limit/offset, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// INSERT with no non-null assignments
    #[error("No columns specified for insert")]
    EmptyInsert,

    /// UPDATE with no assignments
    #[error("No columns specified for update")]
    EmptyUpdate,

    /// Strict IN / NOT IN with an empty value list
    #[error("IN list for column '{column}' can not be empty")]
    EmptyInList { column: String },

    /// An operation required a primary key the table does not declare
    #[error("Table '{table}' has no primary key")]
    MissingPrimaryKey { table: String },

    /// A join block without a `left <kind> right` pairing
    #[error("Join condition is missing")]
    MissingJoinCondition,

    /// Column declared with a type the schema model cannot map
    #[error("Unsupported column type: {0}")]
    UnsupportedType(String),

    /// Driver error
    #[cfg(feature = "sqlite")]
    #[error("Query error: {0}")]
    Query(#[from] rusqlite::Error),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique constraint violation
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation
    #[error("Check constraint violation: {0}")]
    CheckViolation(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// A pre-write filter check did not pass
    #[error("Filter rejected: {message}")]
    FilterRejected {
        field: Option<String>,
        message: String,
    },

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl SqlError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub(crate) fn missing_primary_key(table: impl Into<String>) -> Self {
        Self::MissingPrimaryKey {
            table: table.into(),
        }
    }

    /// Check if this is a unique violation error
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation(_))
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if a pre-write filter check rejected the operation.
    ///
    /// Lets callers tell precondition failures apart from persistence failures.
    pub fn is_filter_rejection(&self) -> bool {
        matches!(self, Self::FilterRejected { .. })
    }

    /// Map a rusqlite error into a more specific SqlError using SQLite's
    /// extended result codes.
    #[cfg(feature = "sqlite")]
    pub fn from_db_error(err: rusqlite::Error) -> Self {
        use rusqlite::ffi;

        if let rusqlite::Error::SqliteFailure(ffi_err, message) = &err {
            let message = message.clone().unwrap_or_else(|| ffi_err.to_string());
            match ffi_err.extended_code {
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                    return Self::UniqueViolation(message);
                }
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => return Self::ForeignKeyViolation(message),
                ffi::SQLITE_CONSTRAINT_CHECK => return Self::CheckViolation(message),
                _ => {}
            }
        }
        Self::Query(err)
    }
}
