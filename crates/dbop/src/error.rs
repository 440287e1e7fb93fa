//! Error types for dbop

use thiserror::Error;

/// Result type alias for dbop operations
pub type DbopResult<T> = Result<T, DbopError>;

/// Error types for table handles, statement building and execution
#[derive(Debug, Error)]
pub enum DbopError {
    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Configuration could not be loaded or is invalid
    #[error("Config error: {0}")]
    Config(String),

    /// Malformed table metadata
    #[error("Validation error: {0}")]
    Validation(String),

    /// The handle has no table metadata (never initialized or reset)
    #[error("Table handle is not initialized")]
    NotInitialized,

    /// A field name that the table does not declare
    #[error("Unknown field '{0}'")]
    UnknownField(String),

    /// Identity operation on a table declared without a `recid` column
    #[error("Table '{0}' has no recid column")]
    NoIdentity(String),

    /// INSERT or UPDATE without any field set
    #[error("No fields set: {0}")]
    NoFieldsSet(String),

    /// A statement that requires a WHERE clause has no condition
    #[error("Missing WHERE clause: {0}")]
    MissingWhere(String),

    /// A `recid` supplied for a table whose database assigns it
    #[error("recid of '{0}' is assigned by the database and cannot be set for insert")]
    IdentityAssigned(String),

    /// Identity addressed operation with a zero recid
    #[error("No row addressed: recid is 0")]
    NoRowAddressed,

    /// Operation that needs a previously selected row
    #[error("No record has been selected: {0}")]
    NotSelected(String),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Returned row width does not match the table layout
    #[error("Row shape mismatch: expected {expected} columns, got {got}")]
    RowShape { expected: usize, got: usize },

    /// A statement touched an unexpected number of rows
    #[error("Expected {expected} affected row(s), got {got}: {sql}")]
    RowsAffected { expected: u64, got: u64, sql: String },

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },
}

impl DbopError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a missing WHERE error
    pub fn missing_where(message: impl Into<String>) -> Self {
        Self::MissingWhere(message.into())
    }

    /// Create a no fields set error
    pub fn no_fields_set(message: impl Into<String>) -> Self {
        Self::NoFieldsSet(message.into())
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is a missing WHERE error
    pub fn is_missing_where(&self) -> bool {
        matches!(self, Self::MissingWhere(_))
    }

    /// Check if this is a no fields set error
    pub fn is_no_fields_set(&self) -> bool {
        matches!(self, Self::NoFieldsSet(_))
    }

    /// Whether the error was raised before anything reached the database.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::NotInitialized
                | Self::UnknownField(_)
                | Self::NoIdentity(_)
                | Self::NoFieldsSet(_)
                | Self::IdentityAssigned(_)
                | Self::MissingWhere(_)
                | Self::NoRowAddressed
                | Self::NotSelected(_)
        )
    }

    /// Map a tokio_postgres error onto the connection/query split
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if err.is_closed() {
            return Self::Connection(err.to_string());
        }
        Self::Query(err)
    }
}
