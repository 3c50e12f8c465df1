use std::fmt::Display;
use thiserror::Error;

/// Failure taxonomy carried inside [`crate::Error`].
///
/// Every fallible operation returns an `anyhow` error; the typed cause can be
/// recovered with `error.downcast_ref::<OrmError>()` even after context was
/// attached to it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrmError {
    /// Invalid session configuration or use of an entity that was never registered.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed entity declaration found while building the catalog.
    #[error("Entity `{entity}` cannot be registered: {reason}")]
    Catalog { entity: String, reason: String },

    /// A column declares a value kind outside Integer, Text and Timestamp.
    #[error("Column `{column}` has unsupported type `{type_name}`")]
    UnsupportedType { column: String, type_name: String },

    /// Transport or authentication failure.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The database rejected a statement.
    #[error("{reason}\nWhile executing: {sql}")]
    SqlExecution { sql: String, reason: String },

    /// The record has no primary key value assigned yet.
    #[error("Record of table `{table}` has no value for the primary key `{column}`")]
    MissingKey { table: String, column: String },

    /// Reading or writing a record field failed.
    #[error("Cannot access column `{column}` of table `{table}`: {reason}")]
    Access {
        table: String,
        column: String,
        reason: String,
    },

    /// An operation was attempted in a state that does not allow it.
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl OrmError {
    pub fn access(table: impl Into<String>, column: impl Into<String>, reason: impl Display) -> Self {
        Self::Access {
            table: table.into(),
            column: column.into(),
            reason: reason.to_string(),
        }
    }

    pub fn catalog(entity: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Catalog {
            entity: entity.into(),
            reason: reason.into(),
        }
    }

    pub fn sql(sql: impl AsRef<str>, reason: impl Display) -> Self {
        let sql = sql.as_ref();
        Self::SqlExecution {
            sql: crate::truncate_long!(sql),
            reason: reason.to_string(),
        }
    }
}
