use crate::SqlWriter;

/// A database backend: its name and the SQL dialect it speaks.
pub trait Driver: Send + Sync {
    type SqlWriter: SqlWriter + Send + Sync;

    const NAME: &'static str;

    fn sql_writer(&self) -> Self::SqlWriter;
}
