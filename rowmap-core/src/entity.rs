use crate::{EntityDescriptor, OrmError, Result, RowLabeled, Value};

/// A record type mapped to a table.
///
/// Usually implemented with `#[derive(Entity)]`. The descriptor is built once
/// and shared for the whole process, `get`/`set` give the engine field access
/// by column name.
pub trait Entity: Default + Send + Sync {
    fn descriptor() -> &'static EntityDescriptor;

    /// Read the value of `column`.
    fn get(&self, column: &str) -> Result<Value>;

    /// Store `value` into the field mapped to `column`.
    fn set(&mut self, column: &str, value: Value) -> Result<()>;

    fn table_name() -> &'static str {
        Self::descriptor().table_name()
    }

    fn primary_key_value(&self) -> Result<Value> {
        let key = Self::descriptor().primary_key()?;
        self.get(key.name())
    }

    /// Build a record from a result row, reading each declared column by its semantic type.
    fn from_row(row: &RowLabeled) -> Result<Self> {
        let descriptor = Self::descriptor();
        let mut entity = Self::default();
        for column in descriptor.columns() {
            let Some(value) = row.get_column(column.name()) else {
                return Err(OrmError::access(
                    descriptor.table_name(),
                    column.name(),
                    "the column is missing from the result row",
                )
                .into());
            };
            let value = column
                .semantic_type
                .coerce(value.clone())
                .map_err(|reason| OrmError::access(descriptor.table_name(), column.name(), reason))?;
            entity.set(column.name(), value)?;
        }
        Ok(entity)
    }
}
