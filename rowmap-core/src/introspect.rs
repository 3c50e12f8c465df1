use crate::{
    Context, Driver, Executor, OrmError, Result, RowLabeled, SqlWriter, Value,
    stream::TryStreamExt,
};
use std::collections::BTreeMap;

/// What the database currently holds for one table.
///
/// Fetched at each synchronization pass and never cached.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct LiveSchemaSnapshot {
    pub exists: bool,
    /// Column name to database type, as reported by the database.
    pub columns: BTreeMap<String, String>,
    pub primary_key: Option<String>,
}

impl LiveSchemaSnapshot {
    /// Snapshot of a table that does not exist.
    pub fn missing() -> Self {
        Self::default()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }
}

/// Reads table layouts from the information schema of the target database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaIntrospector {
    pub schema: String,
}

impl SchemaIntrospector {
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
        }
    }

    /// Read the live layout of `table`.
    ///
    /// A missing table is not an error, it yields `exists == false`.
    pub async fn snapshot<Exe: Executor>(
        &self,
        executor: &mut Exe,
        table: &str,
    ) -> Result<LiveSchemaSnapshot> {
        let writer = executor.driver().sql_writer();
        let exists = !fetch_all(executor, writer.write_table_exists_query(&self.schema, table))
            .await?
            .is_empty();
        if !exists {
            log::debug!("Table {}.{} does not exist", self.schema, table);
            return Ok(LiveSchemaSnapshot::missing());
        }
        let mut columns = BTreeMap::new();
        for row in fetch_all(executor, writer.write_columns_query(&self.schema, table)).await? {
            let name = text_column(&row, "name")?;
            let db_type = text_column(&row, "db_type")?;
            columns.insert(name, db_type);
        }
        let primary_key = fetch_all(executor, writer.write_primary_key_query(&self.schema, table))
            .await?
            .first()
            .map(|row| text_column(row, "name"))
            .transpose()?;
        Ok(LiveSchemaSnapshot {
            exists,
            columns,
            primary_key,
        })
    }
}

async fn fetch_all<Exe: Executor>(executor: &mut Exe, query: crate::Query) -> Result<Vec<RowLabeled>> {
    let context = format!("While reading the schema with: {}", query);
    executor
        .fetch(query)
        .try_collect::<Vec<_>>()
        .await
        .context(context)
}

/// Information schema labels come back in the case the server chooses.
fn text_column(row: &RowLabeled, label: &str) -> Result<String> {
    let value = row.get_column(label).or_else(|| {
        row.names()
            .iter()
            .position(|v| v.eq_ignore_ascii_case(label))
            .and_then(|i| row.values().get(i))
    });
    match value {
        Some(Value::Text(v)) => Ok(v.clone()),
        Some(v) => Err(OrmError::Connection(format!(
            "the information schema returned {:?} for `{}`",
            v, label
        ))
        .into()),
        None => Err(OrmError::Connection(format!(
            "the information schema did not return the `{}` column",
            label
        ))
        .into()),
    }
}
