use crate::{
    ColumnDescriptor, Context, Driver, EntityDescriptor, Executor, LiveSchemaSnapshot, Query,
    Result, SqlWriter,
};

/// One column alteration planned by [`TableSynchronizer::plan_reconciliation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnChange<'a> {
    Add(&'a ColumnDescriptor),
    Drop(String),
}

/// Emits the DDL bringing a live table in line with its descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSynchronizer {
    pub schema: String,
}

impl TableSynchronizer {
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
        }
    }

    pub async fn create_table<Exe: Executor>(
        &self,
        executor: &mut Exe,
        descriptor: &EntityDescriptor,
    ) -> Result<()> {
        let mut sql = String::new();
        executor
            .driver()
            .sql_writer()
            .write_create_table(&mut sql, &self.schema, descriptor);
        execute_ddl(executor, sql).await?;
        log::info!("Created table {}.{}", self.schema, descriptor.table_name());
        Ok(())
    }

    pub async fn set_primary_key<Exe: Executor>(
        &self,
        executor: &mut Exe,
        table: &str,
        column: &str,
    ) -> Result<()> {
        let mut sql = String::new();
        executor
            .driver()
            .sql_writer()
            .write_set_primary_key(&mut sql, &self.schema, table, column);
        execute_ddl(executor, sql).await
    }

    pub async fn drop_primary_key<Exe: Executor>(
        &self,
        executor: &mut Exe,
        table: &str,
        column: &str,
    ) -> Result<()> {
        let mut sql = String::new();
        executor
            .driver()
            .sql_writer()
            .write_drop_primary_key(&mut sql, &self.schema, table, column);
        execute_ddl(executor, sql).await
    }

    /// Columns to add (descriptor order) then columns to drop (ascending name).
    ///
    /// Columns present on both sides are never altered, even when their types differ.
    pub fn plan_reconciliation<'a>(
        descriptor: &'a EntityDescriptor,
        snapshot: &LiveSchemaSnapshot,
    ) -> Vec<ColumnChange<'a>> {
        let added = descriptor
            .columns()
            .iter()
            .filter(|c| !snapshot.has_column(c.name()))
            .map(ColumnChange::Add);
        let dropped = snapshot
            .columns
            .keys()
            .filter(|name| descriptor.column_named(name).is_none())
            .map(|name| ColumnChange::Drop(name.clone()));
        added.chain(dropped).collect()
    }

    /// Add the missing columns and drop the extra ones, returns the number of statements issued.
    pub async fn reconcile_columns<Exe: Executor>(
        &self,
        executor: &mut Exe,
        descriptor: &EntityDescriptor,
        snapshot: &LiveSchemaSnapshot,
    ) -> Result<usize> {
        let changes = Self::plan_reconciliation(descriptor, snapshot);
        let writer = executor.driver().sql_writer();
        let table = descriptor.table_name();
        for change in &changes {
            let mut sql = String::new();
            match change {
                ColumnChange::Add(column) => {
                    writer.write_add_column(&mut sql, &self.schema, table, column);
                    log::info!("Adding column {} to {}.{}", column.name(), self.schema, table);
                }
                ColumnChange::Drop(column) => {
                    writer.write_drop_column(&mut sql, &self.schema, table, column);
                    log::info!("Dropping column {} from {}.{}", column, self.schema, table);
                }
            }
            execute_ddl(executor, sql).await?;
        }
        Ok(changes.len())
    }
}

pub(crate) async fn execute_ddl<Exe: Executor>(executor: &mut Exe, sql: String) -> Result<()> {
    let context = format!("While running the query: {}", crate::truncate_long!(sql));
    executor.execute(Query::raw(sql)).await.context(context)?;
    Ok(())
}
