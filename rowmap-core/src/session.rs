use crate::{
    Catalog, Config, Context, Driver, Entity, EntityDescriptor, Executor, OrmError, Query, Result,
    SqlWriter, Synchronization, Value, stream::TryStreamExt, truncate_long,
};

/// A configured connection through which every CRUD call is issued.
///
/// Opening the session synchronizes the schema first, so no record is read or
/// written before the tables match the catalog.
pub struct Session<Exe: Executor> {
    executor: Exe,
    config: Config,
    catalog: Catalog,
}

impl<Exe: Executor> Session<Exe> {
    /// Validate `config`, run its strategy once over `catalog` and return the ready session.
    pub async fn open(mut executor: Exe, config: Config, catalog: Catalog) -> Result<Self> {
        config.validate()?;
        let mut synchronization = Synchronization::new(config.strategy);
        synchronization
            .run(&mut executor, &config.schema, &catalog)
            .await?;
        Ok(Self {
            executor,
            config,
            catalog,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn executor(&self) -> &Exe {
        &self.executor
    }

    pub fn executor_mut(&mut self) -> &mut Exe {
        &mut self.executor
    }

    /// Give back the connection.
    pub fn into_inner(self) -> Exe {
        self.executor
    }

    fn registered<E: Entity>(&self) -> Result<&'static EntityDescriptor> {
        let descriptor = E::descriptor();
        if !self.catalog.contains_descriptor(descriptor) {
            return Err(OrmError::Configuration(format!(
                "the entity mapped to table `{}` is not registered in the catalog",
                descriptor.table_name()
            ))
            .into());
        }
        Ok(descriptor)
    }

    /// Insert `record` when its key is not assigned yet (NULL or not positive), update it otherwise.
    ///
    /// Returns whether a row was affected. After an insert the generated key is
    /// stored back into the record.
    pub async fn persist<E: Entity>(&mut self, record: &mut E) -> Result<bool> {
        let descriptor = self.registered::<E>()?;
        let key = descriptor.primary_key()?;
        let key_value = record.get(key.name())?;
        let row = descriptor
            .non_key_columns()
            .map(|c| Ok((c.name(), record.get(c.name())?)))
            .collect::<Result<Vec<_>>>()?;
        let writer = self.executor.driver().sql_writer();
        let mut query = Query::default();
        let insert = !is_assigned(&key_value);
        if insert {
            writer.write_insert(
                &mut query,
                &self.config.schema,
                descriptor.table_name(),
                row,
                self.config.insert_mode,
            );
        } else {
            writer.write_update(
                &mut query,
                &self.config.schema,
                descriptor.table_name(),
                row,
                (key.name(), key_value),
            );
        }
        let result = self.execute(query).await?;
        if insert {
            if let Some(id) = result.last_affected_id.filter(|v| *v > 0) {
                record.set(key.name(), Value::Integer(id))?;
            }
        }
        Ok(result.rows_affected > 0)
    }

    /// Every record of the table.
    pub async fn find<E: Entity>(&mut self) -> Result<Vec<E>> {
        self.select(None, None).await
    }

    /// Records matching `predicate`, a raw SQL condition copied verbatim in the `WHERE` clause.
    pub async fn find_where<E: Entity>(&mut self, predicate: &str) -> Result<Vec<E>> {
        self.select(Some(predicate), None).await
    }

    pub async fn find_first<E: Entity>(&mut self) -> Result<Option<E>> {
        Ok(self.select(None, Some(1)).await?.into_iter().next())
    }

    pub async fn find_first_where<E: Entity>(&mut self, predicate: &str) -> Result<Option<E>> {
        Ok(self.select(Some(predicate), Some(1)).await?.into_iter().next())
    }

    /// Delete the row of `record`, its key must be assigned.
    pub async fn delete<E: Entity>(&mut self, record: &E) -> Result<()> {
        let descriptor = self.registered::<E>()?;
        let key = descriptor.primary_key()?;
        let key_value = record.get(key.name())?;
        if !is_assigned(&key_value) {
            return Err(OrmError::MissingKey {
                table: descriptor.table_name().to_string(),
                column: key.name().to_string(),
            }
            .into());
        }
        let mut query = Query::default();
        self.executor.driver().sql_writer().write_delete(
            &mut query,
            &self.config.schema,
            descriptor.table_name(),
            key.name(),
            key_value,
            self.config.insert_mode,
        );
        self.execute(query).await?;
        Ok(())
    }

    async fn select<E: Entity>(
        &mut self,
        predicate: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Vec<E>> {
        let descriptor = self.registered::<E>()?;
        let predicate = predicate.map(str::trim).filter(|v| !v.is_empty());
        let mut sql = String::new();
        self.executor.driver().sql_writer().write_select(
            &mut sql,
            &self.config.schema,
            descriptor.table_name(),
            predicate,
            limit,
        );
        let context = format!("While running the query: {}", truncate_long!(sql));
        let rows = self
            .executor
            .fetch(Query::raw(sql))
            .try_collect::<Vec<_>>()
            .await
            .context(context)?;
        rows.iter().map(E::from_row).collect()
    }

    async fn execute(&mut self, query: Query) -> Result<crate::RowsAffected> {
        let context = format!("While running the query: {}", query);
        self.executor.execute(query).await.context(context)
    }
}

fn is_assigned(key: &Value) -> bool {
    matches!(key, Value::Integer(v) if *v > 0)
}
