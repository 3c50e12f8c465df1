use crate::{
    Catalog, Driver, Error, Executor, OrmError, Result, SchemaIntrospector, SqlWriter,
    TableSynchronizer, synchronizer::execute_ddl,
};
use std::{
    fmt::{self, Display},
    str::FromStr,
};

/// Policy used to bring the live schema in line with the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Drop the whole schema and create every table again. Existing data is lost.
    DropCreate,
    /// Create what is missing and alter the tables that drifted.
    Update,
}

impl Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strategy::DropCreate => "full-rebuild",
            Strategy::Update => "incremental-update",
        })
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full-rebuild" | "dropcreate" | "drop-create" => Ok(Strategy::DropCreate),
            "incremental-update" | "update" => Ok(Strategy::Update),
            _ => Err(OrmError::Configuration(format!(
                "unknown synchronization strategy `{}`, expected `full-rebuild` or `incremental-update`",
                s
            ))
            .into()),
        }
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    #[default]
    NotStarted,
    Running,
    Completed,
    /// The run aborted, the schema may be partially altered.
    Failed,
}

/// A single synchronization pass of a [`Strategy`].
///
/// It can run only once: a failed run is not retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synchronization {
    strategy: Strategy,
    state: SyncState,
}

impl Synchronization {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            state: SyncState::NotStarted,
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub async fn run<Exe: Executor>(
        &mut self,
        executor: &mut Exe,
        schema: &str,
        catalog: &Catalog,
    ) -> Result<()> {
        if self.state != SyncState::NotStarted {
            return Err(OrmError::InvalidState(format!(
                "the {} synchronization already ran (state {:?})",
                self.strategy, self.state
            ))
            .into());
        }
        self.state = SyncState::Running;
        log::info!(
            "Synchronizing schema {} ({} entities) using {}",
            schema,
            catalog.len(),
            self.strategy
        );
        let result = match self.strategy {
            Strategy::DropCreate => drop_create(executor, schema, catalog).await,
            Strategy::Update => update(executor, schema, catalog).await,
        };
        match result {
            Ok(()) => {
                self.state = SyncState::Completed;
                log::info!("Schema {} synchronized", schema);
                Ok(())
            }
            Err(e) => {
                self.state = SyncState::Failed;
                log::error!("Synchronization of schema {} failed: {:#}", schema, e);
                Err(e)
            }
        }
    }
}

async fn drop_create<Exe: Executor>(executor: &mut Exe, schema: &str, catalog: &Catalog) -> Result<()> {
    let writer = executor.driver().sql_writer();
    let mut sql = String::new();
    writer.write_drop_schema(&mut sql, schema);
    log::warn!("Dropping schema {} and all of its data", schema);
    execute_ddl(executor, sql).await?;
    let mut sql = String::new();
    writer.write_create_schema(&mut sql, schema);
    execute_ddl(executor, sql).await?;
    let synchronizer = TableSynchronizer::new(schema);
    for descriptor in catalog.scan() {
        let key = descriptor.primary_key()?;
        synchronizer.create_table(executor, descriptor).await?;
        synchronizer
            .set_primary_key(executor, descriptor.table_name(), key.name())
            .await?;
    }
    Ok(())
}

async fn update<Exe: Executor>(executor: &mut Exe, schema: &str, catalog: &Catalog) -> Result<()> {
    let mut sql = String::new();
    executor
        .driver()
        .sql_writer()
        .write_create_schema(&mut sql, schema);
    execute_ddl(executor, sql).await?;
    let introspector = SchemaIntrospector::new(schema);
    let synchronizer = TableSynchronizer::new(schema);
    for descriptor in catalog.scan() {
        let table = descriptor.table_name();
        let key = descriptor.primary_key()?;
        let snapshot = introspector.snapshot(executor, table).await?;
        if !snapshot.exists {
            synchronizer.create_table(executor, descriptor).await?;
            synchronizer.set_primary_key(executor, table, key.name()).await?;
            continue;
        }
        if let Some(live_key) = &snapshot.primary_key {
            synchronizer.drop_primary_key(executor, table, live_key).await?;
        }
        let changes = synchronizer
            .reconcile_columns(executor, descriptor, &snapshot)
            .await?;
        if changes == 0 {
            log::debug!("Table {}.{} is up to date", schema, table);
        }
        synchronizer.set_primary_key(executor, table, key.name()).await?;
    }
    Ok(())
}
