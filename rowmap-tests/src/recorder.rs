use rowmap::{
    Driver, Executor, GenericSqlWriter, OrmError, Query, QueryResult, Result, RowLabeled,
    RowsAffected, Value, stream::{self, Stream},
};

/// Canned answer of a [`RecordingExecutor`].
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Rows(Vec<RowLabeled>),
    Affected(RowsAffected),
    /// Fails like a statement rejected by the server.
    Fail(String),
}

impl Reply {
    /// Rows sharing the `labels` columns.
    pub fn rows(labels: &[&str], rows: impl IntoIterator<Item = Vec<Value>>) -> Self {
        let labels: rowmap::RowNames = labels.iter().map(|v| v.to_string()).collect();
        Reply::Rows(
            rows.into_iter()
                .map(|v| RowLabeled::new(labels.clone(), v.into()))
                .collect(),
        )
    }

    pub fn affected(rows_affected: u64, last_affected_id: Option<i64>) -> Self {
        Reply::Affected(RowsAffected {
            rows_affected,
            last_affected_id,
        })
    }
}

#[derive(Debug, Clone)]
struct Rule {
    fragment: String,
    param: Option<Value>,
    reply: Reply,
}

impl Rule {
    fn matches(&self, query: &Query) -> bool {
        query.sql.contains(&self.fragment)
            && self.param.as_ref().is_none_or(|v| query.params.contains(v))
    }
}

#[derive(Default, Debug, Clone, Copy)]
pub struct RecordingDriver;

impl Driver for RecordingDriver {
    type SqlWriter = GenericSqlWriter;

    const NAME: &'static str = "recording";

    fn sql_writer(&self) -> GenericSqlWriter {
        GenericSqlWriter::new()
    }
}

/// Executor double keeping every query it receives.
///
/// Replies are chosen by the most recently added rule whose fragment appears
/// in the SQL text. Without a matching rule a `SELECT` returns no rows and
/// any other statement affects one row.
#[derive(Default, Debug, Clone)]
pub struct RecordingExecutor {
    driver: RecordingDriver,
    queries: Vec<Query>,
    rules: Vec<Rule>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, fragment: impl Into<String>, reply: Reply) -> Self {
        self.reply(fragment, reply);
        self
    }

    /// Like [`RecordingExecutor::on`] restricted to queries binding `param`.
    pub fn on_param(
        mut self,
        fragment: impl Into<String>,
        param: impl Into<Value>,
        reply: Reply,
    ) -> Self {
        self.rules.push(Rule {
            fragment: fragment.into(),
            param: Some(param.into()),
            reply,
        });
        self
    }

    pub fn reply(&mut self, fragment: impl Into<String>, reply: Reply) {
        self.rules.push(Rule {
            fragment: fragment.into(),
            param: None,
            reply,
        });
    }

    /// Make the introspection queries describe an existing `table`.
    pub fn live_table(self, table: &str, columns: &[(&str, &str)], primary_key: Option<&str>) -> Self {
        self.on_param(
            "information_schema.tables",
            table,
            Reply::rows(&["name"], [vec![Value::from(table)]]),
        )
        .on_param(
            "information_schema.columns",
            table,
            Reply::rows(
                &["name", "db_type"],
                columns
                    .iter()
                    .map(|(name, ty)| vec![Value::from(*name), Value::from(*ty)]),
            ),
        )
        .on_param(
            "information_schema.table_constraints",
            table,
            Reply::rows(&["name"], primary_key.map(|v| vec![Value::from(v)])),
        )
    }

    pub fn queries(&self) -> &[Query] {
        &self.queries
    }

    /// SQL text of every query received, in order.
    pub fn statements(&self) -> Vec<&str> {
        self.queries.iter().map(|v| v.sql.as_str()).collect()
    }

    /// Statements that are not reads of the information schema.
    pub fn changes(&self) -> Vec<&str> {
        self.statements()
            .into_iter()
            .filter(|v| !v.contains("information_schema"))
            .collect()
    }

    pub fn clear(&mut self) {
        self.queries.clear();
    }
}

impl Executor for RecordingExecutor {
    type Driver = RecordingDriver;

    fn driver(&self) -> &RecordingDriver {
        &self.driver
    }

    fn run(&mut self, query: Query) -> impl Stream<Item = Result<QueryResult>> + Send {
        log::debug!("Recording: {}", query);
        let reply = self
            .rules
            .iter()
            .rev()
            .find(|v| v.matches(&query))
            .map(|v| v.reply.clone())
            .unwrap_or_else(|| {
                if query.sql.trim_start().starts_with("SELECT") {
                    Reply::Rows(Vec::new())
                } else {
                    Reply::affected(1, None)
                }
            });
        let items: Vec<Result<QueryResult>> = match reply {
            Reply::Rows(rows) => rows.into_iter().map(|v| Ok(v.into())).collect(),
            Reply::Affected(v) => vec![Ok(v.into())],
            Reply::Fail(reason) => vec![Err(OrmError::sql(&query.sql, reason).into())],
        };
        self.queries.push(query);
        stream::iter(items)
    }
}
