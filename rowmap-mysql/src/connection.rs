use crate::{MySQLDriver, RowWrap, ValueWrap};
use async_stream::try_stream;
use mysql_async::{Conn, Opts, OptsBuilder, Params, prelude::Queryable};
use rowmap_core::{
    Connection, Context, Driver, Error, Executor, OrmError, Query, QueryResult, Result, RowsAffected,
    stream::{Stream, StreamExt, TryStreamExt},
    truncate_long,
};
use std::{borrow::Cow, sync::Arc};
use url::Url;

pub struct MySQLConnection {
    pub(crate) connection: Conn,
}

/// Server side rejections are statement failures, everything else is a connection failure.
fn classify(sql: &str, error: mysql_async::Error) -> Error {
    match error {
        mysql_async::Error::Server(e) => OrmError::sql(sql, e).into(),
        e => OrmError::Connection(e.to_string()).into(),
    }
}

impl Executor for MySQLConnection {
    type Driver = MySQLDriver;

    fn driver(&self) -> &Self::Driver {
        &MySQLDriver {}
    }

    fn run(&mut self, query: Query) -> impl Stream<Item = Result<QueryResult>> + Send {
        log::debug!("{}", query);
        let context = Arc::new(format!("While running the query: {}", query));
        let Query { sql, params } = query;
        try_stream! {
            if params.is_empty() {
                let mut result = self
                    .connection
                    .query_iter(sql.as_str())
                    .await
                    .map_err(|e| classify(&sql, e))?;
                let mut rows = 0;
                while let Some(mut stream) = result
                    .stream::<RowWrap>()
                    .await
                    .map_err(|e| classify(&sql, e))?
                {
                    while let Some(row) = stream.next().await.transpose().map_err(|e| classify(&sql, e))? {
                        rows += 1;
                        yield QueryResult::Row(row.0)
                    }
                }
                if rows == 0 {
                    yield QueryResult::Affected(RowsAffected {
                        rows_affected: result.affected_rows(),
                        last_affected_id: result.last_insert_id().map(|v| v as _),
                    });
                }
            } else {
                let params = params
                    .into_iter()
                    .map(|v| mysql_async::Value::try_from(ValueWrap(v)))
                    .collect::<Result<Vec<_>>>()?;
                let mut result = self
                    .connection
                    .exec_iter(sql.as_str(), Params::Positional(params))
                    .await
                    .map_err(|e| classify(&sql, e))?;
                let mut rows = 0;
                while let Some(mut stream) = result
                    .stream::<RowWrap>()
                    .await
                    .map_err(|e| classify(&sql, e))?
                {
                    while let Some(row) = stream.next().await.transpose().map_err(|e| classify(&sql, e))? {
                        rows += 1;
                        yield QueryResult::Row(row.0)
                    }
                }
                if rows == 0 {
                    yield QueryResult::Affected(RowsAffected {
                        rows_affected: result.affected_rows(),
                        last_affected_id: result.last_insert_id().map(|v| v as _),
                    });
                }
            }
        }
        .map_err(move |e: Error| {
            let error = e.context(context.clone());
            log::error!("{:#}", error);
            error
        })
    }
}

impl Connection for MySQLConnection {
    async fn connect(url: Cow<'static, str>) -> Result<MySQLConnection> {
        let context = || format!("While trying to connect to `{}`", truncate_long!(url));
        let prefix = format!("{}://", <Self::Driver as Driver>::NAME);
        if !url.starts_with(&prefix) {
            let error = Error::from(OrmError::Connection(format!(
                "MySQL connection url must start with `{}`",
                &prefix
            )))
            .context(context());
            log::error!("{:#}", error);
            return Err(error);
        }
        let url = Url::parse(&url)
            .map_err(|e| OrmError::Connection(e.to_string()))
            .with_context(context)?;
        let config = Opts::from_url(url.as_str())
            .map_err(|e| OrmError::Connection(e.to_string()))
            .with_context(context)?;
        // Matched rather than changed rows, an UPDATE writing the same values still succeeds
        let config = OptsBuilder::from_opts(config).client_found_rows(true);
        let connection = Conn::new(config)
            .await
            .map_err(|e| OrmError::Connection(e.to_string()))
            .with_context(context)?;
        Ok(MySQLConnection { connection })
    }

    async fn disconnect(self) -> Result<()> {
        self.connection
            .disconnect()
            .await
            .map_err(|e| OrmError::Connection(e.to_string()).into())
    }
}
