use crate::{Executor, Result};
use std::{borrow::Cow, future::Future};

pub trait Connection: Executor + Sized {
    /// Open one connection to the database at `url`.
    fn connect(url: Cow<'static, str>) -> impl Future<Output = Result<Self>> + Send;

    /// Close the connection, reporting any error raised while doing so.
    fn disconnect(self) -> impl Future<Output = Result<()>> + Send {
        async move {
            drop(self);
            Ok(())
        }
    }
}
