mod entities;
mod lifecycle;
mod recorder;

pub use entities::*;
pub use recorder::*;

use crate::lifecycle::lifecycle;
use log::LevelFilter;
use rowmap::Connection;
use std::env;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Run the driver-agnostic scenarios against a live database, `schema` is dropped and recreated.
pub async fn execute_tests<C: Connection>(connection: C, schema: &str) -> C {
    lifecycle(connection, schema).await
}
