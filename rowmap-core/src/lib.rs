mod catalog;
mod config;
mod connection;
mod decode_type;
mod descriptor;
mod driver;
mod entity;
mod error;
mod executor;
mod introspect;
mod query;
mod session;
mod sql_writer;
mod strategy;
mod synchronizer;
mod util;
mod value;

pub use ::anyhow::Context;
pub use catalog::*;
pub use config::*;
pub use connection::*;
pub use decode_type::*;
pub use descriptor::*;
pub use driver::*;
pub use entity::*;
pub use error::*;
pub use executor::*;
pub use introspect::*;
pub use query::*;
pub use session::*;
pub use sql_writer::*;
pub use strategy::*;
pub use synchronizer::*;
pub use util::*;
pub use value::*;
pub mod stream {
    pub use ::futures::stream::*;
}
pub use ::futures::future;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
