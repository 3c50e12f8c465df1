mod connection;
mod driver;
mod row_wrap;
mod sql_writer;
mod value_wrap;

pub use connection::*;
pub use driver::*;
pub(crate) use row_wrap::*;
pub use sql_writer::*;
pub(crate) use value_wrap::*;
