mod context;
mod mutation;
mod select;
mod sql_writer;

pub use context::*;
pub use mutation::*;
pub use select::*;
pub use sql_writer::*;
