mod as_value;
mod dao;
mod decode_type;
mod entity;
mod error;
mod executor;
pub mod expression;
mod metadata;
mod naming;
mod query;
mod row_mapper;
mod util;
mod value;
mod writer;

pub use as_value::*;
pub use dao::*;
pub use decode_type::*;
pub use entity::*;
pub use error::*;
pub use executor::*;
pub use metadata::*;
pub use naming::*;
pub use query::*;
pub use row_mapper::*;
pub use util::*;
pub use value::*;
pub use writer::*;
