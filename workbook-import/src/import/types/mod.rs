//! Core types for workbook imports

mod entity;
mod error;
mod rights;
mod schema;
mod sheet;

pub use entity::*;
pub use error::*;
pub use rights::*;
pub use schema::*;
pub use sheet::*;
