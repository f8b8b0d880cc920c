//! Workbook reading
//!
//! Each sheet's first row is its header; every later row becomes a
//! [`Row`](crate::import::types::Row) keyed by header name.

mod reader;

pub use reader::{read_workbook, read_workbook_file};
