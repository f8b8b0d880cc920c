//! Import spreadsheet workbooks as typed, linked entities
//!
//! Each data sheet's rows are mapped to entities of the type named by the
//! sheet, relationship columns are resolved against a [`DataLookup`], and
//! the leading `MAC` sheet grants per-role access rights.

pub mod config;
pub mod import;

pub use config::ImportConfig;
pub use import::{
    DataLookup, Entity, ImportError, ImportResult, ImportSummary, MemoryLookup, Relation, Rights,
    Row, TypeSchema, WorkbookImporter, import_single_sheet, import_workbook,
};
