//! Spreadsheet to entity import
//!
//! Rows become typed entities through a schema served by a
//! [`DataLookup`]; relationship columns are resolved to the entities they
//! reference, and the `MAC` control sheet is turned into rights grants.

pub mod builder;
pub mod concurrency;
pub mod excel;
pub mod lookup;
pub mod mac;
pub mod sheet;
pub mod transform;
pub mod types;
pub mod workbook;

pub use builder::{build_entity, prepare_entity};
pub use concurrency::{RowLimiter, RowLimiterStats};
pub use excel::{read_workbook, read_workbook_file};
pub use lookup::{DataLookup, MemoryLookup, SchemaCatalog, StoreSnapshot, StoredEntity};
pub use mac::{MacGrant, MacTarget, store_mac_row, store_mac_sheet, translate_mac_row};
pub use sheet::map_sheet;
pub use transform::{ColumnPath, property_path};
pub use types::*;
pub use workbook::{
    ImportSummary, SheetSummary, WorkbookImporter, import_single_sheet, import_workbook,
};
