//! Workbook orchestration
//!
//! A full import walks the sheets in three phases:
//!
//! 1. `MAC` must be the first sheet; its rows become rights grants.
//! 2. `Role` must be the second sheet.
//! 3. Every sheet from the second on, `Role` included, is mapped as
//!    entities whose type is the sheet name. Sheets run strictly one after
//!    another.
//!
//! Both sheet names are checked before any row is touched.

use super::concurrency::RowLimiter;
use super::excel::read_workbook;
use super::lookup::DataLookup;
use super::mac::store_mac_sheet;
use super::sheet::map_sheet;
use super::types::{ImportError, ImportResult, Workbook};

pub const MAC_SHEET: &str = "MAC";
pub const ROLE_SHEET: &str = "Role";

/// Outcome of one mapped data sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSummary {
    /// Sheet name, also the entity type
    pub name: String,
    pub entities: usize,
}

/// Outcome of a full workbook import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub mac_grants: usize,
    pub sheets: Vec<SheetSummary>,
}

impl ImportSummary {
    pub fn total_entities(&self) -> usize {
        self.sheets.iter().map(|s| s.entities).sum()
    }
}

/// Runs imports with a shared row limiter
#[derive(Debug, Clone, Default)]
pub struct WorkbookImporter {
    limiter: RowLimiter,
}

impl WorkbookImporter {
    /// `max_concurrent_rows` of 0 leaves row dispatch unbounded
    pub fn new(max_concurrent_rows: usize) -> Self {
        WorkbookImporter {
            limiter: RowLimiter::new(max_concurrent_rows),
        }
    }

    pub fn limiter(&self) -> &RowLimiter {
        &self.limiter
    }

    /// Import XLSX bytes: control sheets first, then every data sheet
    pub async fn import_workbook(
        &self,
        data: &[u8],
        lookup: &dyn DataLookup,
    ) -> ImportResult<ImportSummary> {
        let workbook = decode(data)?;
        self.import_sheets(&workbook, lookup).await
    }

    /// Import the first populated sheet of XLSX bytes as `type_name`,
    /// returning the columns of its first row
    pub async fn import_single_sheet(
        &self,
        data: &[u8],
        type_name: &str,
        lookup: &dyn DataLookup,
    ) -> ImportResult<Vec<String>> {
        let workbook = decode(data)?;
        self.import_first_sheet_as(&workbook, type_name, lookup).await
    }

    /// Full import of an already parsed workbook
    pub async fn import_sheets(
        &self,
        workbook: &Workbook,
        lookup: &dyn DataLookup,
    ) -> ImportResult<ImportSummary> {
        check_sheet_order(workbook)?;

        let mut summary = ImportSummary {
            mac_grants: store_mac_sheet(lookup, &workbook.sheets[0].rows).await?,
            sheets: Vec::with_capacity(workbook.sheets.len() - 1),
        };

        for sheet in &workbook.sheets[1..] {
            log::info!("Importing sheet '{}'", sheet.name);
            let entities = map_sheet(&sheet.name, &sheet.rows, lookup, &self.limiter).await?;
            summary.sheets.push(SheetSummary {
                name: sheet.name.clone(),
                entities,
            });
        }

        log::info!(
            "Workbook imported: {} MAC grants, {} entities across {} sheets",
            summary.mac_grants,
            summary.total_entities(),
            summary.sheets.len()
        );
        Ok(summary)
    }

    /// Map the first populated sheet of a parsed workbook as `type_name`,
    /// skipping control-sheet checks
    pub async fn import_first_sheet_as(
        &self,
        workbook: &Workbook,
        type_name: &str,
        lookup: &dyn DataLookup,
    ) -> ImportResult<Vec<String>> {
        let sheet = workbook
            .first_populated()
            .ok_or_else(|| ImportError::argument("workbook has no rows"))?;

        map_sheet(type_name, &sheet.rows, lookup, &self.limiter).await?;

        Ok(sheet
            .rows
            .first()
            .map(|row| row.columns().map(str::to_string).collect())
            .unwrap_or_default())
    }
}

fn decode(data: &[u8]) -> ImportResult<Workbook> {
    read_workbook(data).map_err(|source| ImportError::Spreadsheet { source })
}

fn check_sheet_order(workbook: &Workbook) -> ImportResult<()> {
    for (position, expected) in [MAC_SHEET, ROLE_SHEET].into_iter().enumerate() {
        let found = workbook.sheets.get(position).map(|s| s.name.as_str());
        if found != Some(expected) {
            return Err(ImportError::SheetOrder {
                expected,
                position,
                found: found.map(str::to_string),
            });
        }
    }
    Ok(())
}

/// Import XLSX bytes with default settings
pub async fn import_workbook(data: &[u8], lookup: &dyn DataLookup) -> ImportResult<ImportSummary> {
    WorkbookImporter::default().import_workbook(data, lookup).await
}

/// Import one sheet of XLSX bytes as `type_name` with default settings
pub async fn import_single_sheet(
    data: &[u8],
    type_name: &str,
    lookup: &dyn DataLookup,
) -> ImportResult<Vec<String>> {
    WorkbookImporter::default()
        .import_single_sheet(data, type_name, lookup)
        .await
}
