//! Read XLSX workbooks into sheets of rows

use anyhow::{Context, Result};
use calamine::{Data, Reader, Xlsx, open_workbook};
use serde_json::{Value, json};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use crate::import::types::{Row, Sheet, Workbook};

/// Cell value as JSON; text stays text, empty and error cells are null
fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::String(text) if text.is_empty() => Value::Null,
        Data::String(text) => Value::String(text.clone()),
        Data::Int(n) => json!(*n),
        // whole floats read back as integers
        Data::Float(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => json!(*n as i64),
        Data::Float(n) => json!(*n),
        Data::Bool(flag) => Value::Bool(*flag),
        Data::DateTime(stamp) => Value::String(stamp.to_string()),
        Data::DateTimeIso(text) | Data::DurationIso(text) => Value::String(text.clone()),
    }
}

/// Header cell text; non-text headers use their display form
fn header_name(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Turn a sheet's cell grid into rows, skipping blank cells and blank rows
fn grid_to_rows(grid: &[Vec<Data>]) -> Vec<Row> {
    let Some((header, body)) = grid.split_first() else {
        return Vec::new();
    };
    let headers: Vec<String> = header.iter().map(header_name).collect();

    let mut rows = Vec::new();
    for cells in body {
        let mut row = Row::new();
        for (col_idx, cell) in cells.iter().enumerate() {
            let header = headers.get(col_idx).map(|s| s.as_str()).unwrap_or("");

            // Skip columns without a header
            if header.is_empty() {
                continue;
            }

            let value = cell_to_value(cell);
            if value.is_null() {
                continue;
            }
            row.insert(header, value);
        }

        // Skip empty rows
        if !row.is_empty() {
            rows.push(row);
        }
    }
    rows
}

fn read_sheets<R, RS>(workbook: &mut R) -> Result<Workbook>
where
    R: Reader<RS>,
    RS: Read + Seek,
    R::Error: std::error::Error + Send + Sync + 'static,
{
    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let mut sheets = Vec::with_capacity(sheet_names.len());

    for sheet_name in sheet_names {
        let range = workbook
            .worksheet_range(&sheet_name)
            .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

        let grid: Vec<Vec<Data>> = range.rows().map(|r| r.to_vec()).collect();
        let rows = grid_to_rows(&grid);
        log::debug!("Sheet '{}': {} data rows", sheet_name, rows.len());
        sheets.push(Sheet::new(sheet_name, rows));
    }

    Ok(Workbook::new(sheets))
}

/// Read a workbook from XLSX bytes
pub fn read_workbook(data: &[u8]) -> Result<Workbook> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(data)).context("Failed to open workbook data")?;
    read_sheets(&mut workbook)
}

/// Read a workbook from an XLSX file
pub fn read_workbook_file<P: AsRef<Path>>(path: P) -> Result<Workbook> {
    let path = path.as_ref();
    let mut workbook: Xlsx<_> = open_workbook(path)
        .with_context(|| format!("Failed to open Excel file: {}", path.display()))?;
    read_sheets(&mut workbook)
}
