//! Import command handlers

use anyhow::{Context, Result};
use colored::*;
use std::fs;
use std::path::Path;
use std::time::Instant;

use super::{OutputFormat, Settings};
use workbook_import::{MemoryLookup, WorkbookImporter};

/// Handle `sheet`: map the first sheet of a workbook as one type
pub async fn handle_sheet_command(file: &Path, type_name: &str, settings: &Settings) -> Result<()> {
    let data = read_input(file)?;
    let lookup = MemoryLookup::from_schema_file(&settings.schema)?;
    let importer = WorkbookImporter::new(settings.max_concurrent_rows);

    let start = Instant::now();
    let columns = importer
        .import_single_sheet(&data, type_name, &lookup)
        .await
        .with_context(|| format!("Failed to import {} as {}", file.display(), type_name))?;

    eprintln!(
        "{} {} {} entities in {:.2}ms",
        "Imported".bright_green().bold(),
        lookup.entity_count(),
        type_name.cyan(),
        start.elapsed().as_secs_f64() * 1000.0
    );
    eprintln!("Columns: {}", columns.join(", ").dimmed());

    write_snapshot(&lookup, settings)
}

/// Handle `workbook`: full MAC/Role/data import
pub async fn handle_workbook_command(file: &Path, settings: &Settings) -> Result<()> {
    let data = read_input(file)?;
    let lookup = MemoryLookup::from_schema_file(&settings.schema)?;
    let importer = WorkbookImporter::new(settings.max_concurrent_rows);

    let start = Instant::now();
    let summary = importer
        .import_workbook(&data, &lookup)
        .await
        .with_context(|| format!("Failed to import workbook {}", file.display()))?;

    eprintln!(
        "{} {} MAC grants",
        "Stored".bright_green().bold(),
        summary.mac_grants
    );
    for sheet in &summary.sheets {
        eprintln!("  {:<24} {} entities", sheet.name.cyan(), sheet.entities);
    }
    eprintln!(
        "Total: {} entities in {:.2}ms",
        summary.total_entities(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    let stats = importer.limiter().stats();
    if stats.rows_waited > 0 {
        eprintln!(
            "{}",
            format!(
                "{} of {} rows waited for a slot (limit {})",
                stats.rows_waited, stats.rows_acquired, stats.max_concurrent_rows
            )
            .dimmed()
        );
    }

    write_snapshot(&lookup, settings)
}

fn read_input(file: &Path) -> Result<Vec<u8>> {
    if !file.exists() {
        anyhow::bail!("Workbook does not exist: {}", file.display());
    }
    fs::read(file).with_context(|| format!("Failed to read workbook: {}", file.display()))
}

/// Write the store contents to the output file or stdout
fn write_snapshot(lookup: &MemoryLookup, settings: &Settings) -> Result<()> {
    let snapshot = lookup.snapshot();
    let formatted = match settings.format {
        OutputFormat::Json => serde_json::to_string_pretty(&snapshot),
        OutputFormat::JsonCompact => serde_json::to_string(&snapshot),
    }
    .context("Failed to format JSON output")?;

    if let Some(output_path) = &settings.output {
        fs::write(output_path, &formatted)
            .with_context(|| format!("Failed to write output to: {}", output_path.display()))?;
        eprintln!(
            "Results saved to: {}",
            output_path.display().to_string().bright_green()
        );
    } else {
        println!("{}", formatted);
    }

    Ok(())
}
