//! Command-line interface

mod handler;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use workbook_import::ImportConfig;

#[derive(Parser, Debug)]
#[command(name = "workbook-import", version, about = "Import XLSX workbooks as linked entities")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Schema catalog (TOML or JSON)
    #[arg(long, global = true)]
    pub schema: Option<PathBuf>,

    /// Write the resulting store to this file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Row pipelines in flight per sheet (0 = unbounded)
    #[arg(long, global = true)]
    pub max_concurrent_rows: Option<usize>,

    /// Output format for the store snapshot
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import the first sheet of a workbook as entities of one type
    Sheet {
        /// XLSX file
        file: PathBuf,
        /// Entity type for every row
        #[arg(short = 't', long = "type")]
        type_name: String,
    },
    /// Import a full workbook: MAC sheet, Role sheet, then data sheets
    Workbook {
        /// XLSX file
        file: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    JsonCompact,
}

/// Resolved settings: config file values overridden by flags
#[derive(Debug, Clone)]
pub struct Settings {
    pub schema: PathBuf,
    pub output: Option<PathBuf>,
    pub max_concurrent_rows: usize,
    pub format: OutputFormat,
}

impl Settings {
    fn resolve(cli: &Cli, config: ImportConfig) -> anyhow::Result<Self> {
        let schema = cli.schema.clone().or(config.schema).ok_or_else(|| {
            anyhow::anyhow!("No schema catalog given. Use --schema or set `schema` in the config file.")
        })?;

        Ok(Settings {
            schema,
            output: cli.output.clone().or(config.output),
            max_concurrent_rows: cli.max_concurrent_rows.unwrap_or(config.max_concurrent_rows),
            format: cli.format,
        })
    }
}

pub async fn run(cli: Cli, config: ImportConfig) -> anyhow::Result<()> {
    let settings = Settings::resolve(&cli, config)?;

    match cli.command {
        Commands::Sheet { file, type_name } => {
            handler::handle_sheet_command(&file, &type_name, &settings).await
        }
        Commands::Workbook { file } => handler::handle_workbook_command(&file, &settings).await,
    }
}
