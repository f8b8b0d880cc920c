use clap::Parser;

mod cli;

use workbook_import::ImportConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = cli::Cli::parse();
    let config = ImportConfig::load(args.config.as_deref())?;

    let default_filter = if args.verbose {
        "debug"
    } else {
        config.log_level.as_str()
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    cli::run(args, config).await
}
