//! tlview CLI -- structured trace log viewer
//!
//! Loads JSONL trace logs from files, URLs, or stdin, persists the last
//! loaded dataset, and renders filtered tables from it.

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;

use tlview_core::config::TlviewConfig;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        use colored::Colorize;

        eprintln!("{} {}", "error:".red().bold(), err);
        std::process::exit(err.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let writer = OutputWriter::new(cli.output);

    // config 명령은 설정 파일 자체를 검사하므로 미리 로드하지 않음
    let command = match cli.command {
        Commands::Config(args) => {
            init_logging(&TlviewConfig::default(), cli.log_level.as_deref())?;
            return commands::config::execute(args, &cli.config, &writer).await;
        }
        other => other,
    };

    let config = TlviewConfig::load_or_default(&cli.config).await?;
    init_logging(&config, cli.log_level.as_deref())?;
    tracing::debug!(config = %cli.config.display(), "tlview starting");

    match command {
        Commands::Load(args) => commands::load::execute(args, &config, &writer).await,
        Commands::View(args) => commands::view::execute(args, &config, &writer).await,
        Commands::Summary(args) => commands::summary::execute(args, &config, &writer).await,
        Commands::Clear => commands::clear::execute(&config, &writer).await,
        Commands::Config(args) => commands::config::execute(args, &cli.config, &writer).await,
    }
}

fn init_logging(config: &TlviewConfig, log_level: Option<&str>) -> Result<(), CliError> {
    let mut general = config.general.clone();
    if let Some(level) = log_level {
        general.log_level = level.to_owned();
    }
    logging::init_tracing(&general).map_err(|e| CliError::Config(e.to_string()))
}
