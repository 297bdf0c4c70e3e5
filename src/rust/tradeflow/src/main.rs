mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(version, about = "Trade-flow map geometry tool", long_about = None, arg_required_else_help = true)]
struct Cli {
    /// Configuration file (defaults to $TRADEFLOW_CONFIG, then /etc/tradeflow.conf).
    /// Only a missing /etc/tradeflow.conf falls back to built-in settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build arc and label layers for an item and year
    Render {
        /// Item name, e.g. copper, oil, semiconductor, plastic_3901
        #[arg(long)]
        item: String,

        #[arg(long)]
        year: u16,

        /// Where to write the layers (overrides output_directory)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print trade totals and the top exporters/importers
    Summary {
        #[arg(long)]
        item: String,

        #[arg(long)]
        year: u16,
    },
    /// Load, validate and print the configuration
    CheckConfig,
}

/// Configure a compact console logger, with the level taken from `RUST_LOG`.
pub fn set_console_logging() -> Result<()> {
    let level = if let Ok(level) = std::env::var("RUST_LOG") {
        match level.to_lowercase().as_str() {
            "trace" => LevelFilter::TRACE,
            "debug" => LevelFilter::DEBUG,
            "info" => LevelFilter::INFO,
            "warn" => LevelFilter::WARN,
            "error" => LevelFilter::ERROR,
            _ => LevelFilter::WARN,
        }
    } else {
        LevelFilter::WARN
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .compact()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(false)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> Result<()> {
    set_console_logging()?;
    let cli = Cli::parse();
    let config = commands::load_configuration(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Render { item, year, output }) => {
            commands::render(&config, &item, year, output.as_deref())
        }
        Some(Commands::Summary { item, year }) => commands::summary(&config, &item, year),
        Some(Commands::CheckConfig) => commands::check_config(&config),
        None => {
            println!("Run with --help to see instructions");
            Ok(())
        }
    }
}
