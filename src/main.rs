use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use tsquotes::cli::setup::setup;
use tsquotes::core::Locale;
use tsquotes::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Display language (en or bg)
    #[arg(short, long, global = true, default_value_t = Locale::En)]
    locale: Locale,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for tsquotes::AppCommand {
    fn from(cmd: Commands) -> tsquotes::AppCommand {
        match cmd {
            Commands::Rates => tsquotes::AppCommand::Rates,
            Commands::Futures => tsquotes::AppCommand::Futures,
            Commands::Board => tsquotes::AppCommand::Board,
            Commands::Scrape => tsquotes::AppCommand::Scrape,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display EUR reference rates
    Rates,
    /// Display grain futures quotes
    Futures,
    /// Display rates and futures together
    Board,
    /// Scrape futures quotes into the snapshot file
    Scrape,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => tsquotes::run_command(cmd.into(), cli.config_path.as_deref(), cli.locale).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
