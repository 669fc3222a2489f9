pub mod cli;
pub mod core;
pub mod providers;
pub mod scrape;

use crate::core::Locale;
use crate::core::config::AppConfig;
use anyhow::Result;
use tracing::{debug, info, warn};

pub enum AppCommand {
    Rates,
    Futures,
    Board,
    Scrape,
}

fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!(
        pairs = ?config.pairs,
        snapshot_path = %config.snapshot_path,
        "Loaded config"
    );
    Ok(config)
}

pub async fn run_command(
    command: AppCommand,
    config_path: Option<&str>,
    locale: Locale,
) -> Result<()> {
    info!("tsquotes starting...");

    match command {
        AppCommand::Rates => cli::rates::run(&load_config(config_path)?, locale).await,
        AppCommand::Futures => cli::futures::run(&load_config(config_path)?, locale).await,
        AppCommand::Board => {
            let config = load_config(config_path)?;
            let (rates, futures) = futures::join!(
                cli::rates::fetch(&config),
                cli::futures::fetch(&config)
            );
            if let Err(e) = &rates {
                warn!("FX rates unavailable: {:#}", e);
            }
            let futures = futures.unwrap_or_else(|e| {
                warn!("Futures data unavailable: {:#}", e);
                crate::core::FuturesDataResult::unavailable()
            });

            let labels = cli::ui::Labels::for_locale(locale);
            println!(
                "{}\n{}\n\n{}\n{}",
                cli::ui::style_text(labels.fx_title, cli::ui::StyleType::Title),
                cli::rates::render(&rates, labels),
                cli::ui::style_text(labels.futures_title, cli::ui::StyleType::Title),
                cli::futures::render(&futures, locale)
            );
            Ok(())
        }
        AppCommand::Scrape => {
            // The scheduled job must not fail; fall back to defaults.
            let config = load_config(config_path).unwrap_or_else(|e| {
                warn!("Using default config for scrape: {:#}", e);
                AppConfig::default()
            });
            cli::scrape::run(&config).await;
            Ok(())
        }
    }
}
