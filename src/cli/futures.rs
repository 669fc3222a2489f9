use super::ui::{self, Labels};
use crate::core::config::AppConfig;
use crate::core::{DataSource, FuturesDataResult, FuturesQuote, Locale};
use crate::providers::{BarchartQuoteProvider, FuturesDataService, SnapshotReader};
use anyhow::Result;
use chrono::{DateTime, NaiveDate};
use comfy_table::Cell;
use tracing::warn;

pub async fn fetch(config: &AppConfig) -> Result<FuturesDataResult> {
    let quotes = BarchartQuoteProvider::new(config.barchart_base_url(), config.api_key())?;
    let service = FuturesDataService::new(quotes, SnapshotReader::new(&config.snapshot_path));
    Ok(service.get_futures_data().await)
}

/// Calendar date of a quote timestamp. Unparseable values are shown as-is.
pub fn date_label(updated_at: &str) -> String {
    let trimmed = updated_at.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return dt.date_naive().format("%Y-%m-%d").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }
    trimmed.to_string()
}

/// Change and percent cells are each toned by their own sign.
fn quote_row(quote: &FuturesQuote, locale: Locale) -> Vec<Cell> {
    vec![
        Cell::new(quote.commodity.label(locale)),
        Cell::new(&quote.contract_label),
        ui::number_cell(quote.last_price, |v| ui::format_price(Some(v))),
        ui::change_cell(ui::format_change(quote.net_change), quote.net_change),
        ui::change_cell(ui::format_percent(quote.percent_change), quote.percent_change),
    ]
}

pub fn render(result: &FuturesDataResult, locale: Locale) -> String {
    let labels = Labels::for_locale(locale);
    if !result.is_available() {
        return ui::style_text(labels.futures_unavailable, ui::StyleType::Error);
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(labels.commodity),
        ui::header_cell(labels.contract),
        ui::header_cell(labels.last),
        ui::header_cell(labels.change),
        ui::header_cell("%"),
    ]);

    for quote in &result.items {
        table.add_row(quote_row(quote, locale));
    }

    let provenance = match result.source {
        DataSource::Api => labels.live,
        _ => labels.snapshot,
    };
    let mut footer = format!("{} ({})", labels.updated_daily, provenance);
    if let Some(updated_at) = &result.updated_at {
        footer.push_str(&format!(" · {}", date_label(updated_at)));
    }

    format!(
        "{}\n{}",
        table,
        ui::style_text(&footer, ui::StyleType::Subtle)
    )
}

pub async fn run(config: &AppConfig, locale: Locale) -> Result<()> {
    let result = fetch(config).await.unwrap_or_else(|e| {
        warn!("Futures data unavailable: {:#}", e);
        FuturesDataResult::unavailable()
    });
    let labels = Labels::for_locale(locale);
    println!(
        "{}\n{}",
        ui::style_text(labels.futures_title, ui::StyleType::Title),
        render(&result, locale)
    );
    Ok(())
}
