use super::ui::{self, Labels};
use crate::core::config::AppConfig;
use crate::core::{Locale, RateProvider, RateSheet};
use crate::providers::EcbRateProvider;
use crate::providers::ecb::currency_codes_from_pairs;
use anyhow::Result;
use tracing::warn;

pub async fn fetch(config: &AppConfig) -> Result<RateSheet> {
    let provider = EcbRateProvider::new(config.ecb_base_url())?;
    let codes = currency_codes_from_pairs(&config.pairs);
    provider.fetch_rates(&codes).await
}

/// One-line FX board, or the unavailable notice when the fetch failed.
pub fn render(result: &Result<RateSheet>, labels: &Labels) -> String {
    match result {
        Ok(sheet) => {
            let mut parts: Vec<String> = sheet
                .rates
                .iter()
                .map(|rate| format!("EUR/{} {}", rate.currency_code, rate.value))
                .collect();
            parts.push(match &sheet.date {
                Some(date) => format!("{} {}", labels.fx_source, date),
                None => labels.fx_source.to_string(),
            });
            parts.push(labels.fixed_conversion.to_string());
            parts.join(" | ")
        }
        Err(_) => format!(
            "{} | {}",
            ui::style_text(labels.rates_unavailable, ui::StyleType::Error),
            labels.fixed_conversion
        ),
    }
}

pub async fn run(config: &AppConfig, locale: Locale) -> Result<()> {
    let result = fetch(config).await;
    if let Err(e) = &result {
        warn!("FX rates unavailable: {:#}", e);
    }
    let labels = Labels::for_locale(locale);
    println!(
        "{}\n{}",
        ui::style_text(labels.fx_title, ui::StyleType::Title),
        render(&result, labels)
    );
    Ok(())
}
