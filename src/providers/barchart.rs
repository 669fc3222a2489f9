//! Barchart OnDemand quotes for the tracked grain futures.

use crate::core::numeric::coerce_field;
use crate::core::{FuturesQuote, QuoteProvider, TRACKED_CONTRACTS};
use crate::providers::util::{USER_AGENT, build_client};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

const QUOTE_FIELDS: &str = "lastPrice,netChange,percentChange,tradeTimestamp,timestamp";

// Checked in order; the first present value becomes the quote timestamp.
const TIMESTAMP_KEYS: [&str; 5] = [
    "tradeTimestamp",
    "tradeTime",
    "quoteTime",
    "timestamp",
    "serverTimestamp",
];

pub struct BarchartQuoteProvider {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl BarchartQuoteProvider {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self> {
        Ok(BarchartQuoteProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client: build_client(USER_AGENT, Duration::from_secs(30))?,
        })
    }

    fn quote_url(&self, api_key: &str, with_fields: bool) -> Result<Url> {
        let symbols = TRACKED_CONTRACTS
            .iter()
            .map(|c| c.symbol)
            .collect::<Vec<_>>()
            .join(",");
        let mut params = vec![("apikey", api_key), ("symbols", symbols.as_str())];
        if with_fields {
            params.push(("fields", QUOTE_FIELDS));
        }
        let endpoint = format!("{}/getQuote.json", self.base_url);
        Url::parse_with_params(&endpoint, &params)
            .map_err(|e| anyhow!("Invalid quote URL {}: {}", endpoint, e))
    }

    async fn request(&self, url: Url) -> Result<QuoteResponse> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!("Quote request failed: {}", response.status()));
        }
        Ok(response.json::<QuoteResponse>().await?)
    }
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(default)]
    results: Option<Vec<Value>>,
}

/// Upstream symbols may carry exchange qualifiers around the contract code.
fn matches_symbol(input: Option<&str>, symbol: &str) -> bool {
    input.is_some_and(|i| i == symbol || i.ends_with(symbol))
}

/// Epoch numbers are kept as their decimal text.
fn row_timestamp(row: &Value) -> Option<String> {
    TIMESTAMP_KEYS.iter().find_map(|key| match row.get(*key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Maps API rows onto the tracked contracts. Contracts without a matching
/// row get all values unavailable.
pub fn normalize_rows(rows: &[Value]) -> Vec<FuturesQuote> {
    TRACKED_CONTRACTS
        .iter()
        .map(|contract| {
            let row = rows.iter().find(|row| {
                matches_symbol(row.get("symbol").and_then(Value::as_str), contract.symbol)
            });

            FuturesQuote {
                symbol: contract.symbol.to_string(),
                commodity: contract.commodity,
                contract_label: contract.contract_label.to_string(),
                last_price: coerce_field(row.and_then(|r| r.get("lastPrice"))),
                net_change: coerce_field(row.and_then(|r| r.get("netChange"))),
                percent_change: coerce_field(row.and_then(|r| r.get("percentChange"))),
                updated_at: row.and_then(row_timestamp),
            }
        })
        .collect()
}

#[async_trait]
impl QuoteProvider for BarchartQuoteProvider {
    fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    #[instrument(name = "BarchartQuoteFetch", skip(self))]
    async fn fetch_quotes(&self) -> Option<Vec<FuturesQuote>> {
        let api_key = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())?;

        let with_fields = match self.quote_url(api_key, true) {
            Ok(url) => self.request(url).await,
            Err(e) => Err(e),
        };

        let response = match with_fields {
            Ok(response) => response,
            Err(e) => {
                debug!("Quote request with fields failed: {}. Retrying without fields", e);
                let plain = match self.quote_url(api_key, false) {
                    Ok(url) => self.request(url).await,
                    Err(e) => Err(e),
                };
                match plain {
                    Ok(response) => response,
                    Err(e) => {
                        warn!("Quote request failed: {}", e);
                        return None;
                    }
                }
            }
        };

        let rows = response.results.unwrap_or_default();
        let quotes = normalize_rows(&rows);

        if !quotes.iter().any(FuturesQuote::has_any_value) {
            warn!(
                "Quote response had {} rows but no usable values; treating as unavailable",
                rows.len()
            );
            return None;
        }

        debug!("Normalized {} futures quotes", quotes.len());
        Some(quotes)
    }
}
