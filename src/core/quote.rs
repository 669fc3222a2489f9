//! Quote and rate types shared by the providers and the presentation layer.

use crate::core::commodity::Commodity;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A reference rate against EUR, already formatted to 4 decimals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateQuote {
    pub currency_code: String,
    pub value: String,
}

impl RateQuote {
    pub fn new(currency_code: &str, rate: f64) -> Self {
        Self {
            currency_code: currency_code.to_string(),
            value: format!("{rate:.4}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSheet {
    pub rates: Vec<RateQuote>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuturesQuote {
    pub symbol: String,
    #[serde(rename = "commodityKey")]
    pub commodity: Commodity,
    pub contract_label: String,
    pub last_price: Option<f64>,
    pub net_change: Option<f64>,
    pub percent_change: Option<f64>,
    pub updated_at: Option<String>,
}

impl FuturesQuote {
    /// True when at least one of price, change or percent is known.
    pub fn has_any_value(&self) -> bool {
        self.last_price.is_some() || self.net_change.is_some() || self.percent_change.is_some()
    }
}

/// Which path produced a [`FuturesDataResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Api,
    Scrape,
    Unavailable,
}

impl Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                DataSource::Api => "api",
                DataSource::Scrape => "scrape",
                DataSource::Unavailable => "unavailable",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuturesDataResult {
    pub items: Vec<FuturesQuote>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    pub source: DataSource,
}

impl FuturesDataResult {
    pub fn unavailable() -> Self {
        Self {
            items: Vec::new(),
            updated_at: None,
            source: DataSource::Unavailable,
        }
    }

    pub fn is_available(&self) -> bool {
        self.source != DataSource::Unavailable && !self.items.is_empty()
    }
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetches the requested currency codes. Fails when the feed is
    /// unreachable or none of the codes are present.
    async fn fetch_rates(&self, codes: &[String]) -> Result<RateSheet>;
}

#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Whether a credential is available for the live quote API.
    fn is_configured(&self) -> bool;

    /// Quotes for every tracked contract, or `None` when not configured,
    /// when the upstream fails, or when nothing plausible came back.
    async fn fetch_quotes(&self) -> Option<Vec<FuturesQuote>>;
}
