//! ECB daily euro foreign exchange reference rates.

use crate::core::{RateProvider, RateQuote, RateSheet};
use crate::providers::util::{USER_AGENT, build_client};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, instrument, warn};

const DAILY_FEED_PATH: &str = "/stats/eurofxref/eurofxref-daily.xml";

static FEED_DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"time=['"]([^'"]+)['"]"#).expect("valid feed date pattern"));

pub struct EcbRateProvider {
    base_url: String,
    client: reqwest::Client,
}

impl EcbRateProvider {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(EcbRateProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: build_client(USER_AGENT, Duration::from_secs(30))?,
        })
    }
}

/// Turns pair names like `EURUSD` into the quoted currency codes.
pub fn currency_codes_from_pairs(pairs: &[String]) -> Vec<String> {
    pairs
        .iter()
        .map(|pair| pair.trim().to_uppercase().replace("EUR", ""))
        .filter(|code| code.len() == 3)
        .collect()
}

/// Extracts the feed date and the requested rates from the daily XML.
///
/// Codes that are absent or carry an unreadable rate are skipped.
pub fn parse_daily_feed(xml: &str, codes: &[String]) -> RateSheet {
    let date = FEED_DATE_PATTERN
        .captures(xml)
        .map(|caps| caps[1].to_string());

    let rates = codes
        .iter()
        .filter_map(|code| {
            let pattern = format!(
                r#"<Cube\s+currency=['"]{}['"]\s+rate=['"]([^'"]+)['"]\s*/>"#,
                regex::escape(code)
            );
            let re = Regex::new(&pattern).ok()?;
            let raw = re.captures(xml)?[1].to_string();
            match raw.trim().parse::<f64>() {
                Ok(rate) if rate.is_finite() => Some(RateQuote::new(code, rate)),
                _ => {
                    warn!("Unreadable ECB rate for {}: '{}'", code, raw);
                    None
                }
            }
        })
        .collect();

    RateSheet { rates, date }
}

#[async_trait]
impl RateProvider for EcbRateProvider {
    #[instrument(name = "EcbRateFetch", skip(self), fields(codes = ?codes))]
    async fn fetch_rates(&self, codes: &[String]) -> Result<RateSheet> {
        let url = format!("{}{}", self.base_url, DAILY_FEED_PATH);
        debug!("Requesting ECB reference rates from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("ECB request error: {} URL: {}", e, url))?;

        if !response.status().is_success() {
            return Err(anyhow!("ECB request failed: {}", response.status()));
        }

        let xml = response.text().await?;
        let sheet = parse_daily_feed(&xml, codes);

        if sheet.rates.is_empty() {
            return Err(anyhow!("No ECB rates parsed"));
        }

        debug!(
            "Parsed {} of {} ECB rates dated {:?}",
            sheet.rates.len(),
            codes.len(),
            sheet.date
        );
        Ok(sheet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DAILY_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gesmes:Envelope xmlns:gesmes="http://www.gesmes.org/xml/2002-08-01" xmlns="http://www.ecb.int/vocabulary/2002-08-01/eurofxref">
	<gesmes:subject>Reference rates</gesmes:subject>
	<Cube>
		<Cube time='2026-10-15'>
			<Cube currency='USD' rate='1.085'/>
			<Cube currency='JPY' rate='162.37'/>
			<Cube currency='GBP' rate='0.84218'/>
			<Cube currency='PLN' rate='4.2793'/>
		</Cube>
	</Cube>
</gesmes:Envelope>"#;

    fn codes(list: &[&str]) -> Vec<String> {
        list.iter().map(|c| c.to_string()).collect()
    }

    async fn create_mock_server(status: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(DAILY_FEED_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;
        mock_server
    }

    #[test]
    fn test_parse_daily_feed() {
        let sheet = parse_daily_feed(DAILY_XML, &codes(&["USD", "GBP"]));
        assert_eq!(sheet.date.as_deref(), Some("2026-10-15"));
        assert_eq!(
            sheet.rates,
            vec![RateQuote::new("USD", 1.085), RateQuote::new("GBP", 0.84218)]
        );
        assert_eq!(sheet.rates[0].value, "1.0850");
        assert_eq!(sheet.rates[1].value, "0.8422");
    }

    #[test]
    fn test_parse_accepts_double_quotes() {
        let xml = r#"<Cube time="2026-10-15"><Cube currency="USD" rate="1.1"/></Cube>"#;
        let sheet = parse_daily_feed(xml, &codes(&["USD"]));
        assert_eq!(sheet.date.as_deref(), Some("2026-10-15"));
        assert_eq!(sheet.rates[0].value, "1.1000");
    }

    #[test]
    fn test_currency_codes_from_pairs() {
        let pairs = codes(&["EURUSD", "EURGBP", "eurpln", "EUR", "USDJPY2"]);
        assert_eq!(currency_codes_from_pairs(&pairs), codes(&["USD", "GBP", "PLN"]));
    }

    #[tokio::test]
    async fn test_partial_match_returns_only_found_codes() {
        let mock_server = create_mock_server(200, DAILY_XML).await;
        let provider = EcbRateProvider::new(&mock_server.uri()).unwrap();

        let sheet = provider
            .fetch_rates(&codes(&["USD", "ZZZ"]))
            .await
            .expect("Failed to fetch rates");
        assert_eq!(sheet.rates.len(), 1);
        assert_eq!(sheet.rates[0].currency_code, "USD");
        assert_eq!(sheet.rates[0].value, "1.0850");
        assert_eq!(sheet.date.as_deref(), Some("2026-10-15"));
    }

    #[tokio::test]
    async fn test_no_requested_code_found_is_an_error() {
        let mock_server = create_mock_server(200, DAILY_XML).await;
        let provider = EcbRateProvider::new(&mock_server.uri()).unwrap();

        let result = provider.fetch_rates(&codes(&["ZZZ"])).await;
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().to_string(), "No ECB rates parsed");
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let mock_server = create_mock_server(503, "").await;
        let provider = EcbRateProvider::new(&mock_server.uri()).unwrap();

        let result = provider.fetch_rates(&codes(&["USD"])).await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "ECB request failed: 503 Service Unavailable"
        );
    }
}
