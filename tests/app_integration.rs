use std::fs;
use std::path::Path;
use tracing::info;
use tsquotes::core::config::AppConfig;
use tsquotes::core::{Commodity, DataSource, Locale};
use tsquotes::providers::{BarchartQuoteProvider, FuturesDataService, SnapshotReader};
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ECB_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gesmes:Envelope xmlns:gesmes="http://www.gesmes.org/xml/2002-08-01" xmlns="http://www.ecb.int/vocabulary/2002-08-01/eurofxref">
  <Cube>
    <Cube time='2026-10-15'>
      <Cube currency='USD' rate='1.0850'/>
      <Cube currency='GBP' rate='0.84218'/>
      <Cube currency='PLN' rate='4.2793'/>
    </Cube>
  </Cube>
</gesmes:Envelope>"#;

const QUOTE_RESPONSE: &str = r#"{
  "status": {"code": 200, "message": "Success."},
  "results": [
    {"symbol": "ZCH26", "lastPrice": 441.25, "netChange": -1.75, "percentChange": -0.4, "tradeTimestamp": "2026-10-15T13:20:00-05:00"},
    {"symbol": "ZWH26", "lastPrice": "538.5", "netChange": "2.5", "percentChange": "0.47"},
    {"symbol": "ZSH26", "lastPrice": 1062, "netChange": 3.25, "percentChange": 0.31}
  ]
}"#;

const SNAPSHOT: &str = r#"{
  "updatedAt": "2026-10-14",
  "source": "barchart_scrape",
  "items": [
    {"symbol": "ZCH26", "name": "Corn", "month": "Mar '26", "last": 440.5, "change": -0.75, "percent": -0.17},
    {"symbol": "ZWH26", "name": "Wheat", "month": "", "last": "536-0", "change": null, "percent": null}
  ]
}"#;

mod test_utils {
    use super::*;

    pub async fn create_ecb_mock_server() -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stats/eurofxref/eurofxref-daily.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ECB_FEED))
            .mount(&mock_server)
            .await;
        mock_server
    }

    pub fn write_config(dir: &Path, body: &str) -> String {
        let config_path = dir.join("config.yaml");
        fs::write(&config_path, body).expect("Failed to write config file");
        config_path.to_string_lossy().to_string()
    }
}

#[test_log::test(tokio::test)]
async fn test_rates_flow_with_ecb_mock() {
    let mock_server = test_utils::create_ecb_mock_server().await;
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(
        temp_dir.path(),
        &format!(
            "pairs: [\"EURUSD\", \"EURGBP\", \"EURPLN\"]\nproviders:\n  ecb:\n    base_url: \"{}\"\n",
            mock_server.uri()
        ),
    );

    let config = AppConfig::load_from_path(&config_path).expect("Failed to load config");
    let sheet = tsquotes::cli::rates::fetch(&config)
        .await
        .expect("Expected ECB rates");
    info!(?sheet, "Fetched rates");

    let codes: Vec<&str> = sheet.rates.iter().map(|r| r.currency_code.as_str()).collect();
    assert_eq!(codes, vec!["USD", "GBP", "PLN"]);
    assert_eq!(sheet.rates[1].value, "0.8422");
    assert_eq!(sheet.date.as_deref(), Some("2026-10-15"));

    let result = tsquotes::run_command(
        tsquotes::AppCommand::Rates,
        Some(&config_path),
        Locale::Bg,
    )
    .await;
    assert!(result.is_ok(), "Rates command failed: {result:?}");
}

#[test_log::test(tokio::test)]
async fn test_futures_flow_with_configured_api_key() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getQuote.json"))
        .and(query_param("apikey", "integration-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string(QUOTE_RESPONSE))
        .mount(&mock_server)
        .await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(
        temp_dir.path(),
        &format!(
            "providers:\n  barchart:\n    base_url: \"{}\"\n    api_key: \"integration-key\"\n",
            mock_server.uri()
        ),
    );
    let config = AppConfig::load_from_path(&config_path).expect("Failed to load config");

    let result = tsquotes::cli::futures::fetch(&config)
        .await
        .expect("Expected futures data");
    assert_eq!(result.source, DataSource::Api);
    assert_eq!(result.items.len(), 3);
    assert_eq!(result.items[1].commodity, Commodity::Wheat);
    assert_eq!(result.items[1].last_price, Some(538.5));
    assert_eq!(result.items[2].last_price, Some(1062.0));
    assert_eq!(
        result.updated_at.as_deref(),
        Some("2026-10-15T13:20:00-05:00")
    );

    let rendered = tsquotes::cli::futures::render(&result, Locale::En);
    assert!(rendered.contains("1,062.00"));
    assert!(rendered.contains("(live)"));
}

#[test_log::test(tokio::test)]
async fn test_futures_without_key_reads_snapshot() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let snapshot_path = temp_dir.path().join("futures.json");
    fs::write(&snapshot_path, SNAPSHOT).expect("Failed to write snapshot");

    let quotes = BarchartQuoteProvider::new("http://127.0.0.1:9", None)
        .expect("Failed to build provider");
    let service = FuturesDataService::new(quotes, SnapshotReader::new(&snapshot_path));
    let result = service.get_futures_data().await;

    assert_eq!(result.source, DataSource::Scrape);
    assert_eq!(result.updated_at.as_deref(), Some("2026-10-14"));
    assert_eq!(result.items.len(), 2);
    assert_eq!(result.items[0].last_price, Some(440.5));
    assert_eq!(result.items[1].contract_label, "Mar '26");
    assert_eq!(result.items[1].last_price, Some(536.0));
    assert_eq!(result.items[1].net_change, None);
}

#[test_log::test(tokio::test)]
async fn test_failing_api_does_not_fall_back_to_snapshot() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getQuote.json"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&mock_server)
        .await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let snapshot_path = temp_dir.path().join("futures.json");
    fs::write(&snapshot_path, SNAPSHOT).expect("Failed to write snapshot");

    let quotes = BarchartQuoteProvider::new(&mock_server.uri(), Some("key".to_string()))
        .expect("Failed to build provider");
    let service = FuturesDataService::new(quotes, SnapshotReader::new(&snapshot_path));
    let result = service.get_futures_data().await;

    assert_eq!(result.source, DataSource::Unavailable);
    assert!(result.items.is_empty());
    assert!(
        tsquotes::cli::futures::render(&result, Locale::En).contains("Futures data unavailable")
    );
}

#[test_log::test(tokio::test)]
async fn test_scrape_command_writes_snapshot() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/futures/quotes/.*/futures-prices$"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<div data-symbol='{"symbol":"ZCH26","contractName":"Corn Mar &#039;26","lastPrice":"441-2","priceChange":"-1-6","percentChange":"-0.40%"}'></div>"#,
        ))
        .expect(3)
        .mount(&mock_server)
        .await;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let snapshot_path = temp_dir.path().join("public/data/futures.json");
    let config_path = test_utils::write_config(
        temp_dir.path(),
        &format!(
            "snapshot_path: \"{}\"\nscraper:\n  base_url: \"{}\"\n  wait_timeout_secs: 5\n",
            snapshot_path.display(),
            mock_server.uri()
        ),
    );

    let result = tsquotes::run_command(
        tsquotes::AppCommand::Scrape,
        Some(&config_path),
        Locale::En,
    )
    .await;
    assert!(result.is_ok(), "Scrape command failed: {result:?}");

    let written = fs::read_to_string(&snapshot_path).expect("Snapshot should exist");
    let json: serde_json::Value = serde_json::from_str(&written).expect("Snapshot is JSON");
    assert_eq!(json["source"], "barchart_scrape");
    assert_eq!(json["items"].as_array().map(Vec::len), Some(3));
    assert_eq!(json["items"][0]["last"], 441.25);
    assert_eq!(json["items"][1]["name"], "Wheat");
}
