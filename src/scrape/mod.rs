//! Out-of-band scraper that produces the futures snapshot.
//!
//! The scraper fetches the public futures price page for each tracked
//! commodity, extracts the front-month row and writes one consolidated
//! snapshot. It is meant to run unattended, so it never fails: targets that
//! cannot be scraped are left out and a top-level failure still writes an
//! empty snapshot.

pub mod html;

use crate::core::commodity::{extract_contract_symbol, normalize_contract_month};
use crate::core::config::{AppConfig, ScraperConfig};
use crate::core::numeric::parse_number;
use crate::providers::util::{build_client, with_retry};
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

pub const SNAPSHOT_SOURCE: &str = "barchart_scrape";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeTarget {
    pub name: &'static str,
    pub root: &'static str,
    pub symbol_hint: &'static str,
}

pub const TARGETS: [ScrapeTarget; 3] = [
    ScrapeTarget {
        name: "Corn",
        root: "ZC*0",
        symbol_hint: "ZCH26",
    },
    ScrapeTarget {
        name: "Wheat",
        root: "ZW*0",
        symbol_hint: "ZWH26",
    },
    ScrapeTarget {
        name: "Soybeans",
        root: "ZS*0",
        symbol_hint: "ZSH26",
    },
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotItem {
    pub symbol: String,
    pub name: String,
    pub month: String,
    pub last: Option<f64>,
    pub change: Option<f64>,
    pub percent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotFile {
    pub updated_at: String,
    pub source: String,
    pub items: Vec<SnapshotItem>,
}

impl SnapshotFile {
    pub fn new(items: Vec<SnapshotItem>) -> Self {
        SnapshotFile {
            updated_at: chrono::Utc::now().format("%Y-%m-%d").to_string(),
            source: SNAPSHOT_SOURCE.to_string(),
            items,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

pub struct Scraper {
    base_url: String,
    client: reqwest::Client,
}

impl Scraper {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        Ok(Scraper {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client: build_client(
                &config.user_agent,
                Duration::from_secs(config.wait_timeout_secs),
            )?,
        })
    }

    pub fn target_url(&self, target: &ScrapeTarget) -> String {
        format!(
            "{}/futures/quotes/{}/futures-prices?viewName=main",
            self.base_url, target.root
        )
    }

    async fn fetch_page(&self, url: &str) -> Result<String> {
        let response = with_retry(|| self.client.get(url).send(), 1, 500)
            .await
            .with_context(|| format!("Failed to fetch {url}"))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {} for {}", response.status(), url));
        }

        Ok(response.text().await?)
    }

    /// Scrapes one commodity. `None` when the page cannot be fetched or holds
    /// neither a quotes table nor an embedded quote.
    #[instrument(name = "ScrapeTarget", skip(self, target), fields(target = target.name))]
    pub async fn scrape_target(&self, target: &ScrapeTarget) -> Option<SnapshotItem> {
        let url = self.target_url(target);
        debug!("Fetching {}", url);

        let page = match self.fetch_page(&url).await {
            Ok(page) => page,
            Err(e) => {
                warn!("Skipping {}: {:#}", target.name, e);
                return None;
            }
        };

        let Some(row) = html::extract_contract_row(&page) else {
            warn!("No quote found on page for {}", target.name);
            return None;
        };

        Some(SnapshotItem {
            symbol: extract_contract_symbol(Some(&row.contract), target.symbol_hint),
            name: target.name.to_string(),
            month: normalize_contract_month(Some(&row.contract)),
            last: parse_number(&row.last),
            change: parse_number(&row.change),
            percent: parse_number(&row.percent),
        })
    }

    /// Scrapes every target in order, reporting each one to `on_target`.
    pub async fn run<F>(&self, mut on_target: F) -> SnapshotFile
    where
        F: FnMut(&ScrapeTarget, bool),
    {
        let mut items = Vec::new();
        for target in &TARGETS {
            let item = self.scrape_target(target).await;
            on_target(target, item.is_some());
            items.extend(item);
        }
        SnapshotFile::new(items)
    }
}

/// Writes the snapshot as pretty JSON, creating parent directories.
pub async fn write_snapshot(path: &Path, snapshot: &SnapshotFile) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let mut body = serde_json::to_string_pretty(snapshot)?;
    body.push('\n');
    tokio::fs::write(path, body)
        .await
        .with_context(|| format!("Failed to write snapshot to {}", path.display()))?;
    Ok(())
}

/// Runs the scraper and writes the snapshot to the configured path.
///
/// Returns the snapshot that was produced. Errors are logged, never
/// returned; when the scraper cannot start an empty snapshot is written.
pub async fn run_and_write<F>(config: &AppConfig, on_target: F) -> SnapshotFile
where
    F: FnMut(&ScrapeTarget, bool),
{
    let snapshot = match Scraper::new(&config.scraper) {
        Ok(scraper) => scraper.run(on_target).await,
        Err(e) => {
            error!("Scraper could not start: {:#}", e);
            SnapshotFile::empty()
        }
    };

    let path = Path::new(&config.snapshot_path);
    if let Err(e) = write_snapshot(path, &snapshot).await {
        error!("Failed to write snapshot: {:#}", e);
    } else {
        info!(
            "Wrote {} of {} futures to {}",
            snapshot.items.len(),
            TARGETS.len(),
            path.display()
        );
    }
    snapshot
}
