//! Reads the scraped futures snapshot written by the `scrape` command.

use crate::core::commodity::DEFAULT_CONTRACT_LABEL;
use crate::core::numeric::coerce_field;
use crate::core::{Commodity, DataSource, FuturesDataResult, FuturesQuote};
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

/// Snapshot as found on disk. Metadata of the wrong type is treated as
/// absent and a non-array `items` as empty.
#[derive(Debug)]
struct RawSnapshot {
    updated_at: Option<String>,
    source: Option<String>,
    items: Vec<Value>,
}

impl RawSnapshot {
    fn from_value(value: Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
        RawSnapshot {
            updated_at: text("updatedAt"),
            source: text("source"),
            items: value
                .get("items")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSnapshotItem {
    symbol: Option<Value>,
    name: Option<Value>,
    month: Option<Value>,
    last: Option<Value>,
    change: Option<Value>,
    percent: Option<Value>,
    updated_at: Option<Value>,
}

fn as_text(value: &Option<Value>) -> Option<&str> {
    value.as_ref().and_then(Value::as_str)
}

pub struct SnapshotReader {
    path: PathBuf,
}

impl SnapshotReader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        SnapshotReader {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and normalizes the snapshot. Never fails: unreadable files and
    /// snapshots without a single resolvable item are reported as unavailable.
    #[instrument(name = "SnapshotRead", skip(self), fields(path = %self.path.display()))]
    pub async fn read(&self) -> FuturesDataResult {
        let raw = match self.load().await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Futures snapshot unavailable: {:#}", e);
                return FuturesDataResult::unavailable();
            }
        };

        debug!(source = ?raw.source, updated_at = ?raw.updated_at, "Loaded snapshot");
        let items = normalize_snapshot(&raw);
        if items.is_empty() {
            debug!("Snapshot contained no resolvable items");
            return FuturesDataResult::unavailable();
        }

        FuturesDataResult {
            items,
            updated_at: raw.updated_at,
            source: DataSource::Scrape,
        }
    }

    async fn load(&self) -> Result<RawSnapshot> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read snapshot: {}", self.path.display()))?;
        let value: Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse snapshot: {}", self.path.display()))?;
        Ok(RawSnapshot::from_value(value))
    }
}

fn normalize_snapshot(raw: &RawSnapshot) -> Vec<FuturesQuote> {
    raw.items
        .iter()
        .filter_map(|value| match RawSnapshotItem::deserialize(value) {
            Ok(item) => normalize_item(item, raw.updated_at.as_deref()),
            Err(e) => {
                debug!("Skipping malformed snapshot item: {}", e);
                None
            }
        })
        .collect()
}

fn normalize_item(item: RawSnapshotItem, snapshot_updated_at: Option<&str>) -> Option<FuturesQuote> {
    let symbol = as_text(&item.symbol)
        .map(str::trim)
        .filter(|s| !s.is_empty())?;
    let commodity = Commodity::resolve(Some(symbol), as_text(&item.name))?;

    let contract_label = as_text(&item.month)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_CONTRACT_LABEL)
        .to_string();

    Some(FuturesQuote {
        symbol: symbol.to_string(),
        commodity,
        contract_label,
        last_price: coerce_field(item.last.as_ref()),
        net_change: coerce_field(item.change.as_ref()),
        percent_change: coerce_field(item.percent.as_ref()),
        updated_at: as_text(&item.updated_at)
            .or(snapshot_updated_at)
            .map(str::to_string),
    })
}
