//! Chooses between the live quote API and the scraped snapshot.

use crate::core::{DataSource, FuturesDataResult, QuoteProvider};
use crate::providers::snapshot::SnapshotReader;
use tracing::{debug, info, instrument};

pub struct FuturesDataService<Q: QuoteProvider> {
    quotes: Q,
    snapshot: SnapshotReader,
}

impl<Q: QuoteProvider> FuturesDataService<Q> {
    pub fn new(quotes: Q, snapshot: SnapshotReader) -> Self {
        Self { quotes, snapshot }
    }

    /// With a configured API key the live API is the only source; an empty
    /// answer is reported as unavailable instead of serving the snapshot.
    /// Without a key the snapshot is read.
    #[instrument(name = "FuturesData", skip(self))]
    pub async fn get_futures_data(&self) -> FuturesDataResult {
        if !self.quotes.is_configured() {
            debug!(
                "No quote API key configured, reading snapshot {}",
                self.snapshot.path().display()
            );
            return self.snapshot.read().await;
        }

        match self.quotes.fetch_quotes().await {
            Some(items) if !items.is_empty() => {
                let updated_at = items.iter().find_map(|item| item.updated_at.clone());
                FuturesDataResult {
                    items,
                    updated_at,
                    source: DataSource::Api,
                }
            }
            _ => {
                info!("Quote API configured but returned nothing; futures unavailable");
                FuturesDataResult::unavailable()
            }
        }
    }
}
