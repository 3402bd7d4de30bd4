use tokio::sync::watch;

use crate::config::CatalogConfig;
use crate::errors::Result;
use crate::models::{GameDetail, GameSummary};
use crate::services::{ApiClient, DetailPrefetchCache, DetailStatus, PrefetchProgress};

/// Facade over the list endpoint and the detail prefetch cache. Fetching a
/// list kicks off the background detail prefetch for every returned summary,
/// so `game_detail` answers from memory once the cycle has warmed up.
#[derive(Clone)]
pub struct CatalogService {
    api: ApiClient,
    details: DetailPrefetchCache,
}

impl CatalogService {
    pub fn new(config: CatalogConfig) -> Result<Self> {
        let api = ApiClient::new(config)?;
        let details = DetailPrefetchCache::new(api.clone());
        Ok(Self { api, details })
    }

    /// Fetch one page of summaries, then start prefetching every entry's
    /// detail. Returns as soon as the list itself is decoded; the prefetch
    /// runs to completion in the background.
    pub async fn list_games(&self, search: Option<&str>) -> Result<Vec<GameSummary>> {
        let summaries = self.api.fetch_list(search).await?;
        tracing::info!(
            "fetched {} games (search={:?}), prefetching details",
            summaries.len(),
            search
        );
        self.details.refresh(&summaries)?;
        Ok(summaries)
    }

    pub fn game_detail(&self, id: i64) -> Option<GameDetail> {
        self.details.lookup(id)
    }

    pub fn detail_status(&self, id: i64) -> DetailStatus {
        self.details.status(id)
    }

    pub fn subscribe_prefetch(&self) -> watch::Receiver<PrefetchProgress> {
        self.details.subscribe()
    }

    /// Wait for the latest prefetch cycle to finish; returns immediately when
    /// nothing is in flight.
    pub async fn wait_prefetch_idle(&self) {
        self.details.wait_idle().await;
    }
}
