use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use futures_util::stream::{self, StreamExt};
use serde::Serialize;
use tokio::sync::watch;

use crate::errors::{CatalogError, Result};
use crate::models::{GameDetail, GameSummary};
use crate::services::ApiClient;

/// Where a detail stands within the live refresh cycle. `Absent` means the id
/// was not part of the cycle's list at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetailStatus {
    Pending,
    Ready,
    Failed,
    Absent,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PrefetchProgress {
    pub generation: u64,
    pub total: usize,
    pub fetched: usize,
    pub failed: usize,
    pub complete: bool,
}

#[derive(Debug, Clone)]
enum DetailEntry {
    Pending,
    Ready(GameDetail),
    Failed(String),
}

struct CacheState {
    generation: u64,
    entries: HashMap<i64, DetailEntry>,
}

/// Eagerly fetches every listed game's detail in the background so a later
/// synchronous lookup returns without network latency. Each `refresh` starts
/// a new generation: the map is cleared up front, and completions from an
/// older generation are discarded instead of racing against the live cycle.
#[derive(Clone)]
pub struct DetailPrefetchCache {
    api: ApiClient,
    concurrency: usize,
    state: Arc<Mutex<CacheState>>,
    progress: Arc<watch::Sender<PrefetchProgress>>,
}

impl DetailPrefetchCache {
    pub fn new(api: ApiClient) -> Self {
        let concurrency = api.config().prefetch_concurrency.max(1);
        let (progress, _) = watch::channel(PrefetchProgress {
            complete: true,
            ..PrefetchProgress::default()
        });
        Self {
            api,
            concurrency,
            state: Arc::new(Mutex::new(CacheState {
                generation: 0,
                entries: HashMap::new(),
            })),
            progress: Arc::new(progress),
        }
    }

    /// Drop all prior entries and start fetching details for the given
    /// summaries. Returns the new generation without waiting for any fetch;
    /// progress is published on the watch channel as completions land.
    pub fn refresh(&self, summaries: &[GameSummary]) -> Result<u64> {
        let ids: Vec<i64> = summaries.iter().map(|summary| summary.id).collect();
        let total = ids.len();

        // Progress is only ever published while holding the state lock, so a
        // superseded cycle can never overwrite the live cycle's progress.
        let generation = {
            let mut guard = self
                .state
                .lock()
                .map_err(|_| CatalogError::Config("detail cache lock poisoned".to_string()))?;
            guard.generation += 1;
            guard.entries.clear();
            for id in &ids {
                guard.entries.insert(*id, DetailEntry::Pending);
            }
            // send_replace keeps publishing even before anyone subscribes.
            self.progress.send_replace(PrefetchProgress {
                generation: guard.generation,
                total,
                fetched: 0,
                failed: 0,
                complete: total == 0,
            });
            guard.generation
        };

        if total == 0 {
            return Ok(generation);
        }

        let api = self.api.clone();
        let state = Arc::clone(&self.state);
        let progress = Arc::clone(&self.progress);
        let concurrency = self.concurrency;

        tokio::spawn(async move {
            let mut outcomes = stream::iter(ids)
                .map(|id| {
                    let api = api.clone();
                    async move { (id, api.fetch_detail(id).await) }
                })
                .buffer_unordered(concurrency);

            let mut fetched = 0_usize;
            let mut failed = 0_usize;
            while let Some((id, outcome)) = outcomes.next().await {
                let entry = match outcome {
                    Ok(detail) => {
                        fetched += 1;
                        DetailEntry::Ready(detail)
                    }
                    Err(err) => {
                        failed += 1;
                        tracing::warn!("detail prefetch for game {} failed: {}", id, err);
                        DetailEntry::Failed(err.to_string())
                    }
                };

                let live = match state.lock() {
                    Ok(mut guard) if guard.generation == generation => {
                        guard.entries.insert(id, entry);
                        progress.send_replace(PrefetchProgress {
                            generation,
                            total,
                            fetched,
                            failed,
                            complete: fetched + failed == total,
                        });
                        true
                    }
                    _ => false,
                };
                if !live {
                    tracing::debug!(
                        "detail prefetch generation {} superseded, dropping remaining results",
                        generation
                    );
                    return;
                }
            }

            tracing::info!(
                "detail prefetch warmed {} / {} games (generation {})",
                fetched,
                total,
                generation
            );
        });

        Ok(generation)
    }

    /// Non-blocking lookup; `Some` only once the detail fetch has completed
    /// successfully within the live cycle.
    pub fn lookup(&self, id: i64) -> Option<GameDetail> {
        self.state
            .lock()
            .ok()
            .and_then(|guard| match guard.entries.get(&id) {
                Some(DetailEntry::Ready(detail)) => Some(detail.clone()),
                _ => None,
            })
    }

    pub fn status(&self, id: i64) -> DetailStatus {
        self.state
            .lock()
            .ok()
            .map(|guard| match guard.entries.get(&id) {
                Some(DetailEntry::Pending) => DetailStatus::Pending,
                Some(DetailEntry::Ready(_)) => DetailStatus::Ready,
                Some(DetailEntry::Failed(_)) => DetailStatus::Failed,
                None => DetailStatus::Absent,
            })
            .unwrap_or(DetailStatus::Absent)
    }

    pub fn subscribe(&self) -> watch::Receiver<PrefetchProgress> {
        self.progress.subscribe()
    }

    /// Wait until the most recent refresh cycle has finished. Returns
    /// immediately if no cycle is in flight.
    pub async fn wait_idle(&self) {
        let mut receiver = self.progress.subscribe();
        while !receiver.borrow_and_update().complete {
            if receiver.changed().await.is_err() {
                return;
            }
        }
    }
}
