//! The listening aggregator: one explicitly constructed service owning the
//! music source and the consolidated cache, shared with handlers through
//! server state.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cache::{ConsolidatedCache, DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CACHE_TTL};
use crate::consolidated::{fetch_consolidated, Consolidated};
use crate::server::metrics;
use crate::spotify::{MusicSource, SourceError};
use crate::themes::{infer_themes, ThemesOutput};

pub const DEFAULT_PRUNE_INTERVAL: Duration = Duration::from_secs(300);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AggregatorSettings {
    pub cache_ttl: Duration,
    pub cache_max_entries: usize,
    /// How often expired cache entries are dropped in the background.
    pub prune_interval: Duration,
}

impl Default for AggregatorSettings {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_CACHE_TTL,
            cache_max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            prune_interval: DEFAULT_PRUNE_INTERVAL,
        }
    }
}

pub struct ListeningAggregator {
    source: Arc<dyn MusicSource>,
    cache: Arc<ConsolidatedCache>,
    prune_interval: Duration,
    shutdown_token: CancellationToken,
    pruner: Mutex<Option<JoinHandle<()>>>,
}

impl ListeningAggregator {
    pub fn new(source: Arc<dyn MusicSource>, settings: AggregatorSettings) -> Self {
        Self {
            source,
            cache: Arc::new(ConsolidatedCache::new(
                settings.cache_ttl,
                settings.cache_max_entries,
            )),
            prune_interval: settings.prune_interval,
            shutdown_token: CancellationToken::new(),
            pruner: Mutex::new(None),
        }
    }

    pub fn source(&self) -> &dyn MusicSource {
        self.source.as_ref()
    }

    pub fn cache(&self) -> &ConsolidatedCache {
        &self.cache
    }

    /// Starts the background cache pruner. Calling it again is a no-op.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) {
        let mut pruner = self.pruner.lock().unwrap_or_else(|e| e.into_inner());
        if pruner.is_some() {
            return;
        }

        let cache = self.cache.clone();
        let interval = self.prune_interval;
        let shutdown = self.shutdown_token.clone();
        *pruner = Some(tokio::spawn(async move {
            info!("Cache pruner starting (interval={}s)", interval.as_secs());
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let removed = cache.purge_expired();
                        if removed > 0 {
                            debug!("Pruned {} expired consolidated snapshots", removed);
                        }
                    }
                    _ = shutdown.cancelled() => {
                        info!("Cache pruner shutting down");
                        break;
                    }
                }
            }
        }));
    }

    /// Stops the background pruner and waits for it to finish.
    pub async fn shutdown(&self) {
        self.shutdown_token.cancel();
        let handle = self
            .pruner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    pub fn is_running(&self) -> bool {
        self.pruner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Cached snapshot for `user_id`, fetched with `access_token` on a miss.
    pub async fn consolidated(
        &self,
        user_id: &str,
        access_token: &str,
    ) -> Result<Arc<Consolidated>, SourceError> {
        if let Some(cached) = self.cache.get(user_id) {
            debug!(user = %user_id, "Consolidated cache hit");
            return Ok(cached);
        }

        let fresh = Arc::new(fetch_consolidated(self.source.as_ref(), access_token).await?);
        self.cache.insert(user_id, fresh.clone());
        Ok(fresh)
    }

    pub async fn themes(
        &self,
        user_id: &str,
        access_token: &str,
    ) -> Result<ThemesOutput, SourceError> {
        let consolidated = self.consolidated(user_id, access_token).await?;
        let output = infer_themes(&consolidated);
        for theme in &output.themes {
            metrics::record_theme_synthesized(&theme.name);
        }
        Ok(output)
    }
}
