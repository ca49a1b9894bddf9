//! Catalogue cache: explicitly owned, TTL + invalidation.
//!
//! The rarity table is read-mostly. Readers get the cached table while it
//! is fresh; a stale cache triggers a refetch, but a failed refetch falls
//! back to stale-but-valid data within a staleness bound rather than
//! surfacing an error or an empty table. `invalidate()` is called on known
//! mutation events (content edit, branch switch).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use tracing::{info, warn};
use wheel_core::constants::{CATALOGUE_STALENESS_BOUND_SECS, CATALOGUE_TTL_SECS};
use wheel_core::error::WheelResult;
use wheel_core::rarity::{catalogue, RarityTable};

/// Where the upstream catalogue document comes from. Transport is an
/// external concern; the engine only needs the text.
#[async_trait]
pub trait CatalogueSource: Send + Sync {
    async fn fetch(&self) -> WheelResult<String>;
}

/// Fixed document source (embedded fallback, tests, local files read once).
pub struct StaticSource(pub String);

#[async_trait]
impl CatalogueSource for StaticSource {
    async fn fetch(&self) -> WheelResult<String> {
        Ok(self.0.clone())
    }
}

struct CachedTable {
    table: Arc<RarityTable>,
    fetched_at: DateTime<Utc>,
}

/// Owned cache object, injected where a table is needed - never ambient
/// global state.
pub struct CatalogueCache {
    source: Arc<dyn CatalogueSource>,
    ttl: Duration,
    staleness_bound: Duration,
    cached: RwLock<Option<CachedTable>>,
    generation: AtomicU64,
}

impl CatalogueCache {
    pub fn new(source: Arc<dyn CatalogueSource>) -> Self {
        CatalogueCache {
            source,
            ttl: Duration::seconds(CATALOGUE_TTL_SECS as i64),
            staleness_bound: Duration::seconds(CATALOGUE_STALENESS_BOUND_SECS as i64),
            cached: RwLock::new(None),
            generation: AtomicU64::new(0),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Current table: fresh cache, else refetch, else stale-but-valid
    /// fallback. Never substitutes an empty table.
    pub async fn get(&self) -> WheelResult<Arc<RarityTable>> {
        let now = Utc::now();

        if let Some(cached) = self.cached.read().as_ref() {
            if now - cached.fetched_at < self.ttl {
                return Ok(cached.table.clone());
            }
        }

        match self.refresh(now).await {
            Ok(table) => Ok(table),
            Err(err) => {
                // Stale data within the staleness bound beats no data.
                if let Some(cached) = self.cached.read().as_ref() {
                    if now - cached.fetched_at < self.staleness_bound {
                        warn!(error = %err, "catalogue refresh failed, serving stale table");
                        return Ok(cached.table.clone());
                    }
                }
                Err(err)
            }
        }
    }

    /// Drop the cached table so the next read refetches. Called on known
    /// mutation events.
    pub fn invalidate(&self) {
        *self.cached.write() = None;
        info!("catalogue cache invalidated");
    }

    async fn refresh(&self, now: DateTime<Utc>) -> WheelResult<Arc<RarityTable>> {
        let doc = self.source.fetch().await?;
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let table = Arc::new(catalogue::parse(&doc, generation)?);
        info!(
            generation,
            entities = table.len(),
            "catalogue refreshed"
        );
        *self.cached.write() = Some(CachedTable {
            table: table.clone(),
            fetched_at: now,
        });
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;
    use wheel_core::error::WheelError;

    struct FlakySource {
        calls: AtomicU32,
        fail_after: u32,
    }

    #[async_trait]
    impl CatalogueSource for FlakySource {
        async fn fetch(&self) -> WheelResult<String> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n >= self.fail_after {
                Err(WheelError::TransientFetch("upstream down".to_string()))
            } else {
                Ok("[pool]\ncommon stone Stone\n".to_string())
            }
        }
    }

    #[tokio::test]
    async fn test_fresh_cache_skips_fetch() {
        let source = Arc::new(FlakySource {
            calls: AtomicU32::new(0),
            fail_after: 1,
        });
        let cache = CatalogueCache::new(source.clone());

        let first = cache.get().await.unwrap();
        let second = cache.get().await.unwrap();
        assert_eq!(first.generation(), second.generation());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let source = Arc::new(FlakySource {
            calls: AtomicU32::new(0),
            fail_after: 10,
        });
        let cache = CatalogueCache::new(source);

        let first = cache.get().await.unwrap();
        cache.invalidate();
        let second = cache.get().await.unwrap();
        assert!(second.generation() > first.generation());
    }

    #[tokio::test]
    async fn test_stale_fallback_when_refresh_fails() {
        let source = Arc::new(FlakySource {
            calls: AtomicU32::new(0),
            fail_after: 1,
        });
        let cache = CatalogueCache::new(source).with_ttl(Duration::seconds(0));

        let first = cache.get().await.unwrap();
        // TTL zero: the next get refetches, fails, and serves stale data.
        let second = cache.get().await.unwrap();
        assert_eq!(first.generation(), second.generation());
    }

    #[tokio::test]
    async fn test_no_cache_and_failed_fetch_surfaces_error() {
        let source = Arc::new(FlakySource {
            calls: AtomicU32::new(0),
            fail_after: 0,
        });
        let cache = CatalogueCache::new(source);
        let result = cache.get().await;
        assert!(matches!(result, Err(WheelError::TransientFetch(_))));
    }
}
