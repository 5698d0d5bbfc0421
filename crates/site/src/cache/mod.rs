//! Page render cache.
//!
//! Rendered pages are kept in an in-process Moka cache keyed by path and
//! query string. Entries are replaced whole, never merged, and expire after
//! the configured TTL. The revalidation webhook clears every entry at once.
//!
//! Every clear bumps a generation counter. A render stamps the generation it
//! started under, and its insert is dropped when a clear happened meanwhile.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use axum::body::Bytes;
use moka::future::Cache;
use tracing::{debug, info};

/// Maximum number of cached pages.
const MAX_CAPACITY: u64 = 10_000;

/// A rendered response body with its content type.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedPage {
    pub content_type: String,
    pub body: Bytes,
}

/// Cache of rendered pages.
#[derive(Clone)]
pub struct PageCache {
    inner: Arc<Cache<String, CachedPage>>,
    generation: Arc<AtomicU64>,
}

impl PageCache {
    pub fn new(ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(MAX_CAPACITY)
            .time_to_live(ttl)
            .build();
        Self {
            inner: Arc::new(cache),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub async fn get(&self, key: &str) -> Option<CachedPage> {
        let hit = self.inner.get(key).await;
        if hit.is_some() {
            debug!(key = %key, "page cache hit");
        }
        hit
    }

    /// Generation a render should stamp before reading content.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Store a page rendered under `generation`.
    ///
    /// Returns false when a clear happened since the render started; the
    /// page is then not kept.
    pub async fn insert(&self, key: String, page: CachedPage, generation: u64) -> bool {
        if self.generation() != generation {
            debug!(key = %key, "stale render not cached");
            return false;
        }
        debug!(key = %key, bytes = page.body.len(), "page cached");
        self.inner.insert(key.clone(), page).await;

        // A clear may have landed between the check and the insert
        if self.generation() != generation {
            self.inner.invalidate(&key).await;
            debug!(key = %key, "stale render evicted");
            return false;
        }
        true
    }

    /// Drop every cached page and every render still in flight.
    pub async fn invalidate_all(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let entries = self.inner.entry_count();
        self.inner.invalidate_all();
        self.inner.run_pending_tasks().await;
        info!(entries, "page cache cleared");
    }

    /// Approximate number of cached pages.
    pub async fn len(&self) -> u64 {
        self.inner.run_pending_tasks().await;
        self.inner.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
