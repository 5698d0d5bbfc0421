//! Per-request record of degraded reads.
//!
//! The page cache middleware scopes a counter around each render. The query
//! service bumps it whenever a read falls back to an empty or partial value,
//! and renders built on such reads are served but never cached.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

tokio::task_local! {
    /// Degraded reads seen by the current request.
    static DEGRADED_READS: Arc<AtomicU32>;
}

/// Record a degraded read. Outside a tracked request this is a no-op.
pub fn note_degraded() {
    let _ = DEGRADED_READS.try_with(|count| {
        count.fetch_add(1, Ordering::Relaxed);
    });
}

/// Run `future` and return its output with the number of degraded reads it noted.
pub async fn track_degraded<F: Future>(future: F) -> (F::Output, u32) {
    let count = Arc::new(AtomicU32::new(0));
    let output = DEGRADED_READS.scope(count.clone(), future).await;
    (output, count.load(Ordering::Relaxed))
}
