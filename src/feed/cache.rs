use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use super::fetcher::{FeedSource, FetchError};
use super::types::FeedSnapshot;

/// How long a fetched snapshot is served before the feed is fetched again (5 minutes)
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Time-bounded memo of the parsed feed.
///
/// Holds at most one [`FeedSnapshot`]. The check-fetch-replace sequence runs
/// under an async mutex, so concurrent callers never start duplicate fetches
/// and never see a snapshot paired with the wrong timestamp.
///
/// Age is measured with `tokio::time::Instant`, which tests can freeze and
/// advance with `tokio::time::pause`/`advance`.
pub struct FeedCache<S> {
    source: S,
    ttl: Duration,
    state: Mutex<Option<Arc<FeedSnapshot>>>,
}

impl<S: FeedSource> FeedCache<S> {
    pub fn new(source: S) -> Self {
        Self::with_ttl(source, DEFAULT_TTL)
    }

    pub fn with_ttl(source: S, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            state: Mutex::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached snapshot if it is younger than the TTL, otherwise
    /// fetches a fresh one and replaces the cache with it.
    ///
    /// # Errors
    ///
    /// Propagates the source's [`FetchError`]. A failed fetch leaves the
    /// previous snapshot and its timestamp untouched.
    pub async fn snapshot(&self) -> Result<Arc<FeedSnapshot>, FetchError> {
        let mut state = self.state.lock().await;

        if let Some(cached) = state.as_ref() {
            let age = cached.fetched_at.elapsed();
            if age < self.ttl {
                tracing::debug!(age_secs = age.as_secs(), "Feed cache hit");
                return Ok(Arc::clone(cached));
            }
        }

        tracing::debug!("Feed cache miss, fetching");
        let entries = self.source.fetch().await.inspect_err(|e| {
            tracing::warn!(error = %e, "Feed fetch failed, cache left unchanged");
        })?;

        let snapshot = Arc::new(FeedSnapshot::new(entries));
        *state = Some(Arc::clone(&snapshot));

        tracing::info!(entries = snapshot.entries.len(), "Feed cache refreshed");
        Ok(snapshot)
    }
}
