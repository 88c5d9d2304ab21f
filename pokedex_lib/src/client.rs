//! Caching and retrying wrapper around the catalog.

use std::future::Future;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::watch;
use tokio::time::Duration;

use crate::cache::{CacheKey, Lookup, QueryCache, QuerySnapshot};
use crate::catalog::Catalog;
use crate::config::{DETAIL_STALE_TIME, LIST_STALE_TIME};
use crate::connectivity::ConnectivityMonitor;
use crate::error::PokedexError;
use crate::models::{DetailItem, ListPage, ViewMode};
use crate::retry::{RetryContext, RetryPolicy};

/// Catalog wrapper that adds the query cache, retries, and deduplication.
///
/// Fresh cache hits bypass the network entirely. Stale hits are returned
/// immediately while a background task refreshes the entry. On a miss, at
/// most one request per key is in flight; concurrent callers for the same
/// key wait for it and share its outcome, failures included.
#[derive(Clone)]
pub struct CachedClient {
    inner: Catalog,
    cache: Arc<QueryCache>,
    connectivity: ConnectivityMonitor,
    retry: RetryPolicy,
    /// Keys currently being fetched. Waiters watch for the owner's outcome.
    in_flight: Arc<DashMap<String, watch::Receiver<Shared>>>,
}

/// Outcome published by the caller that owns a fetch: the value as JSON, or
/// the error every waiter should see.
type Shared = Option<Result<String, PokedexError>>;

enum Claim {
    Owner(InFlight),
    Waiter(watch::Receiver<Shared>),
}

/// Ownership of one key's fetch. Dropping it lets the next caller claim the
/// key, even if the owner was cancelled before publishing.
struct InFlight {
    key: String,
    map: Arc<DashMap<String, watch::Receiver<Shared>>>,
    tx: watch::Sender<Shared>,
}

impl InFlight {
    fn publish(&self, outcome: Result<String, PokedexError>) {
        self.tx.send_replace(Some(outcome));
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.map.remove(&self.key);
    }
}

impl CachedClient {
    /// Creates a cached client using the production API URL.
    pub fn new(cache: QueryCache) -> Result<Self, PokedexError> {
        Ok(Self::from_catalog(Catalog::new()?, cache))
    }

    /// Creates a cached client with a custom base URL. Used for testing.
    pub fn with_base_url(base_url: &str, cache: QueryCache) -> Result<Self, PokedexError> {
        Ok(Self::from_catalog(Catalog::with_base_url(base_url)?, cache))
    }

    fn from_catalog(inner: Catalog, cache: QueryCache) -> Self {
        Self {
            inner,
            cache: Arc::new(cache),
            connectivity: ConnectivityMonitor::default(),
            retry: RetryPolicy::default(),
            in_flight: Arc::new(DashMap::new()),
        }
    }

    /// Shares an existing connectivity monitor with this client.
    pub fn with_connectivity(mut self, connectivity: ConnectivityMonitor) -> Self {
        self.connectivity = connectivity;
        self
    }

    /// Replaces the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn connectivity(&self) -> &ConnectivityMonitor {
        &self.connectivity
    }

    pub fn catalog(&self) -> &Catalog {
        &self.inner
    }

    /// Fetches a listing page for the given view mode.
    pub async fn get_list(&self, page: u32, mode: ViewMode) -> Result<ListPage, PokedexError> {
        let catalog = self.inner.clone();
        self.query(
            CacheKey::List { page, mode },
            LIST_STALE_TIME,
            RetryContext::List { page, mode },
            move || {
                let catalog = catalog.clone();
                async move { catalog.fetch_list(page).await }
            },
        )
        .await
    }

    /// Fetches a single detail record.
    pub async fn get_detail(&self, id: u32) -> Result<DetailItem, PokedexError> {
        let catalog = self.inner.clone();
        self.query(
            CacheKey::Detail { id },
            DETAIL_STALE_TIME,
            RetryContext::Detail,
            move || {
                let catalog = catalog.clone();
                async move { catalog.fetch_detail(id).await }
            },
        )
        .await
    }

    /// Loading/error state of a query, for views that render it.
    pub fn query_state(&self, key: &CacheKey) -> Option<QuerySnapshot> {
        self.cache.snapshot(key)
    }

    /// Removes all entries from the cache.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    async fn query<T, F, Fut>(
        &self,
        key: CacheKey,
        stale_after: Duration,
        ctx: RetryContext,
        fetch: F,
    ) -> Result<T, PokedexError>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, PokedexError>> + Send + 'static,
    {
        match self.cache.lookup(&key, stale_after) {
            Lookup::Fresh(cached) => {
                tracing::debug!("cache hit for {}", key);
                return decode(&cached);
            }
            Lookup::Stale(cached) => {
                tracing::debug!("serving stale {} while refreshing", key);
                self.spawn_refresh(key, ctx, fetch);
                return decode(&cached);
            }
            Lookup::Miss => {}
        }

        loop {
            match self.claim(&key) {
                Claim::Owner(owner) => {
                    // Another caller may have filled the entry just before we claimed it.
                    if let Lookup::Fresh(cached) | Lookup::Stale(cached) =
                        self.cache.lookup(&key, stale_after)
                    {
                        return decode(&cached);
                    }
                    return self.fetch_and_store(&key, ctx, &fetch, &owner).await;
                }
                Claim::Waiter(mut rx) => {
                    tracing::debug!("waiting for in-flight {}", key);
                    let shared = match rx.wait_for(Option::is_some).await {
                        Ok(outcome) => outcome.clone(),
                        Err(_) => None,
                    };
                    match shared {
                        Some(Ok(json)) => return decode(&json),
                        Some(Err(err)) => return Err(err),
                        // The owner went away without an outcome; try to claim again.
                        None => continue,
                    }
                }
            }
        }
    }

    fn spawn_refresh<T, F, Fut>(&self, key: CacheKey, ctx: RetryContext, fetch: F)
    where
        T: Serialize + Send + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, PokedexError>> + Send + 'static,
    {
        let this = self.clone();
        tokio::spawn(async move {
            // A refresh or first fetch for this key is already running.
            let Claim::Owner(owner) = this.claim(&key) else {
                return;
            };
            if let Err(e) = this.fetch_and_store(&key, ctx, &fetch, &owner).await {
                tracing::warn!("background refresh of {} failed: {}", key, e);
            }
        });
    }

    async fn fetch_and_store<T, F, Fut>(
        &self,
        key: &CacheKey,
        ctx: RetryContext,
        fetch: &F,
        owner: &InFlight,
    ) -> Result<T, PokedexError>
    where
        T: Serialize,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, PokedexError>>,
    {
        self.cache.mark_loading(key);
        match self.with_retry(key, ctx, fetch).await {
            Ok(value) => {
                match encode(&value) {
                    Ok(json) => {
                        self.cache.set_success(key, json.clone());
                        owner.publish(Ok(json));
                    }
                    Err(e) => {
                        tracing::warn!("not caching {}: {}", key, e);
                        owner.publish(Err(e));
                    }
                }
                Ok(value)
            }
            Err(err) => {
                self.cache.set_error(key, err.to_string());
                owner.publish(Err(err.clone()));
                Err(err)
            }
        }
    }

    async fn with_retry<T, F, Fut>(
        &self,
        key: &CacheKey,
        ctx: RetryContext,
        fetch: &F,
    ) -> Result<T, PokedexError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, PokedexError>>,
    {
        let mut failures = 0u32;
        loop {
            match fetch().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    let online = self.connectivity.is_online();
                    if !self.retry.should_retry(failures, &err, ctx, online) {
                        if failures == 0 && err.is_retryable() {
                            tracing::warn!("{} failed without retry: {}", key, err);
                        }
                        return Err(err);
                    }
                    let delay = self.retry.delay_for_attempt(failures);
                    failures += 1;
                    tracing::warn!(
                        "{} request failed (attempt {}/{}), retrying in {:.1}s: {}",
                        key,
                        failures,
                        self.retry.max_retries,
                        delay.as_secs_f64(),
                        err
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    fn claim(&self, key: &CacheKey) -> Claim {
        match self.in_flight.entry(key.to_string()) {
            Entry::Occupied(entry) => Claim::Waiter(entry.get().clone()),
            Entry::Vacant(entry) => {
                let (tx, rx) = watch::channel(None);
                entry.insert(rx);
                Claim::Owner(InFlight {
                    key: key.to_string(),
                    map: Arc::clone(&self.in_flight),
                    tx,
                })
            }
        }
    }
}

fn encode<T: Serialize>(value: &T) -> Result<String, PokedexError> {
    serde_json::to_string(value).map_err(|e| PokedexError::Cache(e.to_string()))
}

fn decode<T: DeserializeOwned>(cached: &str) -> Result<T, PokedexError> {
    serde_json::from_str(cached).map_err(|e| PokedexError::Cache(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn no_retries() -> RetryPolicy {
        RetryPolicy {
            max_retries: 0,
            base_delay_ms: 1,
            max_delay_ms: 1,
        }
    }

    #[tokio::test]
    async fn finished_fetches_release_their_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/pokemon/\d+$"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let client = CachedClient::with_base_url(&server.uri(), QueryCache::new())
            .unwrap()
            .with_retry_policy(no_retries());

        for id in 1..=5 {
            assert!(client.get_detail(id).await.is_err());
        }
        assert!(client.in_flight.is_empty());
    }

    #[tokio::test]
    async fn cancelled_owner_releases_its_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/pokemon/25$"))
            .respond_with(ResponseTemplate::new(500).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;
        let client = CachedClient::with_base_url(&server.uri(), QueryCache::new())
            .unwrap()
            .with_retry_policy(no_retries());

        let result = tokio::time::timeout(Duration::from_millis(50), client.get_detail(25)).await;
        assert!(result.is_err());
        assert!(client.in_flight.is_empty());
    }
}
