//! In-memory query cache backed by `DashMap` for concurrent access.
//!
//! Each key tracks the lifecycle of one query (`idle -> loading -> success
//! | error`) alongside the last good value. Values are stored as serialized
//! JSON strings. Entries are never evicted by size; a successful entry just
//! goes stale once it is older than the caller's staleness window.

use std::fmt;

use dashmap::DashMap;
use tokio::time::{Duration, Instant};

use crate::models::ViewMode;

/// Identifies one cached query: resource kind, page-or-id, and view mode.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CacheKey {
    List { page: u32, mode: ViewMode },
    Detail { id: u32 },
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::List { page, mode } => write!(f, "pokemon:{}:{}", page, mode),
            CacheKey::Detail { id } => write!(f, "pokemon:detail:{}", id),
        }
    }
}

/// Lifecycle state of a query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryState {
    Idle,
    Loading,
    Success,
    Error(String),
}

/// A single cached query.
#[derive(Clone, Debug)]
struct CacheEntry {
    state: QueryState,
    /// Last successfully fetched value, kept through later failures.
    value: Option<String>,
    fetched_at: Option<Instant>,
    /// Consecutive failures since the last success.
    error_count: u32,
}

impl CacheEntry {
    fn idle() -> Self {
        Self {
            state: QueryState::Idle,
            value: None,
            fetched_at: None,
            error_count: 0,
        }
    }
}

/// Result of looking a key up against a staleness window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lookup {
    /// Value younger than the window; serve without refetching.
    Fresh(String),
    /// Value older than the window; serve it and refresh in the background.
    Stale(String),
    /// Nothing usable cached.
    Miss,
}

/// Read-only view of an entry, for rendering loading/error state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuerySnapshot {
    pub state: QueryState,
    pub has_value: bool,
    pub error_count: u32,
    pub age: Option<Duration>,
}

/// Thread-safe query store shared by every view.
#[derive(Default)]
pub struct QueryCache {
    store: DashMap<String, CacheEntry>,
}

impl QueryCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up `key`, classifying its value against `stale_after`.
    pub fn lookup(&self, key: &CacheKey, stale_after: Duration) -> Lookup {
        let Some(entry) = self.store.get(&key.to_string()) else {
            return Lookup::Miss;
        };
        match (&entry.value, entry.fetched_at) {
            (Some(value), Some(fetched_at)) => {
                if fetched_at.elapsed() < stale_after {
                    Lookup::Fresh(value.clone())
                } else {
                    Lookup::Stale(value.clone())
                }
            }
            _ => Lookup::Miss,
        }
    }

    /// Marks `key` as being fetched. Any previous value is kept.
    pub fn mark_loading(&self, key: &CacheKey) {
        self.store
            .entry(key.to_string())
            .or_insert_with(CacheEntry::idle)
            .state = QueryState::Loading;
    }

    /// Stores a freshly fetched value and resets the failure count.
    pub fn set_success(&self, key: &CacheKey, value: String) {
        self.store.insert(
            key.to_string(),
            CacheEntry {
                state: QueryState::Success,
                value: Some(value),
                fetched_at: Some(Instant::now()),
                error_count: 0,
            },
        );
    }

    /// Records a failed fetch. The last good value, if any, stays servable.
    pub fn set_error(&self, key: &CacheKey, message: String) {
        let mut entry = self
            .store
            .entry(key.to_string())
            .or_insert_with(CacheEntry::idle);
        entry.state = QueryState::Error(message);
        entry.error_count += 1;
    }

    /// Current state of `key`, `None` if it was never queried.
    pub fn snapshot(&self, key: &CacheKey) -> Option<QuerySnapshot> {
        self.store.get(&key.to_string()).map(|entry| QuerySnapshot {
            state: entry.state.clone(),
            has_value: entry.value.is_some(),
            error_count: entry.error_count,
            age: entry.fetched_at.map(|t| t.elapsed()),
        })
    }

    /// Number of tracked keys.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Removes all entries from the cache.
    pub fn clear(&self) {
        self.store.clear();
    }
}
