//! Library layer for the Pokédex catalog: the normalized catalog client,
//! a cached and retrying query layer, and the incremental list-loading
//! state machines used by the browsing views.
//!
//! Wraps the `pokeapi` crate with an in-memory query cache keyed by
//! resource, page-or-id and view mode, exponential-backoff retries,
//! connectivity tracking, and the infinite-scroll accumulator/trigger pair.

pub mod accumulator;
pub mod cache;
pub mod catalog;
pub mod client;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod models;
pub mod retry;
pub mod route;
pub mod session;
pub mod trigger;
pub mod validation;
pub mod view;

pub use pokeapi;

pub use accumulator::{AccumulatorState, ListAccumulator};
pub use cache::{CacheKey, QueryCache, QueryState};
pub use catalog::Catalog;
pub use client::CachedClient;
pub use connectivity::ConnectivityMonitor;
pub use error::PokedexError;
pub use models::{DetailItem, ListItem, ListPage, PageDescriptor, Stat, ViewMode};
pub use retry::RetryPolicy;
pub use route::Route;
pub use session::{BrowseSession, PageOutcome, PageSource};
pub use trigger::{LoadMoreTrigger, ProximityObserver, RetryControl, TriggerState, Viewport};
