//! Infinite-scroll browsing session.
//!
//! Owns the accumulated list and the load-more trigger for one view, and
//! drives page fetches from proximity signals, button presses, manual
//! retries, and reconnects. Only one page request is outstanding at a time
//! because every fetch goes through the trigger and borrows the session
//! mutably until it resolves.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;

use crate::accumulator::ListAccumulator;
use crate::client::CachedClient;
use crate::error::PokedexError;
use crate::models::{ListItem, ListPage, PageDescriptor, ViewMode};
use crate::trigger::{LoadMoreTrigger, ProximityObserver, RetryControl, TriggerState, Viewport};

/// Anything that can resolve a listing page for a view mode.
pub trait PageSource {
    fn load_page(
        &self,
        page: u32,
        mode: ViewMode,
    ) -> impl Future<Output = Result<ListPage, PokedexError>> + Send;
}

impl PageSource for CachedClient {
    fn load_page(
        &self,
        page: u32,
        mode: ViewMode,
    ) -> impl Future<Output = Result<ListPage, PokedexError>> + Send {
        self.get_list(page, mode)
    }
}

/// What a session step did.
#[derive(Clone, Debug, PartialEq)]
pub enum PageOutcome {
    /// A page was fetched and merged; `added` items were appended.
    Loaded { page: u32, added: usize },
    /// Nothing was requested (already loading, failed, offline, or done).
    Skipped,
}

pub struct BrowseSession<S> {
    source: S,
    mode: ViewMode,
    accumulator: ListAccumulator,
    trigger: LoadMoreTrigger,
    observer: ProximityObserver,
    connectivity: watch::Receiver<bool>,
}

impl<S: PageSource> BrowseSession<S> {
    /// Creates a session; nothing is fetched until [`BrowseSession::start`].
    pub fn new(source: S, mode: ViewMode, connectivity: watch::Receiver<bool>) -> Self {
        let mut trigger = LoadMoreTrigger::new();
        trigger.on_connectivity(*connectivity.borrow());
        Self {
            source,
            mode,
            accumulator: ListAccumulator::new(),
            trigger,
            observer: ProximityObserver::default(),
            connectivity,
        }
    }

    /// Uses a custom sentinel margin instead of the default.
    pub fn with_observer(mut self, observer: ProximityObserver) -> Self {
        self.observer = observer;
        self
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn items(&self) -> &[ListItem] {
        self.accumulator.items()
    }

    pub fn pagination(&self) -> Option<&PageDescriptor> {
        self.accumulator.last_page()
    }

    pub fn trigger_state(&self) -> TriggerState {
        self.trigger.state()
    }

    pub fn has_more(&self) -> bool {
        self.trigger.has_more()
    }

    /// Latest connectivity, including changes not yet processed.
    pub fn is_online(&self) -> bool {
        *self.connectivity.borrow()
    }

    /// Retry affordance to show when the last page request failed.
    pub fn retry_control(&self) -> Option<RetryControl> {
        match self.trigger.retry_control() {
            Some(_) if !self.is_online() => Some(RetryControl::WAITING_FOR_CONNECTION),
            control => control,
        }
    }

    /// Discards everything and loads page 1 again.
    pub async fn start(&mut self) -> Result<PageOutcome, PokedexError> {
        self.accumulator.reset();
        self.trigger.reset();
        match self.trigger.on_button() {
            Some(page) => self.load(page).await,
            None => Ok(PageOutcome::Skipped),
        }
    }

    /// Switches browsing mode, restarting from page 1.
    pub async fn switch_mode(&mut self, mode: ViewMode) -> Result<PageOutcome, PokedexError> {
        self.mode = mode;
        self.start().await
    }

    /// Explicit "load more" action.
    pub async fn load_more(&mut self) -> Result<PageOutcome, PokedexError> {
        match self.trigger.on_button() {
            Some(page) => self.load(page).await,
            None => Ok(PageOutcome::Skipped),
        }
    }

    /// Feeds a scroll position; loads the next page when the sentinel at
    /// `sentinel_top` is close enough to the viewport.
    pub async fn on_scroll(
        &mut self,
        viewport: Viewport,
        sentinel_top: f64,
        sentinel_height: f64,
    ) -> Result<PageOutcome, PokedexError> {
        let intersecting = self
            .observer
            .is_intersecting(&viewport, sentinel_top, sentinel_height);
        match self.trigger.on_intersection(intersecting) {
            Some(page) => self.load(page).await,
            None => Ok(PageOutcome::Skipped),
        }
    }

    /// Manual retry of the failed page; a no-op while offline.
    pub async fn retry(&mut self) -> Result<PageOutcome, PokedexError> {
        self.sync_connectivity();
        match self.trigger.retry() {
            Some(page) => self.load(page).await,
            None => Ok(PageOutcome::Skipped),
        }
    }

    /// Waits for the next online/offline transition. When it restores
    /// connectivity after a failed page, waits the reconnect delay and
    /// retries that page once. Returns `None` if the monitor went away.
    pub async fn next_connectivity_change(
        &mut self,
    ) -> Option<Result<PageOutcome, PokedexError>> {
        if self.connectivity.changed().await.is_err() {
            return None;
        }
        let online = *self.connectivity.borrow_and_update();
        let Some(delay) = self.observe_connectivity(online) else {
            return Some(Ok(PageOutcome::Skipped));
        };
        tracing::info!(
            "Back online, retrying in {:.1}s",
            delay.as_secs_f64()
        );
        tokio::time::sleep(delay).await;
        self.sync_connectivity();
        match self.trigger.on_reconnect_timer() {
            Some(page) => Some(self.load(page).await),
            None => Some(Ok(PageOutcome::Skipped)),
        }
    }

    /// Folds any connectivity change not yet observed into the trigger.
    fn sync_connectivity(&mut self) {
        if self.connectivity.has_changed().unwrap_or(false) {
            let online = *self.connectivity.borrow_and_update();
            self.observe_connectivity(online);
        }
    }

    /// The channel only keeps the latest value, so a change that lands on
    /// online while the trigger still thinks it is online went through an
    /// offline state we never saw.
    fn observe_connectivity(&mut self, online: bool) -> Option<Duration> {
        if online && self.trigger.is_online() {
            self.trigger.on_connectivity(false);
        }
        self.trigger.on_connectivity(online)
    }

    async fn load(&mut self, page: u32) -> Result<PageOutcome, PokedexError> {
        match self.source.load_page(page, self.mode).await {
            Ok(result) => {
                let added = result.items.len();
                self.trigger.on_loaded(&result.pagination);
                self.accumulator.apply(result.items, result.pagination);
                tracing::debug!(
                    "Merged page {} ({} items, {} total)",
                    page,
                    added,
                    self.accumulator.len()
                );
                Ok(PageOutcome::Loaded { page, added })
            }
            Err(err) => {
                self.sync_connectivity();
                self.trigger.on_failed();
                tracing::warn!("Failed to load page {}: {}", page, err);
                Err(err)
            }
        }
    }
}
