//! Load-more trigger for infinite scrolling.
//!
//! [`LoadMoreTrigger`] is the single source of truth for whether a next-page
//! request may start. Both drivers, the explicit "load more" action and the
//! sentinel proximity signal, go through the same state check, so a signal
//! that repeats while a fetch is outstanding cannot issue a second request.

use std::time::Duration;

use crate::config::{DEFAULT_SCROLL_MARGIN_PX, RECONNECT_RETRY_DELAY};
use crate::models::PageDescriptor;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerState {
    /// Waiting for a signal; `next_page` is the page a signal would request.
    Idle { next_page: u32 },
    /// A request for `page` is outstanding.
    Loading { page: u32 },
    /// The request for `page` failed; it is the one a retry re-issues.
    Error { page: u32 },
    /// The last page has been loaded.
    Done,
}

/// Retry affordance shown alongside a failed page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryControl {
    pub enabled: bool,
    pub label: &'static str,
}

impl RetryControl {
    pub const AVAILABLE: RetryControl = RetryControl {
        enabled: true,
        label: "Try Again",
    };
    pub const WAITING_FOR_CONNECTION: RetryControl = RetryControl {
        enabled: false,
        label: "Waiting for connection...",
    };
}

#[derive(Debug)]
pub struct LoadMoreTrigger {
    state: TriggerState,
    online: bool,
    /// Set when connectivity returned after a failure and the automatic
    /// retry has been scheduled but not yet fired.
    reconnect_retry_pending: bool,
}

impl Default for LoadMoreTrigger {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadMoreTrigger {
    pub fn new() -> Self {
        Self {
            state: TriggerState::Idle { next_page: 1 },
            online: true,
            reconnect_retry_pending: false,
        }
    }

    pub fn state(&self) -> TriggerState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, TriggerState::Loading { .. })
    }

    pub fn has_more(&self) -> bool {
        !matches!(self.state, TriggerState::Done)
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    /// Back to page 1, as on a mode switch or remount.
    pub fn reset(&mut self) {
        self.state = TriggerState::Idle { next_page: 1 };
        self.reconnect_retry_pending = false;
    }

    /// Starts the next request if idle, returning the page to fetch.
    fn begin(&mut self) -> Option<u32> {
        match self.state {
            TriggerState::Idle { next_page } => {
                self.state = TriggerState::Loading { page: next_page };
                Some(next_page)
            }
            _ => None,
        }
    }

    /// Explicit "load more" activation.
    pub fn on_button(&mut self) -> Option<u32> {
        self.begin()
    }

    /// Sentinel proximity signal. Only an intersecting signal can fire.
    pub fn on_intersection(&mut self, intersecting: bool) -> Option<u32> {
        if !intersecting {
            return None;
        }
        self.begin()
    }

    /// Records a successfully loaded page.
    pub fn on_loaded(&mut self, pagination: &PageDescriptor) {
        self.reconnect_retry_pending = false;
        self.state = if pagination.has_next {
            TriggerState::Idle {
                next_page: pagination.current_page + 1,
            }
        } else {
            TriggerState::Done
        };
    }

    /// Records a failed request for the outstanding page.
    pub fn on_failed(&mut self) {
        if let TriggerState::Loading { page } = self.state {
            self.state = TriggerState::Error { page };
        }
    }

    /// Manual retry of the failed page. Refused while offline.
    pub fn retry(&mut self) -> Option<u32> {
        match self.state {
            TriggerState::Error { page } if self.online => {
                self.reconnect_retry_pending = false;
                self.state = TriggerState::Loading { page };
                Some(page)
            }
            _ => None,
        }
    }

    /// Applies an online/offline transition. Returns the delay after which
    /// [`LoadMoreTrigger::on_reconnect_timer`] should be called when coming
    /// back online after a failed page.
    pub fn on_connectivity(&mut self, online: bool) -> Option<Duration> {
        let was_online = self.online;
        self.online = online;
        if online
            && !was_online
            && !self.reconnect_retry_pending
            && matches!(self.state, TriggerState::Error { .. })
        {
            self.reconnect_retry_pending = true;
            return Some(RECONNECT_RETRY_DELAY);
        }
        None
    }

    /// Fires the automatic retry scheduled by a reconnect, at most once.
    pub fn on_reconnect_timer(&mut self) -> Option<u32> {
        if !self.reconnect_retry_pending {
            return None;
        }
        self.reconnect_retry_pending = false;
        self.retry()
    }

    /// Retry affordance for the current failure, if there is one.
    pub fn retry_control(&self) -> Option<RetryControl> {
        match self.state {
            TriggerState::Error { .. } if self.online => Some(RetryControl::AVAILABLE),
            TriggerState::Error { .. } => Some(RetryControl::WAITING_FOR_CONNECTION),
            _ => None,
        }
    }
}

/// Visible region of the scroll container, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub scroll_top: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(scroll_top: f64, height: f64) -> Self {
        Self { scroll_top, height }
    }

    /// Viewport scrolled so its bottom edge sits at `content_height`.
    pub fn at_bottom_of(content_height: f64, height: f64) -> Self {
        Self {
            scroll_top: (content_height - height).max(0.0),
            height,
        }
    }
}

/// Decides whether the sentinel is within `margin` pixels of the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProximityObserver {
    pub margin: f64,
}

impl Default for ProximityObserver {
    fn default() -> Self {
        Self {
            margin: DEFAULT_SCROLL_MARGIN_PX,
        }
    }
}

impl ProximityObserver {
    pub fn new(margin: f64) -> Self {
        Self {
            margin: margin.max(0.0),
        }
    }

    /// Whether a sentinel spanning `sentinel_top..sentinel_top + sentinel_height`
    /// overlaps the viewport grown by the margin on every side.
    pub fn is_intersecting(
        &self,
        viewport: &Viewport,
        sentinel_top: f64,
        sentinel_height: f64,
    ) -> bool {
        let top = viewport.scroll_top - self.margin;
        let bottom = viewport.scroll_top + viewport.height + self.margin;
        sentinel_top <= bottom && sentinel_top + sentinel_height >= top
    }
}
