//! Compiled-in tuning constants for the catalog.

use std::time::Duration;

/// Entries per listing page.
pub const PAGE_SIZE: u32 = pokeapi::PAGE_SIZE;

/// Listing pages are served from cache without refetching for this long.
pub const LIST_STALE_TIME: Duration = Duration::from_secs(5 * 60);

/// Detail records are served from cache without refetching for this long.
pub const DETAIL_STALE_TIME: Duration = Duration::from_secs(10 * 60);

/// Distance in pixels around the viewport inside which the sentinel counts
/// as visible.
pub const DEFAULT_SCROLL_MARGIN_PX: f64 = 500.0;

/// Delay before the automatic retry issued when connectivity returns.
pub const RECONNECT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// How often the reachability probe checks the upstream host.
pub const PROBE_INTERVAL: Duration = Duration::from_secs(5);

/// Upper bound on a single reachability probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(3);
