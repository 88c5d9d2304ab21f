//! Retry policy for upstream queries.

use std::time::Duration;

use crate::error::PokedexError;
use crate::models::ViewMode;

const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_BASE_DELAY_MS: u64 = 1000;
const DEFAULT_MAX_DELAY_MS: u64 = 30_000;

/// Exponential backoff: `min(base * 2^attempt, max)` with attempt counted
/// from zero, up to `max_retries` retries after the first failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
        }
    }
}

/// What a query is fetching, as far as the retry decision cares.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryContext {
    /// A listing page fetched for the given view mode.
    List { page: u32, mode: ViewMode },
    /// A detail record.
    Detail,
}

impl RetryContext {
    /// Later infinite-scroll pages surface connectivity loss immediately
    /// instead of hiding it behind the backoff schedule.
    fn fails_fast_on_network_error(&self) -> bool {
        matches!(
            self,
            RetryContext::List {
                page,
                mode: ViewMode::InfiniteScroll,
            } if *page > 1
        )
    }
}

impl RetryPolicy {
    /// Reads overrides from `POKEDEX_RETRY_MAX`, `POKEDEX_RETRY_BASE_MS` and
    /// `POKEDEX_RETRY_MAX_MS`, falling back to the compiled-in defaults.
    pub fn from_env() -> Self {
        Self {
            max_retries: env_parse("POKEDEX_RETRY_MAX", DEFAULT_MAX_RETRIES),
            base_delay_ms: env_parse("POKEDEX_RETRY_BASE_MS", DEFAULT_BASE_DELAY_MS),
            max_delay_ms: env_parse("POKEDEX_RETRY_MAX_MS", DEFAULT_MAX_DELAY_MS),
        }
    }

    /// Backoff before retry number `attempt` (0 = first retry).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exp = 1u64 << attempt.min(30);
        let ms = self
            .base_delay_ms
            .saturating_mul(exp)
            .min(self.max_delay_ms);
        Duration::from_millis(ms)
    }

    /// Decides whether to retry after `failure_count` earlier retries.
    ///
    /// `online` is the connectivity monitor's current view; being offline
    /// counts as a network failure regardless of the error itself.
    pub fn should_retry(
        &self,
        failure_count: u32,
        err: &PokedexError,
        ctx: RetryContext,
        online: bool,
    ) -> bool {
        if ctx.fails_fast_on_network_error() && (!online || err.is_network()) {
            return false;
        }
        err.is_retryable() && failure_count < self.max_retries
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<T>().ok())
        .unwrap_or(default)
}
