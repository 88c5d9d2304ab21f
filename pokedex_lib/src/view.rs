//! Presentation models: pagination controls, error panels, and the small
//! formatting rules the views share.

use crate::config::PAGE_SIZE;
use crate::error::PokedexError;
use crate::models::PageDescriptor;
use crate::trigger::RetryControl;

/// Page-number buttons shown at most, ellipses excluded.
const MAX_VISIBLE_PAGES: u32 = 5;

/// Stat value that fills a stat bar completely.
const STAT_BAR_MAX: f64 = 200.0;

/// One entry in the page-number strip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageLink {
    Page(u32),
    Ellipsis,
}

/// Page-number strip: always the first and last page, the current page
/// with its neighbours, and ellipses over the gaps.
pub fn page_numbers(current: u32, total: u32) -> Vec<PageLink> {
    if total <= MAX_VISIBLE_PAGES {
        return (1..=total).map(PageLink::Page).collect();
    }

    let mut links = vec![PageLink::Page(1)];
    if current > 3 {
        links.push(PageLink::Ellipsis);
    }
    let start = current.saturating_sub(1).max(2);
    let end = (current + 1).min(total - 1);
    for page in start..=end {
        links.push(PageLink::Page(page));
    }
    if current + 2 < total {
        links.push(PageLink::Ellipsis);
    }
    links.push(PageLink::Page(total));
    links
}

/// Everything the pagination footer renders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaginationControls {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: u64,
    pub previous_enabled: bool,
    pub next_enabled: bool,
    pub links: Vec<PageLink>,
    /// 1-based index of the first item on the page, 0 when it is empty.
    pub start_item: u64,
    /// 1-based index of the last item on the page.
    pub end_item: u64,
}

impl PaginationControls {
    pub fn new(pagination: &PageDescriptor, loading: bool) -> Self {
        let page = u64::from(pagination.current_page);
        let size = u64::from(PAGE_SIZE);
        let end_item = (page * size).min(pagination.total_count);
        let first = page.saturating_sub(1) * size + 1;
        // A page past the end holds nothing.
        let start_item = if first > end_item { 0 } else { first };
        Self {
            current_page: pagination.current_page,
            total_pages: pagination.total_pages,
            total_count: pagination.total_count,
            previous_enabled: pagination.current_page > 1 && !loading,
            next_enabled: pagination.current_page < pagination.total_pages && !loading,
            links: page_numbers(pagination.current_page, pagination.total_pages),
            start_item,
            end_item: if start_item == 0 { 0 } else { end_item },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start_item == 0
    }

    /// "Page 3 of 66 • 1302 Pokémon discovered"
    pub fn summary(&self) -> String {
        format!(
            "Page {} of {} • {} Pokémon discovered",
            self.current_page, self.total_pages, self.total_count
        )
    }

    /// The page strip as text, current page in brackets.
    pub fn strip(&self) -> String {
        self.links
            .iter()
            .map(|link| match link {
                PageLink::Page(p) if *p == self.current_page => format!("[{}]", p),
                PageLink::Page(p) => p.to_string(),
                PageLink::Ellipsis => "...".to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Which copy an error panel shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The device has no connectivity.
    Offline,
    /// A request failed while apparently online.
    ConnectionError,
    /// A page or detail view could not be loaded at all.
    LoadFailed,
    /// Rendering failed; the view is remounted on retry.
    Boundary,
}

/// User-facing error panel with its retry affordance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorPanel {
    pub kind: ErrorKind,
    pub title: &'static str,
    pub message: String,
    pub retry: RetryControl,
}

impl ErrorPanel {
    /// Panel for a failed "load more" page in infinite-scroll mode.
    pub fn load_more(err: &PokedexError, online: bool) -> Self {
        if !online {
            return Self {
                kind: ErrorKind::Offline,
                title: "You're offline",
                message: "Check your internet connection. Loading resumes automatically once you're back online.".to_string(),
                retry: RetryControl::WAITING_FOR_CONNECTION,
            };
        }
        Self {
            kind: ErrorKind::ConnectionError,
            title: "Connection error",
            message: format!("Couldn't load more Pokémon: {}", err),
            retry: RetryControl::AVAILABLE,
        }
    }

    /// Panel replacing a whole page or detail view that failed to load.
    pub fn load_failed(err: &PokedexError) -> Self {
        let message = err.to_string();
        Self {
            kind: ErrorKind::LoadFailed,
            title: "Oops! Something went wrong",
            message: if message.is_empty() {
                "We couldn't load the Pokémon data. Please check your connection and try again."
                    .to_string()
            } else {
                message
            },
            retry: RetryControl::AVAILABLE,
        }
    }

    /// Generic panel for a failure caught at the top level.
    pub fn boundary(message: &str) -> Self {
        Self {
            kind: ErrorKind::Boundary,
            title: "Something went wrong",
            message: if message.is_empty() {
                "An unexpected error occurred".to_string()
            } else {
                message.to_string()
            },
            retry: RetryControl::AVAILABLE,
        }
    }
}

/// Shown under the list once the last page is in.
pub const END_OF_LIST: &str = "You've caught them all!";

/// Shown for a route or id that resolves to nothing.
pub const NOT_FOUND: &str = "Pokémon not found";

/// Caption of the explicit load-more control.
pub fn load_more_label(has_more: bool, loading: bool) -> &'static str {
    match (has_more, loading) {
        (_, true) => "Loading...",
        (true, false) => "Load More Pokémon",
        (false, false) => "No more Pokémon to load",
    }
}

/// `#025`-style display id.
pub fn format_id(id: u32) -> String {
    format!("#{:03}", id)
}

/// `special-attack` -> `Special Attack`.
pub fn format_stat_name(name: &str) -> String {
    name.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Fraction of the stat bar a value fills, capped at 1.
pub fn stat_bar_fraction(value: u32) -> f64 {
    (f64::from(value) / STAT_BAR_MAX).min(1.0)
}

/// Text stat bar `width` cells wide.
pub fn stat_bar(value: u32, width: usize) -> String {
    let filled = (stat_bar_fraction(value) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}
