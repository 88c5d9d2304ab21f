//! Running list of items for infinite-scroll browsing.
//!
//! Page 1 replaces whatever was accumulated; later pages append in arrival
//! order. The `has_next` flag of the most recent page decides completion.

use crate::models::{ListItem, PageDescriptor};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccumulatorState {
    Empty,
    Accumulating,
    Complete,
}

/// Items merged across successive listing pages.
#[derive(Debug, Default)]
pub struct ListAccumulator {
    items: Vec<ListItem>,
    last_page: Option<PageDescriptor>,
}

impl ListAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges the items of a successfully fetched page.
    pub fn apply(&mut self, items: Vec<ListItem>, pagination: PageDescriptor) {
        if pagination.current_page <= 1 {
            self.items = items;
        } else {
            self.items.extend(items);
        }
        self.last_page = Some(pagination);
    }

    /// Drops everything; the next page to load is page 1 again.
    pub fn reset(&mut self) {
        self.items.clear();
        self.last_page = None;
    }

    pub fn state(&self) -> AccumulatorState {
        match self.last_page {
            None => AccumulatorState::Empty,
            Some(page) if !page.has_next => AccumulatorState::Complete,
            Some(_) => AccumulatorState::Accumulating,
        }
    }

    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether another page should be requested.
    pub fn has_more(&self) -> bool {
        self.last_page.map_or(true, |page| page.has_next)
    }

    /// Page number the next fetch should ask for.
    pub fn next_page(&self) -> u32 {
        self.last_page.map_or(1, |page| page.current_page + 1)
    }

    /// Descriptor of the most recently merged page.
    pub fn last_page(&self) -> Option<&PageDescriptor> {
        self.last_page.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u32) -> ListItem {
        ListItem {
            id,
            name: format!("mon-{}", id),
            image_ref: String::new(),
            categories: vec!["normal".to_string()],
        }
    }

    fn page(n: u32, total_count: u64) -> PageDescriptor {
        PageDescriptor::from_listing(n, 20, total_count, u64::from(n) * 20 < total_count, n > 1)
    }

    fn items(range: std::ops::RangeInclusive<u32>) -> Vec<ListItem> {
        range.map(item).collect()
    }

    #[test]
    fn starts_empty() {
        let acc = ListAccumulator::new();
        assert_eq!(acc.state(), AccumulatorState::Empty);
        assert!(acc.has_more());
        assert_eq!(acc.next_page(), 1);
    }

    #[test]
    fn appends_pages_in_order() {
        let mut acc = ListAccumulator::new();
        acc.apply(items(1..=20), page(1, 50));
        acc.apply(items(21..=40), page(2, 50));
        acc.apply(items(41..=50), page(3, 50));

        assert_eq!(acc.len(), 20 + 20 + 10);
        let ids: Vec<u32> = acc.items().iter().map(|i| i.id).collect();
        assert_eq!(ids, (1..=50).collect::<Vec<_>>());
        assert_eq!(acc.state(), AccumulatorState::Complete);
        assert!(!acc.has_more());
    }

    #[test]
    fn first_page_replaces_stale_list() {
        let mut acc = ListAccumulator::new();
        acc.apply(items(1..=20), page(1, 100));
        acc.apply(items(21..=40), page(2, 100));
        acc.apply(items(1..=20), page(1, 100));

        assert_eq!(acc.len(), 20);
        assert_eq!(acc.next_page(), 2);
        assert_eq!(acc.state(), AccumulatorState::Accumulating);
    }

    #[test]
    fn reset_returns_to_page_one() {
        let mut acc = ListAccumulator::new();
        acc.apply(items(1..=20), page(1, 100));
        acc.reset();
        assert!(acc.is_empty());
        assert_eq!(acc.state(), AccumulatorState::Empty);
        assert_eq!(acc.next_page(), 1);
    }

    #[test]
    fn empty_index_completes_immediately() {
        let mut acc = ListAccumulator::new();
        acc.apply(Vec::new(), page(1, 0));
        assert_eq!(acc.state(), AccumulatorState::Complete);
        assert!(acc.is_empty());
    }
}
