//! Query builder for the `/pokemon` listing endpoint.

use url::Url;

use super::common::Query;

/// Number of entries requested per listing page.
pub const PAGE_SIZE: u32 = 20;

/// Offset-based pagination parameters for the listing endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListQuery {
    pub limit: u32,
    pub offset: u32,
}

impl Default for ListQuery {
    fn default() -> ListQuery {
        ListQuery {
            limit: PAGE_SIZE,
            offset: 0,
        }
    }
}

impl ListQuery {
    /// Builds the query for a 1-indexed page of [`PAGE_SIZE`] entries.
    ///
    /// Page 0 is treated as page 1.
    pub fn for_page(page: u32) -> Self {
        Self::default().with_page(page)
    }

    /// Sets the page number (1-indexed), keeping the current limit.
    pub fn with_page(mut self, page: u32) -> Self {
        self.offset = page.saturating_sub(1).saturating_mul(self.limit);
        self
    }

    /// Sets the number of entries per page. Call before [`ListQuery::with_page`].
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

impl Query for ListQuery {
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        url.query_pairs_mut()
            .append_pair("limit", &self.limit.to_string())
            .append_pair("offset", &self.offset.to_string());
        url
    }
}
