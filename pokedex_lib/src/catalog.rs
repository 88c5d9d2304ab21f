//! Normalized catalog access: listing pages and detail records.
//!
//! A listing page costs one index request plus one detail request per
//! entry. The detail requests run concurrently and the page only resolves
//! once all of them have; any single failure fails the whole page.

use pokeapi::types::{NamedResource, Pokemon};
use pokeapi::{Client, ListQuery};
use tokio::task::JoinSet;

use crate::config::PAGE_SIZE;
use crate::error::PokedexError;
use crate::models::{DetailItem, ListItem, ListPage, PageDescriptor};
use crate::validation;

/// Uncached catalog client producing view models.
#[derive(Clone)]
pub struct Catalog {
    inner: Client,
}

impl Catalog {
    /// Creates a catalog backed by the production PokéAPI.
    pub fn new() -> Result<Self, PokedexError> {
        Ok(Self {
            inner: Client::new()?,
        })
    }

    /// Creates a catalog with a custom API root. Used for testing.
    pub fn with_base_url(base_url: &str) -> Result<Self, PokedexError> {
        Ok(Self {
            inner: Client::with_base_url(base_url)?,
        })
    }

    /// The API root this catalog talks to.
    pub fn base_url(&self) -> &str {
        self.inner.base_url()
    }

    /// Fetches listing page `page` (1-indexed) and resolves every entry.
    pub async fn fetch_list(&self, page: u32) -> Result<ListPage, PokedexError> {
        let page = validation::validate_page(i64::from(page))?;
        let listing = self
            .inner
            .get_pokemon_list(&ListQuery::for_page(page))
            .await?;

        let items = self.resolve_entries(&listing.results).await?;
        let pagination = PageDescriptor::from_listing(
            page,
            PAGE_SIZE,
            listing.count,
            listing.next.is_some(),
            listing.previous.is_some(),
        );
        tracing::debug!(
            "Resolved page {}/{} ({} items)",
            page,
            pagination.total_pages,
            items.len()
        );
        Ok(ListPage { items, pagination })
    }

    /// Fetches one detail record by id.
    pub async fn fetch_detail(&self, id: u32) -> Result<DetailItem, PokedexError> {
        let id = validation::validate_id(i64::from(id))?;
        let pokemon = self.inner.get_pokemon(id).await?;
        Ok(DetailItem::from(&pokemon))
    }

    /// Fans out one detail request per entry and joins them in listing order.
    async fn resolve_entries(
        &self,
        entries: &[NamedResource],
    ) -> Result<Vec<ListItem>, PokedexError> {
        let ids = entries
            .iter()
            .map(NamedResource::id)
            .collect::<Result<Vec<_>, _>>()?;

        let mut set: JoinSet<(usize, Result<Pokemon, pokeapi::Error>)> = JoinSet::new();
        for (index, id) in ids.into_iter().enumerate() {
            let client = self.inner.clone();
            set.spawn(async move { (index, client.get_pokemon(id).await) });
        }

        let mut slots: Vec<Option<ListItem>> = vec![None; entries.len()];
        while let Some(joined) = set.join_next().await {
            let outcome = joined
                .map_err(|e| {
                    tracing::error!("Detail request task failed: {}", e);
                    PokedexError::Network(e.to_string())
                })
                .and_then(|(index, result)| result.map(|p| (index, p)).map_err(PokedexError::from));
            match outcome {
                Ok((index, pokemon)) => slots[index] = Some(ListItem::from(&pokemon)),
                Err(err) => {
                    // Requests already issued run to completion; their results are dropped.
                    set.detach_all();
                    return Err(err);
                }
            }
        }

        Ok(slots.into_iter().flatten().collect())
    }
}
