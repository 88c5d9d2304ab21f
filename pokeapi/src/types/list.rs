//! Listing types returned by the `/pokemon` endpoint.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::PokemonID;
use crate::Error;

/// A name/url pair pointing at another API resource.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

impl NamedResource {
    /// Extracts the numeric id from the trailing path segment of `url`
    /// (e.g. `.../pokemon/25/` yields 25).
    pub fn id(&self) -> Result<PokemonID, Error> {
        extract_id(&self.url)
    }
}

/// One page of the listing endpoint.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NamedResourceList {
    /// Total number of resources across all pages.
    pub count: u64,
    /// URL of the next page, absent on the last page.
    pub next: Option<String>,
    /// URL of the previous page, absent on the first page.
    pub previous: Option<String>,
    pub results: Vec<NamedResource>,
}

fn id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"/(\d+)/$").expect("id pattern is valid"))
}

/// Parses the id out of a resource URL ending in `/<digits>/`.
pub(crate) fn extract_id(url: &str) -> Result<PokemonID, Error> {
    id_pattern()
        .captures(url)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<PokemonID>().ok())
        .ok_or_else(|| Error::Extraction {
            url: url.to_string(),
        })
}
