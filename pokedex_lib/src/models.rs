//! View models produced from upstream responses.

use std::fmt;
use std::str::FromStr;

use pokeapi::types::Pokemon;
use serde::{Deserialize, Serialize};

/// Summary record shown in listing grids. Identity is `id`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ListItem {
    pub id: u32,
    pub name: String,
    /// Small sprite URL, empty when the API has none.
    pub image_ref: String,
    /// Type names in slot order.
    pub categories: Vec<String>,
}

/// Full record shown on the detail page.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DetailItem {
    pub id: u32,
    pub name: String,
    /// Height in metres.
    pub height: f64,
    /// Weight in kilograms.
    pub weight: f64,
    pub image_ref: String,
    /// Official artwork URL, falling back to `image_ref`.
    pub large_image_ref: String,
    pub categories: Vec<String>,
    pub stats: Vec<Stat>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Stat {
    pub name: String,
    pub value: u32,
}

/// Where a listing page sits in the full index.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageDescriptor {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl PageDescriptor {
    /// Derives the descriptor from the listing's `count` and whether the
    /// `next`/`previous` links were present.
    pub fn from_listing(
        page: u32,
        page_size: u32,
        total_count: u64,
        has_next: bool,
        has_previous: bool,
    ) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            total_count.div_ceil(u64::from(page_size))
        };
        Self {
            current_page: page,
            total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
            total_count,
            has_next,
            has_previous,
        }
    }
}

/// One resolved listing page: its items plus the pagination descriptor.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ListPage {
    pub items: Vec<ListItem>,
    pub pagination: PageDescriptor,
}

/// How the listing view is being browsed. Part of the listing cache key.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Pagination,
    #[default]
    InfiniteScroll,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Pagination => "pagination",
            ViewMode::InfiniteScroll => "infinitescroll",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pagination" | "paged" => Ok(ViewMode::Pagination),
            "infinitescroll" | "infinite" | "scroll" | "loadmore" => Ok(ViewMode::InfiniteScroll),
            other => Err(format!("unknown view mode '{}'", other)),
        }
    }
}

impl From<&Pokemon> for ListItem {
    fn from(p: &Pokemon) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            image_ref: p.sprite(),
            categories: p.type_names(),
        }
    }
}

impl From<&Pokemon> for DetailItem {
    fn from(p: &Pokemon) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            height: f64::from(p.height) / 10.0,
            weight: f64::from(p.weight) / 10.0,
            image_ref: p.sprite(),
            large_image_ref: p.large_sprite(),
            categories: p.type_names(),
            stats: p
                .stats
                .iter()
                .map(|s| Stat {
                    name: s.stat.name.clone(),
                    value: s.base_stat,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_for_first_page() {
        let d = PageDescriptor::from_listing(1, 20, 1302, true, false);
        assert_eq!(
            d,
            PageDescriptor {
                current_page: 1,
                total_pages: 66,
                total_count: 1302,
                has_next: true,
                has_previous: false,
            }
        );
    }

    #[test]
    fn descriptor_exact_multiple() {
        assert_eq!(PageDescriptor::from_listing(1, 20, 40, true, false).total_pages, 2);
    }

    #[test]
    fn descriptor_empty_index() {
        let d = PageDescriptor::from_listing(1, 20, 0, false, false);
        assert_eq!(d.total_pages, 0);
        assert!(!d.has_next);
    }

    #[test]
    fn view_mode_parse_and_display() {
        assert_eq!("infinite".parse::<ViewMode>().unwrap(), ViewMode::InfiniteScroll);
        assert_eq!("Pagination".parse::<ViewMode>().unwrap(), ViewMode::Pagination);
        assert!("grid".parse::<ViewMode>().is_err());
        assert_eq!(ViewMode::InfiniteScroll.to_string(), "infinitescroll");
    }
}
