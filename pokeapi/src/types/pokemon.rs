//! Pokémon detail types returned by the `/pokemon/{id}` endpoint.
//!
//! Only the fields the catalog consumes are modelled; unknown fields are
//! ignored. Deserialization doubles as the response schema check.

use serde::{Deserialize, Serialize};

use super::NamedResource;

/// Numeric Pokémon identifier.
pub type PokemonID = u32;

/// Full Pokémon record.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Pokemon {
    pub id: PokemonID,
    pub name: String,
    /// Height in decimetres.
    pub height: u32,
    /// Weight in hectograms.
    pub weight: u32,
    pub sprites: Sprites,
    pub types: Vec<TypeSlot>,
    pub stats: Vec<StatEntry>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Sprites {
    pub front_default: Option<String>,
    pub front_shiny: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other: Option<OtherSprites>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork")]
    pub official_artwork: Artwork,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Artwork {
    pub front_default: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TypeSlot {
    pub slot: u32,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StatEntry {
    pub base_stat: u32,
    pub effort: u32,
    pub stat: NamedResource,
}

impl Pokemon {
    /// Small sprite URL, empty when the API has none.
    pub fn sprite(&self) -> String {
        self.sprites.front_default.clone().unwrap_or_default()
    }

    /// Official artwork URL, falling back to the small sprite.
    pub fn large_sprite(&self) -> String {
        self.sprites
            .other
            .as_ref()
            .and_then(|o| o.official_artwork.front_default.clone())
            .or_else(|| self.sprites.front_default.clone())
            .unwrap_or_default()
    }

    /// Type names in slot order as returned by the API.
    pub fn type_names(&self) -> Vec<String> {
        self.types.iter().map(|t| t.kind.name.clone()).collect()
    }
}
