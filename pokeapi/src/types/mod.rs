mod list;
pub use self::list::{NamedResource, NamedResourceList};

mod pokemon;
pub use self::pokemon::{
    Artwork, OtherSprites, Pokemon, PokemonID, Sprites, StatEntry, TypeSlot,
};
