//! Input validation for page numbers and Pokémon ids.

use crate::error::PokedexError;
use crate::models::ViewMode;

/// Highest page the listing endpoint can be asked for without the offset
/// overflowing.
const MAX_PAGE: i64 = (u32::MAX / crate::config::PAGE_SIZE) as i64;

/// Page numbers are 1-indexed and must stay within offset range.
pub fn validate_page(page: i64) -> Result<u32, PokedexError> {
    if page < 1 {
        return Err(PokedexError::InvalidInput(format!(
            "page must be a positive integer, got {}",
            page
        )));
    }
    if page > MAX_PAGE {
        return Err(PokedexError::InvalidInput(format!(
            "page {} is out of range (max {})",
            page, MAX_PAGE
        )));
    }
    Ok(page as u32)
}

/// Pokémon ids are positive integers.
pub fn validate_id(id: i64) -> Result<u32, PokedexError> {
    if id < 1 || id > i64::from(u32::MAX) {
        return Err(PokedexError::InvalidInput(format!(
            "id must be a positive integer, got {}",
            id
        )));
    }
    Ok(id as u32)
}

/// Parses an id from free text such as a route segment.
pub fn parse_id(input: &str) -> Result<u32, PokedexError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PokedexError::InvalidInput(format!(
            "'{}' is not a numeric id",
            input
        )));
    }
    let id = trimmed
        .parse::<i64>()
        .map_err(|_| PokedexError::InvalidInput(format!("'{}' is out of range", input)))?;
    validate_id(id)
}

/// Parses a view mode name such as `pagination` or `infinite`.
pub fn parse_mode(input: &str) -> Result<ViewMode, PokedexError> {
    input.parse().map_err(PokedexError::InvalidInput)
}
