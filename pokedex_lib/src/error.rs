//! Error types for the library layer.

use thiserror::Error;

/// Errors produced by the library layer, mapping upstream API failures onto
/// the catalog's error taxonomy and adding cache and input failures.
#[derive(Error, Debug, Clone)]
pub enum PokedexError {
    /// The API answered with a non-success status.
    #[error("Pokemon API request failed: {status} {status_text}")]
    Upstream { status: u16, status_text: String },
    /// A response did not match the expected shape.
    #[error("Invalid response from Pokemon API: {0}")]
    Validation(String),
    /// A listing entry's URL carried no numeric id.
    #[error("Could not extract ID from URL: {url}")]
    Extraction { url: String },
    /// The request never reached the API, or connectivity is down.
    #[error("Network error: {0}")]
    Network(String),
    /// Caller-provided input was rejected before any request was made.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// A cached value could not be decoded.
    #[error("Cache error: {0}")]
    Cache(String),
}

impl PokedexError {
    /// Whether the failure points at lost connectivity rather than a
    /// server-side or data problem.
    pub fn is_network(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Validation(msg) | Self::Cache(msg) => {
                let lower = msg.to_lowercase();
                lower.contains("network") || lower.contains("fetch")
            }
            _ => false,
        }
    }

    /// Whether retrying the same request could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Upstream { .. } | Self::Network(_))
    }
}

impl From<pokeapi::Error> for PokedexError {
    fn from(e: pokeapi::Error) -> Self {
        let network = e.is_network();
        match e {
            pokeapi::Error::HttpStatus {
                status,
                status_text,
                ..
            } => Self::Upstream {
                status,
                status_text,
            },
            pokeapi::Error::Validation(msg) => Self::Validation(msg),
            pokeapi::Error::Extraction { url } => Self::Extraction { url },
            pokeapi::Error::Network(msg) => Self::Network(msg),
            pokeapi::Error::InvalidRequest(msg) if network => Self::Network(msg),
            pokeapi::Error::InvalidRequest(msg) => Self::InvalidInput(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_maps_to_upstream() {
        let err: PokedexError = pokeapi::Error::HttpStatus {
            status: 500,
            status_text: "Internal Server Error".into(),
            body: "boom".into(),
        }
        .into();
        assert!(matches!(err, PokedexError::Upstream { status: 500, .. }));
        assert!(err.is_retryable());
        assert!(!err.is_network());
    }

    #[test]
    fn transport_failure_maps_to_network() {
        let err: PokedexError = pokeapi::Error::Network("connection reset".into()).into();
        assert!(err.is_network());
        assert!(err.is_retryable());
    }

    #[test]
    fn deterministic_failures_are_not_retryable() {
        let extraction: PokedexError = pokeapi::Error::Extraction {
            url: "https://pokeapi.co/api/v2/pokemon/x/".into(),
        }
        .into();
        assert!(!extraction.is_retryable());
        assert!(!PokedexError::Validation("missing field `id`".into()).is_retryable());
        assert!(!PokedexError::InvalidInput("page must be positive".into()).is_retryable());
    }

    #[test]
    fn fetch_wording_in_invalid_request_is_network() {
        let err: PokedexError = pokeapi::Error::InvalidRequest("Failed to fetch".into()).into();
        assert!(matches!(err, PokedexError::Network(_)));
    }
}
