//! Error types for the API client.

/// Errors that can occur when making API requests.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The request never produced a response (connect failure, timeout, or
    /// the body could not be read).
    #[error("network request failed: {0}")]
    Network(String),
    /// The API returned a non-success status.
    #[error("Pokemon API request failed: {status} {status_text}")]
    HttpStatus {
        status: u16,
        status_text: String,
        body: String,
    },
    /// The response body did not match the expected shape.
    #[error("response failed validation: {0}")]
    Validation(String),
    /// A listing entry's URL carried no trailing numeric id.
    #[error("Could not extract ID from URL: {url}")]
    Extraction { url: String },
    /// The client could not be constructed or a URL could not be built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl Error {
    /// Whether this error looks like a connectivity failure rather than an
    /// answer from the server.
    ///
    /// Transport errors always qualify. Other variants qualify only when
    /// their message mentions a network or fetch failure, which is how
    /// proxies and some TLS stacks surface dropped connections.
    pub fn is_network(&self) -> bool {
        match self {
            Error::Network(_) => true,
            Error::HttpStatus { .. } | Error::Extraction { .. } => false,
            Error::Validation(msg) | Error::InvalidRequest(msg) => {
                let lower = msg.to_lowercase();
                lower.contains("network") || lower.contains("fetch")
            }
        }
    }
}
