use thiserror::Error;

/// Errors returned by a geocoding provider.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The request timed out, either locally or at the provider (408/504).
    /// The only condition the retry policy resubmits.
    #[error("geocoder timed out: {context}")]
    Timeout { context: String },

    #[error("rate limited by geocoder at {url}")]
    RateLimited { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A hit was missing a field every result must carry.
    #[error("malformed geocoder hit: {reason}")]
    MalformedHit { reason: String },

    #[error("invalid geocoder base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl GeocodeError {
    /// `true` for a provider or client timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            GeocodeError::Timeout { .. } => true,
            GeocodeError::Http(e) => e.is_timeout(),
            _ => false,
        }
    }
}
