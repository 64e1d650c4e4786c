//! HTTP client for a Nominatim-compatible `/search` endpoint.
//!
//! Makes exactly one request per call. Timeouts surface as
//! [`GeocodeError::Timeout`] so the caller's [`crate::RetryPolicy`] can decide
//! whether to resubmit; this client never retries on its own.
//!
//! The `reqwest::Client` is built once, but its pool keeps no idle
//! connections, so every request (each geocode, each category search) opens
//! its own connection.

use std::time::Duration;

use colocate_core::{AppConfig, BoundingBox, GeocodedLocation};
use reqwest::{Client, StatusCode, Url};

use crate::error::GeocodeError;
use crate::parse::parse_search_body;
use crate::Geocoder;

/// Nominatim's hard cap on `limit`.
pub const MAX_LIMIT: u32 = 50;

/// Client for a Nominatim `/search` endpoint.
///
/// Use [`NominatimClient::from_config`] in the binary, or
/// [`NominatimClient::new`] to point at a mock server in tests.
pub struct NominatimClient {
    client: Client,
    search_url: Url,
}

impl NominatimClient {
    /// Creates a client for `base_url` (scheme + host, optional path prefix).
    ///
    /// `timeout_secs = None` leaves the request without a caller-side timeout.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::InvalidBaseUrl`] if `base_url` does not parse,
    /// or [`GeocodeError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        base_url: &str,
        user_agent: &str,
        timeout_secs: Option<u64>,
    ) -> Result<Self, GeocodeError> {
        let mut builder = Client::builder()
            .user_agent(user_agent)
            .pool_max_idle_per_host(0);
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        // Ensure exactly one trailing slash so `join` appends rather than
        // replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let search_url = Url::parse(&normalised)
            .and_then(|base| base.join("search"))
            .map_err(|e| GeocodeError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Self { client, search_url })
    }

    /// # Errors
    ///
    /// See [`NominatimClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, GeocodeError> {
        Self::new(
            &config.nominatim_url,
            &config.user_agent,
            config.request_timeout_secs,
        )
    }

    fn build_url(&self, params: &[(&str, &str)]) -> Url {
        let mut url = self.search_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("format", "jsonv2");
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// Sends the request and maps transport and status failures onto
    /// [`GeocodeError`] variants.
    async fn request_hits(&self, url: Url) -> Result<Vec<GeocodedLocation>, GeocodeError> {
        tracing::debug!(%url, "geocoder request");
        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                return Err(GeocodeError::Timeout {
                    context: format!("{url}: {e}"),
                })
            }
            Err(e) => return Err(GeocodeError::Http(e)),
        };

        let status = response.status();
        match status {
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
                return Err(GeocodeError::Timeout {
                    context: format!("{url}: HTTP {}", status.as_u16()),
                });
            }
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(GeocodeError::RateLimited {
                    url: url.to_string(),
                });
            }
            s if !s.is_success() => {
                return Err(GeocodeError::UnexpectedStatus {
                    status: s.as_u16(),
                    url: url.to_string(),
                });
            }
            _ => {}
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) if e.is_timeout() => {
                return Err(GeocodeError::Timeout {
                    context: format!("{url}: {e}"),
                })
            }
            Err(e) => return Err(GeocodeError::Http(e)),
        };
        parse_search_body(&body, url.as_str())
    }
}

/// Formats a box as Nominatim's `viewbox=<west>,<north>,<east>,<south>`.
fn viewbox(bbox: &BoundingBox) -> String {
    format!("{},{},{},{}", bbox.west, bbox.north, bbox.east, bbox.south)
}

impl Geocoder for NominatimClient {
    async fn geocode(&self, query: &str) -> Result<Option<GeocodedLocation>, GeocodeError> {
        let url = self.build_url(&[("q", query), ("limit", "1")]);
        let hits = self.request_hits(url).await?;
        Ok(hits.into_iter().next())
    }

    async fn search_within(
        &self,
        query: &str,
        bbox: &BoundingBox,
        limit: u32,
    ) -> Result<Vec<GeocodedLocation>, GeocodeError> {
        let limit = limit.clamp(1, MAX_LIMIT);
        let limit_param = limit.to_string();
        let viewbox = viewbox(bbox);
        let url = self.build_url(&[
            ("q", query),
            ("limit", &limit_param),
            ("viewbox", &viewbox),
            ("bounded", "1"),
        ]);
        let mut hits = self.request_hits(url).await?;
        // Servers that ignore `limit` still must not hand back more than asked.
        hits.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(hits)
    }
}
