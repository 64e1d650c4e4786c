//! Geocoding capability for the pipeline: the [`Geocoder`] trait, the
//! timeout [`RetryPolicy`], and a Nominatim HTTP implementation.

pub mod client;
pub mod error;
pub mod parse;
pub mod retry;

use std::future::Future;

use colocate_core::{BoundingBox, GeocodedLocation};

pub use client::{NominatimClient, MAX_LIMIT};
pub use error::GeocodeError;
pub use retry::RetryPolicy;

/// An address-to-coordinate lookup service.
///
/// Implementations make a single attempt per call and report timeouts as
/// [`GeocodeError::Timeout`]; retrying is the caller's [`RetryPolicy`]'s job.
pub trait Geocoder {
    /// Best single match for `query`, or `None` when nothing matches.
    fn geocode(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Option<GeocodedLocation>, GeocodeError>>;

    /// Up to `limit` matches for `query` inside `bbox`.
    fn search_within(
        &self,
        query: &str,
        bbox: &BoundingBox,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<GeocodedLocation>, GeocodeError>>;
}
