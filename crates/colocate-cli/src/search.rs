//! Bounded POI search for one category around the resolved place.

use colocate_core::{Place, PoiCollection, PoiRecord};
use colocate_geocoder::{GeocodeError, Geocoder, RetryPolicy, MAX_LIMIT};

pub(crate) fn search_query(category: &str, place: &Place) -> String {
    format!("{category} near {}", place.display_name)
}

/// Searches `category` inside the place's search box and normalizes every hit.
///
/// # Errors
///
/// Returns the first non-timeout [`GeocodeError`]; timeouts are handled by
/// `retry`.
pub(crate) async fn search_category<G: Geocoder>(
    geocoder: &G,
    retry: &RetryPolicy,
    category: &str,
    place: &Place,
    limit: u32,
) -> Result<PoiCollection, GeocodeError> {
    let query = search_query(category, place);
    let limit = limit.min(MAX_LIMIT);
    let hits = retry
        .run(&query, || {
            geocoder.search_within(&query, &place.search_bbox, limit)
        })
        .await?;

    let records: Vec<PoiRecord> = hits
        .into_iter()
        .map(|hit| PoiRecord::from_geocoded(hit, category))
        .collect();
    tracing::info!(category, found = records.len(), "category search complete");
    Ok(PoiCollection::new(category, records))
}
