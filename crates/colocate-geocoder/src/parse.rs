//! Normalization of raw Nominatim hits into [`GeocodedLocation`]s.
//!
//! Nominatim encodes coordinates as strings (`"lat": "37.32"`) and the
//! bounding box as four strings in `[south, north, west, east]` order. Numbers
//! are accepted too so other Nominatim-compatible servers parse the same way.

use colocate_core::{BoundingBox, Coordinate, GeocodedLocation};
use serde_json::Value;

use crate::error::GeocodeError;

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

fn required_f64(hit: &Value, key: &str) -> Result<f64, GeocodeError> {
    hit.get(key)
        .and_then(as_f64)
        .ok_or_else(|| GeocodeError::MalformedHit {
            reason: format!("missing or non-numeric '{key}'"),
        })
}

fn parse_bbox(hit: &Value) -> Result<Option<BoundingBox>, GeocodeError> {
    let Some(raw) = hit.get("boundingbox") else {
        return Ok(None);
    };
    let edges: Option<Vec<f64>> = raw
        .as_array()
        .and_then(|items| items.iter().map(as_f64).collect());
    match edges.as_deref() {
        Some(&[south, north, west, east]) if south <= north => {
            Ok(Some(BoundingBox::new(south, north, west, east)))
        }
        _ => Err(GeocodeError::MalformedHit {
            reason: format!("unusable boundingbox {raw}"),
        }),
    }
}

/// Converts one hit object into a [`GeocodedLocation`], keeping the whole
/// object as the raw payload.
///
/// # Errors
///
/// Returns [`GeocodeError::MalformedHit`] when `lat`, `lon` or `display_name`
/// is missing, or when a present `boundingbox` is not four ordered numbers.
pub fn parse_hit(hit: Value) -> Result<GeocodedLocation, GeocodeError> {
    let lat = required_f64(&hit, "lat")?;
    let lon = required_f64(&hit, "lon")?;
    let address = hit
        .get("display_name")
        .and_then(Value::as_str)
        .ok_or_else(|| GeocodeError::MalformedHit {
            reason: "missing 'display_name'".to_owned(),
        })?
        .to_owned();
    let bbox = parse_bbox(&hit)?;

    Ok(GeocodedLocation {
        address,
        coordinate: Coordinate::new(lat, lon),
        bbox,
        raw: hit,
    })
}

/// Parses a Nominatim `/search` response body: a JSON array of hits.
///
/// # Errors
///
/// Returns [`GeocodeError::Deserialize`] if the body is not a JSON array and
/// [`GeocodeError::MalformedHit`] if any hit is unusable.
pub fn parse_search_body(body: &str, context: &str) -> Result<Vec<GeocodedLocation>, GeocodeError> {
    let hits: Vec<Value> = serde_json::from_str(body).map_err(|e| GeocodeError::Deserialize {
        context: context.to_owned(),
        source: e,
    })?;
    hits.into_iter().map(parse_hit).collect()
}
