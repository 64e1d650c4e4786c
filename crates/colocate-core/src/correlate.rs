//! Anchor correlation: which secondary and tertiary POIs sit inside each
//! anchor's local neighborhood box.

use serde::{Deserialize, Serialize};

use crate::geometry::{distance_miles, make_bounding_box};
use crate::types::{BoundingBox, PoiRecord};

/// Default neighborhood radius around each anchor, in miles.
pub const DEFAULT_NEIGHBORHOOD_RADIUS_MILES: f64 = 1.0;

/// A record inside an anchor's box, with its distance from that anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyPoi {
    pub record: PoiRecord,
    pub distance_miles: f64,
}

/// An anchor together with every secondary/tertiary record inside its box.
///
/// Match lists keep input order; distance sorting happens at ranking time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationEntry {
    pub anchor: PoiRecord,
    pub secondary: Vec<NearbyPoi>,
    pub tertiary: Vec<NearbyPoi>,
}

impl CorrelationEntry {
    #[must_use]
    pub fn total_hits(&self) -> usize {
        self.secondary.len() + self.tertiary.len()
    }
}

fn within(anchor: &PoiRecord, records: &[PoiRecord], bbox: &BoundingBox) -> Vec<NearbyPoi> {
    records
        .iter()
        .filter(|r| bbox.contains(r.coordinate))
        .map(|r| NearbyPoi {
            record: r.clone(),
            distance_miles: distance_miles(anchor.coordinate, r.coordinate),
        })
        .collect()
}

/// Correlates every anchor against the secondary and tertiary collections.
///
/// Anchors with no match in either collection are dropped. `tertiary` may be
/// empty for a two-collection correlation.
#[must_use]
pub fn correlate(
    anchors: &[PoiRecord],
    secondary: &[PoiRecord],
    tertiary: &[PoiRecord],
    radius_miles: f64,
) -> Vec<CorrelationEntry> {
    let entries: Vec<CorrelationEntry> = anchors
        .iter()
        .filter_map(|anchor| {
            let local = make_bounding_box(anchor.coordinate, radius_miles);
            let near_secondary = within(anchor, secondary, &local);
            let near_tertiary = within(anchor, tertiary, &local);
            if near_secondary.is_empty() && near_tertiary.is_empty() {
                tracing::debug!(anchor = %anchor.name, "no neighbors inside local box");
                return None;
            }
            Some(CorrelationEntry {
                anchor: anchor.clone(),
                secondary: near_secondary,
                tertiary: near_tertiary,
            })
        })
        .collect();

    tracing::info!(
        anchors = anchors.len(),
        matched = entries.len(),
        radius_miles,
        "correlation complete"
    );
    entries
}

#[cfg(test)]
#[path = "correlate_test.rs"]
mod tests;
