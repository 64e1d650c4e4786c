//! Domain types shared by every stage of the pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geometry::{enclosing_radius_miles, make_bounding_box};

/// A WGS-84 latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Axis-aligned lat/lon rectangle.
///
/// The canonical edge order is `[south, north, west, east]`, which is also how
/// the box is serialized. Boxes crossing the antimeridian are not supported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

impl BoundingBox {
    #[must_use]
    pub const fn new(south: f64, north: f64, west: f64, east: f64) -> Self {
        Self {
            south,
            north,
            west,
            east,
        }
    }

    #[must_use]
    pub const fn south_west(&self) -> Coordinate {
        Coordinate::new(self.south, self.west)
    }

    #[must_use]
    pub const fn north_east(&self) -> Coordinate {
        Coordinate::new(self.north, self.east)
    }

    /// Inclusive point-in-box test. No antimeridian or pole handling.
    #[must_use]
    pub fn contains(&self, point: Coordinate) -> bool {
        self.south <= point.lat
            && point.lat <= self.north
            && self.west <= point.lon
            && point.lon <= self.east
    }

    /// Edges in canonical `[south, north, west, east]` order.
    #[must_use]
    pub const fn to_array(self) -> [f64; 4] {
        [self.south, self.north, self.west, self.east]
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from([south, north, west, east]: [f64; 4]) -> Self {
        Self::new(south, north, west, east)
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(bbox: BoundingBox) -> Self {
        bbox.to_array()
    }
}

/// One normalized geocoder hit, before it is interpreted as a place or a POI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodedLocation {
    /// Provider display address, e.g. `"Cupertino, Santa Clara County, California, United States"`.
    pub address: String,
    pub coordinate: Coordinate,
    /// Provider-native bounding box, if the provider reported one.
    pub bbox: Option<BoundingBox>,
    /// The provider's JSON object for this hit, passed through untouched.
    pub raw: serde_json::Value,
}

/// The resolved anchor area for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub display_name: String,
    pub coordinate: Coordinate,
    pub native_bbox: Option<BoundingBox>,
    /// `true` when the provider gave no box and one was synthesized.
    pub add_bbox: bool,
    /// Regular box of `radius_miles` around `coordinate`, used for POI search.
    pub search_bbox: BoundingBox,
    pub radius_miles: f64,
    pub raw: serde_json::Value,
}

impl Place {
    /// Builds the place from a confirmed geocoder hit.
    ///
    /// Uses the provider box when present, otherwise synthesizes one of
    /// `default_radius_miles`. Either way the search box is re-synthesized
    /// around the center at the radius that encloses that box, so downstream
    /// search always sees a regular box.
    #[must_use]
    pub fn from_geocoded(location: GeocodedLocation, default_radius_miles: f64) -> Self {
        let center = location.coordinate;
        let (bbox, add_bbox) = match location.bbox {
            Some(native) => (native, false),
            None => (make_bounding_box(center, default_radius_miles), true),
        };
        let radius_miles = enclosing_radius_miles(center, &bbox);
        let search_bbox = make_bounding_box(center, radius_miles);

        Self {
            display_name: location.address,
            coordinate: center,
            native_bbox: location.bbox,
            add_bbox,
            search_bbox,
            radius_miles,
            raw: location.raw,
        }
    }
}

/// Pipeline role of a POI category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoiRole {
    Anchor,
    Secondary,
    Tertiary,
}

impl PoiRole {
    pub const ALL: [PoiRole; 3] = [PoiRole::Anchor, PoiRole::Secondary, PoiRole::Tertiary];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PoiRole::Anchor => "anchor",
            PoiRole::Secondary => "secondary",
            PoiRole::Tertiary => "tertiary",
        }
    }
}

impl std::fmt::Display for PoiRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three category names searched in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySet {
    pub anchor: String,
    pub secondary: String,
    pub tertiary: String,
}

impl CategorySet {
    pub const DEFAULT_ANCHOR: &'static str = "park";
    pub const DEFAULT_SECONDARY: &'static str = "book shop";
    pub const DEFAULT_TERTIARY: &'static str = "bakery";

    #[must_use]
    pub fn new(
        anchor: impl Into<String>,
        secondary: impl Into<String>,
        tertiary: impl Into<String>,
    ) -> Self {
        Self {
            anchor: anchor.into(),
            secondary: secondary.into(),
            tertiary: tertiary.into(),
        }
    }

    #[must_use]
    pub fn default_for(role: PoiRole) -> &'static str {
        match role {
            PoiRole::Anchor => Self::DEFAULT_ANCHOR,
            PoiRole::Secondary => Self::DEFAULT_SECONDARY,
            PoiRole::Tertiary => Self::DEFAULT_TERTIARY,
        }
    }

    #[must_use]
    pub fn get(&self, role: PoiRole) -> &str {
        match role {
            PoiRole::Anchor => &self.anchor,
            PoiRole::Secondary => &self.secondary,
            PoiRole::Tertiary => &self.tertiary,
        }
    }
}

impl Default for CategorySet {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_ANCHOR,
            Self::DEFAULT_SECONDARY,
            Self::DEFAULT_TERTIARY,
        )
    }
}

/// Display name for a provider hit: the provider's `"name"` field when it is a
/// non-empty string, else the text before the first comma of the address.
#[must_use]
pub fn derive_display_name(raw: &serde_json::Value, address: &str) -> String {
    raw.get("name")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map_or_else(
            || address.split(',').next().unwrap_or_default().trim().to_owned(),
            str::to_owned,
        )
}

/// One POI search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiRecord {
    pub name: String,
    pub address: String,
    pub coordinate: Coordinate,
    pub category: String,
    pub raw: serde_json::Value,
}

impl PoiRecord {
    #[must_use]
    pub fn from_geocoded(location: GeocodedLocation, category: &str) -> Self {
        Self {
            name: derive_display_name(&location.raw, &location.address),
            address: location.address,
            coordinate: location.coordinate,
            category: category.to_owned(),
            raw: location.raw,
        }
    }
}

/// A named POI collection: every record found for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiCollection {
    pub category: String,
    pub fetched_at: DateTime<Utc>,
    pub records: Vec<PoiRecord>,
}

impl PoiCollection {
    #[must_use]
    pub fn new(category: impl Into<String>, records: Vec<PoiRecord>) -> Self {
        Self {
            category: category.into(),
            fetched_at: Utc::now(),
            records,
        }
    }
}
