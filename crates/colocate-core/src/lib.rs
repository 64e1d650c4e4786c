pub mod app_config;
pub mod config;
pub mod correlate;
pub mod geometry;
pub mod rank;
pub mod types;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use correlate::{correlate, CorrelationEntry, NearbyPoi};
pub use geometry::{
    contains, destination_point, distance_miles, enclosing_radius_miles, make_bounding_box,
};
pub use rank::{summarize, RankedMatch, SummaryEntry, DISPLAY_MATCHES, SUMMARY_ENTRIES};
pub use types::{
    derive_display_name, BoundingBox, CategorySet, Coordinate, GeocodedLocation, Place,
    PoiCollection, PoiRecord, PoiRole,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
