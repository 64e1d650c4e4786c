use std::path::PathBuf;

/// Runtime configuration, constructed once at startup and passed by reference
/// to whichever stage needs it.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Geocoder endpoint including scheme, e.g. `https://nominatim.openstreetmap.org`.
    pub nominatim_url: String,
    pub user_agent: String,
    /// Caller-side HTTP timeout. `None` waits on the provider indefinitely.
    pub request_timeout_secs: Option<u64>,
    /// Attempts per provider call while it keeps timing out. `None` is unbounded.
    pub max_attempts: Option<u32>,
    pub result_limit: u32,
    /// Radius used to synthesize a box when the provider reports none.
    pub default_radius_miles: f64,
    /// Local box radius around each anchor during correlation.
    pub neighborhood_radius_miles: f64,
    pub staging_dir: PathBuf,
    pub log_level: String,
}
