use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_USER_AGENT: &str = "colocate/0.1 (poi-correlation)";
/// Nominatim refuses limits above this.
pub const MAX_RESULT_LIMIT: u32 = 50;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .trim()
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    // Unset, empty or zero all mean "no limit".
    let parse_optional_u64 = |var: &str| -> Result<Option<u64>, ConfigError> {
        match lookup(var) {
            Err(_) => Ok(None),
            Ok(raw) if raw.trim().is_empty() => Ok(None),
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map(|v| (v > 0).then_some(v))
                .map_err(|e| invalid(var, e.to_string())),
        }
    };

    let parse_radius = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let value = or_default(var, default)
            .trim()
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if value.is_finite() && value > 0.0 {
            Ok(value)
        } else {
            Err(invalid(var, format!("radius must be positive, got {value}")))
        }
    };

    let nominatim_url = or_default("COLOCATE_NOMINATIM_URL", DEFAULT_NOMINATIM_URL);
    if !(nominatim_url.starts_with("http://") || nominatim_url.starts_with("https://")) {
        return Err(invalid(
            "COLOCATE_NOMINATIM_URL",
            format!("expected an http(s) URL, got '{nominatim_url}'"),
        ));
    }
    let user_agent = or_default("COLOCATE_USER_AGENT", DEFAULT_USER_AGENT);

    let request_timeout_secs = parse_optional_u64("COLOCATE_REQUEST_TIMEOUT_SECS")?;
    let max_attempts = parse_optional_u64("COLOCATE_MAX_ATTEMPTS")?
        .map(|v| u32::try_from(v).map_err(|e| invalid("COLOCATE_MAX_ATTEMPTS", e.to_string())))
        .transpose()?;

    let result_limit = parse_u32("COLOCATE_RESULT_LIMIT", "50")?;
    if result_limit == 0 {
        return Err(invalid(
            "COLOCATE_RESULT_LIMIT",
            "limit must be at least 1".to_string(),
        ));
    }

    let default_radius_miles = parse_radius("COLOCATE_DEFAULT_RADIUS_MILES", "5")?;
    let neighborhood_radius_miles = parse_radius("COLOCATE_NEIGHBORHOOD_RADIUS_MILES", "1")?;
    let staging_dir = PathBuf::from(or_default("COLOCATE_STAGING_DIR", "./staging"));
    let log_level = or_default("COLOCATE_LOG_LEVEL", "info");

    Ok(AppConfig {
        nominatim_url,
        user_agent,
        request_timeout_secs,
        max_attempts,
        result_limit,
        default_radius_miles,
        neighborhood_radius_miles,
        staging_dir,
        log_level,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
