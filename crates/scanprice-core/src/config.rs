use crate::app_config::{AppConfig, DEFAULT_OVERPASS_URL, DEFAULT_USER_AGENT};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is invalid. The device position is
/// checked later by [`AppConfig::device_position`].
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
/// Returns `ConfigError` if a value is invalid. The device position is
/// checked later by [`AppConfig::device_position`].
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        let value = raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })?;
        if value == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(value)
    };

    let log_level = or_default("SCANPRICE_LOG_LEVEL", "warn");
    let overpass_base_url = or_default("SCANPRICE_OVERPASS_URL", DEFAULT_OVERPASS_URL);
    let http_timeout_secs = parse_u64("SCANPRICE_HTTP_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("SCANPRICE_USER_AGENT", DEFAULT_USER_AGENT);
    let location_timeout_secs = parse_u64("SCANPRICE_LOCATION_TIMEOUT_SECS", "60")?;

    let device_latitude = lookup("SCANPRICE_LATITUDE").ok();
    let device_longitude = lookup("SCANPRICE_LONGITUDE").ok();

    Ok(AppConfig {
        log_level,
        overpass_base_url,
        http_timeout_secs,
        user_agent,
        location_timeout_secs,
        device_latitude,
        device_longitude,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
