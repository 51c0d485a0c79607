use crate::geo::Coordinate;
use crate::ConfigError;

pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de";
pub const DEFAULT_USER_AGENT: &str = "scanprice/0.1 (supermarket-prices)";

const LATITUDE_VAR: &str = "SCANPRICE_LATITUDE";
const LONGITUDE_VAR: &str = "SCANPRICE_LONGITUDE";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub log_level: String,
    /// Base URL of the Overpass instance; `/api/interpreter` is appended.
    pub overpass_base_url: String,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    /// Upper bound on a single location attempt.
    pub location_timeout_secs: u64,
    /// Raw `SCANPRICE_LATITUDE`, unparsed.
    pub device_latitude: Option<String>,
    /// Raw `SCANPRICE_LONGITUDE`, unparsed.
    pub device_longitude: Option<String>,
}

impl AppConfig {
    /// Fixed device position from `SCANPRICE_LATITUDE`/`SCANPRICE_LONGITUDE`.
    ///
    /// Both variables or neither must be set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` when only one half of the pair is
    /// set, and `ConfigError::InvalidEnvVar` when a value is not a number or
    /// lies outside the valid range.
    pub fn device_position(&self) -> Result<Option<Coordinate>, ConfigError> {
        let latitude = parse_degrees(LATITUDE_VAR, self.device_latitude.as_deref())?;
        let longitude = parse_degrees(LONGITUDE_VAR, self.device_longitude.as_deref())?;
        match (latitude, longitude) {
            (Some(lat), Some(lon)) => Coordinate::new(lat, lon).map(Some).map_err(|e| {
                ConfigError::InvalidEnvVar {
                    var: format!("{LATITUDE_VAR}/{LONGITUDE_VAR}"),
                    reason: e.to_string(),
                }
            }),
            (None, None) => Ok(None),
            (Some(_), None) => Err(ConfigError::MissingEnvVar(LONGITUDE_VAR.into())),
            (None, Some(_)) => Err(ConfigError::MissingEnvVar(LATITUDE_VAR.into())),
        }
    }
}

fn parse_degrees(var: &str, raw: Option<&str>) -> Result<Option<f64>, ConfigError> {
    raw.map(|raw| {
        raw.trim()
            .parse::<f64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    })
    .transpose()
}
