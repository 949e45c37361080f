//! Service configuration loader - parses floodmap.toml
//!
//! Separates provider endpoints, timeouts, and fallback tuning from code so
//! they can be adjusted without recompiling. Every field has a default, so
//! a missing file (or a partial one) is valid. After the file is read,
//! a handful of `FLOODMAP_*` environment variables (optionally from `.env`)
//! override it.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::model::GeoPoint;

/// Config file read when `FLOODMAP_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "floodmap.toml";

// ---------------------------------------------------------------------------
// Configuration structures
// ---------------------------------------------------------------------------

/// Root configuration structure for TOML parsing
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub sources: SourcesConfig,
    pub http: HttpConfig,
    pub region: RegionConfig,
    pub synthetic: SyntheticConfig,
    pub endpoint: EndpointConfig,
}

/// Upstream provider endpoints
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SourcesConfig {
    pub usgs_iv_url: String,
    pub nws_alerts_url: String,
    pub overpass_url: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            usgs_iv_url: "https://waterservices.usgs.gov/nwis/iv/".to_string(),
            nws_alerts_url: "https://api.weather.gov/alerts/active".to_string(),
            overpass_url: "https://overpass-api.de/api/interpreter".to_string(),
        }
    }
}

/// Outbound HTTP behaviour
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-adapter-call budget; a call exceeding it counts as a network error.
    pub timeout_secs: u64,
    /// NWS rejects requests without an identifying User-Agent.
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 5,
            user_agent: "floodmap_service/0.1 (flood map aggregation)".to_string(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Defaults applied when a request omits its center or radius
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct RegionConfig {
    pub default_latitude: f64,
    pub default_longitude: f64,
    pub default_radius_miles: i64,
}

impl Default for RegionConfig {
    fn default() -> Self {
        // San Francisco
        Self {
            default_latitude: 37.7749,
            default_longitude: -122.4194,
            default_radius_miles: 50,
        }
    }
}

impl RegionConfig {
    pub fn default_center(&self) -> GeoPoint {
        GeoPoint::new(self.default_latitude, self.default_longitude)
    }
}

/// Tuning for the sample and synthetic fallbacks
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SyntheticConfig {
    /// Fixed seed for reproducible fallback output. `None` draws a fresh
    /// seed per pipeline.
    pub seed: Option<u64>,
    pub observation_count: usize,
    pub closure_count: usize,
    /// Append the synthetic generator to the weather-alert chain. Set to
    /// false to leave the alert category empty when NWS is unavailable.
    pub alert_fallback: bool,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            seed: None,
            observation_count: 3,
            closure_count: 3,
            alert_fallback: true,
        }
    }
}

/// HTTP endpoint settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct EndpointConfig {
    pub bind_address: String,
    pub port: u16,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl EndpointConfig {
    /// Port to serve on: a command-line port wins over the configured one.
    pub fn port_or(&self, cli_port: Option<u16>) -> u16 {
        cli_port.unwrap_or(self.port)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Parses configuration from a TOML string.
pub fn parse_config(contents: &str, origin: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = toml::from_str(contents).map_err(|e| ConfigError::Parse {
        path: origin.to_string(),
        source: e,
    })?;
    validate(&config)?;
    Ok(config)
}

/// Loads configuration from `path`. A missing file yields the defaults;
/// an unreadable or malformed one is an error.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let path_str = path.display().to_string();
    if !path.exists() {
        tracing::debug!(path = %path_str, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path_str.clone(),
        source: e,
    })?;

    parse_config(&contents, &path_str)
}

/// Loads `.env`, reads the config file named by `FLOODMAP_CONFIG` (or
/// `floodmap.toml`), then applies environment overrides.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    dotenv::dotenv().ok();

    let path = env::var("FLOODMAP_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let mut config = load_config_from(Path::new(&path))?;
    apply_env_overrides(&mut config, |key| env::var(key).ok())?;
    validate(&config)?;
    Ok(config)
}

/// Applies `FLOODMAP_SEED`, `FLOODMAP_TIMEOUT_SECS`, and
/// `FLOODMAP_USER_AGENT` from `lookup`.
///
/// Takes the lookup as a closure so tests can supply values without
/// touching the process environment.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(seed) = lookup("FLOODMAP_SEED") {
        let parsed = seed.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
            key: "FLOODMAP_SEED".to_string(),
            value: seed.clone(),
        })?;
        config.synthetic.seed = Some(parsed);
    }

    if let Some(timeout) = lookup("FLOODMAP_TIMEOUT_SECS") {
        config.http.timeout_secs =
            timeout.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                key: "FLOODMAP_TIMEOUT_SECS".to_string(),
                value: timeout.clone(),
            })?;
    }

    if let Some(agent) = lookup("FLOODMAP_USER_AGENT") {
        config.http.user_agent = agent;
    }

    Ok(())
}

fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    if config.http.timeout_secs == 0 {
        return Err(ConfigError::InvalidValue {
            key: "http.timeout_secs".to_string(),
            value: "0".to_string(),
        });
    }
    if !config.region.default_center().is_valid() {
        return Err(ConfigError::InvalidValue {
            key: "region.default_latitude/default_longitude".to_string(),
            value: format!(
                "{}, {}",
                config.region.default_latitude, config.region.default_longitude
            ),
        });
    }
    if config.region.default_radius_miles <= 0 {
        return Err(ConfigError::InvalidValue {
            key: "region.default_radius_miles".to_string(),
            value: config.region.default_radius_miles.to_string(),
        });
    }
    if config.synthetic.observation_count == 0 || config.synthetic.closure_count == 0 {
        // the last-resort generator must never come back empty
        return Err(ConfigError::InvalidValue {
            key: "synthetic.observation_count/closure_count".to_string(),
            value: "0".to_string(),
        });
    }
    Ok(())
}
