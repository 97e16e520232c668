//! # Runtime configuration
//!
//! [`NeoConfig`] gathers the endpoints and credentials used by the network collaborators
//! (NASA NeoWs, JPL Horizons, CelesTrak). Values default to the public services and can be
//! overridden through environment variables:
//!
//! | Variable                | Field            | Default                                   |
//! |-------------------------|------------------|-------------------------------------------|
//! | `NASA_API_KEY`          | `api_key`        | `DEMO_KEY`                                |
//! | `NEOWS_BASE_URL`        | `neows_base_url` | `https://api.nasa.gov/neo/rest/v1`        |
//! | `HORIZONS_URL`          | `horizons_url`   | `https://ssd.jpl.nasa.gov/api/horizons_file.api` |
//! | `CELESTRAK_URL`         | `celestrak_url`  | CelesTrak `stations` group in TLE format  |
//! | `NEO_HTTP_TIMEOUT_SECS` | `http_timeout`   | 10 s                                      |

use std::time::Duration;

use crate::neo_errors::NeoError;

pub const DEFAULT_NEOWS_BASE_URL: &str = "https://api.nasa.gov/neo/rest/v1";
pub const DEFAULT_HORIZONS_URL: &str = "https://ssd.jpl.nasa.gov/api/horizons_file.api";
pub const DEFAULT_CELESTRAK_URL: &str =
    "https://celestrak.org/NORAD/elements/gp.php?GROUP=stations&FORMAT=tle";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct NeoConfig {
    pub api_key: String,
    pub neows_base_url: String,
    pub horizons_url: String,
    pub celestrak_url: String,
    pub http_timeout: Duration,
}

impl Default for NeoConfig {
    fn default() -> Self {
        NeoConfig {
            api_key: "DEMO_KEY".to_string(),
            neows_base_url: DEFAULT_NEOWS_BASE_URL.to_string(),
            horizons_url: DEFAULT_HORIZONS_URL.to_string(),
            celestrak_url: DEFAULT_CELESTRAK_URL.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl NeoConfig {
    /// Build a configuration from the process environment, falling back on defaults.
    ///
    /// Return
    /// ------
    /// * The configuration, or [`NeoError::InvalidConfig`] if `NEO_HTTP_TIMEOUT_SECS`
    ///   is not an unsigned integer.
    pub fn from_env() -> Result<Self, NeoError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`NeoConfig::from_env`] with an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, NeoError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = NeoConfig::default();

        if let Some(key) = lookup("NASA_API_KEY") {
            config.api_key = key;
        }
        if let Some(url) = lookup("NEOWS_BASE_URL") {
            config.neows_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(url) = lookup("HORIZONS_URL") {
            config.horizons_url = url;
        }
        if let Some(url) = lookup("CELESTRAK_URL") {
            config.celestrak_url = url;
        }
        if let Some(raw) = lookup("NEO_HTTP_TIMEOUT_SECS") {
            let secs = raw.trim().parse::<u64>().map_err(|_| NeoError::InvalidConfig {
                key: "NEO_HTTP_TIMEOUT_SECS".into(),
                value: raw.clone(),
            })?;
            config.http_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}
