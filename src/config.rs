use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::{
    AVIATION_WEATHER_API_BASE, IP_API_URL, NEARBY_MAX_STATIONS, NEARBY_RADIUS_NM,
    SETTINGS_DIR_NAME, SETTINGS_FILE_NAME,
};
use crate::error::ConfigError;

/// Runtime configuration, read from `AVWX_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_base: String,
    pub ip_api_url: String,
    pub settings_path: PathBuf,
    /// No timeout unless set
    pub request_timeout_secs: Option<u64>,
    pub nearby_radius_nm: f64,
    pub nearby_max_stations: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: AVIATION_WEATHER_API_BASE.to_string(),
            ip_api_url: IP_API_URL.to_string(),
            settings_path: default_settings_path(),
            request_timeout_secs: None,
            nearby_radius_nm: NEARBY_RADIUS_NM,
            nearby_max_stations: NEARBY_MAX_STATIONS,
        }
    }
}

impl Config {
    /// Loads configuration from the process environment.
    ///
    /// Calls `dotenvy::dotenv().ok()` first, so a `.env` file in the working
    /// directory (or a parent) fills in variables the process does not set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup, so tests can pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let nearby_radius_nm: f64 =
            parse_var(&lookup, "AVWX_NEARBY_RADIUS_NM")?.unwrap_or(defaults.nearby_radius_nm);
        if !(nearby_radius_nm.is_finite() && nearby_radius_nm > 0.0) {
            return Err(ConfigError::InvalidEnvVar {
                var: "AVWX_NEARBY_RADIUS_NM".to_string(),
                reason: "must be a positive number of nautical miles".to_string(),
            });
        }

        Ok(Self {
            api_base: lookup("AVWX_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
            ip_api_url: lookup("AVWX_IP_API_URL").unwrap_or(defaults.ip_api_url),
            settings_path: lookup("AVWX_SETTINGS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.settings_path),
            request_timeout_secs: parse_var(&lookup, "AVWX_REQUEST_TIMEOUT_SECS")?,
            nearby_radius_nm,
            nearby_max_stations: parse_var(&lookup, "AVWX_NEARBY_MAX_STATIONS")?
                .unwrap_or(defaults.nearby_max_stations),
        })
    }
}

/// Per-user settings file. Falls back to the working directory on platforms
/// without a config dir.
pub fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join(SETTINGS_DIR_NAME))
        .unwrap_or_default()
        .join(SETTINGS_FILE_NAME)
}

/// Parses `var` when it is set to something non-blank.
fn parse_var<T, F>(lookup: &F, var: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(var).filter(|raw| !raw.trim().is_empty()) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.api_base, "https://aviationweather.gov");
        assert_eq!(config.request_timeout_secs, None);
        assert_eq!(config.nearby_max_stations, 5);
    }

    #[test]
    fn overrides_are_applied() {
        let config = config_from(&[
            ("AVWX_API_BASE", "http://127.0.0.1:9000/"),
            ("AVWX_SETTINGS_PATH", "/tmp/wx.json"),
            ("AVWX_REQUEST_TIMEOUT_SECS", "15"),
            ("AVWX_NEARBY_RADIUS_NM", "40.5"),
            ("AVWX_NEARBY_MAX_STATIONS", "3"),
        ])
        .unwrap();

        assert_eq!(config.api_base, "http://127.0.0.1:9000");
        assert_eq!(config.settings_path, PathBuf::from("/tmp/wx.json"));
        assert_eq!(config.request_timeout_secs, Some(15));
        assert_eq!(config.nearby_radius_nm, 40.5);
        assert_eq!(config.nearby_max_stations, 3);
    }

    #[test]
    fn default_settings_file_is_per_user() {
        let path = Config::default().settings_path;
        assert!(path.ends_with("mcp-aviation-weather/settings.json"), "{}", path.display());
        if let Some(config_dir) = dirs::config_dir() {
            assert!(path.starts_with(config_dir));
        }
    }

    #[test]
    fn dotenv_file_values_are_understood() {
        let dir = tempfile::tempdir().unwrap();
        let env_file = dir.path().join(".env");
        std::fs::write(
            &env_file,
            "# local overrides\nAVWX_NEARBY_RADIUS_NM=50\nAVWX_SETTINGS_PATH=\"/tmp/wx settings.json\"\n",
        )
        .unwrap();

        let map: HashMap<String, String> = dotenvy::from_path_iter(&env_file)
            .unwrap()
            .map(|item| item.unwrap())
            .collect();
        let config = Config::from_lookup(|key| map.get(key).cloned()).unwrap();

        assert_eq!(config.nearby_radius_nm, 50.0);
        assert_eq!(config.settings_path, PathBuf::from("/tmp/wx settings.json"));
    }

    #[test]
    fn unparseable_values_name_the_variable() {
        let err = config_from(&[("AVWX_NEARBY_MAX_STATIONS", "five")]).unwrap_err();
        assert!(err.to_string().contains("AVWX_NEARBY_MAX_STATIONS"), "{err}");
    }

    #[test]
    fn radius_must_be_positive() {
        assert!(config_from(&[("AVWX_NEARBY_RADIUS_NM", "0")]).is_err());
        assert!(config_from(&[("AVWX_NEARBY_RADIUS_NM", "-10")]).is_err());
    }
}
