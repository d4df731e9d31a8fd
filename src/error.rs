use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// The remote call an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Metar,
    Taf,
    StationLookup,
    IpGeolocation,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Metar => "METAR fetch",
            Self::Taf => "TAF fetch",
            Self::StationLookup => "Station lookup",
            Self::IpGeolocation => "IP geolocation",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("{endpoint} failed: {status}")]
    Status { endpoint: Endpoint, status: u16 },

    #[error("{endpoint} failed: {source}")]
    Transport {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned an unreadable body: {source}")]
    Decode {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    #[error("IP geolocation returned failure status")]
    LocationUnavailable,
}

impl WeatherError {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Self::Status { endpoint, .. }
            | Self::Transport { endpoint, .. }
            | Self::Decode { endpoint, .. } => *endpoint,
            Self::LocationUnavailable => Endpoint::IpGeolocation,
        }
    }

    /// True when the station directory query itself failed.
    pub fn is_station_lookup(&self) -> bool {
        self.endpoint() == Endpoint::StationLookup
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("settings file {path} is not a JSON object of strings: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_read_like_the_failed_call() {
        let err = WeatherError::Status {
            endpoint: Endpoint::StationLookup,
            status: 503,
        };
        assert_eq!(err.to_string(), "Station lookup failed: 503");
        assert!(err.is_station_lookup());

        let err = WeatherError::Status {
            endpoint: Endpoint::Metar,
            status: 404,
        };
        assert_eq!(err.to_string(), "METAR fetch failed: 404");
        assert!(!err.is_station_lookup());
    }

    #[test]
    fn location_failure_belongs_to_geolocation() {
        let err = WeatherError::LocationUnavailable;
        assert_eq!(err.endpoint(), Endpoint::IpGeolocation);
        assert_eq!(err.to_string(), "IP geolocation returned failure status");
    }
}
