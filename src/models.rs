use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================================
// Aviation Weather API Models
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct MetarReport {
    #[serde(rename = "icaoId")]
    pub icao_id: String,
    #[serde(rename = "rawOb")]
    pub raw_ob: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TafReport {
    #[serde(rename = "icaoId")]
    pub icao_id: String,
    #[serde(rename = "rawTAF")]
    pub raw_taf: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationInfo {
    #[serde(rename = "icaoId")]
    pub icao_id: Option<String>,
    pub lat: f64,
    pub lon: f64,
    #[serde(rename = "siteType", default)]
    pub site_type: Vec<String>,
    #[serde(default = "lowest_priority")]
    pub priority: i64,
}

fn lowest_priority() -> i64 {
    i64::MAX
}

// ============================================================================
// IP Geolocation Models
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct IpLocation {
    pub status: String,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lon: f64,
    #[serde(default)]
    pub city: String,
    #[serde(rename = "regionName", default)]
    pub region_name: String,
}

// ============================================================================
// Merged results
// ============================================================================

/// Reports for one requested station; either may be missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationWeather {
    pub station: String,
    pub metar: Option<String>,
    pub taf: Option<String>,
}

// ============================================================================
// MCP Tool Request Models
// ============================================================================

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct GetStationWeatherRequest {
    /// ICAO codes separated by commas or spaces, e.g. "CYOW, CYUL"
    pub stations: String,
    #[serde(default)]
    pub include_taf: bool,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct GetNearbyStationsRequest {
    pub latitude: f64,
    pub longitude: f64,
    /// Search radius in nautical miles (default 75)
    pub radius_nm: Option<f64>,
    /// Maximum number of stations to return (default 5)
    pub max_stations: Option<usize>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct TabRequest {
    /// 0 = Nearby, 1 = Stations 1, 2 = Stations 2
    pub tab: u8,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct SaveTabSettingsRequest {
    /// 1 or 2
    pub tab: u8,
    pub stations: String,
    #[serde(default)]
    pub include_taf: bool,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct SetNearbyTafRequest {
    pub include_taf: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn station_info_tolerates_missing_fields() {
        let stations: Vec<StationInfo> = serde_json::from_value(json!([
            {"icaoId": "CYOW", "lat": 45.32, "lon": -75.67, "siteType": ["METAR", "TAF"], "priority": 1},
            {"icaoId": null, "lat": 45.0, "lon": -75.0}
        ]))
        .unwrap();

        assert_eq!(stations[0].icao_id.as_deref(), Some("CYOW"));
        assert_eq!(stations[0].site_type, vec!["METAR", "TAF"]);
        assert!(stations[1].icao_id.is_none());
        assert!(stations[1].site_type.is_empty());
        assert_eq!(stations[1].priority, i64::MAX);
    }

    #[test]
    fn reports_ignore_unused_fields() {
        let metar: MetarReport = serde_json::from_value(json!({
            "icaoId": "CYUL",
            "rawOb": "CYUL 191200Z 24012KT 15SM FEW040 08/02 A3002",
            "temp": 8
        }))
        .unwrap();
        assert_eq!(metar.icao_id, "CYUL");

        let taf: TafReport = serde_json::from_value(json!({
            "icaoId": "CYUL",
            "rawTAF": "TAF CYUL 191140Z 1912/2018 24012KT P6SM FEW040"
        }))
        .unwrap();
        assert!(taf.raw_taf.unwrap().starts_with("TAF CYUL"));
    }
}
