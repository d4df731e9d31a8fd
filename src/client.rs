use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::Config;
use crate::constants::USER_AGENT;
use crate::error::{Endpoint, WeatherError};
use crate::geo::BoundingBox;
use crate::models::{IpLocation, MetarReport, StationInfo, StationWeather, TafReport};
use crate::nearby::select_nearest;

/// HTTP access to the Aviation Weather Center data API and IP geolocation.
#[derive(Debug, Clone)]
pub struct AviationWeatherClient {
    client: Arc<Client>,
    api_base: String,
    ip_api_url: String,
}

impl AviationWeatherClient {
    /// Creates a client for the endpoints named in `config`
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: Arc::new(builder.build()?),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            ip_api_url: config.ip_api_url.clone(),
        })
    }

    /// Makes an HTTP GET request and deserializes the JSON response.
    ///
    /// `204 No Content` (the data API's answer to "no matching reports") is `None`.
    async fn make_request<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<T>, WeatherError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|source| WeatherError::Transport { endpoint, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }
        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let data = response
            .json::<T>()
            .await
            .map_err(|source| WeatherError::Decode { endpoint, source })?;
        Ok(Some(data))
    }

    fn data_url(&self, product: &str) -> String {
        format!("{}/api/data/{}", self.api_base, product)
    }

    /// Latest raw METAR per station id
    pub async fn fetch_metars(
        &self,
        stations: &[String],
    ) -> Result<HashMap<String, String>, WeatherError> {
        if stations.is_empty() {
            return Ok(HashMap::new());
        }
        let ids = stations.join(",");
        tracing::debug!("Fetching METARs for {}", ids);

        let data = self
            .make_request::<Value>(
                Endpoint::Metar,
                &self.data_url("metar"),
                &[("ids", ids.as_str()), ("format", "json")],
            )
            .await?;

        Ok(entries::<MetarReport>(data)
            .filter_map(|m| m.raw_ob.map(|raw| (m.icao_id, raw)))
            .collect())
    }

    /// Latest raw TAF per station id
    pub async fn fetch_tafs(
        &self,
        stations: &[String],
    ) -> Result<HashMap<String, String>, WeatherError> {
        if stations.is_empty() {
            return Ok(HashMap::new());
        }
        let ids = stations.join(",");
        tracing::debug!("Fetching TAFs for {}", ids);

        let data = self
            .make_request::<Value>(
                Endpoint::Taf,
                &self.data_url("taf"),
                &[("ids", ids.as_str()), ("format", "json")],
            )
            .await?;

        Ok(entries::<TafReport>(data)
            .filter_map(|t| t.raw_taf.map(|raw| (t.icao_id, raw)))
            .collect())
    }

    /// Fetches METARs and, if asked, TAFs concurrently and merges them in request order.
    pub async fn fetch_weather(
        &self,
        stations: &[String],
        include_taf: bool,
    ) -> Result<Vec<StationWeather>, WeatherError> {
        let (metars, tafs) = tokio::try_join!(self.fetch_metars(stations), async {
            if include_taf {
                self.fetch_tafs(stations).await
            } else {
                Ok::<_, WeatherError>(HashMap::new())
            }
        })?;

        Ok(merge_reports(stations, &metars, &tafs))
    }

    /// Approximate location of this machine from its public IP.
    pub async fn fetch_user_location(&self) -> Result<IpLocation, WeatherError> {
        let location = self
            .make_request::<IpLocation>(Endpoint::IpGeolocation, &self.ip_api_url, &[])
            .await?
            .ok_or(WeatherError::LocationUnavailable)?;

        if location.status != "success" {
            return Err(WeatherError::LocationUnavailable);
        }
        tracing::info!(
            "Located near {}, {} ({:.4}, {:.4})",
            location.city,
            location.region_name,
            location.lat,
            location.lon
        );
        Ok(location)
    }

    /// Station directory records inside `bbox`.
    pub async fn fetch_station_info(
        &self,
        bbox: &BoundingBox,
    ) -> Result<Vec<StationInfo>, WeatherError> {
        let bbox = bbox.to_string();
        let data = self
            .make_request::<Value>(
                Endpoint::StationLookup,
                &self.data_url("stationInfo"),
                &[("bbox", bbox.as_str()), ("format", "json")],
            )
            .await?;
        Ok(entries::<StationInfo>(data).collect())
    }

    /// Up to `max_count` METAR station ids within roughly `radius_nm` of the point,
    /// best directory priority first and nearest within a priority.
    pub async fn fetch_nearby_station_ids(
        &self,
        lat: f64,
        lon: f64,
        radius_nm: f64,
        max_count: usize,
    ) -> Result<Vec<String>, WeatherError> {
        let bbox = BoundingBox::around(lat, lon, radius_nm);
        let records = self.fetch_station_info(&bbox).await?;
        let ids = select_nearest(&records, lat, lon, max_count);

        tracing::info!(
            "Selected {} of {} stations within {} nm: {}",
            ids.len(),
            records.len(),
            radius_nm,
            ids.join(", ")
        );
        Ok(ids)
    }
}

/// Elements of a JSON array body that parse as `T`; anything else is skipped.
fn entries<T: DeserializeOwned>(data: Option<Value>) -> impl Iterator<Item = T> {
    let items = match data {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    };
    items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
}

/// One entry per requested station; a missing report is `None`.
pub fn merge_reports(
    stations: &[String],
    metars: &HashMap<String, String>,
    tafs: &HashMap<String, String>,
) -> Vec<StationWeather> {
    stations
        .iter()
        .map(|station| StationWeather {
            station: station.clone(),
            metar: metars.get(station).cloned(),
            taf: tafs.get(station).cloned(),
        })
        .collect()
}
