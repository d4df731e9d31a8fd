use anyhow::Result;
use rmcp::{
    handler::server::{wrapper::Parameters, ServerHandler, tool::ToolRouter},
    model::{CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
    ErrorData as McpError,
};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::client::AviationWeatherClient;
use crate::config::Config;
use crate::error::WeatherError;
use crate::formatters::{format_results, format_settings, format_station_ids, glasses_content};
use crate::models::{
    GetNearbyStationsRequest, GetStationWeatherRequest, SaveTabSettingsRequest,
    SetNearbyTafRequest, TabRequest,
};
use crate::session::{AppMode, Session, Tab};
use crate::settings::{parse_stations, SettingsStore, StationTab, TabSettings};

/// Outcome of one fetch-and-display pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchReport {
    /// One-line status for the user
    pub status: String,
    /// Results panel text, when anything was fetched
    pub results: Option<String>,
    /// Whether the glasses page was updated in place
    pub displayed: bool,
}

impl FetchReport {
    fn status_only(status: String) -> Self {
        Self {
            status,
            results: None,
            displayed: false,
        }
    }
}

/// Status, results panel and glasses content for the Nearby tab.
struct NearbyView {
    status: String,
    results: Option<String>,
    content: String,
}

/// Aviation weather service that handles MCP requests and drives the glasses display
#[derive(Clone)]
pub struct AviationWeather {
    client: AviationWeatherClient,
    store: SettingsStore,
    session: Arc<Mutex<Session>>,
    nearby_radius_nm: f64,
    nearby_max_stations: usize,
    tool_router: ToolRouter<Self>,
}

impl AviationWeather {
    /// Creates the service, loading saved settings and showing the tab menu
    pub fn new(config: &Config) -> Result<Self> {
        let client = AviationWeatherClient::new(config)?;
        let store = SettingsStore::new(&config.settings_path);
        let settings = store.load()?;

        let mut session = Session::new(settings);
        session.init_display();
        tracing::info!("Settings loaded from {}", store.path().display());

        Ok(Self {
            client,
            store,
            session: Arc::new(Mutex::new(session)),
            nearby_radius_nm: config.nearby_radius_nm,
            nearby_max_stations: config.nearby_max_stations,
            tool_router: Self::tool_router(),
        })
    }

    pub fn session(&self) -> &Arc<Mutex<Session>> {
        &self.session
    }

    /// Fetches weather for `tab`, renders the results panel and, when the
    /// glasses are showing that tab, updates them in place.
    ///
    /// Nearby failures are rendered into the tab rather than returned.
    pub async fn fetch_and_display(&self, tab: Tab) -> Result<FetchReport, WeatherError> {
        match tab.station_tab() {
            None => Ok(self.fetch_nearby().await),
            Some(station_tab) => self.fetch_station_tab(station_tab).await,
        }
    }

    async fn fetch_nearby(&self) -> FetchReport {
        let include_taf = self.session.lock().await.settings().taf_nearby;

        let view = match self.load_nearby(include_taf).await {
            Ok(view) => view,
            Err(e) => {
                tracing::warn!("Could not load nearby stations: {}", e);
                NearbyView {
                    status: format!("Error: {}", e),
                    results: Some(format!("Could not load nearby stations: {}", e)),
                    content: format!("Nearby error:\n{}", e),
                }
            }
        };

        let displayed = self.session.lock().await.publish(Tab::Nearby, view.content);
        FetchReport {
            status: view.status,
            results: view.results,
            displayed,
        }
    }

    async fn load_nearby(&self, include_taf: bool) -> Result<NearbyView, WeatherError> {
        let location = self.client.fetch_user_location().await?;
        let radius = self.nearby_radius_nm;

        let stations = self
            .client
            .fetch_nearby_station_ids(location.lat, location.lon, radius, self.nearby_max_stations)
            .await?;
        self.session
            .lock()
            .await
            .set_nearby_stations(stations.clone());

        if stations.is_empty() {
            return Ok(NearbyView {
                status: "No nearby stations found".to_string(),
                results: Some(format!(
                    "No METAR stations found within {} nm of {}.",
                    radius, location.city
                )),
                content: format!("No METAR stations within\n{} nm of {}.", radius, location.city),
            });
        }

        tracing::info!("Fetching weather for {}", stations.join(", "));
        let results = self.client.fetch_weather(&stations, include_taf).await?;

        let label = format!("Nearby ({})", location.city);
        let content = glasses_content(&results, include_taf);
        let content = if content.is_empty() {
            format!("Nearby {}:\nNo data.", location.city)
        } else {
            content
        };

        Ok(NearbyView {
            status: format!("Nearby stations for {}, {}", location.city, location.region_name),
            results: Some(format_results(&results, include_taf, &label)),
            content,
        })
    }

    async fn fetch_station_tab(&self, station_tab: StationTab) -> Result<FetchReport, WeatherError> {
        let tab = Tab::from(station_tab);
        let TabSettings {
            stations,
            include_taf,
        } = self.session.lock().await.settings().tab(station_tab).clone();

        if stations.is_empty() {
            return Ok(FetchReport::status_only(format!(
                "No stations configured for {}",
                tab.name()
            )));
        }

        let ids = stations.join(", ");
        tracing::info!("Fetching weather for {}", ids);
        let results = self.client.fetch_weather(&stations, include_taf).await?;
        let rendered = format_results(&results, include_taf, tab.name());

        let content = glasses_content(&results, include_taf);
        if content.is_empty() {
            return Ok(FetchReport {
                status: format!("No weather data found for {}", ids),
                results: Some(rendered),
                displayed: false,
            });
        }

        let displayed = self.session.lock().await.publish(tab, content);
        let status = if displayed {
            "Displayed on glasses"
        } else {
            "Weather fetched"
        };
        Ok(FetchReport {
            status: status.to_string(),
            results: Some(rendered),
            displayed,
        })
    }

    /// Glasses menu selection: show the tab at once, then refresh it.
    pub async fn select_tab(&self, tab: Tab) -> Result<FetchReport, WeatherError> {
        tracing::info!("Selecting tab {} on glasses", tab.name());
        self.session.lock().await.enter_tab(tab);
        self.fetch_and_display(tab).await
    }

    /// Double click: back to the menu from a weather page.
    pub async fn back(&self) -> bool {
        self.session.lock().await.back()
    }

    /// Single tap on a weather page refreshes the current tab; ignored in the menu.
    pub async fn tap(&self) -> Option<Result<FetchReport, WeatherError>> {
        let (mode, tab) = {
            let session = self.session.lock().await;
            (session.mode(), session.current_tab())
        };
        if mode != AppMode::Weather {
            return None;
        }
        Some(self.fetch_and_display(tab).await)
    }

    /// Text of the page currently on the glasses.
    pub async fn display_text(&self) -> String {
        self.session
            .lock()
            .await
            .display()
            .map(|page| page.render())
            .unwrap_or_default()
    }

    /// Tool output for a fetch: status, results and, if updated, the glasses page.
    async fn report_result(&self, report: FetchReport) -> CallToolResult {
        let mut output = format!("{}\n", report.status);
        if let Some(results) = &report.results {
            output.push('\n');
            output.push_str(results);
        }
        if report.displayed {
            output.push_str("\nGlasses:\n");
            output.push_str(&self.display_text().await);
            output.push('\n');
        }
        CallToolResult::success(vec![Content::text(output)])
    }
}

fn parse_tab(index: u8) -> Result<Tab, McpError> {
    Tab::from_index(index)
        .ok_or_else(|| McpError::invalid_params("tab must be 0 (Nearby), 1 or 2", None))
}

fn fetch_error(e: WeatherError) -> McpError {
    McpError::internal_error(format!("Failed to fetch weather: {}", e), None)
}

#[tool_handler]
impl ServerHandler for AviationWeather {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "mcp-aviation-weather".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some(
                "Aviation weather (METAR/TAF) from aviationweather.gov, with a nearby-station \
                finder and a glasses display showing three tabs: Nearby, Stations 1 and Stations 2."
                    .to_string(),
            ),
        }
    }
}

#[tool_router]
impl AviationWeather {
    /// Gets METAR and optionally TAF reports for a list of stations
    #[tool(description = "Get METAR (and optionally TAF) reports for ICAO stations. Provide codes separated by commas or spaces, e.g. 'CYOW, CYUL'.")]
    async fn get_station_weather(
        &self,
        Parameters(request): Parameters<GetStationWeatherRequest>,
    ) -> Result<CallToolResult, McpError> {
        let stations = parse_stations(&request.stations);
        if stations.is_empty() {
            return Err(McpError::invalid_params(
                "Enter at least one valid ICAO station code (3–4 characters)",
                None,
            ));
        }
        tracing::info!("Getting weather for stations: {}", stations.join(", "));

        let results = self
            .client
            .fetch_weather(&stations, request.include_taf)
            .await
            .map_err(fetch_error)?;

        let formatted = format_results(&results, request.include_taf, &stations.join(", "));

        Ok(CallToolResult::success(vec![Content::text(formatted)]))
    }

    /// Finds the nearest METAR stations to a point
    #[tool(description = "Find the nearest METAR-reporting stations to a latitude/longitude. Stations are ranked by the directory's priority, then by distance.")]
    async fn get_nearby_stations(
        &self,
        Parameters(request): Parameters<GetNearbyStationsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let radius = request.radius_nm.unwrap_or(self.nearby_radius_nm);
        let max = request.max_stations.unwrap_or(self.nearby_max_stations);
        if !(radius.is_finite() && radius > 0.0) {
            return Err(McpError::invalid_params("radius_nm must be positive", None));
        }
        tracing::info!(
            "Getting stations within {} nm of {}, {}",
            radius,
            request.latitude,
            request.longitude
        );

        let ids = self
            .client
            .fetch_nearby_station_ids(request.latitude, request.longitude, radius, max)
            .await
            .map_err(|e| McpError::internal_error(format!("Station lookup failed: {}", e), None))?;

        let formatted = format_station_ids(&ids, radius, request.latitude, request.longitude);

        Ok(CallToolResult::success(vec![Content::text(formatted)]))
    }

    /// Fetches a tab for the results panel without changing the glasses tab
    #[tool(description = "Fetch weather for a tab (0 = Nearby, 1 = Stations 1, 2 = Stations 2) and show the results. The glasses are updated only if they are showing that tab.")]
    async fn fetch_tab(
        &self,
        Parameters(request): Parameters<TabRequest>,
    ) -> Result<CallToolResult, McpError> {
        let tab = parse_tab(request.tab)?;
        let report = self.fetch_and_display(tab).await.map_err(fetch_error)?;
        Ok(self.report_result(report).await)
    }

    /// Saves stations and the TAF option for tab 1 or 2, then fetches it
    #[tool(description = "Save the station list and TAF option for tab 1 or 2, then fetch its weather.")]
    async fn save_tab_settings(
        &self,
        Parameters(request): Parameters<SaveTabSettingsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let station_tab = StationTab::from_number(request.tab)
            .ok_or_else(|| McpError::invalid_params("tab must be 1 or 2", None))?;
        let stations = parse_stations(&request.stations);
        if stations.is_empty() {
            return Err(McpError::invalid_params(
                "Enter at least one valid ICAO station code (3–4 characters)",
                None,
            ));
        }

        let value = TabSettings {
            stations,
            include_taf: request.include_taf,
        };
        self.store
            .save_tab(station_tab, &value)
            .map_err(|e| McpError::internal_error(format!("Failed to save settings: {}", e), None))?;
        tracing::info!("Saved settings for tab {}", request.tab);
        self.session
            .lock()
            .await
            .settings_mut()
            .set_tab(station_tab, value);

        let report = self
            .fetch_and_display(Tab::from(station_tab))
            .await
            .map_err(fetch_error)?;
        Ok(self.report_result(report).await)
    }

    /// Toggles TAF reports on the Nearby tab
    #[tool(description = "Turn TAF reports on or off for the Nearby tab. Refreshes Nearby if the glasses are showing it.")]
    async fn set_nearby_taf(
        &self,
        Parameters(request): Parameters<SetNearbyTafRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.store
            .save_nearby_taf(request.include_taf)
            .map_err(|e| McpError::internal_error(format!("Failed to save settings: {}", e), None))?;

        let current_tab = {
            let mut session = self.session.lock().await;
            session.settings_mut().taf_nearby = request.include_taf;
            session.current_tab()
        };

        if current_tab == Tab::Nearby {
            let report = self.fetch_and_display(Tab::Nearby).await.map_err(fetch_error)?;
            return Ok(self.report_result(report).await);
        }
        Ok(CallToolResult::success(vec![Content::text(format!(
            "Nearby TAF {}",
            if request.include_taf { "enabled" } else { "disabled" }
        ))]))
    }

    /// Shows the saved settings
    #[tool(description = "Show the configured stations and TAF options for each tab.")]
    async fn get_settings(&self) -> Result<CallToolResult, McpError> {
        let formatted = format_settings(self.session.lock().await.settings());
        Ok(CallToolResult::success(vec![Content::text(formatted)]))
    }

    /// Selects a tab from the glasses menu
    #[tool(description = "Select a tab on the glasses (0 = Nearby, 1 = Stations 1, 2 = Stations 2). Shows cached content immediately, then refreshes it.")]
    async fn glasses_select_tab(
        &self,
        Parameters(request): Parameters<TabRequest>,
    ) -> Result<CallToolResult, McpError> {
        let tab = parse_tab(request.tab)?;
        let report = self.select_tab(tab).await.map_err(fetch_error)?;
        Ok(self.report_result(report).await)
    }

    /// Moves the glasses to the next tab
    #[tool(description = "Select the next tab on the glasses, wrapping from Stations 2 back to Nearby.")]
    async fn glasses_next_tab(&self) -> Result<CallToolResult, McpError> {
        let next = self.session.lock().await.current_tab().next();
        let report = self.select_tab(next).await.map_err(fetch_error)?;
        Ok(self.report_result(report).await)
    }

    /// Double click on the glasses
    #[tool(description = "Go back from a weather page to the glasses menu.")]
    async fn glasses_back(&self) -> Result<CallToolResult, McpError> {
        let text = if self.back().await {
            format!("Back to menu\n\n{}", self.display_text().await)
        } else {
            "Already at the menu".to_string()
        };
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Single tap on the glasses
    #[tool(description = "Refresh the weather page currently shown on the glasses.")]
    async fn glasses_tap(&self) -> Result<CallToolResult, McpError> {
        match self.tap().await {
            Some(report) => Ok(self.report_result(report.map_err(fetch_error)?).await),
            None => Ok(CallToolResult::success(vec![Content::text(
                "Glasses are on the menu; select a tab first",
            )])),
        }
    }

    /// Current glasses page
    #[tool(description = "Show what the glasses are currently displaying.")]
    async fn glasses_display(&self) -> Result<CallToolResult, McpError> {
        let session = self.session.lock().await;
        let Some(page) = session.display() else {
            return Ok(CallToolResult::success(vec![Content::text("Display not initialised")]));
        };
        let layout = serde_json::to_string_pretty(page)
            .map_err(|e| McpError::internal_error(format!("Failed to encode page: {}", e), None))?;
        let mode = match session.mode() {
            AppMode::Menu => "menu",
            AppMode::Weather => "weather",
        };
        Ok(CallToolResult::success(vec![Content::text(format!(
            "Mode: {}\n\n{}\n\nLayout:\n{}",
            mode,
            page.render(),
            layout
        ))]))
    }
}
