/// User agent string for HTTP requests
pub const USER_AGENT: &str = "mcp-aviation-weather/0.1.0";

/// Aviation Weather Center API base URL
pub const AVIATION_WEATHER_API_BASE: &str = "https://aviationweather.gov";

/// IP geolocation endpoint used to locate the user for the Nearby tab
pub const IP_API_URL: &str = "http://ip-api.com/json";

/// Settings live in `<config dir>/mcp-aviation-weather/settings.json`
pub const SETTINGS_DIR_NAME: &str = "mcp-aviation-weather";
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Mean Earth radius in nautical miles
pub const EARTH_RADIUS_NM: f64 = 3440.065;

/// Nautical miles per degree of latitude
pub const NM_PER_DEGREE: f64 = 60.0;

/// Floor for cos(lat) when widening the longitude extent near the poles
pub const MIN_LON_SCALE: f64 = 0.01;

pub const NEARBY_RADIUS_NM: f64 = 75.0;
pub const NEARBY_MAX_STATIONS: usize = 5;

/// Site type a station must publish to be offered as a nearby station
pub const METAR_SITE_TYPE: &str = "METAR";

/// Stations 1 is seeded with this list until the user saves their own
pub const DEFAULT_STATIONS_1: &[&str] = &["CYPQ"];

// Settings store keys
pub const STORAGE_KEY_STATIONS_1: &str = "wx_stations_1";
pub const STORAGE_KEY_TAF_1: &str = "wx_taf_1";
pub const STORAGE_KEY_STATIONS_2: &str = "wx_stations_2";
pub const STORAGE_KEY_TAF_2: &str = "wx_taf_2";
pub const STORAGE_KEY_TAF_NEARBY: &str = "wx_taf_nearby";

// Glasses display geometry
pub const DISPLAY_WIDTH: u32 = 576;
pub const DISPLAY_HEIGHT: u32 = 288;
pub const CONTAINER_PADDING: u32 = 8;
pub const CONTAINER_ID: u32 = 1;
pub const MENU_CONTAINER_NAME: &str = "menu-list";
pub const TEXT_CONTAINER_NAME: &str = "wx-text";
pub const PAGE_DIVIDER_WIDTH: usize = 40;
