//! Aviation weather (METAR/TAF) for a pair of smart glasses, served over MCP.
//!
//! Reports come from the aviationweather.gov data API. The Nearby tab locates
//! the user by IP and picks the closest METAR stations; two more tabs show
//! user-configured station lists. Each tab renders both as a results panel
//! and as a page for the glasses display.

pub mod client;
pub mod config;
pub mod constants;
pub mod display;
pub mod error;
pub mod formatters;
pub mod geo;
pub mod models;
pub mod nearby;
pub mod service;
pub mod session;
pub mod settings;

pub use client::AviationWeatherClient;
pub use config::Config;
pub use error::{ConfigError, Endpoint, SettingsError, WeatherError};
pub use service::{AviationWeather, FetchReport};
