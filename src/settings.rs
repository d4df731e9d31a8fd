//! Station lists, per-tab options and the JSON key-value file they live in.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::constants::{
    DEFAULT_STATIONS_1, STORAGE_KEY_STATIONS_1, STORAGE_KEY_STATIONS_2, STORAGE_KEY_TAF_1,
    STORAGE_KEY_TAF_2, STORAGE_KEY_TAF_NEARBY,
};
use crate::error::SettingsError;

/// Uppercases `input`, splits on whitespace and commas, and keeps 3-4 character codes.
pub fn parse_stations(input: &str) -> Vec<String> {
    input
        .to_uppercase()
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| (3..=4).contains(&s.chars().count()))
        .map(str::to_string)
        .collect()
}

/// The two user-configurable station tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationTab {
    One,
    Two,
}

impl StationTab {
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            _ => None,
        }
    }

    fn keys(self) -> (&'static str, &'static str) {
        match self {
            Self::One => (STORAGE_KEY_STATIONS_1, STORAGE_KEY_TAF_1),
            Self::Two => (STORAGE_KEY_STATIONS_2, STORAGE_KEY_TAF_2),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabSettings {
    pub stations: Vec<String>,
    pub include_taf: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub tab_1: TabSettings,
    pub tab_2: TabSettings,
    pub taf_nearby: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tab_1: TabSettings {
                stations: DEFAULT_STATIONS_1.iter().map(|s| s.to_string()).collect(),
                include_taf: false,
            },
            tab_2: TabSettings::default(),
            taf_nearby: false,
        }
    }
}

impl Settings {
    pub fn tab(&self, tab: StationTab) -> &TabSettings {
        match tab {
            StationTab::One => &self.tab_1,
            StationTab::Two => &self.tab_2,
        }
    }

    pub fn set_tab(&mut self, tab: StationTab, value: TabSettings) {
        match tab {
            StationTab::One => self.tab_1 = value,
            StationTab::Two => self.tab_2 = value,
        }
    }
}

/// String key-value store persisted as a flat JSON object.
///
/// Clones share one lock, so concurrent saves through the same store never
/// interleave their read-modify-write.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, SettingsError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(SettingsError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|source| SettingsError::Json {
            path: self.path.clone(),
            source,
        })
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<(), SettingsError> {
        let io_err = |source: std::io::Error| SettingsError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(values).map_err(|source| SettingsError::Json {
            path: self.path.clone(),
            source,
        })?;

        // Readers see either the old file or the new one, never a partial write.
        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);
        std::fs::write(&tmp_path, json).map_err(io_err)?;
        std::fs::rename(&tmp_path, &self.path).map_err(io_err)
    }

    pub fn get(&self, key: &str) -> Result<Option<String>, SettingsError> {
        let _guard = self.lock.lock();
        Ok(self.read_all()?.remove(key))
    }

    pub fn set_many(&self, entries: &[(&str, String)]) -> Result<(), SettingsError> {
        let _guard = self.lock.lock();
        let mut values = self.read_all()?;
        for (key, value) in entries {
            values.insert((*key).to_string(), value.clone());
        }
        self.write_all(&values)
    }

    pub fn load(&self) -> Result<Settings, SettingsError> {
        let values = {
            let _guard = self.lock.lock();
            self.read_all()?
        };
        let stations = |key: &str| {
            values
                .get(key)
                .filter(|raw| !raw.is_empty())
                .map(|raw| parse_stations(raw))
        };
        let flag = |key: &str| values.get(key).is_some_and(|raw| raw == "true");

        let defaults = Settings::default();
        let settings = Settings {
            tab_1: TabSettings {
                stations: stations(STORAGE_KEY_STATIONS_1).unwrap_or(defaults.tab_1.stations),
                include_taf: flag(STORAGE_KEY_TAF_1),
            },
            tab_2: TabSettings {
                stations: stations(STORAGE_KEY_STATIONS_2).unwrap_or_default(),
                include_taf: flag(STORAGE_KEY_TAF_2),
            },
            taf_nearby: flag(STORAGE_KEY_TAF_NEARBY),
        };
        tracing::debug!("Loaded settings from {}", self.path.display());
        Ok(settings)
    }

    pub fn save_tab(&self, tab: StationTab, value: &TabSettings) -> Result<(), SettingsError> {
        let (stations_key, taf_key) = tab.keys();
        self.set_many(&[
            (stations_key, value.stations.join(",")),
            (taf_key, value.include_taf.to_string()),
        ])
    }

    pub fn save_nearby_taf(&self, include_taf: bool) -> Result<(), SettingsError> {
        self.set_many(&[(STORAGE_KEY_TAF_NEARBY, include_taf.to_string())])
    }
}
