//! Per-process UI state: which tab the glasses show, whether they show the
//! menu or a weather page, and the last content rendered for each tab.

use crate::display::{build_page_text, GlassesPage, TextUpgrade};
use crate::settings::{Settings, StationTab};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Nearby,
    Stations1,
    Stations2,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Nearby, Tab::Stations1, Tab::Stations2];

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }

    pub fn index(self) -> usize {
        match self {
            Self::Nearby => 0,
            Self::Stations1 => 1,
            Self::Stations2 => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Nearby => "Nearby",
            Self::Stations1 => "Stations 1",
            Self::Stations2 => "Stations 2",
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn station_tab(self) -> Option<StationTab> {
        match self {
            Self::Nearby => None,
            Self::Stations1 => Some(StationTab::One),
            Self::Stations2 => Some(StationTab::Two),
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            Self::Nearby => "Fetching nearby\nstations...",
            _ => "Fetching...",
        }
    }
}

impl From<StationTab> for Tab {
    fn from(tab: StationTab) -> Self {
        match tab {
            StationTab::One => Self::Stations1,
            StationTab::Two => Self::Stations2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Menu,
    Weather,
}

#[derive(Debug)]
pub struct Session {
    mode: AppMode,
    current_tab: Tab,
    settings: Settings,
    nearby_stations: Vec<String>,
    cached_content: [String; 3],
    display: Option<GlassesPage>,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self {
            mode: AppMode::Menu,
            current_tab: Tab::Stations1,
            settings,
            nearby_stations: Vec::new(),
            cached_content: Default::default(),
            display: None,
        }
    }

    pub fn mode(&self) -> AppMode {
        self.mode
    }

    pub fn current_tab(&self) -> Tab {
        self.current_tab
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn nearby_stations(&self) -> &[String] {
        &self.nearby_stations
    }

    pub fn set_nearby_stations(&mut self, stations: Vec<String>) {
        self.nearby_stations = stations;
    }

    pub fn cached_content(&self, tab: Tab) -> &str {
        &self.cached_content[tab.index()]
    }

    pub fn display(&self) -> Option<&GlassesPage> {
        self.display.as_ref()
    }

    /// Shows the tab menu. Called once when the display comes up.
    pub fn init_display(&mut self) {
        self.display = Some(GlassesPage::menu());
        self.mode = AppMode::Menu;
    }

    /// Switches the glasses to `tab`, showing cached content or a placeholder
    /// until fresh data arrives.
    pub fn enter_tab(&mut self, tab: Tab) -> &GlassesPage {
        self.current_tab = tab;
        let cached = self.cached_content(tab);
        let body = if cached.is_empty() { tab.placeholder() } else { cached };
        let page = GlassesPage::weather(build_page_text(tab, body));
        self.mode = AppMode::Weather;
        tracing::debug!("Glasses entered tab {}", tab.name());
        self.display.insert(page)
    }

    /// Returns from a weather page to the menu. In the menu this does nothing
    /// and returns false, leaving the exit to the host.
    pub fn back(&mut self) -> bool {
        if self.mode != AppMode::Weather || self.display.is_none() {
            return false;
        }
        self.mode = AppMode::Menu;
        self.display = Some(GlassesPage::menu());
        tracing::debug!("Glasses returned to menu");
        true
    }

    /// Caches `content` for `tab` and, if the glasses are showing that tab,
    /// updates the page in place. Returns whether the display changed.
    pub fn publish(&mut self, tab: Tab, content: String) -> bool {
        let showing = self.mode == AppMode::Weather && self.current_tab == tab;
        let page_text = build_page_text(tab, &content);
        self.cached_content[tab.index()] = content;

        if !showing {
            return false;
        }
        let Some(page) = self.display.as_mut() else {
            return false;
        };
        let updated = page.apply(&TextUpgrade::replace_all(page_text));
        if !updated {
            tracing::warn!("Text upgrade did not match the page on display");
        }
        updated
    }
}
