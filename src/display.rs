//! Pages for the glasses display: a menu list of tabs and a weather text page.
//!
//! Container properties mirror what the display host expects, so a page can be
//! handed over as JSON unchanged.

use serde::Serialize;

use crate::constants::{
    CONTAINER_ID, CONTAINER_PADDING, DISPLAY_HEIGHT, DISPLAY_WIDTH, MENU_CONTAINER_NAME,
    PAGE_DIVIDER_WIDTH, TEXT_CONTAINER_NAME,
};
use crate::session::Tab;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerFrame {
    pub x_position: u32,
    pub y_position: u32,
    pub width: u32,
    pub height: u32,
    pub border_width: u32,
    pub border_color: u32,
    pub border_radius: u32,
    pub padding_length: u32,
    #[serde(rename = "containerID")]
    pub container_id: u32,
    pub container_name: String,
    pub is_event_capture: u8,
}

impl ContainerFrame {
    /// Full-screen frame that captures input events.
    fn full_screen(name: &str) -> Self {
        Self {
            x_position: 0,
            y_position: 0,
            width: DISPLAY_WIDTH,
            height: DISPLAY_HEIGHT,
            border_width: 0,
            border_color: 0,
            border_radius: 0,
            padding_length: CONTAINER_PADDING,
            container_id: CONTAINER_ID,
            container_name: name.to_string(),
            is_event_capture: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItems {
    pub item_count: u32,
    pub item_width: u32,
    pub is_item_select_border_en: u8,
    pub item_name: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListContainer {
    #[serde(flatten)]
    pub frame: ContainerFrame,
    pub item_container: ListItems,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextContainer {
    #[serde(flatten)]
    pub frame: ContainerFrame,
    pub content: String,
}

/// In-place replacement of a text container's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextUpgrade {
    #[serde(rename = "containerID")]
    pub container_id: u32,
    pub container_name: String,
    /// Offset and length count UTF-16 code units, as the display bridge does.
    pub content_offset: usize,
    pub content_length: usize,
    pub content: String,
}

impl TextUpgrade {
    pub fn replace_all(content: String) -> Self {
        Self {
            container_id: CONTAINER_ID,
            container_name: TEXT_CONTAINER_NAME.to_string(),
            content_offset: 0,
            content_length: content.encode_utf16().count(),
            content,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "page", rename_all = "lowercase")]
pub enum GlassesPage {
    Menu(ListContainer),
    Weather(TextContainer),
}

impl GlassesPage {
    pub fn menu() -> Self {
        let names: Vec<String> = Tab::ALL.iter().map(|t| t.name().to_string()).collect();
        Self::Menu(ListContainer {
            frame: ContainerFrame::full_screen(MENU_CONTAINER_NAME),
            item_container: ListItems {
                item_count: names.len() as u32,
                item_width: 0,
                is_item_select_border_en: 1,
                item_name: names,
            },
        })
    }

    /// Text page; the display rejects empty text, so blank content becomes a space.
    pub fn weather(content: String) -> Self {
        let content = if content.is_empty() { " ".to_string() } else { content };
        Self::Weather(TextContainer {
            frame: ContainerFrame::full_screen(TEXT_CONTAINER_NAME),
            content,
        })
    }

    /// Applies `upgrade` to a matching text container. Returns false if nothing changed.
    pub fn apply(&mut self, upgrade: &TextUpgrade) -> bool {
        let Self::Weather(text) = self else {
            return false;
        };
        if text.frame.container_id != upgrade.container_id
            || text.frame.container_name != upgrade.container_name
        {
            return false;
        }
        let mut units = 0;
        let mut content: String = text
            .content
            .chars()
            .take_while(|c| {
                units += c.len_utf16();
                units <= upgrade.content_offset
            })
            .collect();
        content.push_str(&upgrade.content);
        text.content = content;
        true
    }

    /// What the wearer sees.
    pub fn render(&self) -> String {
        match self {
            Self::Menu(list) => list
                .item_container
                .item_name
                .iter()
                .enumerate()
                .map(|(i, name)| format!("[{}] {}", i, name))
                .collect::<Vec<_>>()
                .join("\n"),
            Self::Weather(text) => text.content.clone(),
        }
    }
}

/// Tab name, a divider line, then the content.
pub fn build_page_text(tab: Tab, content: &str) -> String {
    format!("{}\n{}\n{}", tab.name(), "-".repeat(PAGE_DIVIDER_WIDTH), content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn page_text_has_header_and_divider() {
        let text = build_page_text(Tab::Stations2, "METAR CYOW");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Stations 2");
        assert_eq!(lines[1], "-".repeat(40));
        assert_eq!(lines[2], "METAR CYOW");
    }

    #[test]
    fn menu_lists_every_tab() {
        let page = GlassesPage::menu();
        assert_eq!(page.render(), "[0] Nearby\n[1] Stations 1\n[2] Stations 2");

        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value["page"], json!("menu"));
        assert_eq!(value["containerName"], json!("menu-list"));
        assert_eq!(value["containerID"], json!(1));
        assert_eq!(value["width"], json!(576));
        assert_eq!(value["itemContainer"]["itemCount"], json!(3));
    }

    #[test]
    fn blank_weather_page_holds_a_space() {
        assert_eq!(GlassesPage::weather(String::new()).render(), " ");
    }

    #[test]
    fn upgrade_replaces_text_but_not_menus() {
        let mut page = GlassesPage::weather("Fetching...".to_string());
        let upgrade = TextUpgrade::replace_all("METAR CYOW".to_string());
        assert_eq!(upgrade.content_length, 10);
        assert!(page.apply(&upgrade));
        assert_eq!(page.render(), "METAR CYOW");

        let mut menu = GlassesPage::menu();
        assert!(!menu.apply(&upgrade));
        assert_eq!(menu, GlassesPage::menu());
    }

    #[test]
    fn upgrade_lengths_count_utf16_units() {
        let upgrade = TextUpgrade::replace_all("\u{1F6E9} CYOW \u{2014} 5SM".to_string());
        assert_eq!(upgrade.content_length, 13);

        let mut page = GlassesPage::weather("\u{1F6E9}old".to_string());
        let keep_plane = TextUpgrade {
            content_offset: 2,
            content: " new".to_string(),
            ..TextUpgrade::replace_all(String::new())
        };
        assert!(page.apply(&keep_plane));
        assert_eq!(page.render(), "\u{1F6E9} new");
    }
}
