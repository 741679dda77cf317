use std::collections::BTreeMap;

use glass_ipc::{Bounds, ButtonConfig, ButtonKey, Location, Settings, Size};
use serde::Deserialize;

use crate::error::GlassError;

pub const DEFAULT_WIDTH: u32 = 1280;
pub const DEFAULT_HEIGHT: u32 = 720;
pub const DEFAULT_SETTINGS_SAVE_TIMEOUT_MS: u64 = 3000;
pub const DEFAULT_GLASS_CLOSE_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Glass) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";

const DEFAULT_LOCATIONS: [&str; 5] = [
    "netflix",
    "disneyplus",
    "primevideo",
    "crunchyroll",
    "youtube",
];

pub fn default_locations() -> Vec<Location> {
    DEFAULT_LOCATIONS
        .iter()
        .map(|name| Location {
            url: format!("https://www.{}.com", name),
            icon: name.to_string(),
        })
        .collect()
}

/// Settings record as found on disk: any field may be missing or null.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoredSettings {
    pub initialized: Option<bool>,
    pub bounds: Option<Bounds>,
    pub is_maximized: Option<bool>,
    pub is_always_on_top: Option<bool>,
    pub user_agent: Option<String>,
    pub settings_save_timeout: Option<u64>,
    pub glass_close_timeout: Option<u64>,
    pub buttons: Option<BTreeMap<String, Option<ButtonConfig>>>,
    pub locations: Option<Vec<Location>>,
}

/// Result of filling in a stored record.
#[derive(Debug)]
pub struct Defaulted {
    pub settings: Settings,
    /// Something had to be filled in, so the record should be written back.
    pub dirty: bool,
    /// The record had never been initialized before.
    pub first_run: bool,
}

impl StoredSettings {
    pub fn parse(text: &str) -> Result<Self, GlassError> {
        serde_json::from_str(text).map_err(GlassError::ConfigCorrupt)
    }

    /// Fill every missing or falsy field with its default.
    ///
    /// `work_area` is the primary display's usable size; it is only consulted
    /// when the record has no bounds.
    pub fn into_defaulted(self, work_area: Size) -> Defaulted {
        let mut dirty = false;

        let first_run = !self.initialized.unwrap_or(false);
        if first_run {
            dirty = true;
        }

        let bounds = self.bounds.unwrap_or_else(|| {
            dirty = true;
            Bounds::centered(work_area, Size::new(DEFAULT_WIDTH, DEFAULT_HEIGHT))
        });

        let is_maximized = self.is_maximized.unwrap_or_else(|| {
            dirty = true;
            false
        });

        let is_always_on_top = self.is_always_on_top.unwrap_or_else(|| {
            dirty = true;
            false
        });

        let user_agent = match self.user_agent {
            Some(ua) if !ua.is_empty() => ua,
            _ => {
                dirty = true;
                DEFAULT_USER_AGENT.to_string()
            }
        };

        let settings_save_timeout = match self.settings_save_timeout {
            Some(ms) if ms > 0 => ms,
            _ => {
                dirty = true;
                DEFAULT_SETTINGS_SAVE_TIMEOUT_MS
            }
        };

        let glass_close_timeout = match self.glass_close_timeout {
            Some(ms) if ms > 0 => ms,
            _ => {
                dirty = true;
                DEFAULT_GLASS_CLOSE_TIMEOUT_MS
            }
        };

        let mut buttons: BTreeMap<String, ButtonConfig> = BTreeMap::new();
        for (key, button) in self.buttons.unwrap_or_default() {
            match button {
                Some(button) => {
                    buttons.insert(key, button);
                }
                None => dirty = true,
            }
        }
        for key in ButtonKey::ALL {
            if !buttons.contains_key(key.as_str()) {
                buttons.insert(key.to_string(), key.default_config());
                dirty = true;
            }
        }

        let locations = self.locations.unwrap_or_else(|| {
            dirty = true;
            default_locations()
        });

        Defaulted {
            settings: Settings {
                initialized: true,
                bounds,
                is_maximized,
                is_always_on_top,
                user_agent,
                settings_save_timeout,
                glass_close_timeout,
                buttons,
                locations,
            },
            dirty,
            first_run,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORK_AREA: Size = Size {
        width: 1920,
        height: 1080,
    };

    fn defaulted(json: &str) -> Defaulted {
        StoredSettings::parse(json).unwrap().into_defaulted(WORK_AREA)
    }

    #[test]
    fn test_empty_record_gets_every_default() {
        let result = defaulted("{}");
        let s = &result.settings;

        assert!(result.first_run);
        assert!(result.dirty);
        assert!(s.initialized);
        assert_eq!(s.bounds, Bounds::new(320, 180, 1280, 720));
        assert!(!s.is_maximized);
        assert!(!s.is_always_on_top);
        assert_eq!(s.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(s.settings_save_timeout, 3000);
        assert_eq!(s.glass_close_timeout, 5000);
        assert_eq!(s.buttons.len(), 6);
        assert_eq!(s.buttons["close"].location, 1);
        assert_eq!(s.buttons["alwaysontop"].location, 6);
        assert_eq!(s.locations.len(), 5);
        assert_eq!(s.locations[0].url, "https://www.netflix.com");
        assert_eq!(s.locations[4].icon, "youtube");
    }

    #[test]
    fn test_bounds_derived_from_small_display() {
        let result = StoredSettings::default().into_defaulted(Size::new(1024, 600));
        assert_eq!(result.settings.bounds, Bounds::new(0, 0, 1024, 600));
    }

    #[test]
    fn test_complete_record_is_not_dirty() {
        let first = defaulted("{}").settings;
        let json = serde_json::to_string(&first).unwrap();

        let second = defaulted(&json);
        assert!(!second.first_run);
        assert!(!second.dirty);
        assert_eq!(second.settings, first);
    }

    #[test]
    fn test_initialized_only_once() {
        let first = defaulted("{}");
        assert!(first.first_run);

        let json = serde_json::to_string(&first.settings).unwrap();
        assert!(!defaulted(&json).first_run);
    }

    #[test]
    fn test_falsy_values_are_replaced() {
        let result = defaulted(
            r#"{"initialized":true,"userAgent":"","settingsSaveTimeout":0,"glassCloseTimeout":null}"#,
        );
        assert!(!result.first_run);
        assert!(result.dirty);
        assert_eq!(result.settings.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(result.settings.settings_save_timeout, 3000);
        assert_eq!(result.settings.glass_close_timeout, 5000);
    }

    #[test]
    fn test_existing_values_are_kept() {
        let result = defaulted(
            r#"{
                "initialized": true,
                "bounds": {"x": 5, "y": 6, "width": 800, "height": 600},
                "isMaximized": true,
                "glassCloseTimeout": 1500,
                "locations": [{"url": "https://example.com", "icon": "https://example.com/icon.png"}]
            }"#,
        );
        let s = &result.settings;
        assert_eq!(s.bounds, Bounds::new(5, 6, 800, 600));
        assert!(s.is_maximized);
        assert_eq!(s.glass_close_timeout, 1500);
        assert_eq!(s.locations.len(), 1);
    }

    #[test]
    fn test_partial_buttons_are_completed() {
        let result = defaulted(
            r#"{"buttons": {
                "close": {"enabled": false, "location": 3, "icon": "x"},
                "hide": null,
                "pip": {"enabled": true, "location": 7, "icon": "pip"}
            }}"#,
        );
        let buttons = &result.settings.buttons;
        assert_eq!(buttons.len(), 7);
        assert!(!buttons["close"].enabled);
        assert_eq!(buttons["close"].icon, "x");
        assert_eq!(buttons["hide"], ButtonKey::Hide.default_config());
        assert_eq!(buttons["pip"].location, 7);
    }

    #[test]
    fn test_entry_missing_fields_keeps_record() {
        let result = defaulted(
            r#"{
                "initialized": true,
                "bounds": {"x": 0, "y": 0, "width": 800, "height": 600},
                "locations": [{"url": "https://example.com"}],
                "buttons": {"close": {"location": 1}}
            }"#,
        );
        let s = &result.settings;
        assert!(!result.first_run);
        assert_eq!(s.bounds, Bounds::new(0, 0, 800, 600));
        assert_eq!(s.locations.len(), 1);
        assert_eq!(s.locations[0].url, "https://example.com");
        assert_eq!(s.locations[0].icon, "");
        assert!(s.buttons["close"].enabled);
        assert_eq!(s.buttons["close"].icon, "");
    }

    #[test]
    fn test_empty_location_list_is_kept() {
        let result = defaulted(r#"{"locations": []}"#);
        assert!(result.settings.locations.is_empty());
    }

    #[test]
    fn test_corrupt_record_is_reported() {
        assert!(matches!(
            StoredSettings::parse("{not json"),
            Err(GlassError::ConfigCorrupt(_))
        ));
        assert!(matches!(
            StoredSettings::parse("[1, 2]"),
            Err(GlassError::ConfigCorrupt(_))
        ));
    }
}
