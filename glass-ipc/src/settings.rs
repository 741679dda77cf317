use std::collections::BTreeMap;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::Bounds;

/// Persisted settings record, stored pretty-printed in `settings.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub initialized: bool,
    pub bounds: Bounds,
    pub is_maximized: bool,
    pub is_always_on_top: bool,
    pub user_agent: String,
    /// Debounce period for settings writes, in milliseconds.
    pub settings_save_timeout: u64,
    /// Idle period before the expanded glass bar collapses, in milliseconds.
    pub glass_close_timeout: u64,
    pub buttons: BTreeMap<String, ButtonConfig>,
    pub locations: Vec<Location>,
}

/// Missing fields are tolerated so a hand-edited entry never invalidates the
/// whole record; an empty icon is resolved by the asset fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonConfig {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// Ordinal slot on the glass bar (1-based).
    #[serde(default)]
    pub location: u32,
    #[serde(default)]
    pub icon: String,
}

fn enabled_by_default() -> bool {
    true
}

/// Navigation shortcut shown on the glass bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub icon: String,
}

/// Buttons every settings record carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonKey {
    Close,
    Move,
    Hide,
    Maximize,
    Minimize,
    AlwaysOnTop,
}

impl ButtonKey {
    pub const ALL: [ButtonKey; 6] = [
        ButtonKey::Close,
        ButtonKey::Move,
        ButtonKey::Hide,
        ButtonKey::Maximize,
        ButtonKey::Minimize,
        ButtonKey::AlwaysOnTop,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ButtonKey::Close => "close",
            ButtonKey::Move => "move",
            ButtonKey::Hide => "hide",
            ButtonKey::Maximize => "maximize",
            ButtonKey::Minimize => "minimize",
            ButtonKey::AlwaysOnTop => "alwaysontop",
        }
    }

    /// Slot the button occupies in the default layout.
    pub fn default_slot(self) -> u32 {
        match self {
            ButtonKey::Close => 1,
            ButtonKey::Move => 2,
            ButtonKey::Hide => 3,
            ButtonKey::Maximize => 4,
            ButtonKey::Minimize => 5,
            ButtonKey::AlwaysOnTop => 6,
        }
    }

    pub fn default_config(self) -> ButtonConfig {
        ButtonConfig {
            enabled: true,
            location: self.default_slot(),
            icon: self.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ButtonKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ButtonKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ButtonKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("unknown button: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub url: String,
    /// `data:` URI, absent when neither the icon nor the default image could be loaded.
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedButton {
    pub enabled: bool,
    pub location: u32,
    /// Inline SVG markup or a `data:` URI for remote icons.
    pub icon: Option<String>,
}

impl ResolvedButton {
    pub fn disabled(config: &ButtonConfig) -> Self {
        Self {
            enabled: false,
            location: config.location,
            icon: None,
        }
    }
}

/// Settings plus display-ready icon payloads, as handed to the glass UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfiguration {
    pub settings: Settings,
    pub locations: Vec<ResolvedLocation>,
    pub buttons: BTreeMap<String, ResolvedButton>,
    /// Modification time of the settings file at the last load or save.
    pub settings_time: Option<SystemTime>,
}
