use serde::{Deserialize, Serialize};

use crate::{Bounds, ResolvedConfiguration};

/// Named commands sent by the glass UI, the content surface, the host window and the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Command {
    // Glass bar
    PopOut,
    PopIn,
    HoverIn,
    HoverOut,

    // Window controls
    Close,
    Minimize,
    ToggleMaximize,
    #[serde(rename = "toggle-alwaysontop")]
    ToggleAlwaysOnTop,

    // Content surface
    Navigate { url: String },
    ClickedIn,
    OnLoadedContent,
    OnLeaving,

    // Host window events
    WindowResized { bounds: Bounds },
    WindowMoved { bounds: Bounds },

    // Queries
    GetConfiguration,
    GetContentCss,
    GetState,
}

impl Command {
    /// Wire name of the command, as used in logs and by the CLI.
    pub fn name(&self) -> &'static str {
        match self {
            Command::PopOut => "pop-out",
            Command::PopIn => "pop-in",
            Command::HoverIn => "hover-in",
            Command::HoverOut => "hover-out",
            Command::Close => "close",
            Command::Minimize => "minimize",
            Command::ToggleMaximize => "toggle-maximize",
            Command::ToggleAlwaysOnTop => "toggle-alwaysontop",
            Command::Navigate { .. } => "navigate",
            Command::ClickedIn => "clicked-in",
            Command::OnLoadedContent => "on-loaded-content",
            Command::OnLeaving => "on-leaving",
            Command::WindowResized { .. } => "window-resized",
            Command::WindowMoved { .. } => "window-moved",
            Command::GetConfiguration => "get-configuration",
            Command::GetContentCss => "get-content-css",
            Command::GetState => "get-state",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Ok,
    Error {
        message: String,
    },
    Configuration {
        configuration: Box<ResolvedConfiguration>,
    },
    Css {
        text: String,
    },
    State {
        state: StateInfo,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateInfo {
    pub is_out: bool,
    pub main_bounds: Bounds,
    pub overlay_bounds: Bounds,
    pub content_visible: bool,
    pub is_maximized: bool,
    pub is_always_on_top: bool,
    pub settings_path: String,
}
