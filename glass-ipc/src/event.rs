use serde::{Deserialize, Serialize};

use crate::Bounds;

/// Filter for subscribing to specific host request groups
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostFilter {
    /// Main window requests (fullscreen, always-on-top, minimize, quit)
    #[serde(default)]
    pub window: bool,
    /// Glass overlay requests (overlay bounds, close glass)
    #[serde(default)]
    pub overlay: bool,
    /// Content surface requests (content bounds, load url)
    #[serde(default)]
    pub content: bool,
    /// Desktop notifications
    #[serde(default)]
    pub notification: bool,
}

impl HostFilter {
    /// Create a filter that subscribes to all requests
    pub fn all() -> Self {
        Self {
            window: true,
            overlay: true,
            content: true,
            notification: true,
        }
    }

    /// Check if the filter matches a given request
    pub fn matches(&self, request: &HostRequest) -> bool {
        match request {
            HostRequest::SetFullscreen { .. }
            | HostRequest::SetAlwaysOnTop { .. }
            | HostRequest::Minimize
            | HostRequest::Quit => self.window,
            HostRequest::SetOverlayBounds { .. } | HostRequest::CloseGlass => self.overlay,
            HostRequest::SetContentBounds { .. } | HostRequest::LoadUrl { .. } => self.content,
            HostRequest::Notify { .. } => self.notification,
            HostRequest::Setup { .. } => true,
        }
    }

    pub fn any(&self) -> bool {
        self.window || self.overlay || self.content || self.notification
    }
}

/// Request sent by a host process when it connects to the host socket
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubscribeRequest {
    /// Whether to send the initial window setup on connection
    #[serde(default)]
    pub snapshot: bool,
    /// Request filter (if not set or all false, subscribes to everything)
    #[serde(default)]
    pub filter: HostFilter,
}

impl SubscribeRequest {
    pub fn with_snapshot() -> Self {
        Self {
            snapshot: true,
            filter: HostFilter::default(),
        }
    }

    /// Get the effective filter (all if none specified)
    pub fn effective_filter(&self) -> HostFilter {
        if self.filter.any() {
            self.filter.clone()
        } else {
            HostFilter::all()
        }
    }
}

/// Everything a host needs to build the main window, the content surface and the overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSetup {
    pub main_bounds: Bounds,
    pub overlay_bounds: Bounds,
    pub content_bounds: Bounds,
    pub fullscreen: bool,
    pub always_on_top: bool,
    pub user_agent: String,
    pub start_url: String,
}

/// Operations the daemon asks the host window system to perform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostRequest {
    Setup { window: WindowSetup },
    SetOverlayBounds { bounds: Bounds },
    SetContentBounds { bounds: Bounds },
    SetFullscreen { enabled: bool },
    SetAlwaysOnTop { enabled: bool },
    Minimize,
    LoadUrl { url: String, user_agent: String },
    /// Tell the glass UI to play its closing transition.
    CloseGlass,
    Notify { title: String, body: String },
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_all_matches_everything() {
        let filter = HostFilter::all();
        assert!(filter.matches(&HostRequest::Minimize));
        assert!(filter.matches(&HostRequest::CloseGlass));
        assert!(filter.matches(&HostRequest::Notify {
            title: "t".to_string(),
            body: "b".to_string(),
        }));
    }

    #[test]
    fn test_overlay_filter() {
        let filter = HostFilter {
            overlay: true,
            ..Default::default()
        };
        assert!(filter.matches(&HostRequest::CloseGlass));
        assert!(filter.matches(&HostRequest::SetOverlayBounds {
            bounds: Bounds::default()
        }));
        assert!(!filter.matches(&HostRequest::SetFullscreen { enabled: true }));
        assert!(!filter.matches(&HostRequest::LoadUrl {
            url: "https://www.netflix.com".to_string(),
            user_agent: String::new(),
        }));
    }

    #[test]
    fn test_setup_always_passes_filter() {
        let filter = HostFilter {
            notification: true,
            ..Default::default()
        };
        let setup = HostRequest::Setup {
            window: WindowSetup {
                main_bounds: Bounds::new(0, 0, 1280, 720),
                overlay_bounds: Bounds::new(64, 0, 1152, 16),
                content_bounds: Bounds::default(),
                fullscreen: false,
                always_on_top: false,
                user_agent: "ua".to_string(),
                start_url: "https://www.crunchyroll.com".to_string(),
            },
        };
        assert!(filter.matches(&setup));
    }

    #[test]
    fn test_effective_filter_defaults_to_all() {
        let request = SubscribeRequest::with_snapshot();
        let filter = request.effective_filter();
        assert!(filter.window && filter.overlay && filter.content && filter.notification);
    }

    #[test]
    fn test_subscribe_request_from_empty_object() {
        let request: SubscribeRequest = serde_json::from_str("{}").unwrap();
        assert!(!request.snapshot);
        assert!(!request.filter.any());
    }

    #[test]
    fn test_host_request_serialization() {
        let json = serde_json::to_string(&HostRequest::CloseGlass).unwrap();
        assert_eq!(json, "{\"type\":\"close_glass\"}");

        let json = serde_json::to_string(&HostRequest::SetFullscreen { enabled: true }).unwrap();
        assert_eq!(json, "{\"type\":\"set_fullscreen\",\"enabled\":true}");
    }
}
