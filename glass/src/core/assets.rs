use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use glass_ipc::{ButtonConfig, Location, ResolvedButton, ResolvedLocation, Settings};
use reqwest::header::CONTENT_TYPE;

use crate::error::GlassError;

const LOCATIONS_DIR: &str = "locations";
const BUTTONS_DIR: &str = "buttons";
const DEFAULT_LOCATION_ICON: &str = "default";
const CONTENT_CSS: &str = "content.css";

/// True if `s` parses as an absolute http or https URL.
pub fn is_http_url(s: &str) -> bool {
    match url::Url::parse(s) {
        Ok(url) => url.scheme() == "http" || url.scheme() == "https",
        Err(_) => false,
    }
}

/// Turns logical icon names or URLs into display-ready payloads.
///
/// Location icons fall back to the bundled default image; button icons that
/// cannot be resolved disable their button instead.
pub struct AssetResolver {
    resources: PathBuf,
    client: reqwest::Client,
}

impl AssetResolver {
    pub fn new(resources: impl Into<PathBuf>) -> Self {
        Self {
            resources: resources.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn resources(&self) -> &Path {
        &self.resources
    }

    pub async fn resolve_all(
        &self,
        settings: &Settings,
    ) -> (Vec<ResolvedLocation>, BTreeMap<String, ResolvedButton>) {
        let mut locations = Vec::with_capacity(settings.locations.len());
        for location in &settings.locations {
            locations.push(self.resolve_location(location).await);
        }

        let mut buttons = BTreeMap::new();
        for (key, button) in &settings.buttons {
            buttons.insert(key.clone(), self.resolve_button(key, button).await);
        }

        (locations, buttons)
    }

    pub async fn resolve_location(&self, location: &Location) -> ResolvedLocation {
        let icon = match self.location_icon(&location.icon).await {
            Ok(icon) => Some(icon),
            Err(e) => {
                tracing::warn!("{}; using default location image", e);
                self.default_location_icon().await
            }
        };
        ResolvedLocation {
            url: location.url.clone(),
            icon,
        }
    }

    pub async fn resolve_button(&self, key: &str, button: &ButtonConfig) -> ResolvedButton {
        match self.button_icon(&button.icon).await {
            Ok(icon) => ResolvedButton {
                enabled: button.enabled,
                location: button.location,
                icon: Some(icon),
            },
            Err(e) => {
                tracing::warn!("{}; disabling button '{}'", e, key);
                ResolvedButton::disabled(button)
            }
        }
    }

    /// Stylesheet injected into the content surface.
    pub async fn content_css(&self) -> Result<String, GlassError> {
        Ok(tokio::fs::read_to_string(self.resources.join(CONTENT_CSS)).await?)
    }

    async fn location_icon(&self, icon: &str) -> Result<String, GlassError> {
        if icon.is_empty() {
            return Err(no_icon());
        }
        if is_http_url(icon) {
            return self.fetch_data_uri(icon).await;
        }
        let path = self.resources.join(LOCATIONS_DIR).join(format!("{}.png", icon));
        png_data_uri(icon, &path).await
    }

    async fn default_location_icon(&self) -> Option<String> {
        let path = self
            .resources
            .join(LOCATIONS_DIR)
            .join(format!("{}.png", DEFAULT_LOCATION_ICON));
        match png_data_uri(DEFAULT_LOCATION_ICON, &path).await {
            Ok(icon) => Some(icon),
            Err(e) => {
                tracing::error!("{}", e);
                None
            }
        }
    }

    /// Button icons are inlined as SVG markup; remote ones become data URIs.
    async fn button_icon(&self, icon: &str) -> Result<String, GlassError> {
        if icon.is_empty() {
            return Err(no_icon());
        }
        if is_http_url(icon) {
            return self.fetch_data_uri(icon).await;
        }
        let path = self.resources.join(BUTTONS_DIR).join(format!("{}.svg", icon));
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| GlassError::AssetUnavailable {
                icon: icon.to_string(),
                reason: format!("{}: {}", path.display(), e),
            })
    }

    async fn fetch_data_uri(&self, url: &str) -> Result<String, GlassError> {
        let unavailable = |reason: String| GlassError::AssetUnavailable {
            icon: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| unavailable(e.to_string()))?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        tracing::debug!("Fetched icon {} ({} bytes, {})", url, bytes.len(), content_type);
        Ok(data_uri(&content_type, &bytes))
    }
}

fn no_icon() -> GlassError {
    GlassError::AssetUnavailable {
        icon: String::new(),
        reason: "no icon configured".to_string(),
    }
}

fn data_uri(content_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", content_type, STANDARD.encode(bytes))
}

async fn png_data_uri(icon: &str, path: &Path) -> Result<String, GlassError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| GlassError::AssetUnavailable {
            icon: icon.to_string(),
            reason: format!("{}: {}", path.display(), e),
        })?;
    Ok(data_uri("image/png", &bytes))
}
