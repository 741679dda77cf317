use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use glass_ipc::{ResolvedConfiguration, Settings};

use super::assets::AssetResolver;
use super::settings::{Defaulted, StoredSettings};
use super::timer::{Timer, TimerFired};
use crate::error::GlassError;
use crate::platform::{DisplayMetrics, Notifier};

pub const SETTINGS_FILE_NAME: &str = "settings.json";
const WELCOME_TITLE: &str = "Glass Initialized!";

/// Per-user location of the settings file.
pub fn default_settings_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("glass")
        .join(SETTINGS_FILE_NAME)
}

/// Collaborators needed to (re)build the resolved configuration.
pub struct LoadContext<'a> {
    pub resolver: &'a AssetResolver,
    pub display: &'a dyn DisplayMetrics,
    pub notifier: &'a dyn Notifier,
}

/// Owns the live settings, their resolved icons and the debounced save timer.
pub struct SettingsStore {
    path: PathBuf,
    config: ResolvedConfiguration,
    save_timer: Timer,
}

impl SettingsStore {
    /// Create the store and perform the initial load.
    pub async fn open(path: PathBuf, save_timer: Timer, ctx: &LoadContext<'_>) -> Self {
        let (config, dirty) = read_configuration(&path, ctx).await;
        let mut store = Self {
            path,
            config,
            save_timer,
        };
        if dirty {
            store.schedule_save();
        }
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &Settings {
        &self.config.settings
    }

    pub fn configuration(&self) -> &ResolvedConfiguration {
        &self.config
    }

    /// Current configuration, re-read from disk only when the settings file
    /// changed since the last load or save.
    pub async fn load(&mut self, ctx: &LoadContext<'_>) -> &ResolvedConfiguration {
        let modified = modified_time(&self.path).await;
        if modified.is_some() && modified == self.config.settings_time {
            tracing::debug!("Settings unchanged on disk, using cached configuration");
            return &self.config;
        }

        tracing::info!("Reloading settings from {}", self.path.display());
        let (config, dirty) = read_configuration(&self.path, ctx).await;
        self.config = config;
        if dirty {
            self.schedule_save();
        }
        &self.config
    }

    /// Change the live settings in place. Call [`Self::schedule_save`] afterwards.
    pub fn mutate<F: FnOnce(&mut Settings)>(&mut self, f: F) {
        f(&mut self.config.settings);
    }

    /// Start or restart the debounced save.
    pub fn schedule_save(&mut self) {
        let delay = Duration::from_millis(self.config.settings.settings_save_timeout);
        self.save_timer.schedule(delay);
    }

    pub fn save_pending(&self) -> bool {
        self.save_timer.is_pending()
    }

    /// Persist when the accepted save timer fires. Returns true if a save ran.
    pub async fn on_timer(&mut self, fired: TimerFired) -> bool {
        if !self.save_timer.accept(fired) {
            return false;
        }
        if let Err(e) = self.persist().await {
            tracing::error!("{}", e);
        }
        true
    }

    /// Write a pending save immediately, used on shutdown.
    pub async fn flush(&mut self) {
        if self.save_timer.cancel() {
            if let Err(e) = self.persist().await {
                tracing::error!("{}", e);
            }
        }
    }

    /// Serialize the live settings and remember the resulting file time.
    pub async fn persist(&mut self) -> Result<(), GlassError> {
        let json = serde_json::to_string_pretty(&self.config.settings)?;
        let persist_failure = |source| GlassError::PersistFailure {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(persist_failure)?;
        }
        tokio::fs::write(&self.path, json)
            .await
            .map_err(persist_failure)?;

        self.config.settings_time = modified_time(&self.path).await;
        tracing::debug!("Settings saved to {}", self.path.display());
        Ok(())
    }
}

async fn read_configuration(path: &Path, ctx: &LoadContext<'_>) -> (ResolvedConfiguration, bool) {
    let stored = match read_settings_file(path).await {
        Ok(text) => StoredSettings::parse(&text).unwrap_or_else(|e| {
            tracing::warn!("{}; starting from defaults", e);
            StoredSettings::default()
        }),
        Err(e) => {
            tracing::warn!("Failed to read {}: {}; starting from defaults", path.display(), e);
            StoredSettings::default()
        }
    };
    let settings_time = modified_time(path).await;

    let Defaulted {
        settings,
        dirty,
        first_run,
    } = stored.into_defaulted(ctx.display.work_area());

    if first_run {
        tracing::info!("First run, settings initialized at {}", path.display());
        ctx.notifier.notify(WELCOME_TITLE, &welcome_message(path));
    }

    let (locations, buttons) = ctx.resolver.resolve_all(&settings).await;

    let config = ResolvedConfiguration {
        settings,
        locations,
        buttons,
        settings_time,
    };
    (config, dirty)
}

/// Read the settings file, creating it as `{}` when missing or too short to hold a record.
async fn read_settings_file(path: &Path) -> std::io::Result<String> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let len = match tokio::fs::metadata(path).await {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => 0,
        Err(e) => return Err(e),
    };
    if len < 2 {
        tokio::fs::write(path, "{}").await?;
    }

    tokio::fs::read_to_string(path).await
}

async fn modified_time(path: &Path) -> Option<SystemTime> {
    tokio::fs::metadata(path).await.ok()?.modified().ok()
}

fn welcome_message(path: &Path) -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "friend".to_string());
    let dir = path.parent().unwrap_or(path);
    format!(
        "Welcome to glass, {}! You can change or add available locations and window configuration in the json settings file found at {}.",
        user,
        dir.display()
    )
}
