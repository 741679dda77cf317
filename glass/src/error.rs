use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GlassError {
    /// Settings file could not be parsed; it is treated as an empty record.
    #[error("settings file is corrupt: {0}")]
    ConfigCorrupt(#[source] serde_json::Error),

    #[error("icon '{icon}' unavailable: {reason}")]
    AssetUnavailable { icon: String, reason: String },

    #[error("failed to persist settings to {}: {source}", path.display())]
    PersistFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load {url}: {reason}")]
    NavigationFailure { url: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
