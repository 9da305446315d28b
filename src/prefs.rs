// Persisted user preferences. Currently only the dark-mode flag, stored as a
// small JSON object in the app data directory.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::config::PrefsConfig;
use crate::error::PrefsError;

pub struct PreferenceStore {
    path: PathBuf,
    theme_key: String,
}

impl PreferenceStore {
    pub fn new(dir: impl AsRef<Path>, config: &PrefsConfig) -> Self {
        Self {
            path: dir.as_ref().join(&config.file_name),
            theme_key: config.theme_key.clone(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current dark-mode flag. A missing or unreadable file reads as light.
    pub async fn dark_mode(&self) -> bool {
        self.read_all()
            .await
            .get(&self.theme_key)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Flip the dark-mode flag and persist it. Returns the new value.
    pub async fn toggle_theme(&self) -> Result<bool, PrefsError> {
        let mut prefs = self.read_all().await;
        let dark = !prefs
            .get(&self.theme_key)
            .and_then(Value::as_bool)
            .unwrap_or(false);
        prefs.insert(self.theme_key.clone(), Value::Bool(dark));
        self.write_all(&prefs).await?;
        log::info!("[Prefs] Theme set to {}", if dark { "dark" } else { "light" });
        Ok(dark)
    }

    async fn read_all(&self) -> Map<String, Value> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Map::new(),
            Err(e) => {
                log::warn!("[Prefs] Failed to read {:?}: {}", self.path, e);
                return Map::new();
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                log::warn!("[Prefs] Ignoring malformed {:?}", self.path);
                Map::new()
            }
        }
    }

    async fn write_all(&self, prefs: &Map<String, Value>) -> Result<(), PrefsError> {
        let io_err = |source| PrefsError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir).await.map_err(io_err)?;
        }
        let body = serde_json::to_string_pretty(prefs)?;
        tokio::fs::write(&self.path, body).await.map_err(io_err)
    }
}
