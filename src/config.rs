//! Desktop configuration
//!
//! Settings are read from `desktop.toml`. Every section falls back to its
//! defaults, so a partial file (or no file at all) is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::drag::HitRegion;
use crate::error::ConfigError;
use crate::geometry::Size;

pub const CONFIG_FILE: &str = "desktop.toml";

/// Dialogs are renumbered from the base when the z counter runs out
const MAX_DIALOG_Z_BASE: u32 = u32::MAX / 2;

/// Main configuration structure for the desktop
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DesktopConfig {
    pub stacking: StackingConfig,
    pub drag: DragConfig,
    pub typing: TypingConfig,
    pub content: ContentConfig,
    pub desktop: SurfaceConfig,
    pub audio: AudioConfig,
    pub prefs: PrefsConfig,
}

/// Z-order layers. Icons live entirely below the dialog layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StackingConfig {
    /// z-index of an icon at rest
    pub icon_resting_z: u32,
    /// z-index of an icon while it is being dragged
    pub icon_lifted_z: u32,
    /// Starting value of the shared dialog z-order counter
    pub dialog_z_base: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// Viewports at most this wide are "compact" and disable dragging
    pub compact_max_width: f64,
    /// Parts of a dialog that never start a drag or raise the dialog
    pub dialog_excluded_regions: Vec<HitRegion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingConfig {
    /// Delay between revealed title characters
    pub char_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Base URL that relative text locators are resolved against
    pub base_url: Option<String>,
    /// Style class wrapped around fetched text
    pub text_style: String,
    /// Style class of the inline error state
    pub error_style: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Viewport assumed until the front end reports the real one
    pub initial_viewport: Size,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub enabled: bool,
    pub volume: f32,
    pub asset_dir: PathBuf,
    /// Sample played when a dialog is created
    pub open_cue: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrefsConfig {
    /// Key of the theme flag inside the preference file
    pub theme_key: String,
    pub file_name: String,
}

impl Default for StackingConfig {
    fn default() -> Self {
        Self {
            icon_resting_z: 1,
            icon_lifted_z: 10,
            dialog_z_base: 1000,
        }
    }
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            compact_max_width: 768.0,
            dialog_excluded_regions: vec![HitRegion::CloseControl, HitRegion::FramedContent],
        }
    }
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self { char_delay_ms: 50 }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            text_style: "text-content".to_string(),
            error_style: "content-error".to_string(),
        }
    }
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            initial_viewport: Size::new(1280.0, 800.0),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 0.5,
            asset_dir: PathBuf::from("../assets/audio"),
            open_cue: "notification.mp3".to_string(),
        }
    }
}

impl Default for PrefsConfig {
    fn default() -> Self {
        Self {
            theme_key: "darkMode".to_string(),
            file_name: "preferences.json".to_string(),
        }
    }
}

impl DesktopConfig {
    /// Load and validate configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `desktop.toml` from the current directory, or defaults when it is
    /// missing or unusable
    pub fn load_or_default() -> Self {
        match Self::load_from_file(CONFIG_FILE) {
            Ok(config) => config,
            Err(ConfigError::Read { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                Self::default()
            }
            Err(e) => {
                log::warn!("[Config] {}; using defaults", e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.stacking;
        if s.icon_resting_z > s.icon_lifted_z {
            return Err(ConfigError::Invalid(format!(
                "icon_resting_z ({}) is above icon_lifted_z ({})",
                s.icon_resting_z, s.icon_lifted_z
            )));
        }
        if s.icon_lifted_z >= s.dialog_z_base {
            return Err(ConfigError::Invalid(format!(
                "icon_lifted_z ({}) must stay below dialog_z_base ({})",
                s.icon_lifted_z, s.dialog_z_base
            )));
        }
        if s.dialog_z_base > MAX_DIALOG_Z_BASE {
            return Err(ConfigError::Invalid(format!(
                "dialog_z_base ({}) leaves no room to restack above it (max {})",
                s.dialog_z_base, MAX_DIALOG_Z_BASE
            )));
        }
        Ok(())
    }
}
