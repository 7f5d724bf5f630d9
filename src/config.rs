use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::Level;

use crate::common::Size;
use crate::error::SettingsError;

pub const DEFAULT_CONFIG_PATH: &str = "conf/config.json";
const ENV_PREFIX: &str = "SCENE";

/// Application settings, read from `conf/config.json` and overridable through
/// `SCENE_*` environment variables (e.g. `SCENE_TICK_INTERVAL_MS=100`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub target_window_title: String,
    /// Directory holding the per-template JSON files.
    pub template_dir: PathBuf,
    /// Catalog index listing the templates to load.
    pub template_config: PathBuf,
    /// Screenshots replayed as the target window.
    pub frame_dir: PathBuf,
    /// Debug display size; detected boxes are mapped onto it for overlays.
    pub new_width: u32,
    pub new_height: u32,
    pub tick_interval_ms: u64,
    pub fps_interval_ms: u64,
    pub log_level: String,
    pub save_img_name: String,
    pub capture_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_window_title: String::from("阴阳师-网易游戏"),
            template_dir: PathBuf::from("static/templates"),
            template_config: PathBuf::from("conf/template.json"),
            frame_dir: PathBuf::from("static/images/frames"),
            new_width: 1136,
            new_height: 640,
            tick_interval_ms: 50,
            fps_interval_ms: 1000,
            log_level: String::from("info"),
            save_img_name: String::from("capture.png"),
            capture_dir: PathBuf::from("static/images/cap"),
        }
    }
}

impl Settings {
    /// Loads `path` (format picked from its extension) with environment overrides on top.
    /// A missing file is only an error when `required` is set.
    pub fn load(path: &Path, required: bool) -> Result<Self, SettingsError> {
        let load_error = |source| SettingsError::Load {
            path: path.to_path_buf(),
            source,
        };
        let settings: Settings = config::Config::builder()
            .add_source(config::File::from(path).required(required))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .map_err(load_error)?
            .try_deserialize()
            .map_err(load_error)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.new_width == 0 || self.new_height == 0 {
            return Err(SettingsError::Invalid(
                "new_width/new_height",
                format!("{}x{} is empty", self.new_width, self.new_height),
            ));
        }
        if self.tick_interval_ms == 0 {
            return Err(SettingsError::Invalid(
                "tick_interval_ms",
                "must be greater than 0".to_string(),
            ));
        }
        if self.fps_interval_ms == 0 {
            return Err(SettingsError::Invalid(
                "fps_interval_ms",
                "must be greater than 0".to_string(),
            ));
        }
        if self.save_img_name.trim().is_empty() {
            return Err(SettingsError::Invalid(
                "save_img_name",
                "must not be empty".to_string(),
            ));
        }
        self.log_level()?;
        Ok(())
    }

    pub fn log_level(&self) -> Result<Level, SettingsError> {
        self.log_level
            .parse::<Level>()
            .map_err(|_| SettingsError::Invalid("log_level", self.log_level.clone()))
    }

    pub fn display_size(&self) -> Size {
        Size::new(self.new_width, self.new_height)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn fps_interval(&self) -> Duration {
        Duration::from_millis(self.fps_interval_ms)
    }

    pub fn save_path(&self) -> PathBuf {
        self.capture_dir.join(&self.save_img_name)
    }
}
