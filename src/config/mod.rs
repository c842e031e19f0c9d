use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::drag::HandleRegion;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfigPathError {
    MissingHomeDirectory,
}

const APP_DIR: &str = "tacknote";
const APP_CONFIG_FILE: &str = "config.json";

pub(crate) const DEFAULT_FONT_FAMILY: &str = "Source Han Sans SC";
const DEFAULT_WINDOW_WIDTH: i32 = 500;
const DEFAULT_WINDOW_HEIGHT: i32 = 400;
const MIN_WINDOW_EDGE: i32 = 120;

/// Application-level settings from `config.json`.
///
/// Read once at startup; the app never writes this file.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AppConfig {
    #[serde(default)]
    pub(crate) drag_handle: HandleRegion,
    #[serde(default = "default_true")]
    pub(crate) hide_toolbar_on_blur: bool,
    #[serde(default = "default_font_family")]
    pub(crate) font_family: String,
    #[serde(default = "default_window_width")]
    pub(crate) window_width: i32,
    #[serde(default = "default_window_height")]
    pub(crate) window_height: i32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            drag_handle: HandleRegion::default(),
            hide_toolbar_on_blur: true,
            font_family: default_font_family(),
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

impl AppConfig {
    fn sanitized(mut self) -> Self {
        if self.font_family.trim().is_empty() {
            tracing::warn!("empty font_family in config.json; using default");
            self.font_family = default_font_family();
        }
        self.window_width = self.window_width.max(MIN_WINDOW_EDGE);
        self.window_height = self.window_height.max(MIN_WINDOW_EDGE);
        self
    }
}

fn default_true() -> bool {
    true
}

fn default_font_family() -> String {
    DEFAULT_FONT_FAMILY.to_string()
}

fn default_window_width() -> i32 {
    DEFAULT_WINDOW_WIDTH
}

fn default_window_height() -> i32 {
    DEFAULT_WINDOW_HEIGHT
}

pub(crate) fn load_app_config() -> AppConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_app_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_app_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> AppConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(err) => {
            tracing::debug!(?err, "no config directory; using defaults");
            return AppConfig::default();
        }
    };
    if !path.exists() {
        return AppConfig::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(contents) => serde_json::from_str::<AppConfig>(&contents)
            .map(AppConfig::sanitized)
            .unwrap_or_else(|err| {
                tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
                AppConfig::default()
            }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            AppConfig::default()
        }
    }
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub(crate) fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}
