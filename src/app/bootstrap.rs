use crate::config::{load_app_config, AppConfig};
use crate::pin::{detect_pin_backend, PinBackend};
use crate::theme::{ColorScheme, SystemThemeSource, ThemeError, ThemeResult};
use gtk4::prelude::ObjectExt;

/// GTK properties whose change means the desktop scheme may have flipped.
pub(super) const THEME_SETTING_PROPERTIES: [&str; 3] = [
    "gtk-theme-name",
    "gtk-application-prefer-dark-theme",
    "gtk-interface-color-scheme",
];

pub(super) struct NoteBootstrap {
    pub(super) config: AppConfig,
    pub(super) backend: PinBackend,
}

pub(super) fn bootstrap_note_runtime() -> NoteBootstrap {
    let config = load_app_config();
    tracing::info!(
        handle = ?config.drag_handle,
        hide_toolbar_on_blur = config.hide_toolbar_on_blur,
        font_family = config.font_family,
        width = config.window_width,
        height = config.window_height,
        "loaded note config"
    );
    let backend = detect_pin_backend();

    NoteBootstrap { config, backend }
}

/// Reads the desktop scheme from `GtkSettings` each time it is asked.
#[derive(Debug, Clone)]
pub(super) struct GtkSettingsThemeSource {
    settings: Option<gtk4::Settings>,
}

impl GtkSettingsThemeSource {
    pub(super) fn new(settings: Option<gtk4::Settings>) -> Self {
        Self { settings }
    }
}

impl SystemThemeSource for GtkSettingsThemeSource {
    fn color_scheme(&self) -> ThemeResult<ColorScheme> {
        let settings = self
            .settings
            .as_ref()
            .ok_or(ThemeError::SettingsUnavailable)?;
        system_scheme_from_settings(settings).ok_or(ThemeError::SchemeUnavailable)
    }
}

fn system_scheme_from_settings(settings: &gtk4::Settings) -> Option<ColorScheme> {
    if settings
        .list_properties()
        .iter()
        .any(|prop| prop.name() == "gtk-interface-color-scheme")
    {
        let color_scheme = settings.property_value("gtk-interface-color-scheme");
        if let Ok(raw_scheme) = color_scheme.get::<i32>() {
            if let Some(scheme) = scheme_from_interface_value(raw_scheme) {
                return Some(scheme);
            }
        }
    }

    if let Some(theme_name) = settings.gtk_theme_name() {
        if let Some(scheme) = scheme_from_theme_name(theme_name.as_str()) {
            return Some(scheme);
        }
    }

    #[allow(deprecated)]
    {
        Some(if settings.is_gtk_application_prefer_dark_theme() {
            ColorScheme::Dark
        } else {
            ColorScheme::Light
        })
    }
}

fn scheme_from_interface_value(raw_scheme: i32) -> Option<ColorScheme> {
    match raw_scheme {
        // GTK_INTERFACE_COLOR_SCHEME_DARK
        2 => Some(ColorScheme::Dark),
        // GTK_INTERFACE_COLOR_SCHEME_LIGHT
        3 => Some(ColorScheme::Light),
        // UNSUPPORTED or DEFAULT keep the fallback path
        _ => None,
    }
}

fn scheme_from_theme_name(theme_name: &str) -> Option<ColorScheme> {
    let normalized = theme_name.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        return None;
    }
    if normalized.contains("dark") {
        return Some(ColorScheme::Dark);
    }
    if normalized.contains("light") {
        return Some(ColorScheme::Light);
    }
    None
}
